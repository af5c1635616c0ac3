// Request context middleware - request id and optional viewer per request

pub mod request_context;
pub mod request_context_extractor;
pub mod request_context_middleware;

pub use request_context::RequestContext;
pub use request_context_extractor::Ctx;
pub use request_context_middleware::request_context_middleware;
