// Ctx extractor - hands the request's RequestContext to handlers

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::sync::Arc;

use super::RequestContext;

/// Cheap to clone; derefs to the shared `RequestContext`.
#[derive(Debug, Clone)]
pub struct Ctx(Arc<RequestContext>);

impl Ctx {
    pub fn new(ctx: Arc<RequestContext>) -> Self {
        Self(ctx)
    }
}

impl std::ops::Deref for Ctx {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Missing context means the middleware was not layered on this route
impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let ctx = parts
            .extensions
            .get::<Arc<RequestContext>>()
            .map(|ctx| Ctx(ctx.clone()))
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR);

        async move { ctx }
    }
}
