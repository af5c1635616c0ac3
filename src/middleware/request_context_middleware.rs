// RequestContext middleware - builds the context from headers and injects it
// into request extensions; echoes the request id on the response

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::RequestContext;
use crate::error::{AppError, AppResult};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let ctx = match context_from_headers(request.headers()) {
        Ok(ctx) => Arc::new(ctx),
        Err(err) => return err.into_response(),
    };
    debug!(
        "{} {} request_id={} viewer={:?}",
        request.method(),
        request.uri().path(),
        ctx.request_id,
        ctx.viewer_id
    );

    request.extensions_mut().insert(ctx.clone());
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn context_from_headers(headers: &HeaderMap) -> AppResult<RequestContext> {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("req-{}", Uuid::new_v4()));

    let viewer_id = match headers.get(USER_ID_HEADER) {
        None => None,
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::BadRequest(format!("{} header is not valid text", USER_ID_HEADER)))?;
            let id = raw.trim().parse::<i64>().map_err(|_| {
                AppError::BadRequest(format!("{} header must be a numeric user id, got '{}'", USER_ID_HEADER, raw))
            })?;
            Some(id)
        }
    };

    Ok(RequestContext::new(request_id, viewer_id))
}
