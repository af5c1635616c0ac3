// RequestContext - per-request identity passed explicitly to handlers
//
// There is no authentication. A client may name the acting user with the
// `x-user-id` header; request bodies that carry an explicit id take precedence.

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub viewer_id: Option<i64>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>, viewer_id: Option<i64>) -> Self {
        Self {
            request_id: request_id.into(),
            viewer_id,
        }
    }

    pub fn anonymous(request_id: impl Into<String>) -> Self {
        Self::new(request_id, None)
    }

    /// Pick the acting user: the explicit body value if present, otherwise
    /// the viewer from the header. `field` names the body field in the error.
    pub fn resolve_user(&self, explicit: Option<i64>, field: &str) -> AppResult<i64> {
        explicit.or(self.viewer_id).ok_or_else(|| {
            AppError::BadRequest(format!("{} is required (or send the x-user-id header)", field))
        })
    }
}
