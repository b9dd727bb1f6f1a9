//! HTTP handlers for the dashboard service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) mod dashboard;
pub(crate) mod health;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod session;

/// Generic error body. Deliberately says nothing about what failed.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn unauthorized() -> Self {
        Self {
            error: "unauthorized".to_string(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self {
            error: "internal error".to_string(),
        }
    }
}
