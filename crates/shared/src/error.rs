use serde::{Deserialize, Serialize};

use crate::domain::UnknownFeature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

/// Error body returned by the HTTP surface. Feature failures are not
/// reported this way; they travel as rendered error views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<UnknownFeature> for ApiError {
    fn from(value: UnknownFeature) -> Self {
        Self::new(ErrorCode::NotFound, value.to_string())
    }
}
