//! Normalized API failure shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status used for failures that never produced an HTTP response.
pub const TRANSPORT_STATUS: u16 = 0;

/// Every backend failure folds into this shape: transport errors, non-2xx
/// responses and undecodable bodies alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, or [`TRANSPORT_STATUS`] when no usable response was received.
    pub status: u16,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: TRANSPORT_STATUS,
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.status == TRANSPORT_STATUS
    }
}

/// Result of every backend call.
pub type ApiResponse<T> = Result<T, ApiError>;

/// Tagged envelope handed to the UI boundary: `{success, data?, error?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiOutcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> From<ApiResponse<T>> for ApiOutcome<T> {
    fn from(response: ApiResponse<T>) -> Self {
        match response {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                success: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::http(404, "Property not found");
        assert_eq!(err.to_string(), "Property not found (status 404)");
        assert!(!err.is_transport());
        assert!(ApiError::transport("connection refused").is_transport());
    }

    #[test]
    fn test_outcome_shape() {
        let ok: ApiOutcome<u32> = Ok(7).into();
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({ "success": true, "data": 7 })
        );

        let failed: ApiOutcome<u32> = Err(ApiError::http(400, "Missing name")).into();
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({
                "success": false,
                "error": { "message": "Missing name", "status": 400 }
            })
        );
    }
}
