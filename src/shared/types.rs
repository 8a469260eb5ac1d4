use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned for client errors
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponseDto {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponseDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_are_omitted_when_absent() {
        let body = serde_json::to_value(ErrorResponseDto::new("File ID is required")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "File ID is required" }));

        let body =
            serde_json::to_value(ErrorResponseDto::with_details("File upload failed", "timeout"))
                .unwrap();
        assert_eq!(body["details"], "timeout");
    }
}
