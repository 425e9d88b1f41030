use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::types::contact::{Citation, ContactRecord};

// ===== Extraction Output =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub contact_info: ContactRecord,
    pub sources: Vec<Citation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error_code: String,
}

impl From<&ExtractionError> for ErrorResponse {
    fn from(e: &ExtractionError) -> Self {
        Self {
            message: e.to_string(),
            error_code: e.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_wire_shape() {
        let result = ExtractionResult {
            contact_info: ContactRecord::default(),
            sources: vec![Citation {
                uri: "https://example.com".to_string(),
                title: None,
            }],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("contactInfo").is_some());
        assert_eq!(value["sources"][0]["uri"], "https://example.com");
        assert!(value["sources"][0]["title"].is_null());
    }

    #[test]
    fn test_error_response_carries_message() {
        let response = ErrorResponse::from(&ExtractionError::NoJsonFound);
        assert_eq!(response.error_code, "NO_JSON_FOUND");
        assert!(response.message.contains("valid JSON object"));
    }
}
