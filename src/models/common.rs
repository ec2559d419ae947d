use serde::{Deserialize, Serialize};

/// Envelope shared by every JSON response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: String) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message),
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_skips_empty_fields() {
        let body = serde_json::to_value(ApiResponse::success(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"id": 1}}));

        let body = serde_json::to_value(ApiResponse::message("File deleted successfully".into()))
            .unwrap();
        assert_eq!(
            body,
            json!({"success": true, "message": "File deleted successfully"})
        );

        let body = serde_json::to_value(ApiResponse::error("Memorial page not found".into()))
            .unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": "Memorial page not found"})
        );
    }
}
