use serde::{Deserialize, Serialize};

/// Response envelope shared by every dashboard endpoint:
/// `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Unwrap the envelope into the payload or the server-side error message
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(error)) => Err(error),
            (true, None, None) => Err("Respuesta sin datos".to_string()),
            (false, _, None) => Err("Error desconocido".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_without_data() {
        let env: ApiEnvelope<Vec<u32>> = ApiEnvelope::failure("boom");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn into_result_prefers_error_message() {
        let env: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success": false, "error": "sin conexión"}"#).unwrap();
        assert_eq!(env.into_result(), Err("sin conexión".to_string()));

        let env: ApiEnvelope<u32> = serde_json::from_str(r#"{"success": true, "data": 7}"#).unwrap();
        assert_eq!(env.into_result(), Ok(7));
    }
}
