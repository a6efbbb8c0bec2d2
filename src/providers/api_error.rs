//! Response payload of the pair endpoints and mapping of its `error-type` tag.

use crate::core::currency::{Amount, Rate};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const SUCCESS: &str = "success";

/// Decoded body of a pair or pair/amount request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub result: String,
    #[serde(rename = "error-type", default)]
    pub error_type: Option<String>,
    #[serde(rename = "conversion_rate", default, deserialize_with = "null_as_zero")]
    pub rate: Rate,
    #[serde(rename = "conversion_result", default, deserialize_with = "null_as_zero")]
    pub amount: Amount,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.result == SUCCESS
    }
}

/// Failure reported by the service inside an otherwise well formed response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Unsupported code")]
    UnsupportedCode,
    #[error("Malformed request")]
    MalformedRequest,
    #[error("Invalid key")]
    InvalidKey,
    #[error("Inactive account")]
    InactiveAccount,
    #[error("Quota reached")]
    QuotaReached,
    #[error("Plan upgrade required")]
    PlanUpgradeRequired,
    #[error("Unexpected error type: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "unsupported-code" => ApiError::UnsupportedCode,
            "malformed-request" => ApiError::MalformedRequest,
            "invalid-key" => ApiError::InvalidKey,
            "inactive-account" => ApiError::InactiveAccount,
            "quota-reached" => ApiError::QuotaReached,
            "plan-upgrade-required" => ApiError::PlanUpgradeRequired,
            other => ApiError::Unexpected(other.to_string()),
        }
    }

    /// The wire tag this error was mapped from.
    pub fn tag(&self) -> &str {
        match self {
            ApiError::UnsupportedCode => "unsupported-code",
            ApiError::MalformedRequest => "malformed-request",
            ApiError::InvalidKey => "invalid-key",
            ApiError::InactiveAccount => "inactive-account",
            ApiError::QuotaReached => "quota-reached",
            ApiError::PlanUpgradeRequired => "plan-upgrade-required",
            ApiError::Unexpected(tag) => tag,
        }
    }
}

/// Maps a non-success response to its [`ApiError`]. The `error-type` field of a
/// successful response is never looked at.
pub fn response_api_error(response: &Response) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }

    Err(ApiError::from_tag(
        response.error_type.as_deref().unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_response(tag: &str) -> Response {
        Response {
            result: "error".to_string(),
            error_type: Some(tag.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_recognized_tags_map_to_messages() {
        let cases = [
            ("unsupported-code", "Unsupported code"),
            ("malformed-request", "Malformed request"),
            ("invalid-key", "Invalid key"),
            ("inactive-account", "Inactive account"),
            ("quota-reached", "Quota reached"),
            ("plan-upgrade-required", "Plan upgrade required"),
        ];

        for (tag, message) in cases {
            let err = response_api_error(&error_response(tag)).unwrap_err();
            assert_eq!(err.to_string(), message, "tag {tag}");
            assert_eq!(err.tag(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_still_an_error() {
        let err = response_api_error(&error_response("foo-bar")).unwrap_err();
        assert_eq!(err, ApiError::Unexpected("foo-bar".to_string()));
        assert_eq!(err.to_string(), "Unexpected error type: foo-bar");
    }

    #[test]
    fn test_error_without_tag() {
        let response = Response {
            result: "error".to_string(),
            ..Default::default()
        };
        let err = response_api_error(&response).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected error type: ");
    }

    #[test]
    fn test_success_ignores_error_type() {
        let mut response = Response {
            result: SUCCESS.to_string(),
            ..Default::default()
        };
        assert!(response_api_error(&response).is_ok());

        response.error_type = Some("invalid-key".to_string());
        assert!(response_api_error(&response).is_ok());
    }

    #[test]
    fn test_missing_result_is_not_success() {
        let response: Response = serde_json::from_str(r#"{"error-type": "invalid-key"}"#).unwrap();
        assert!(!response.is_success());
        assert_eq!(
            response_api_error(&response).unwrap_err(),
            ApiError::InvalidKey
        );
    }

    #[test]
    fn test_null_numbers_read_as_zero() {
        let body = r#"{
            "result": "error",
            "error-type": "quota-reached",
            "conversion_rate": null,
            "conversion_result": null
        }"#;
        let response: Response = serde_json::from_str(body).unwrap();
        assert_eq!(response.rate, 0.0);
        assert_eq!(response.amount, 0.0);
        assert_eq!(
            response_api_error(&response).unwrap_err(),
            ApiError::QuotaReached
        );
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{
            "result": "success",
            "documentation": "https://www.exchangerate-api.com/docs",
            "base_code": "USD",
            "target_code": "EUR",
            "conversion_rate": 0.9013,
            "conversion_result": 11.26625
        }"#;
        let response: Response = serde_json::from_str(body).unwrap();
        assert!(response.is_success());
        assert_eq!(response.rate, 0.9013);
        assert_eq!(response.amount, 11.26625);
        assert!(response.error_type.is_none());

        let body = r#"{"result": "error", "error-type": "quota-reached"}"#;
        let response: Response = serde_json::from_str(body).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error_type.as_deref(), Some("quota-reached"));
        assert_eq!(response.rate, 0.0);
    }
}
