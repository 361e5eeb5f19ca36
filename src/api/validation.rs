use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use super::ApiError;

/// JSON body extractor whose rejections use the API error body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| ApiError::validation(rejection_message(&err)))?;
        Ok(Self(value))
    }
}

fn rejection_message(err: &JsonRejection) -> String {
    match err {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected Content-Type: application/json".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
        JsonRejection::JsonDataError(e) => format!("Invalid request body: {}", e.body_text()),
        other => format!("Failed to read request body: {}", other.body_text()),
    }
}

/// Returns the trimmed value of a required text field.
pub fn require_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{field} is required"))),
    }
}

/// Like [`require_field`] but keeps surrounding whitespace, for secrets.
pub fn require_secret<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{field} is required"))),
    }
}

pub fn validate_city_name(name: &str) -> Result<&str, ApiError> {
    const MAX_LEN: usize = 100;

    if name.chars().count() > MAX_LEN {
        return Err(ApiError::validation(format!(
            "City name must be {MAX_LEN} characters or less"
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(ApiError::validation(
            "City name cannot contain control characters",
        ));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field() {
        assert_eq!(require_field(Some("  London "), "City").unwrap(), "London");
        assert!(require_field(Some("   "), "City").is_err());
        assert!(require_field(None, "City").is_err());
    }

    #[test]
    fn test_require_secret_keeps_whitespace() {
        assert_eq!(require_secret(Some(" pw "), "Password").unwrap(), " pw ");
        assert!(require_secret(Some(""), "Password").is_err());
        assert!(require_secret(None, "Password").is_err());
    }

    #[test]
    fn test_validate_city_name() {
        assert!(validate_city_name("Rio de Janeiro").is_ok());
        assert!(validate_city_name("São Paulo").is_ok());
        assert!(validate_city_name(&"a".repeat(101)).is_err());
        assert!(validate_city_name("Lon\ndon").is_err());
    }
}
