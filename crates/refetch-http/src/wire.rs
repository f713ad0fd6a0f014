//! Token refresh endpoint wire types.

use serde::{Deserialize, Serialize};

/// Path of the token refresh endpoint, relative to the base URL.
pub(crate) const TOKEN_REFRESH: &str = "token/refresh/";

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Success response from the refresh endpoint.
///
/// `refresh` is present only when the server rotates the refresh token.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_without_rotation() {
        let response: RefreshResponse = serde_json::from_str(r#"{"access":"A2"}"#).unwrap();
        assert_eq!(response.access, "A2");
        assert!(response.refresh.is_none());
    }

    #[test]
    fn response_with_rotation() {
        let response: RefreshResponse =
            serde_json::from_str(r#"{"access":"A2","refresh":"R2"}"#).unwrap();
        assert_eq!(response.refresh.as_deref(), Some("R2"));
    }
}
