//! Bearer token claims and header parsing

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Claims carried by an accepted access token
///
/// Inserted into request extensions by [`super::JwtAuth::middleware`], so
/// handlers behind the auth layer can take `Extension<Claims>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user or client id)
    pub sub: String,

    /// Display name of the subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Something that can turn a raw token into [`Claims`]
pub trait TokenValidator: Send + Sync + Clone {
    /// Validate a token and extract claims
    fn validate_token(&self, token: &str) -> Result<Claims, Error>;
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_token(headers: &HeaderMap) -> Result<String, Error> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Unauthorized("Missing Authorization header".to_string()))?;

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(Error::Unauthorized(
            "Authorization header must use the Bearer scheme".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        let err = extract_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn test_wrong_scheme_and_empty_token() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "bearer abc"] {
            let mut headers = HeaderMap::new();
            headers.insert(http::header::AUTHORIZATION, HeaderValue::from_static(value));
            assert!(
                matches!(extract_token(&headers), Err(Error::Unauthorized(_))),
                "{value}"
            );
        }
    }
}
