/// Bearer-credential parsing and the request identity type
///
/// The API's guards share two pieces that live here: the parser for the
/// `Authorization: Bearer <token>` header and the `CurrentUser` extension
/// that the auth guard attaches to every authenticated request.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::extract::parse_bearer_token;
///
/// assert_eq!(parse_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
/// assert!(parse_bearer_token("Basic dXNlcjpwYXNz").is_err());
/// assert!(parse_bearer_token("Bearer too many parts").is_err());
/// ```

use crate::models::user::User;

/// Authenticated caller, attached to request extensions by the auth guard
///
/// Handlers extract it with Axum's `Extension` extractor:
///
/// ```ignore
/// async fn handler(Extension(CurrentUser(user)): Extension<CurrentUser>) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Whether the caller may reach the admin endpoints
    pub fn is_admin(&self) -> bool {
        self.0.is_admin
    }
}

/// Error type for credential extraction and verification
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header is absent
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is present but malformed
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token was valid but the subject no longer exists
    #[error("User no longer exists")]
    UserGone,

    /// Database error while resolving the subject
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Parses a `Bearer <token>` authorization header value
///
/// The value must be exactly two space-separated tokens and the scheme
/// must be `Bearer` (case-sensitive, as produced by the login endpoint's
/// clients).
///
/// # Errors
///
/// Returns `AuthError::InvalidFormat` for the wrong scheme or any token
/// count other than two.
pub fn parse_bearer_token(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();

    let scheme = parts
        .next()
        .ok_or_else(|| AuthError::InvalidFormat("Empty authorization header".to_string()))?;
    let token = parts
        .next()
        .ok_or_else(|| AuthError::InvalidFormat("Missing token".to_string()))?;

    if parts.next().is_some() {
        return Err(AuthError::InvalidFormat(
            "Expected exactly two space-separated tokens".to_string(),
        ));
    }

    if scheme != "Bearer" {
        return Err(AuthError::InvalidFormat(format!(
            "Expected Bearer scheme, got {}",
            scheme
        )));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_bearer() {
        let token = parse_bearer_token("Bearer eyJhbGciOiJIUzI1NiJ9.x.y").unwrap();
        assert_eq!(token, "eyJhbGciOiJIUzI1NiJ9.x.y");
    }

    #[test]
    fn test_parse_rejects_wrong_scheme() {
        assert!(matches!(
            parse_bearer_token("Basic dXNlcjpwYXNz"),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_extra_parts() {
        assert!(matches!(
            parse_bearer_token("Bearer abc def"),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bare_scheme() {
        assert!(matches!(
            parse_bearer_token("Bearer"),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_bearer_token(""),
            Err(AuthError::InvalidFormat(_))
        ));
    }
}
