/// Request guards: authentication and the admin-role check
///
/// Both guards are plain `axum::middleware::from_fn*` functions layered
/// onto route groups in `app::build_router`:
///
/// - [`require_auth`] verifies the bearer credential once per request,
///   resolves the subject to a live user row, and attaches it to request
///   extensions as [`CurrentUser`].
/// - [`require_admin`] runs after `require_auth` and is a pure predicate
///   over the attached user's `is_admin` flag. No side effects, no state.

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use taskdeck_shared::{
    auth::{
        extract::{parse_bearer_token, AuthError, CurrentUser},
        jwt,
    },
    models::user::User,
};

use crate::{app::AppState, error::ApiError};

/// Authentication guard
///
/// Extracts and validates the `Authorization: Bearer <token>` header,
/// resolves the token subject against the users table, and injects
/// [`CurrentUser`] into request extensions. A single verification
/// attempt per request; no retry.
///
/// # Errors
///
/// - 401 if the header is absent or malformed
/// - 401 if the token fails validation (signature, expiry, issuer, type)
/// - 401 if the referenced user no longer exists
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Header is not valid UTF-8".to_string()))?;

    let token = parse_bearer_token(auth_header)?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    // The token may outlive the account; a deleted user must not keep
    // an authenticated session.
    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UserGone)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Admin guard
///
/// Requires that [`require_auth`] already attached a user to the request.
/// Rejects with 403 when the attached user is not an administrator or
/// when no user is attached at all.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let is_admin = req
        .extensions()
        .get::<CurrentUser>()
        .map(CurrentUser::is_admin)
        .unwrap_or(false);

    if !is_admin {
        return Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
