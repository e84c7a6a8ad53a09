use auth::bearer_token;
use auth::IssuedToken;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

const SIGNED_IN: &str = "Login successful";

/// Sign in with a still-valid bearer token or with email and password.
///
/// A presented token is handed back only while the stored account keeps the
/// email and role the token was issued for. Any other outcome falls through
/// to the password check. Unknown email and wrong password are reported
/// identically.
pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<SignInRequest>>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    if let Some((issued, user)) = reuse_presented_token(&state, &headers).await? {
        return Ok(ApiSuccess::new(
            StatusCode::OK,
            AuthResponseData::new(SIGNED_IN, issued, &user),
        ));
    }

    let Json(body) =
        body.ok_or_else(|| ApiError::BadRequest("Email and password are required".to_string()))?;

    let user = find_account(&state, &body).await?;
    let issued = state
        .authenticator
        .authenticate(&body.password, &user.password_hash, &user.identity())?;

    tracing::info!(user_id = %user.id, "User signed in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthResponseData::new(SIGNED_IN, issued, &user),
    ))
}

async fn reuse_presented_token(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<(IssuedToken, User)>, ApiError> {
    let Ok(raw) = bearer_token(headers) else {
        return Ok(None);
    };

    let verified = match state.authenticator.validate_token(raw) {
        Ok(verified) => verified,
        Err(e) => {
            tracing::debug!(error = %e, "Presented token not reusable");
            return Ok(None);
        }
    };

    let Ok(identity) = verified.identity() else {
        return Ok(None);
    };

    let user = match state.user_service.get_user(&UserId(identity.subject_id)).await {
        Ok(user) => user,
        Err(UserError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if user.email.as_str() != identity.email || user.role != identity.role {
        tracing::debug!(user_id = %user.id, "Presented token is stale");
        return Ok(None);
    }

    Ok(Some((IssuedToken::from_verified(&verified, &identity), user)))
}

/// Look up the account for `body`, spending a password verification even when
/// there is none so the two failure paths take comparable time.
async fn find_account(state: &AppState, body: &SignInRequest) -> Result<User, ApiError> {
    let unknown = || ApiError::from(state.authenticator.reject_unknown_account(&body.password));

    let Ok(email) = EmailAddress::new(body.email.clone()) else {
        return Err(unknown());
    };

    match state.user_service.get_user_by_email(&email).await {
        Ok(user) => Ok(user),
        Err(UserError::NotFoundByEmail(_)) => Err(unknown()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    email: String,
    password: String,
}
