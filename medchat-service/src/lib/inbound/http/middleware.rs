use std::sync::Arc;

use auth::bearer_token;
use auth::AuthError;
use auth::AuthGate;
use auth::TokenCodec;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;

/// Resolves the caller through the configured gate and stores the resulting
/// [`auth::Identity`] in request extensions for handlers.
pub async fn authenticate(
    State(gate): State<Arc<dyn AuthGate>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = gate.authenticate(req.headers(), req.extensions())?;

    tracing::debug!(user_id = %identity.subject_id, role = %identity.role, "Request authenticated");
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Verifies the bearer token up front and leaves the [`auth::VerifiedToken`]
/// in request extensions. Used ahead of the context gate.
pub async fn verify_token(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let verified = {
        let raw = bearer_token(req.headers())?;
        codec.verify(raw).map_err(AuthError::from)?
    };

    req.extensions_mut().insert(verified);

    Ok(next.run(req).await)
}
