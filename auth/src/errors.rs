use thiserror::Error;

use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::policy::DenyReason;

/// Failure of the authentication or authorization core.
///
/// The HTTP edge collapses every authentication variant into a generic 401;
/// [`kind`](AuthError::kind) is what gets logged instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing credential")]
    MissingCredential,

    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("No authenticated context on request")]
    NoAuthenticatedContext,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    AuthorizationDenied(DenyReason),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "MissingCredential",
            AuthError::MalformedCredential(_) => "MalformedCredential",
            AuthError::Token(TokenError::EncodingFailed(_)) => "EncodingFailed",
            AuthError::Token(TokenError::MalformedToken(_)) => "MalformedToken",
            AuthError::Token(TokenError::InvalidSignature) => "InvalidSignature",
            AuthError::Token(TokenError::TokenExpired) => "TokenExpired",
            AuthError::Token(TokenError::TokenNotYetValid) => "TokenNotYetValid",
            AuthError::Token(TokenError::MalformedClaims(_)) => "MalformedClaims",
            AuthError::NoAuthenticatedContext => "NoAuthenticatedContext",
            AuthError::InvalidCredentials => "InvalidCredentials",
            AuthError::AuthorizationDenied(_) => "AuthorizationDenied",
            AuthError::Password(_) => "HashingError",
        }
    }

    /// Whether the caller failed to prove who they are (as opposed to a
    /// denial or a server-side failure).
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedCredential(_)
            | AuthError::InvalidCredentials => true,
            AuthError::Token(TokenError::EncodingFailed(_)) => false,
            AuthError::Token(_) => true,
            AuthError::NoAuthenticatedContext
            | AuthError::AuthorizationDenied(_)
            | AuthError::Password(_) => false,
        }
    }
}
