use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::Extensions;
use http::HeaderMap;

use crate::errors::AuthError;
use crate::identity::Identity;
use crate::jwt::TokenCodec;
use crate::jwt::VerifiedToken;

const BEARER_PREFIX: &str = "Bearer ";

/// Turns the credential carried by a request into an [`Identity`].
///
/// Implementations differ only in where the credential comes from; both
/// yield the same identity for the same token.
pub trait AuthGate: Send + Sync + 'static {
    /// Resolve the caller of a request.
    ///
    /// # Arguments
    /// * `headers` - request headers, consulted by gates that read the bearer token
    /// * `extensions` - request extensions, consulted by gates that trust an
    ///   upstream verifier
    ///
    /// # Returns
    /// The identity carried by the presented token
    ///
    /// # Errors
    /// * `MissingCredential` / `MalformedCredential` - no usable bearer token
    /// * `Token` - the token failed verification
    /// * `NoAuthenticatedContext` - the upstream verifier is not installed
    fn authenticate(&self, headers: &HeaderMap, extensions: &Extensions)
        -> Result<Identity, AuthError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// # Errors
/// * `MissingCredential` - no Authorization header
/// * `MalformedCredential` - non-ASCII value, wrong scheme or empty token
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedCredential("header is not ASCII".to_string()))?;

    let token = value.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        AuthError::MalformedCredential("expected Bearer scheme".to_string())
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedCredential("empty token".to_string()));
    }

    Ok(token)
}

/// Verifies the bearer token itself on every request.
pub struct HeaderGate {
    codec: Arc<TokenCodec>,
}

impl HeaderGate {
    /// # Arguments
    /// * `codec` - the codec tokens were issued with
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl AuthGate for HeaderGate {
    fn authenticate(
        &self,
        headers: &HeaderMap,
        _extensions: &Extensions,
    ) -> Result<Identity, AuthError> {
        let token = bearer_token(headers)?;
        Ok(self.codec.decode(token)?)
    }
}

/// Reads the [`VerifiedToken`] an upstream layer already attached.
///
/// Its absence means the verifying layer was not installed, which is a
/// server wiring error rather than a client mistake.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextGate;

impl AuthGate for ContextGate {
    fn authenticate(
        &self,
        _headers: &HeaderMap,
        extensions: &Extensions,
    ) -> Result<Identity, AuthError> {
        let verified = extensions
            .get::<VerifiedToken>()
            .ok_or(AuthError::NoAuthenticatedContext)?;

        Ok(verified.identity()?)
    }
}
