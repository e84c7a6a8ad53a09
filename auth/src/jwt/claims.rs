use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::TokenError;
use crate::identity::Identity;
use crate::identity::Role;

/// Lifetime of every issued token. There is no refresh flow.
pub const TOKEN_TTL_HOURS: i64 = 6;

/// Wire claims of an identity token.
///
/// Identity fields are optional at the serde level so that a token with a
/// missing claim still parses and can be reported as `MalformedClaims`
/// instead of a generic parse failure. `role` may legitimately be absent on
/// tokens issued before roles existed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl Claims {
    /// Claims for `identity` valid from `issued_at` for [`TOKEN_TTL_HOURS`].
    pub fn for_identity(identity: &Identity, issued_at: DateTime<Utc>) -> Self {
        let expiration = issued_at + Duration::hours(TOKEN_TTL_HOURS);

        Self {
            user_id: Some(identity.subject_id.to_string()),
            email: Some(identity.email.clone()),
            role: Some(identity.role.as_str().to_string()),
            exp: Some(expiration.timestamp()),
            iat: Some(issued_at.timestamp()),
            nbf: Some(issued_at.timestamp()),
        }
    }

    /// Rebuild the identity carried by these claims.
    ///
    /// # Errors
    /// * `MalformedClaims` - `user_id` missing or not a UUID, `email` missing,
    ///   or `role` is neither "user" nor "admin"
    pub fn identity(&self) -> Result<Identity, TokenError> {
        let user_id = self
            .user_id
            .as_deref()
            .ok_or_else(|| TokenError::MalformedClaims("missing user_id".to_string()))?;

        let subject_id = Uuid::parse_str(user_id)
            .map_err(|e| TokenError::MalformedClaims(format!("user_id: {}", e)))?;

        let email = self
            .email
            .clone()
            .ok_or_else(|| TokenError::MalformedClaims("missing email".to_string()))?;

        let role = match self.role.as_deref() {
            Some(role) => role
                .parse::<Role>()
                .map_err(|e| TokenError::MalformedClaims(e.to_string()))?,
            None => Role::User,
        };

        Ok(Identity {
            subject_id,
            email,
            role,
        })
    }
}
