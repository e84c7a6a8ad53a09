use std::sync::Arc;

use crate::errors::AuthError;
use crate::identity::Identity;
use crate::jwt::IssuedToken;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::VerifiedToken;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Argon2id digest with the default parameters that no password is known to match.
///
/// Verifying against it costs the same as verifying a real stored hash.
const UNKNOWN_ACCOUNT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$TuLwCrnuVftqX7gdx5ouew$NvlS27BRPl3SpCPyZ3VcueY4i08nySkRUdjwwr+wuN0";

/// Credential check and token issuance behind sign-up and sign-in.
///
/// Holds the process-wide token codec; gates built from [`codec`](Self::codec)
/// share the same secret.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
}

impl Authenticator {
    /// Create an authenticator signing tokens with `jwt_secret`.
    ///
    /// # Arguments
    /// * `jwt_secret` - HMAC key shared by every token issued and verified
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            codec: Arc::new(TokenCodec::new(jwt_secret)),
        }
    }

    pub fn codec(&self) -> Arc<TokenCodec> {
        self.codec.clone()
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Arguments
    /// * `password` - plaintext password
    ///
    /// # Returns
    /// PHC string with a fresh salt
    ///
    /// # Errors
    /// * `HashingFailed` - the hash computation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify `password` against `stored_hash` and issue a token for `identity`.
    ///
    /// # Arguments
    /// * `password` - plaintext password presented at sign-in
    /// * `stored_hash` - PHC string kept for the account
    /// * `identity` - identity the token is issued for
    ///
    /// # Returns
    /// A freshly signed token valid for six hours
    ///
    /// # Errors
    /// * `InvalidCredentials` - password does not match
    /// * `Password` - stored hash unusable
    /// * `Token` - token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &Identity,
    ) -> Result<IssuedToken, AuthError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.codec.issue(identity)?)
    }

    /// Fail a sign-in for an account that does not exist.
    ///
    /// Runs the same Argon2 verification a wrong password would, so both
    /// failures take comparable time.
    ///
    /// # Returns
    /// Always `InvalidCredentials`
    pub fn reject_unknown_account(&self, password: &str) -> AuthError {
        let _ = self.password_hasher.verify(password, UNKNOWN_ACCOUNT_HASH);
        AuthError::InvalidCredentials
    }

    /// Issue a token without checking a password, e.g. right after sign-up.
    pub fn issue_token(&self, identity: &Identity) -> Result<IssuedToken, TokenError> {
        self.codec.issue(identity)
    }

    /// Verify a token presented by a client.
    ///
    /// # Errors
    /// See [`TokenCodec::verify`].
    pub fn validate_token(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.codec.verify(token)
    }
}
