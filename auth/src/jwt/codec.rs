use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Serialize;
use uuid::Uuid;

use super::claims::Claims;
use super::errors::TokenError;
use crate::identity::Identity;
use crate::identity::Role;

/// Signs and verifies identity tokens with a single process-wide secret.
///
/// The algorithm is pinned to HS256: a token whose header names any other
/// algorithm is rejected as `InvalidSignature`, whatever its payload says.
/// Expiry and not-before are checked with zero leeway.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

/// A token whose structure, signature and validity window have been checked.
///
/// Produced by [`TokenCodec::verify`] and carried in request extensions so a
/// downstream gate can read the claims without verifying twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub raw: String,
    pub claims: Claims,
}

impl VerifiedToken {
    pub fn identity(&self) -> Result<Identity, TokenError> {
        self.claims.identity()
    }
}

/// Token handed back to clients after sign-up, sign-in or provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl IssuedToken {
    /// Describe an already verified token, e.g. one presented again at sign-in.
    pub fn from_verified(verified: &VerifiedToken, identity: &Identity) -> Self {
        Self {
            token: verified.raw.clone(),
            user_id: identity.subject_id,
            email: identity.email.clone(),
            role: identity.role,
            expires_at: verified.claims.exp.unwrap_or_default(),
        }
    }
}

impl TokenCodec {
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a codec bound to `secret`.
    ///
    /// The secret should be at least 32 bytes; it is never logged.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `identity`, valid from now for six hours.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let claims = Claims::for_identity(identity, issued_at);
        let token = self.sign(&claims)?;

        Ok(IssuedToken {
            token,
            user_id: identity.subject_id,
            email: identity.email.clone(),
            role: identity.role,
            expires_at: claims.exp.unwrap_or_default(),
        })
    }

    /// Sign arbitrary claims with the pinned algorithm.
    ///
    /// # Errors
    /// * `EncodingFailed` - serialization or signing failed
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Self::ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Check structure, signature, algorithm and validity window.
    ///
    /// Claim contents are not interpreted here; see [`VerifiedToken::identity`].
    ///
    /// # Arguments
    /// * `token` - compact JWT as presented by the client
    ///
    /// # Returns
    /// The token with its decoded claims
    ///
    /// # Errors
    /// * `MalformedToken` - not a parseable compact JWT
    /// * `InvalidSignature` - signature mismatch, or a header naming any
    ///   algorithm other than HS256 (including "none")
    /// * `TokenExpired` - `exp` is now or in the past
    /// * `TokenNotYetValid` - `nbf` is in the future
    /// * `MalformedClaims` - `exp` claim missing
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        check_algorithm(token)?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?;

        // jsonwebtoken accepts exp == now; a token is only valid strictly before exp.
        if data
            .claims
            .exp
            .is_some_and(|exp| exp <= Utc::now().timestamp())
        {
            return Err(TokenError::TokenExpired);
        }

        Ok(VerifiedToken {
            raw: token.to_string(),
            claims: data.claims,
        })
    }

    /// Verify `token` and rebuild the identity it carries.
    pub fn decode(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify(token)?.identity()
    }
}

/// Reject any header that does not name HS256.
///
/// Algorithms jsonwebtoken has no variant for, "none" among them, make
/// `decode_header` fail outright, so the raw header is read to tell them
/// apart from tokens that are simply garbage.
fn check_algorithm(token: &str) -> Result<(), TokenError> {
    match decode_header(token) {
        Ok(header) if header.alg == TokenCodec::ALGORITHM => Ok(()),
        Ok(_) => Err(TokenError::InvalidSignature),
        Err(err) => match declared_algorithm(token) {
            Some(alg) if alg != "HS256" => Err(TokenError::InvalidSignature),
            _ => Err(classify(err)),
        },
    }
}

fn declared_algorithm(token: &str) -> Option<String> {
    let (header, _) = token.split_once('.')?;
    let bytes = URL_SAFE_NO_PAD.decode(header).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;

    value.get("alg")?.as_str().map(str::to_string)
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::MalformedClaims(format!("missing {}", claim))
        }
        _ => TokenError::MalformedToken(err.to_string()),
    }
}
