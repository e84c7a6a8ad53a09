//! Authentication and authorization core.
//!
//! - Password hashing (Argon2id)
//! - Identity tokens (JWT, HS256, six hour lifetime)
//! - Request gates that turn a credential into an [`Identity`]
//! - Role and ownership based authorization
//!
//! # Examples
//!
//! ## Issuing and decoding a token
//! ```
//! use auth::{Identity, Role, TokenCodec};
//! use uuid::Uuid;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let identity = Identity::new(Uuid::new_v4(), "a@x.com", Role::User);
//! let issued = codec.issue(&identity).unwrap();
//! assert_eq!(codec.decode(&issued.token).unwrap(), identity);
//! ```
//!
//! ## Authorizing an action
//! ```
//! use auth::{authorize, Action, Decision, Identity, Role};
//! use uuid::Uuid;
//!
//! let caller = Identity::new(Uuid::new_v4(), "a@x.com", Role::User);
//! assert_eq!(
//!     authorize(&caller, Action::Update, Some(caller.subject_id)),
//!     Decision::Allow
//! );
//! assert!(!authorize(&caller, Action::Delete, Some(Uuid::new_v4())).is_allowed());
//! ```

pub mod authenticator;
pub mod errors;
pub mod gate;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod policy;

pub use authenticator::Authenticator;
pub use errors::AuthError;
pub use gate::bearer_token;
pub use gate::AuthGate;
pub use gate::ContextGate;
pub use gate::HeaderGate;
pub use identity::Identity;
pub use identity::Role;
pub use identity::RoleError;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::VerifiedToken;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use policy::authorize;
pub use policy::permitted_role_change;
pub use policy::Action;
pub use policy::Decision;
pub use policy::DenyReason;
