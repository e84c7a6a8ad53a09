use std::fmt;
use std::str::FromStr;

use auth::Identity;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Holds the credential (email, password hash, role) and the medical profile.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Identity to embed in a token issued for this user.
    pub fn identity(&self) -> Identity {
        Identity::new(self.id.0, self.email.as_str(), self.role)
    }

    /// Apply a patch in place. Absent fields are left untouched.
    pub fn apply(&mut self, changes: &UserChanges, now: DateTime<Utc>) {
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            self.password_hash = password_hash.clone();
        }
        if let Some(role) = changes.role {
            self.role = role;
        }

        let profile = &mut self.profile;
        patch(&mut profile.name, &changes.name);
        patch(&mut profile.age, &changes.age);
        patch(&mut profile.height, &changes.height);
        patch(&mut profile.weight, &changes.weight);
        patch(&mut profile.gender, &changes.gender);
        patch(&mut profile.physical_condition, &changes.physical_condition);
        patch(&mut profile.medical_history, &changes.medical_history);
        patch(&mut profile.profile_image_url, &changes.profile_image_url);

        self.updated_at = now;
    }
}

fn patch<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        target.clone_from(value);
    }
}

/// Optional medical profile attached to a user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub name: Option<String>,
    pub age: Option<i16>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub gender: Option<String>,
    pub physical_condition: Option<String>,
    pub medical_history: Option<String>,
    pub profile_image_url: Option<String>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `Missing` - Email is empty
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        if email.trim().is_empty() {
            return Err(EmailError::Missing);
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted from a client, before hashing.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - fewer than six characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let actual = password.chars().count();
        if actual < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Self-service sign-up. The account always gets the user role.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub email: EmailAddress,
    pub password: Password,
}

/// Admin provisioning of a new account.
#[derive(Debug)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub role: Option<Role>,
    pub profile: UserProfile,
}

/// Command to update an existing user with optional validated fields.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated. `role` stays unparsed until the
/// service knows whether the caller may change it at all.
#[derive(Debug, Default)]
pub struct UpdateUserCommand {
    pub email: Option<EmailAddress>,
    pub password: Option<Password>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub age: Option<i16>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub gender: Option<String>,
    pub physical_condition: Option<String>,
    pub medical_history: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Value bound for one column of a user update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    SmallInt(i16),
    Real(f32),
}

/// Patch handed to the repository once the password is hashed and the role
/// change has been vetted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<EmailAddress>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub name: Option<String>,
    pub age: Option<i16>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub gender: Option<String>,
    pub physical_condition: Option<String>,
    pub medical_history: Option<String>,
    pub profile_image_url: Option<String>,
}

impl UserChanges {
    /// Column assignments for the present fields, in a fixed column order.
    pub fn assignments(&self) -> Vec<(&'static str, FieldValue)> {
        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);

        [
            (
                "email",
                self.email
                    .as_ref()
                    .map(|e| FieldValue::Text(e.as_str().to_string())),
            ),
            ("password_hash", text(&self.password_hash)),
            (
                "role",
                self.role.map(|r| FieldValue::Text(r.as_str().to_string())),
            ),
            ("name", text(&self.name)),
            ("age", self.age.map(FieldValue::SmallInt)),
            ("height", self.height.map(FieldValue::Real)),
            ("weight", self.weight.map(FieldValue::Real)),
            ("gender", text(&self.gender)),
            ("physical_condition", text(&self.physical_condition)),
            ("medical_history", text(&self.medical_history)),
            ("profile_image_url", text(&self.profile_image_url)),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }
}
