use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::chat::errors::ChatIdError;
use crate::domain::user::models::UserId;

/// Chat unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub Uuid);

impl ChatId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a chat ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ChatIdError> {
        Uuid::parse_str(s)
            .map(ChatId)
            .map_err(|e| ChatIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ChatId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Chat aggregate: one consultation record owned by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: ChatId,
    pub owner: UserId,
    pub record: ChatRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Clinical content of a chat. Every field is optional.
///
/// `l` through `t` are the LODCRAFT symptom-history answers; on the wire they
/// keep their single upper-case letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i16>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub pulse: Option<i16>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub physical_condition: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default, rename = "L")]
    pub l: Option<String>,
    #[serde(default, rename = "O")]
    pub o: Option<String>,
    #[serde(default, rename = "D")]
    pub d: Option<String>,
    #[serde(default, rename = "C")]
    pub c: Option<String>,
    #[serde(default, rename = "R")]
    pub r: Option<String>,
    #[serde(default, rename = "A")]
    pub a: Option<String>,
    #[serde(default, rename = "F")]
    pub f: Option<String>,
    #[serde(default, rename = "T")]
    pub t: Option<String>,
}
