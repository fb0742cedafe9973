use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{FieldKind, Payload};

pub const DEFAULT_LANGUAGE: &str = "es";

/// A stored user record. Never serialized directly into a response; see
/// [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub preferred_language: String,
    pub created_at: DateTime<Utc>,
}

/// Storage input for a signup.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub preferred_language: Option<String>,
}

/// Signup payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(
        required(message = "username is required"),
        length(min = 1, message = "username is required")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "password is required"),
        length(min = 1, message = "password is required")
    )]
    pub password: Option<String>,
    #[validate(
        required(message = "first name is required"),
        length(min = 1, message = "first name is required")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "last name is required"),
        length(min = 1, message = "last name is required")
    )]
    pub last_name: Option<String>,
    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid address")
    )]
    pub email: Option<String>,
    /// Blank means "use the default".
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(min = 2, max = 10, message = "preferred language must be 2-10 characters"))]
    pub preferred_language: Option<String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

impl Payload for SignupRequest {
    type Output = NewUser;

    const LABEL: &'static str = "user";

    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("username", FieldKind::Text),
        ("password", FieldKind::Text),
        ("firstName", FieldKind::Text),
        ("lastName", FieldKind::Text),
        ("email", FieldKind::Text),
        ("preferredLanguage", FieldKind::Text),
    ];

    fn into_output(self) -> Option<NewUser> {
        Some(NewUser {
            username: self.username?,
            password: self.password?,
            first_name: self.first_name?,
            last_name: self.last_name?,
            email: self.email?,
            preferred_language: self.preferred_language,
        })
    }
}

/// User as exposed over the API: everything except the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub preferred_language: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            preferred_language: user.preferred_language,
            created_at: user.created_at,
        }
    }
}
