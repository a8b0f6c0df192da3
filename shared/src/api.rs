use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Credential, InvalidCredential};

// ============================================================================
// Login API Types
// ============================================================================

/// Body of `POST /login`.
///
/// Fields are untyped at the wire level: only presence is validated, and a
/// value of any other JSON type is reported separately from a missing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
}

impl LoginRequest {
    /// Build the credential. A missing, null or empty field is `Missing`;
    /// a non-string value is `NotText`. `Missing` takes precedence.
    pub fn credential(&self) -> Result<Credential, InvalidCredential> {
        let username = field_text(self.username.as_ref(), "username");
        let phone = field_text(self.phone.as_ref(), "phone");

        match (username, phone) {
            (Ok(username), Ok(phone)) => Credential::new(username, phone),
            (Err(e @ InvalidCredential::Missing(_)), _)
            | (_, Err(e @ InvalidCredential::Missing(_))) => Err(e),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    /// The username for logging, when it was sent as a string.
    pub fn username_text(&self) -> Option<&str> {
        self.username.as_ref().and_then(Value::as_str)
    }
}

fn field_text(value: Option<&Value>, name: &'static str) -> Result<String, InvalidCredential> {
    match value {
        None | Some(Value::Null) => Err(InvalidCredential::Missing(name)),
        Some(Value::String(text)) if text.is_empty() => Err(InvalidCredential::Missing(name)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(InvalidCredential::NotText(name)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    Success,
    Fail,
    Error,
}

/// Profile fields returned on a successful login. Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earnings: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: LoginStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<UserProfile>,
}

impl LoginResponse {
    pub fn success(message: impl Into<String>, data: Option<UserProfile>) -> Self {
        Self {
            status: LoginStatus::Success,
            message: message.into(),
            data,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: LoginStatus::Fail,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: LoginStatus::Error,
            message: message.into(),
            data: None,
        }
    }
}
