//! User model

use serde::Serialize;

use super::ids::UserId;

/// A registered user
///
/// The credential hash is never serialized, so users can be written to the
/// audit log as-is.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Normalize and validate a username
pub fn normalize_username(raw: &str) -> Result<String, &'static str> {
    let username = raw.trim();
    if username.is_empty() {
        return Err("username cannot be empty");
    }
    if username.chars().any(char::is_whitespace) {
        return Err("username cannot contain whitespace");
    }
    Ok(username.to_string())
}
