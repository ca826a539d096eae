//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::{Email, UserId};

/// A storefront user.
///
/// The password hash never leaves the storage layer boundary on the wire:
/// it is skipped during serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub username: String,
    /// Argon2 password hash. Not serialized.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password: String,
    pub email: Email,
    /// Display name.
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new user.
///
/// `password` is the argon2 hash by the time it reaches storage; hashing
/// happens in the auth route layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Email,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}
