use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the users table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub id: String,    // UUID v4 as string
    pub email: String, // Lower-cased, unique
    pub name: String,
    pub password_hash: Option<String>, // Argon2 PHC string; None for Google-only accounts
    pub google_sub: Option<String>,    // Google account subject id
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a user that signs in with email and password
    pub fn new_local(email: String, name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password_hash: Some(password_hash),
            google_sub: None,
            created_at: Utc::now(),
        }
    }

    /// Creates a user that signs in through Google
    pub fn new_google(email: String, name: String, google_sub: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password_hash: None,
            google_sub: Some(google_sub),
            created_at: Utc::now(),
        }
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}
