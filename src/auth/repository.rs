use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError>;
    async fn find_by_google_sub(&self, google_sub: &str) -> Result<Option<UserModel>, AppError>;
    /// Attaches a Google identity to an existing account
    async fn link_google(&self, user_id: &str, google_sub: &str) -> Result<(), AppError>;
}

/// In-memory implementation of UserRepository for development and testing.
/// Data is lost when the application restarts.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, email = %user.email, "Creating user in memory");

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            warn!(email = %user.email, "User already exists in memory");
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());

        debug!(user_id = %user.id, "User created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_google_sub(&self, google_sub: &str) -> Result<Option<UserModel>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.google_sub.as_deref() == Some(google_sub))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn link_google(&self, user_id: &str, google_sub: &str) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or_else(|| {
            warn!(user_id = %user_id, "User not found for Google link in memory");
            AppError::NotFound("User not found".to_string())
        })?;
        user.google_sub = Some(google_sub.to_string());
        debug!(user_id = %user_id, "Google identity linked in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<UserModel>, AppError> {
        let sql = format!(
            "SELECT id, email, name, password_hash, google_sub, created_at FROM users WHERE {} = $1",
            column
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, column = column, "Failed to fetch user from database");
                AppError::DatabaseError(e.to_string())
            })?;

        match row {
            Some(row) => {
                let user = UserModel {
                    id: row.get("id"),
                    email: row.get("email"),
                    name: row.get("name"),
                    password_hash: row.get("password_hash"),
                    google_sub: row.get("google_sub"),
                    created_at: row.get("created_at"),
                };
                debug!(user_id = %user.id, "User found in database");
                Ok(Some(user))
            }
            None => {
                debug!(column = column, "User not found in database");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, email = %user.email, "Creating user in database");

        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, google_sub, created_at) VALUES ($1, $2, $3, $4, $5, $6)"
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.google_sub)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                warn!(email = %user.email, "User already exists in database");
                AppError::Conflict("User already exists".to_string())
            }
            e => {
                warn!(error = %e, "Failed to create user in database");
                AppError::DatabaseError(e.to_string())
            }
        })?;

        debug!(user_id = %user.id, "User created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        self.fetch_one_where("email", email).await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        self.fetch_one_where("id", user_id).await
    }

    #[instrument(skip(self))]
    async fn find_by_google_sub(&self, google_sub: &str) -> Result<Option<UserModel>, AppError> {
        self.fetch_one_where("google_sub", google_sub).await
    }

    #[instrument(skip(self))]
    async fn link_google(&self, user_id: &str, google_sub: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET google_sub = $1 WHERE id = $2")
            .bind(google_sub)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user_id, "Failed to link Google identity");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(user_id = %user_id, "User not found for Google link in database");
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}
