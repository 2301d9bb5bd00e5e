use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    google::GoogleTokenVerifier,
    models::UserModel,
    password::{hash_password, verify_password},
    repository::UserRepository,
    token::TokenConfig,
    types::{AuthClaims, AuthResponse, UserResponse},
};
use crate::shared::AppError;

const MIN_PASSWORD_LEN: usize = 6;

/// Service for account business logic
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    google: Arc<dyn GoogleTokenVerifier>,
    token_config: TokenConfig,
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        google: Arc<dyn GoogleTokenVerifier>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            repository,
            google,
            token_config,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.repository.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Registration for existing email");
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let name = display_name(name, &email);
        let user = UserModel::new_local(email, name, hash_password(password)?);
        self.repository.create_user(&user).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::BadRequest("User already exists".to_string()),
            e => e,
        })?;

        info!(user_id = %user.id, "User registered");
        self.issue(&user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
        let email = email.trim().to_lowercase();

        let user = self.repository.find_by_email(&email).await?.ok_or_else(invalid)?;
        let matches = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash));
        if !matches {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(invalid());
        }

        info!(user_id = %user.id, "User logged in");
        self.issue(&user)
    }

    /// Signs in with a Google ID token, creating or linking the account as needed
    #[instrument(skip(self, credential))]
    pub async fn google_login(&self, credential: &str) -> Result<AuthResponse, AppError> {
        if credential.trim().is_empty() {
            return Err(AppError::BadRequest("Missing Google credential".to_string()));
        }
        let identity = self.google.verify(credential).await?;

        if let Some(user) = self.repository.find_by_google_sub(&identity.sub).await? {
            info!(user_id = %user.id, "Google user logged in");
            return self.issue(&user);
        }

        if !identity.email_verified {
            warn!(sub = %identity.sub, "Google account email is not verified");
            return Err(AppError::Unauthorized(
                "Google account email is not verified".to_string(),
            ));
        }

        let email = identity.email.trim().to_lowercase();
        let user = match self.repository.find_by_email(&email).await? {
            Some(mut existing) => {
                self.repository
                    .link_google(&existing.id, &identity.sub)
                    .await?;
                existing.google_sub = Some(identity.sub);
                info!(user_id = %existing.id, "Linked Google identity to existing account");
                existing
            }
            None => {
                let name = display_name(identity.name.as_deref(), &email);
                let user = UserModel::new_google(email, name, identity.sub);
                self.repository.create_user(&user).await?;
                info!(user_id = %user.id, "User registered through Google");
                user
            }
        };

        self.issue(&user)
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthClaims, AppError> {
        self.token_config.validate_token(token)
    }

    fn issue(&self, user: &UserModel) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            token: self.token_config.create_token(user)?,
            user: UserResponse::from(user),
        })
    }
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(AppError::BadRequest("Invalid email address".to_string()))
    }
}

fn display_name(name: Option<&str>, email: &str) -> String {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string())
}
