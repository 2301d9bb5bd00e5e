use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::shared::AppError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity extracted from a verified Google ID token
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleIdentity {
    pub sub: String,
    pub email: String,
    pub email_verified: bool,
    pub name: Option<String>,
}

#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<GoogleIdentity, AppError>;
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    /// tokeninfo reports this as the string "true"; ID token claims use a bool
    #[serde(default)]
    email_verified: Option<serde_json::Value>,
    name: Option<String>,
}

impl TokenInfo {
    fn email_verified(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(verified)) => *verified,
            Some(serde_json::Value::String(verified)) => verified == "true",
            _ => false,
        }
    }
}

/// Verifies ID tokens against Google's tokeninfo endpoint
pub struct HttpGoogleTokenVerifier {
    client: reqwest::Client,
    client_id: Option<String>,
    endpoint: String,
}

impl HttpGoogleTokenVerifier {
    pub fn new(client: reqwest::Client, client_id: Option<String>) -> Self {
        Self {
            client,
            client_id,
            endpoint: TOKENINFO_URL.to_string(),
        }
    }
}

#[async_trait]
impl GoogleTokenVerifier for HttpGoogleTokenVerifier {
    #[instrument(skip(self, credential))]
    async fn verify(&self, credential: &str) -> Result<GoogleIdentity, AppError> {
        let client_id = self.client_id.as_deref().ok_or_else(|| {
            warn!("Google login attempted without GOOGLE_CLIENT_ID configured");
            AppError::Unavailable("Google login is not configured".to_string())
        })?;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Google tokeninfo request failed");
                AppError::Upstream("Google token verification failed".to_string())
            })?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Google rejected ID token");
            return Err(AppError::Unauthorized("Invalid Google credential".to_string()));
        }

        let info: TokenInfo = response.json().await.map_err(|e| {
            warn!(error = %e, "Malformed tokeninfo response");
            AppError::Upstream("Google token verification failed".to_string())
        })?;

        if info.aud != client_id {
            warn!(aud = %info.aud, "Google ID token issued for another client");
            return Err(AppError::Unauthorized("Invalid Google credential".to_string()));
        }

        let email_verified = info.email_verified();
        let email = info.email.ok_or_else(|| {
            AppError::Unauthorized("Google account has no email".to_string())
        })?;

        debug!(sub = %info.sub, email_verified, "Google ID token verified");
        Ok(GoogleIdentity {
            sub: info.sub,
            email,
            email_verified,
            name: info.name,
        })
    }
}
