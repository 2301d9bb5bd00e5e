use serde::{Deserialize, Serialize};

use super::models::UserModel;

/// JWT claims issued after a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Google Identity Services posts the ID token as `credential`
#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(alias = "token", alias = "id_token")]
    pub credential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&UserModel> for UserResponse {
    fn from(user: &UserModel) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Response body of every login flavour
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_login_accepts_credential_aliases() {
        let a: GoogleLoginRequest = serde_json::from_str(r#"{"credential":"x"}"#).unwrap();
        let b: GoogleLoginRequest = serde_json::from_str(r#"{"token":"y"}"#).unwrap();
        assert_eq!(a.credential, "x");
        assert_eq!(b.credential, "y");
    }

    #[test]
    fn test_register_name_is_optional() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"secret1"}"#).unwrap();
        assert!(req.name.is_none());
    }
}
