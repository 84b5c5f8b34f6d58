use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::user::models::UserModel;

/// Discriminates the two token lifetimes a login produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in signed tokens
///
/// Access tokens carry the full identity; refresh tokens carry only the
/// subject id, so the optional fields stay empty there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub kind: TokenKind,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request body for POST /users/signup
// No Debug impl: the password must not end up in log output.
#[derive(Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub phone: String,
}

/// Request body for POST /users/login
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account representation returned by the API. The password hash stays out.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub access_token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            access_token: user.access_token,
            refresh_token: user.refresh_token,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_token_claims_serialization() {
        let claims = TokenClaims {
            sub: "user-1".to_string(),
            email: Some("a@x.com".to_string()),
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            kind: TokenKind::Access,
            exp: 1234567890,
            iat: 1234567800,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("user-1"));
        assert!(json.contains("\"kind\":\"access\""));

        let deserialized: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, claims);
    }

    #[test]
    fn test_refresh_claims_omit_identity_fields() {
        let claims = TokenClaims {
            sub: "user-1".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            kind: TokenKind::Refresh,
            exp: 1234567890,
            iat: 1234567800,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("email"));
        assert!(!json.contains("first_name"));
        assert!(json.contains("\"kind\":\"refresh\""));

        // And they come back as None, not as empty strings.
        let deserialized: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.email, None);
    }

    fn signup_request(email: &str, password: &str, first: &str, last: &str, phone: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_signup_request_accepts_valid_input() {
        let request = signup_request("a@x.com", "secret1", "A", "B", "555-0100");
        assert!(request.validate().is_ok());
    }

    #[rstest]
    #[case::bad_email("not-an-email", "secret1", "A", "B", "555-0100")]
    #[case::short_password("a@x.com", "short", "A", "B", "555-0100")]
    #[case::empty_first_name("a@x.com", "secret1", "", "B", "555-0100")]
    #[case::empty_last_name("a@x.com", "secret1", "A", "", "555-0100")]
    #[case::empty_phone("a@x.com", "secret1", "A", "B", "")]
    fn test_signup_request_rejects_invalid_input(
        #[case] email: &str,
        #[case] password: &str,
        #[case] first: &str,
        #[case] last: &str,
        #[case] phone: &str,
    ) {
        let request = signup_request(email, password, first, last, phone);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_user_response_excludes_password_hash() {
        let user = UserModel::new(
            "user-1".to_string(),
            "a@x.com".to_string(),
            "$2b$04$stored-hash".to_string(),
            "A".to_string(),
            "B".to_string(),
            "555-0100".to_string(),
            "access".to_string(),
            "refresh".to_string(),
        );

        let response = UserResponse::from(user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("a@x.com"));
        assert!(!json.contains("stored-hash"));
    }
}
