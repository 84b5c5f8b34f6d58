use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the users table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub id: String, // UUID v4 as string, assigned before the first token is signed
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub access_token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a new user model with both timestamps set to now.
    ///
    /// The caller supplies the id because the tokens embedded here were
    /// already signed for it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone: String,
        access_token: String,
        refresh_token: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            access_token,
            refresh_token,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the stored tokens after a successful login
    pub fn rotate_tokens(
        &mut self,
        access_token: String,
        refresh_token: String,
        updated_at: DateTime<Utc>,
    ) {
        self.access_token = access_token;
        self.refresh_token = refresh_token;
        self.updated_at = updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserModel {
        UserModel::new(
            "user-1".to_string(),
            "a@x.com".to_string(),
            "$2b$04$hash".to_string(),
            "A".to_string(),
            "B".to_string(),
            "555-0100".to_string(),
            "access".to_string(),
            "refresh".to_string(),
        )
    }

    #[test]
    fn test_new_user_model() {
        let user = sample_user();

        assert_eq!(user.id, "user-1");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_rotate_tokens() {
        let mut user = sample_user();
        let created = user.created_at;

        let later = Utc::now();
        user.rotate_tokens("access-2".to_string(), "refresh-2".to_string(), later);

        assert_eq!(user.access_token, "access-2");
        assert_eq!(user.refresh_token, "refresh-2");
        assert_eq!(user.updated_at, later);
        // Identity and creation time never move.
        assert_eq!(user.id, "user-1");
        assert_eq!(user.created_at, created);
    }
}
