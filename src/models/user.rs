//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{enums::UserRole, RecordId};
use crate::error::AppError;

/// Stored user record
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    /// Unique, stored lowercased
    pub email: String,
    pub role: UserRole,
    pub team_id: Option<RecordId>,
    #[serde(default)]
    pub is_admin: bool,
    pub department: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Argon2 hash, kept out of API responses by [`UserView`]
    pub password_hash: Option<String>,
}

fn default_true() -> bool {
    true
}

/// User as returned by the API (no credential material)
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub team_id: Option<RecordId>,
    pub is_admin: bool,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            team_id: user.team_id,
            is_admin: user.is_admin,
            department: user.department,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Account creation (signup) request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub team_id: Option<RecordId>,
    pub department: Option<String>,
}

/// Admin update of another user
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub department: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

/// Update own profile request (for authenticated users)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    /// Email address (must be unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub department: Option<String>,
    /// Current password (required to change password)
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// User list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub role: Option<UserRole>,
    pub team_id: Option<RecordId>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id
    pub sub: RecordId,
    pub role: UserRole,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }

    pub fn require_manager(&self) -> Result<(), AppError> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Authorization("Manager role required".to_string()))
        }
    }

    pub fn require_technician(&self) -> Result<(), AppError> {
        if self.role == UserRole::Technician {
            Ok(())
        } else {
            Err(AppError::Authorization("Technician role required".to_string()))
        }
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole, is_admin: bool) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "u1".to_string(),
            role,
            is_admin,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_token_roundtrip_keeps_role() {
        let token = claims(UserRole::Technician, false).create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.sub, "u1");
        assert_eq!(parsed.role, UserRole::Technician);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_role_checks() {
        assert!(claims(UserRole::Manager, false).require_manager().is_ok());
        assert!(claims(UserRole::Employee, false).require_manager().is_err());
        assert!(claims(UserRole::Technician, false).require_technician().is_ok());
        assert!(claims(UserRole::Employee, true).require_admin().is_ok());
    }

    #[test]
    fn test_view_drops_password_hash() {
        let user = User {
            id: "u1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::Manager,
            team_id: None,
            is_admin: false,
            department: None,
            is_active: true,
            created_at: Utc::now(),
            password_hash: Some("$argon2id$...".to_string()),
        };
        let json = serde_json::to_value(UserView::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("teamId").is_none());
        assert_eq!(json["role"], "Manager");
    }
}
