//! Account and authentication service

use chrono::Utc;

use super::{password, required_text, teams::assign_member};
use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        new_id,
        user::{CreateUser, UpdateProfile, UpdateUser, UserQuery},
        User, UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken(users: &[User], email: &str, except_id: Option<&str>) -> bool {
    users
        .iter()
        .any(|u| u.email == email && Some(u.id.as_str()) != except_id)
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Create an account (signup). The password policy is only checked here.
    pub async fn signup(&self, data: CreateUser) -> AppResult<User> {
        validator::Validate::validate(&data)?;
        password::check_policy(&data.password)?;

        let name = required_text(&data.name, "Name")?;
        let password_hash = password::hash_password(&data.password)?;
        let email = normalize_email(&data.email);

        let user = self
            .repository
            .transact(|uow| {
                if email_taken(uow.users(), &email, None) {
                    return Err(AppError::Conflict("Email already registered".to_string()));
                }

                let user = User {
                    id: new_id(),
                    name,
                    email,
                    role: data.role,
                    team_id: None,
                    is_admin: false,
                    department: data.department,
                    is_active: true,
                    created_at: Utc::now(),
                    password_hash: Some(password_hash),
                };
                let id = user.id.clone();
                uow.insert_user(user);

                if let Some(ref team_id) = data.team_id {
                    assign_member(uow, team_id, &id)?;
                }
                Ok(uow.user(&id)?.clone())
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Authenticate by email and password, returning a signed token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let invalid = || AppError::Authentication("Invalid email or password".to_string());

        let user = self
            .repository
            .users_get_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !user.is_active {
            return Err(AppError::Authentication("Account is deactivated".to_string()));
        }

        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !password::verify_password(hash, password)? {
            tracing::debug!(user_id = %user.id, "Rejected login");
            return Err(invalid());
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create JWT token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.id.clone(),
            role: user.role,
            is_admin: user.is_admin,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Bring token claims in line with the stored account. Removed or
    /// deactivated accounts are rejected; role and admin flag come from the
    /// record, not from the token.
    pub async fn refresh_claims(&self, mut claims: UserClaims) -> AppResult<UserClaims> {
        let user = match self.repository.get::<User>(&claims.sub).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Authentication("Account no longer exists".to_string()))
            }
            Err(e) => return Err(e),
        };
        if !user.is_active {
            return Err(AppError::Authentication("Account is deactivated".to_string()));
        }
        if user.role != claims.role || user.is_admin != claims.is_admin {
            tracing::debug!(user_id = %user.id, role = %user.role, "Token role is stale");
        }
        claims.role = user.role;
        claims.is_admin = user.is_admin;
        Ok(claims)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<User> {
        self.repository.get::<User>(id).await
    }

    pub async fn search_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.repository.users_search(query).await
    }

    /// Admin update of another account
    pub async fn update_user(&self, id: &str, data: UpdateUser) -> AppResult<User> {
        validator::Validate::validate(&data)?;
        let name = data.name.as_deref().map(|n| required_text(n, "Name")).transpose()?;
        let email = data.email.as_deref().map(normalize_email);

        self.repository
            .transact(|uow| {
                if let Some(ref email) = email {
                    if email_taken(uow.users(), email, Some(id)) {
                        return Err(AppError::Conflict("Email already registered".to_string()));
                    }
                }

                let user = uow.user_mut(id)?;
                if let Some(name) = name {
                    user.name = name;
                }
                if let Some(email) = email {
                    user.email = email;
                }
                if let Some(role) = data.role {
                    user.role = role;
                }
                if let Some(department) = data.department {
                    user.department = Some(department);
                }
                if let Some(is_admin) = data.is_admin {
                    user.is_admin = is_admin;
                }
                if let Some(is_active) = data.is_active {
                    user.is_active = is_active;
                }
                Ok(user.clone())
            })
            .await
    }

    /// Update the caller's own profile
    pub async fn update_profile(&self, user_id: &str, profile: UpdateProfile) -> AppResult<User> {
        validator::Validate::validate(&profile)?;

        let current = self.repository.get::<User>(user_id).await?;

        // Changing the password requires the current one
        let password_hash = match profile.new_password {
            Some(ref new_password) => {
                let current_password = profile.current_password.as_deref().ok_or_else(|| {
                    AppError::Validation("Current password required to change password".to_string())
                })?;
                let valid = match current.password_hash.as_deref() {
                    Some(hash) => password::verify_password(hash, current_password)?,
                    None => false,
                };
                if !valid {
                    return Err(AppError::Authentication("Current password is incorrect".to_string()));
                }
                Some(password::hash_password(new_password)?)
            }
            None => None,
        };
        let name = profile.name.as_deref().map(|n| required_text(n, "Name")).transpose()?;
        let email = profile.email.as_deref().map(normalize_email);

        self.repository
            .transact(|uow| {
                if let Some(ref email) = email {
                    if email_taken(uow.users(), email, Some(user_id)) {
                        return Err(AppError::Conflict("Email already registered".to_string()));
                    }
                }

                let user = uow.user_mut(user_id)?;
                if let Some(name) = name {
                    user.name = name;
                }
                if let Some(email) = email {
                    user.email = email;
                }
                if let Some(department) = profile.department {
                    user.department = Some(department);
                }
                if let Some(hash) = password_hash {
                    user.password_hash = Some(hash);
                }
                Ok(user.clone())
            })
            .await
    }

    /// Delete an account. Admin accounts cannot be deleted; request
    /// history that references the user is kept.
    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.repository
            .transact(|uow| {
                if uow.user(id)?.is_admin {
                    return Err(AppError::BadRequest("Cannot delete the admin user".to_string()));
                }
                let user = uow.remove_user(id)?;
                if let Some(ref team_id) = user.team_id {
                    if let Ok(team) = uow.team_mut(team_id) {
                        team.remove_member(id);
                    }
                }
                Ok(())
            })
            .await?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
