//! User lookups on Repository

use super::Repository;
use crate::{
    error::AppResult,
    models::{user::UserQuery, User},
};

impl Repository {
    /// Find a user by email (case-insensitive)
    pub async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .list::<User>()
            .await?
            .into_iter()
            .find(|u| u.email == email))
    }

    /// List users matching the filters, ordered by name
    pub async fn users_search(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .list::<User>()
            .await?
            .into_iter()
            .filter(|u| query.role.map_or(true, |role| u.role == role))
            .filter(|u| match query.team_id {
                Some(ref team_id) => u.team_id.as_ref() == Some(team_id),
                None => true,
            })
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}
