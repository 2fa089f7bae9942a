//! Business logic services

pub mod equipment;
pub mod password;
pub mod requests;
pub mod stats;
pub mod teams;
pub mod users;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    repository::{seed, Repository},
};

/// Trim a required text field. Blank input is rejected.
pub(crate) fn required_text(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub teams: teams::TeamsService,
    pub equipment: equipment::EquipmentService,
    pub requests: requests::RequestsService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            teams: teams::TeamsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone(), config.lifecycle.clone()),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Load the demo dataset into an empty store
    pub async fn seed_demo_data(&self) -> AppResult<bool> {
        let password_hash = password::hash_password(seed::DEMO_PASSWORD)?;
        let seeded = self
            .repository
            .seed_if_empty(seed::demo_dataset(&password_hash))
            .await?;
        if seeded {
            tracing::info!("Demo data loaded");
        }
        Ok(seeded)
    }

    /// Check the record store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn services_with(repository: Repository, config: AppConfig) -> Services {
        Services::new(repository, &config)
    }

    /// Services over an in-memory store holding the demo dataset. Password
    /// hashes are placeholders; tests that log in create their own account.
    pub async fn seeded_services() -> Services {
        let repository = Repository::in_memory();
        repository
            .seed_if_empty(seed::demo_dataset("not-a-hash"))
            .await
            .unwrap();
        Services::new(repository, &AppConfig::default())
    }
}
