//! Team lookups on Repository

use super::Repository;
use crate::{error::AppResult, models::Team};

impl Repository {
    /// List teams, optionally including deactivated ones
    pub async fn teams_list(&self, include_inactive: bool) -> AppResult<Vec<Team>> {
        Ok(self
            .list::<Team>()
            .await?
            .into_iter()
            .filter(|t| include_inactive || t.is_active)
            .collect())
    }
}
