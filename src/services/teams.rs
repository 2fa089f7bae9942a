//! Maintenance team service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        new_id,
        team::{CreateTeam, UpdateTeam},
        Team, User, UserRole,
    },
    repository::{Repository, UnitOfWork},
    services::required_text,
};

#[derive(Clone)]
pub struct TeamsService {
    repository: Repository,
}

fn name_taken(teams: &[Team], name: &str, except_id: Option<&str>) -> bool {
    teams
        .iter()
        .any(|t| t.name.eq_ignore_ascii_case(name) && Some(t.id.as_str()) != except_id)
}

/// Move a user into a team: set `teamId`, add to the member set, and drop
/// them from the member set of any other team. Historical requests are not
/// touched.
pub(crate) fn assign_member(uow: &mut UnitOfWork, team_id: &str, user_id: &str) -> AppResult<()> {
    let team = uow.team(team_id)?;
    if !team.is_active {
        return Err(AppError::Validation(format!("Team {} is deactivated", team.name)));
    }

    uow.user_mut(user_id)?.team_id = Some(team_id.to_string());

    for team in uow.teams_mut() {
        if team.id == team_id {
            team.add_member(user_id);
        } else {
            team.remove_member(user_id);
        }
    }
    Ok(())
}

impl TeamsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a team. The manager defaults to the creating user.
    pub async fn create(&self, data: CreateTeam, created_by: &str) -> AppResult<Team> {
        validator::Validate::validate(&data)?;
        let name = required_text(&data.name, "Team name")?;

        let team = self
            .repository
            .transact(|uow| {
                if name_taken(uow.teams(), &name, None) {
                    return Err(AppError::Conflict(format!("Team name '{}' already exists", name)));
                }
                let manager_id = data.manager_id.unwrap_or_else(|| created_by.to_string());
                uow.user(&manager_id)?;

                let team = Team {
                    id: new_id(),
                    name,
                    specialization: data.specialization.unwrap_or_default(),
                    members: Vec::new(),
                    manager_id: Some(manager_id),
                    is_active: true,
                    created_at: Some(Utc::now()),
                };
                let id = team.id.clone();
                uow.insert_team(team);

                for user_id in &data.members {
                    assign_member(uow, &id, user_id)?;
                }
                Ok(uow.team(&id)?.clone())
            })
            .await?;

        tracing::info!(team_id = %team.id, name = %team.name, "Team created");
        Ok(team)
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Team>> {
        self.repository.teams_list(include_inactive).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Team> {
        self.repository.get::<Team>(id).await
    }

    /// Members of a team, resolved to user records
    pub async fn members(&self, id: &str) -> AppResult<Vec<User>> {
        let team = self.get(id).await?;
        let users = self.repository.list::<User>().await?;
        Ok(users.into_iter().filter(|u| team.has_member(&u.id)).collect())
    }

    pub async fn update(&self, id: &str, data: UpdateTeam) -> AppResult<Team> {
        validator::Validate::validate(&data)?;
        let name = data.name.as_deref().map(|n| required_text(n, "Team name")).transpose()?;

        self.repository
            .transact(|uow| {
                if let Some(ref name) = name {
                    if name_taken(uow.teams(), name, Some(id)) {
                        return Err(AppError::Conflict(format!("Team name '{}' already exists", name)));
                    }
                }
                if let Some(ref manager_id) = data.manager_id {
                    uow.user(manager_id)?;
                }

                let team = uow.team_mut(id)?;
                if let Some(name) = name {
                    team.name = name;
                }
                if let Some(specialization) = data.specialization {
                    team.specialization = specialization;
                }
                if let Some(manager_id) = data.manager_id {
                    team.manager_id = Some(manager_id);
                }
                Ok(team.clone())
            })
            .await
    }

    /// Teams are deactivated rather than deleted
    pub async fn deactivate(&self, id: &str) -> AppResult<Team> {
        let team = self
            .repository
            .transact(|uow| {
                let team = uow.team_mut(id)?;
                team.is_active = false;
                Ok(team.clone())
            })
            .await?;

        tracing::info!(team_id = %id, "Team deactivated");
        Ok(team)
    }

    /// Assign a technician to a team. The user and team records are written
    /// in one batch.
    pub async fn assign_technician(&self, team_id: &str, user_id: &str) -> AppResult<Team> {
        let team = self
            .repository
            .transact(|uow| {
                let user = uow.user(user_id)?;
                if user.role != UserRole::Technician {
                    return Err(AppError::Validation(format!(
                        "User {} is not a technician",
                        user.name
                    )));
                }
                assign_member(uow, team_id, user_id)?;
                Ok(uow.team(team_id)?.clone())
            })
            .await?;

        tracing::info!(team_id = %team_id, user_id = %user_id, "Technician assigned");
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::{
        repository::{memory::MemoryStore, seed, Collection, CollectionStore, MockCollectionStore},
        services::test_support::seeded_services,
    };

    #[tokio::test]
    async fn test_reassign_technician_to_other_team() {
        let services = seeded_services().await;

        let t2 = services.teams.assign_technician("t2", "u2").await.unwrap();
        assert!(t2.has_member("u2"));
        assert!(t2.has_member("u4"));

        let u2 = services.users.get_by_id("u2").await.unwrap();
        assert_eq!(u2.team_id.as_deref(), Some("t2"));

        let t1 = services.teams.get("t1").await.unwrap();
        assert!(!t1.has_member("u2"));

        // r1 was never u2's, r2 still belongs to u4 and t2
        let r2 = services.requests.get("r2").await.unwrap();
        assert_eq!(r2.technician_id.as_deref(), Some("u4"));
        assert_eq!(r2.team_id, "t2");
    }

    #[tokio::test]
    async fn test_assign_is_set_insert() {
        let services = seeded_services().await;
        services.teams.assign_technician("t1", "u2").await.unwrap();
        let t1 = services.teams.assign_technician("t1", "u2").await.unwrap();
        assert_eq!(t1.members, vec!["u2"]);
    }

    #[tokio::test]
    async fn test_assign_requires_technician_and_active_team() {
        let services = seeded_services().await;
        let err = services.teams.assign_technician("t1", "u3").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        services.teams.deactivate("t2").await.unwrap();
        let err = services.teams.assign_technician("t2", "u2").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = services.teams.assign_technician("t9", "u2").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_both_collections_unchanged() {
        let backing = Arc::new(MemoryStore::new());
        Repository::new(backing.clone())
            .seed_if_empty(seed::demo_dataset("hash"))
            .await
            .unwrap();

        let mut snapshot = HashMap::new();
        for collection in Collection::ALL {
            snapshot.insert(collection, backing.load_collection(collection).await.unwrap());
        }

        let mut store = MockCollectionStore::new();
        store
            .expect_load_collection()
            .returning(move |c| Ok(snapshot[&c].clone()));
        store
            .expect_save_many()
            .times(1)
            .returning(|_| Err(AppError::Storage("disk full".to_string())));

        let service = TeamsService::new(Repository::new(Arc::new(store)));
        let err = service.assign_technician("t2", "u2").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        let repo = Repository::new(backing);
        let u2 = repo.get::<User>("u2").await.unwrap();
        assert_eq!(u2.team_id.as_deref(), Some("t1"));
        let t2 = repo.get::<Team>("t2").await.unwrap();
        assert!(!t2.has_member("u2"));
    }

    #[tokio::test]
    async fn test_team_names_are_unique_case_insensitive() {
        let services = seeded_services().await;
        let err = services
            .teams
            .create(
                CreateTeam {
                    name: "mechanics".to_string(),
                    specialization: None,
                    manager_id: None,
                    members: vec![],
                },
                "u1",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let team = services
            .teams
            .create(
                CreateTeam {
                    name: "Electrical".to_string(),
                    specialization: Some("Electrical".to_string()),
                    manager_id: None,
                    members: vec!["u4".to_string()],
                },
                "u1",
            )
            .await
            .unwrap();
        assert_eq!(team.manager_id.as_deref(), Some("u1"));
        assert_eq!(team.members, vec!["u4"]);
        assert!(!services.teams.get("t2").await.unwrap().has_member("u4"));
    }
}
