//! Maintenance request lifecycle
//!
//! Requests move `New -> In Progress -> Repaired | Scrap`. Entering a stage
//! updates the targeted equipment's status; the engine itself allows any
//! transition and role restrictions are applied by [`stage_change_allowed`].

use chrono::Utc;

use crate::{
    config::LifecycleConfig,
    error::{AppError, AppResult},
    models::{
        new_id,
        request::{CalendarQuery, CreateRequest, KanbanColumn, RequestQuery, UpdateRequest},
        Equipment, EquipmentStatus, MaintenanceRequest, RecordId, RequestStage, User,
        UserClaims, UserRole,
    },
    repository::{Repository, UnitOfWork},
    services::required_text,
};

const DEFAULT_DURATION_HOURS: f64 = 1.0;

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
    config: LifecycleConfig,
}

/// Whether a caller may move `request` to `stage`.
///
/// Managers may set any stage. Technicians may only close their own
/// In Progress requests (Repaired or Scrap). Employees never change stages.
pub fn stage_change_allowed(
    role: UserRole,
    user_id: &str,
    request: &MaintenanceRequest,
    stage: RequestStage,
) -> bool {
    match role {
        UserRole::Manager => true,
        UserRole::Technician => {
            request.technician_id.as_deref() == Some(user_id)
                && request.stage == RequestStage::InProgress
                && stage.is_terminal()
        }
        UserRole::Employee => false,
    }
}

/// Apply the equipment status implied by entering `stage`.
/// Scrapped equipment is left alone.
fn apply_equipment_effect(uow: &mut UnitOfWork, equipment_id: Option<&str>, stage: RequestStage) {
    let (Some(equipment_id), Some(status)) = (equipment_id, stage.equipment_effect()) else {
        return;
    };

    let Some(equipment) = uow.find_equipment(equipment_id) else {
        tracing::warn!(equipment_id = %equipment_id, "Request targets unknown equipment");
        return;
    };
    if equipment.is_scrapped() || equipment.status == status {
        return;
    }

    if let Ok(equipment) = uow.equipment_mut(equipment_id) {
        equipment.status = status;
        if status == EquipmentStatus::Scrapped {
            equipment.is_active = false;
        }
        tracing::info!(equipment_id = %equipment_id, status = %status, "Equipment status changed");
    }
}

fn check_duration(hours: f64) -> AppResult<f64> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(AppError::Validation("Duration cannot be negative".to_string()));
    }
    Ok(if hours == 0.0 { DEFAULT_DURATION_HOURS } else { hours })
}

impl RequestsService {
    pub fn new(repository: Repository, config: LifecycleConfig) -> Self {
        Self { repository, config }
    }

    /// Team for a new request: supplied team, then the equipment's team,
    /// then the configured default, then (if enabled) the first active team.
    fn resolve_team(
        &self,
        uow: &UnitOfWork,
        team_id: Option<&str>,
        equipment: Option<&Equipment>,
    ) -> AppResult<RecordId> {
        if let Some(team_id) = team_id {
            return match uow.find_team(team_id) {
                Some(team) if team.is_active => Ok(team.id.clone()),
                Some(team) => Err(AppError::Validation(format!("Team {} is deactivated", team.name))),
                None => Err(AppError::Validation(format!("Unknown team {}", team_id))),
            };
        }

        let from_equipment = equipment.map(|e| e.maintenance_team_id.as_str());
        for candidate in [from_equipment, self.config.default_team_id.as_deref()]
            .into_iter()
            .flatten()
        {
            if uow.find_team(candidate).is_some_and(|t| t.is_active) {
                return Ok(candidate.to_string());
            }
        }

        if self.config.fallback_to_first_team {
            if let Some(team) = uow.teams().iter().find(|t| t.is_active) {
                tracing::debug!(team_id = %team.id, "Falling back to first team");
                return Ok(team.id.clone());
            }
        }

        Err(AppError::Validation("No maintenance team could be resolved".to_string()))
    }

    /// A technician set on a request must be a Technician of its team
    fn check_technician(&self, uow: &UnitOfWork, technician_id: &str, team_id: &str) -> AppResult<()> {
        let technician: &User = uow
            .find_user(technician_id)
            .ok_or_else(|| AppError::Validation(format!("Unknown technician {}", technician_id)))?;

        if !self.config.enforce_technician_team {
            return Ok(());
        }
        if technician.role != UserRole::Technician {
            return Err(AppError::Validation(format!("User {} is not a technician", technician.name)));
        }
        if technician.team_id.as_deref() != Some(team_id) {
            return Err(AppError::Validation(format!(
                "Technician {} is not a member of team {}",
                technician.name, team_id
            )));
        }
        Ok(())
    }

    /// Create a request. It always starts in New whatever stage was sent.
    pub async fn create(&self, data: CreateRequest) -> AppResult<MaintenanceRequest> {
        validator::Validate::validate(&data)?;
        let subject = required_text(&data.subject, "Subject")?;

        if data.stage.is_some_and(|s| s != RequestStage::New) {
            tracing::debug!(stage = ?data.stage, "Ignoring stage supplied at creation");
        }
        let request_type = data
            .request_type
            .ok_or_else(|| AppError::Validation("Request type is required".to_string()))?;
        let work_center = data
            .work_center
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty());
        if data.equipment_id.is_some() && work_center.is_some() {
            return Err(AppError::Validation(
                "A request targets either equipment or a work center, not both".to_string(),
            ));
        }
        let duration_hours = check_duration(data.duration_hours.unwrap_or(0.0))?;

        let request = self
            .repository
            .transact(|uow| {
                let equipment = match data.equipment_id.as_deref() {
                    Some(id) => {
                        let equipment = uow.equipment_item(id)?;
                        if !equipment.is_active || equipment.is_scrapped() {
                            return Err(AppError::Validation(format!(
                                "Equipment {} is not active",
                                equipment.name
                            )));
                        }
                        Some(equipment)
                    }
                    None => None,
                };

                let team_id = self.resolve_team(uow, data.team_id.as_deref(), equipment)?;
                if let Some(ref technician_id) = data.technician_id {
                    self.check_technician(uow, technician_id, &team_id)?;
                }

                let request = MaintenanceRequest {
                    id: new_id(),
                    subject,
                    description: data.description,
                    request_type,
                    equipment_id: data.equipment_id,
                    work_center,
                    team_id,
                    created_by: data.created_by,
                    technician_id: data.technician_id,
                    stage: RequestStage::New,
                    scheduled_date: data.scheduled_date,
                    duration_hours,
                    created_at: Utc::now(),
                    completed_at: None,
                    notes: data.notes,
                };
                uow.insert_request(request.clone());
                Ok(request)
            })
            .await?;

        tracing::info!(
            request_id = %request.id,
            team_id = %request.team_id,
            request_type = ?request.request_type,
            "Maintenance request created"
        );
        Ok(request)
    }

    /// Claim a New, unassigned request and start work on it.
    ///
    /// The check and the write happen under the repository write lock, so
    /// of two concurrent accepts exactly one wins; the other gets `Conflict`.
    pub async fn accept(&self, id: &str, technician_id: &str) -> AppResult<MaintenanceRequest> {
        let request = self
            .repository
            .transact(|uow| {
                let current = uow.request(id)?;
                if current.stage != RequestStage::New || current.technician_id.is_some() {
                    return Err(AppError::Conflict(format!(
                        "Request {} has already been accepted",
                        id
                    )));
                }
                let team_id = current.team_id.clone();
                self.check_technician(uow, technician_id, &team_id)?;

                let request = uow.request_mut(id)?;
                request.technician_id = Some(technician_id.to_string());
                request.stage = RequestStage::InProgress;
                let request = request.clone();

                apply_equipment_effect(uow, request.equipment_id.as_deref(), RequestStage::InProgress);
                Ok(request)
            })
            .await?;

        tracing::info!(request_id = %id, technician_id = %technician_id, "Request accepted");
        Ok(request)
    }

    /// Move a request to `stage`. Re-setting the current stage changes nothing.
    pub async fn set_stage(&self, id: &str, stage: RequestStage) -> AppResult<MaintenanceRequest> {
        self.transition(id, stage, None).await
    }

    /// Stage change on behalf of a caller. With
    /// `restrict_technician_transitions` set, [`stage_change_allowed`] is
    /// checked against the stored request in the same write cycle.
    pub async fn set_stage_for(
        &self,
        claims: &UserClaims,
        id: &str,
        stage: RequestStage,
    ) -> AppResult<MaintenanceRequest> {
        self.transition(id, stage, Some(claims)).await
    }

    async fn transition(
        &self,
        id: &str,
        stage: RequestStage,
        caller: Option<&UserClaims>,
    ) -> AppResult<MaintenanceRequest> {
        self.repository
            .transact(|uow| {
                let current = uow.request(id)?;
                if current.stage == stage {
                    return Ok(current.clone());
                }
                if let Some(claims) = caller.filter(|_| self.config.restrict_technician_transitions) {
                    if !stage_change_allowed(claims.role, claims.user_id(), current, stage) {
                        return Err(AppError::Authorization(format!(
                            "{} may not move this request to {}",
                            claims.role, stage
                        )));
                    }
                }
                let from = current.stage;

                let request = uow.request_mut(id)?;
                request.stage = stage;
                request.completed_at = if stage.is_terminal() {
                    Some(Utc::now())
                } else {
                    None
                };
                let request = request.clone();

                apply_equipment_effect(uow, request.equipment_id.as_deref(), stage);

                tracing::info!(request_id = %id, from = %from, to = %stage, "Request stage changed");
                Ok(request)
            })
            .await
    }

    /// Edit request details on behalf of `caller`. The stage is only changed
    /// through [`Self::set_stage`] and [`Self::accept`]; only managers may
    /// (re)assign the technician.
    pub async fn update(
        &self,
        caller: UserRole,
        id: &str,
        data: UpdateRequest,
    ) -> AppResult<MaintenanceRequest> {
        validator::Validate::validate(&data)?;
        if data.technician_id.is_some() && caller != UserRole::Manager {
            return Err(AppError::Authorization(
                "Only managers can assign a technician".to_string(),
            ));
        }
        let subject = data
            .subject
            .as_deref()
            .map(|s| required_text(s, "Subject"))
            .transpose()?;
        let duration_hours = data.duration_hours.map(check_duration).transpose()?;

        self.repository
            .transact(|uow| {
                let team_id = uow.request(id)?.team_id.clone();
                if let Some(ref technician_id) = data.technician_id {
                    self.check_technician(uow, technician_id, &team_id)?;
                }

                let request = uow.request_mut(id)?;
                if let Some(subject) = subject {
                    request.subject = subject;
                }
                if let Some(description) = data.description {
                    request.description = description;
                }
                if let Some(request_type) = data.request_type {
                    request.request_type = request_type;
                }
                if let Some(technician_id) = data.technician_id {
                    request.technician_id = Some(technician_id);
                }
                if let Some(scheduled_date) = data.scheduled_date {
                    request.scheduled_date = Some(scheduled_date);
                }
                if let Some(hours) = duration_hours {
                    request.duration_hours = hours;
                }
                if let Some(notes) = data.notes {
                    request.notes = Some(notes);
                }
                Ok(request.clone())
            })
            .await
    }

    pub async fn get(&self, id: &str) -> AppResult<MaintenanceRequest> {
        self.repository.get::<MaintenanceRequest>(id).await
    }

    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<MaintenanceRequest>> {
        self.repository.requests_search(query).await
    }

    /// Requests visible to the caller: managers see everything, technicians
    /// their team's queue plus their own tasks, employees what they reported.
    pub async fn list_for(
        &self,
        claims: &UserClaims,
        query: &RequestQuery,
    ) -> AppResult<Vec<MaintenanceRequest>> {
        let rows = self.list(query).await?;
        match claims.role {
            UserRole::Manager => Ok(rows),
            UserRole::Technician => {
                let team_id = self.repository.get::<User>(claims.user_id()).await?.team_id;
                Ok(rows
                    .into_iter()
                    .filter(|r| {
                        r.technician_id.as_deref() == Some(claims.user_id())
                            || Some(&r.team_id) == team_id.as_ref()
                    })
                    .collect())
            }
            UserRole::Employee => Ok(rows
                .into_iter()
                .filter(|r| r.created_by == claims.user_id())
                .collect()),
        }
    }

    /// The caller's visible requests grouped into one column per stage
    pub async fn kanban(&self, claims: &UserClaims, query: &RequestQuery) -> AppResult<Vec<KanbanColumn>> {
        let rows = self.list_for(claims, query).await?;
        Ok(RequestStage::ALL
            .into_iter()
            .map(|stage| KanbanColumn {
                stage,
                requests: rows.iter().filter(|r| r.stage == stage).cloned().collect(),
            })
            .collect())
    }

    /// Scheduled requests inside the window, earliest first
    pub async fn calendar(&self, query: &CalendarQuery) -> AppResult<Vec<MaintenanceRequest>> {
        if query.to <= query.from {
            return Err(AppError::Validation("Calendar window is empty".to_string()));
        }
        let rows = self
            .repository
            .requests_scheduled_between(query.from, query.to)
            .await?;
        Ok(match query.technician_id {
            Some(ref technician_id) => rows
                .into_iter()
                .filter(|r| r.technician_id.as_ref() == Some(technician_id))
                .collect(),
            None => rows,
        })
    }
}
