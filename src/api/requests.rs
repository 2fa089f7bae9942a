//! Maintenance request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        request::{
            AcceptRequest, CalendarQuery, CreateRequest, KanbanColumn, RequestQuery, SetStage,
            UpdateRequest,
        },
        MaintenanceRequest, UserRole,
    },
};

use super::AuthenticatedUser;

/// List requests visible to the caller
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "Requests, newest first", body = Vec<MaintenanceRequest>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<Vec<MaintenanceRequest>>> {
    let requests = state.services.requests.list_for(&claims, &query).await?;
    Ok(Json(requests))
}

/// File a maintenance request. It always starts in New.
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = MaintenanceRequest),
        (status = 400, description = "Invalid input or no team could be resolved"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(mut data): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<MaintenanceRequest>)> {
    data.created_by = claims.sub.clone();

    let request = state.services.requests.create(data).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Get request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = MaintenanceRequest),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MaintenanceRequest>> {
    let request = state.services.requests.get(&id).await?;
    Ok(Json(request))
}

/// Edit request details (managers and technicians). Only managers may
/// change the technician.
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "Request updated", body = MaintenanceRequest),
        (status = 400, description = "Blank subject or technician not on the request's team"),
        (status = 403, description = "Employees cannot edit requests; technicians cannot reassign"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn update_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(data): Json<UpdateRequest>,
) -> AppResult<Json<MaintenanceRequest>> {
    if claims.role == UserRole::Employee {
        return Err(AppError::Authorization("Employees cannot edit requests".to_string()));
    }

    let request = state.services.requests.update(claims.role, &id, data).await?;
    Ok(Json(request))
}

/// Accept a New request and start work on it.
///
/// Technicians accept for themselves; managers name the technician.
#[utoipa::path(
    post,
    path = "/requests/{id}/accept",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    request_body = AcceptRequest,
    responses(
        (status = 200, description = "Request accepted", body = MaintenanceRequest),
        (status = 400, description = "Technician is not on the request's team"),
        (status = 403, description = "Caller may not accept for this technician"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already accepted")
    )
)]
pub async fn accept_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    body: Option<Json<AcceptRequest>>,
) -> AppResult<Json<MaintenanceRequest>> {
    let requested = body.and_then(|Json(b)| b.technician_id);

    let technician_id = match (claims.role, requested) {
        (UserRole::Manager, Some(technician_id)) => technician_id,
        (UserRole::Manager, None) => {
            return Err(AppError::Validation("technicianId is required".to_string()))
        }
        (UserRole::Technician, Some(technician_id)) if technician_id != claims.sub => {
            return Err(AppError::Authorization(
                "Technicians can only accept requests for themselves".to_string(),
            ))
        }
        (UserRole::Technician, _) => claims.sub.clone(),
        (UserRole::Employee, _) => {
            return Err(AppError::Authorization("Technician role required".to_string()))
        }
    };

    let request = state.services.requests.accept(&id, &technician_id).await?;
    Ok(Json(request))
}

/// Move a request to another stage
#[utoipa::path(
    put,
    path = "/requests/{id}/stage",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    request_body = SetStage,
    responses(
        (status = 200, description = "Stage set", body = MaintenanceRequest),
        (status = 403, description = "Stage change not allowed for this caller"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn set_stage(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(data): Json<SetStage>,
) -> AppResult<Json<MaintenanceRequest>> {
    let request = state
        .services
        .requests
        .set_stage_for(&claims, &id, data.stage)
        .await?;
    Ok(Json(request))
}

/// Requests grouped by stage
#[utoipa::path(
    get,
    path = "/requests/kanban",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "One column per stage", body = Vec<KanbanColumn>)
    )
)]
pub async fn kanban(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<Vec<KanbanColumn>>> {
    let columns = state.services.requests.kanban(&claims, &query).await?;
    Ok(Json(columns))
}

/// Scheduled requests inside a time window
#[utoipa::path(
    get,
    path = "/requests/calendar",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(CalendarQuery),
    responses(
        (status = 200, description = "Scheduled requests, earliest first", body = Vec<MaintenanceRequest>),
        (status = 400, description = "Empty window")
    )
)]
pub async fn calendar(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(mut query): Query<CalendarQuery>,
) -> AppResult<Json<Vec<MaintenanceRequest>>> {
    if claims.role == UserRole::Technician {
        query.technician_id = Some(claims.sub.clone());
    }

    let requests = state.services.requests.calendar(&query).await?;
    Ok(Json(requests))
}
