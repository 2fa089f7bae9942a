//! API tests driving the router in-process over an in-memory store

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use gearguard_server::{api, repository::Repository, services::Services, AppConfig, AppState};

const DEMO_PASSWORD: &str = "Demo123!";
const MANAGER: &str = "manager@gearguard.com";
const MECHANIC: &str = "mechanic@gearguard.com";
const EMPLOYEE: &str = "employee@gearguard.com";

async fn spawn_app() -> Router {
    let config = AppConfig::default();
    let services = Services::new(Repository::in_memory(), &config);
    services.seed_demo_data().await.expect("Failed to seed demo data");
    api::create_router(AppState::new(config, services))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/users/auth",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert_eq!(body["tokenType"], "Bearer");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = spawn_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_signup_login_and_profile() {
    let app = spawn_app().await;

    let signup = json!({
        "name": "Erin Engineer",
        "email": "Erin@Example.com",
        "password": "Sup3r-secret",
        "role": "Technician",
        "teamId": "t1"
    });
    let (status, body) = send(&app, Method::POST, "/api/v1/users", None, Some(signup.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "erin@example.com");
    assert_eq!(body["teamId"], "t1");
    assert!(body.get("passwordHash").is_none());

    let (status, body) = send(&app, Method::POST, "/api/v1/users", None, Some(signup)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");

    let weak = json!({
        "name": "Weak",
        "email": "weak@example.com",
        "password": "password",
        "role": "Employee"
    });
    let (status, _) = send(&app, Method::POST, "/api/v1/users", None, Some(weak)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let token = login(&app, "erin@example.com", "Sup3r-secret").await;
    let (status, body) = send(&app, Method::GET, "/api/v1/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Erin Engineer");

    let (status, _) = send(&app, Method::POST, "/api/v1/users/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users/auth",
        None,
        Some(json!({ "email": "erin@example.com", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_endpoints_require_a_token() {
    let app = spawn_app().await;

    let (status, _) = send(&app, Method::GET, "/api/v1/requests", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/v1/equipment", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_leak_scenario_over_http() {
    let app = spawn_app().await;
    let employee = login(&app, EMPLOYEE, DEMO_PASSWORD).await;
    let mechanic = login(&app, MECHANIC, DEMO_PASSWORD).await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(&employee),
        Some(json!({
            "subject": "Leak",
            "equipmentId": "e1",
            "type": "Corrective",
            "stage": "Repaired"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["stage"], "New");
    assert_eq!(created["teamId"], "t1");
    assert_eq!(created["createdBy"], "u3");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, accepted) = send(
        &app,
        Method::POST,
        &format!("/api/v1/requests/{id}/accept"),
        Some(&mechanic),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["stage"], "In Progress");
    assert_eq!(accepted["technicianId"], "u2");

    let (_, e1) = send(&app, Method::GET, "/api/v1/equipment/e1", Some(&mechanic), None).await;
    assert_eq!(e1["status"], "Under Repair");
    assert_eq!(e1["openRequests"], 2);

    for _ in 0..2 {
        let (status, repaired) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/requests/{id}/stage"),
            Some(&mechanic),
            Some(json!({ "stage": "Repaired" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(repaired["stage"], "Repaired");

        let (_, e1) = send(&app, Method::GET, "/api/v1/equipment/e1", Some(&mechanic), None).await;
        assert_eq!(e1["status"], "Operational");
        assert_eq!(e1["health"], 85);
    }
}

#[tokio::test]
async fn test_second_accept_conflicts() {
    let app = spawn_app().await;
    let mechanic = login(&app, MECHANIC, DEMO_PASSWORD).await;
    let manager = login(&app, MANAGER, DEMO_PASSWORD).await;

    let (status, _) = send(&app, Method::POST, "/api/v1/requests/r1/accept", Some(&mechanic), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/requests/r1/accept",
        Some(&manager),
        Some(json!({ "technicianId": "u2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_role_gates() {
    let app = spawn_app().await;
    let employee = login(&app, EMPLOYEE, DEMO_PASSWORD).await;
    let mechanic = login(&app, MECHANIC, DEMO_PASSWORD).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/requests/r1/stage",
        Some(&employee),
        Some(json!({ "stage": "Scrap" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // r1 is New and unclaimed: technicians must accept it first
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/requests/r1/stage",
        Some(&mechanic),
        Some(json!({ "stage": "Repaired" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::POST, "/api/v1/requests/r1/accept", Some(&employee), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/equipment",
        Some(&employee),
        Some(json!({
            "name": "Lathe",
            "serialNumber": "LT-1",
            "category": "Heavy Machinery",
            "location": "Floor A",
            "maintenanceTeamId": "t1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/v1/reports", Some(&mechanic), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/v1/users", Some(&mechanic), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // nothing changed
    let (_, e1) = send(&app, Method::GET, "/api/v1/equipment/e1", Some(&employee), None).await;
    assert_eq!(e1["status"], "Operational");
    assert_eq!(e1["isActive"], true);
}

#[tokio::test]
async fn test_manager_reassigns_technician() {
    let app = spawn_app().await;
    let manager = login(&app, MANAGER, DEMO_PASSWORD).await;

    let (status, team) = send(
        &app,
        Method::POST,
        "/api/v1/teams/t2/members",
        Some(&manager),
        Some(json!({ "userId": "u2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(team["members"].as_array().unwrap().contains(&json!("u2")));

    let (_, user) = send(&app, Method::GET, "/api/v1/users/u2", Some(&manager), None).await;
    assert_eq!(user["teamId"], "t2");

    let (_, t1) = send(&app, Method::GET, "/api/v1/teams/t1", Some(&manager), None).await;
    assert!(t1["members"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, Method::DELETE, "/api/v1/users/u1", Some(&manager), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot delete the admin user");
}

#[tokio::test]
async fn test_role_views() {
    let app = spawn_app().await;
    let manager = login(&app, MANAGER, DEMO_PASSWORD).await;
    let mechanic = login(&app, MECHANIC, DEMO_PASSWORD).await;

    let (status, board) = send(&app, Method::GET, "/api/v1/requests/kanban", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board.as_array().unwrap().len(), 4);
    assert_eq!(board[1]["stage"], "In Progress");

    let (_, mine) = send(&app, Method::GET, "/api/v1/requests", Some(&mechanic), None).await;
    let ids: Vec<&str> = mine.as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["r1"]);

    let (status, dashboard) = send(&app, Method::GET, "/api/v1/dashboard", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["criticalEquipment"], 1);
    assert_eq!(dashboard["openRequests"], 2);

    let (status, report) = send(&app, Method::GET, "/api/v1/reports", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["totalRequests"], 2);

    let (status, centers) = send(&app, Method::GET, "/api/v1/work-centers", Some(&mechanic), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(centers.as_array().unwrap().contains(&json!("Warehouse")));
}

#[tokio::test]
async fn test_losing_technician_cannot_take_over() {
    let app = spawn_app().await;
    let manager = login(&app, MANAGER, DEMO_PASSWORD).await;
    let bob = login(&app, MECHANIC, DEMO_PASSWORD).await;
    let dave = login(&app, "it@gearguard.com", DEMO_PASSWORD).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/teams/t1/members",
        Some(&manager),
        Some(json!({ "userId": "u4" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, accepted) = send(&app, Method::POST, "/api/v1/requests/r1/accept", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["technicianId"], "u2");

    let (status, _) = send(&app, Method::POST, "/api/v1/requests/r1/accept", Some(&dave), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/requests/r1",
        Some(&dave),
        Some(json!({ "technicianId": "u4" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, r1) = send(&app, Method::GET, "/api/v1/requests/r1", Some(&bob), None).await;
    assert_eq!(r1["technicianId"], "u2");
    assert_eq!(r1["stage"], "In Progress");
}

#[tokio::test]
async fn test_blank_subject_is_rejected() {
    let app = spawn_app().await;
    let employee = login(&app, EMPLOYEE, DEMO_PASSWORD).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(&employee),
        Some(json!({ "subject": "   ", "type": "Corrective", "equipmentId": "e1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, mine) = send(&app, Method::GET, "/api/v1/requests", Some(&employee), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_equipment_filters() {
    let app = spawn_app().await;
    let employee = login(&app, EMPLOYEE, DEMO_PASSWORD).await;

    let (status, owned) = send(
        &app,
        Method::GET,
        "/api/v1/equipment?assignedEmployeeId=u3",
        Some(&employee),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = owned.as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["e2"]);

    let (_, logistics) = send(&app, Method::GET, "/api/v1/equipment?department=Logistics", Some(&employee), None).await;
    assert_eq!(logistics[0]["id"], "e3");
}

#[tokio::test]
async fn test_account_changes_apply_to_issued_tokens() {
    let app = spawn_app().await;
    let manager = login(&app, MANAGER, DEMO_PASSWORD).await;
    let mechanic = login(&app, MECHANIC, DEMO_PASSWORD).await;
    let employee = login(&app, EMPLOYEE, DEMO_PASSWORD).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/users/u2",
        Some(&manager),
        Some(json!({ "role": "Employee" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::POST, "/api/v1/requests/r1/accept", Some(&mechanic), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/users/u3",
        Some(&manager),
        Some(json!({ "isActive": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/v1/requests", Some(&employee), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
