// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use lexdesk::{CoordinatorConfig, ReassignmentCoordinator};
use lexdesk_api::{
    ApiError, ClientCaseMapResponse, ListPastClientsResponse, ListStaffCasesResponse,
    ListStaffClientsResponse, ListStaffResponse, ReassignmentTargetsResponse,
    SubmitDepartureRequest, SubmitDepartureResponse, get_client_case_map, list_past_clients,
    list_reassignment_targets, list_staff, list_staff_cases, list_staff_clients,
    submit_departure,
};
use lexdesk_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// LexDesk Server - HTTP server for staff-departure reassignment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// MySQL/MariaDB connection URL. Takes precedence over `--database`.
    #[arg(long)]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Seconds one client may take before it is reported as timed out
    #[arg(long, default_value_t = 30)]
    unit_timeout_secs: u64,

    /// Maximum number of clients processed concurrently
    #[arg(long, default_value_t = 8)]
    max_concurrency: usize,
}

impl Args {
    const fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::new(
            Duration::from_secs(self.unit_timeout_secs),
            self.max_concurrency,
        )
    }
}

/// Application state shared across handlers.
///
/// The coordinator owns the only handle to the persistence layer; read
/// handlers lock it through [`ReassignmentCoordinator::store`].
#[derive(Clone)]
struct AppState {
    coordinator: ReassignmentCoordinator<Persistence>,
    /// Cancelled on shutdown so queued clients are not started.
    shutdown: CancellationToken,
}

impl AppState {
    fn new(persistence: Persistence, config: CoordinatorConfig) -> Self {
        Self {
            coordinator: ReassignmentCoordinator::new(Arc::new(Mutex::new(persistence)), config),
            shutdown: CancellationToken::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaffCasesQuery {
    #[serde(default)]
    include_inactive: bool,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for GET `/staff`.
async fn handle_list_staff(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListStaffResponse>, HttpError> {
    info!("Handling list_staff request");

    let mut persistence = app_state.coordinator.store().lock().await;
    let response: ListStaffResponse = list_staff(&mut persistence)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/staff/{staff_id}/cases`.
///
/// `INACTIVE` cases are included only with `?includeInactive=true`.
async fn handle_list_staff_cases(
    AxumState(app_state): AxumState<AppState>,
    Path(staff_id): Path<String>,
    Query(query): Query<StaffCasesQuery>,
) -> Result<Json<ListStaffCasesResponse>, HttpError> {
    info!(
        staff_id = %staff_id,
        include_inactive = query.include_inactive,
        "Handling list_staff_cases request"
    );

    let mut persistence = app_state.coordinator.store().lock().await;
    let response: ListStaffCasesResponse =
        list_staff_cases(&mut persistence, &staff_id, query.include_inactive)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/staff/{staff_id}/clients`.
async fn handle_list_staff_clients(
    AxumState(app_state): AxumState<AppState>,
    Path(staff_id): Path<String>,
) -> Result<Json<ListStaffClientsResponse>, HttpError> {
    info!(staff_id = %staff_id, "Handling list_staff_clients request");

    let mut persistence = app_state.coordinator.store().lock().await;
    let response: ListStaffClientsResponse = list_staff_clients(&mut persistence, &staff_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/staff/{staff_id}/client_cases`.
async fn handle_get_client_case_map(
    AxumState(app_state): AxumState<AppState>,
    Path(staff_id): Path<String>,
) -> Result<Json<ClientCaseMapResponse>, HttpError> {
    info!(staff_id = %staff_id, "Handling client_case_map request");

    let response: ClientCaseMapResponse =
        get_client_case_map(&app_state.coordinator, &staff_id).await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/{staff_id}/reassignment_targets`.
async fn handle_list_reassignment_targets(
    AxumState(app_state): AxumState<AppState>,
    Path(staff_id): Path<String>,
) -> Result<Json<ReassignmentTargetsResponse>, HttpError> {
    info!(staff_id = %staff_id, "Handling reassignment_targets request");

    let response: ReassignmentTargetsResponse =
        list_reassignment_targets(&app_state.coordinator, &staff_id).await?;
    Ok(Json(response))
}

/// Handler for GET `/staff/{staff_id}/past_clients`.
async fn handle_list_past_clients(
    AxumState(app_state): AxumState<AppState>,
    Path(staff_id): Path<String>,
) -> Result<Json<ListPastClientsResponse>, HttpError> {
    info!(staff_id = %staff_id, "Handling list_past_clients request");

    let mut persistence = app_state.coordinator.store().lock().await;
    let response: ListPastClientsResponse = list_past_clients(&mut persistence, &staff_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/staff/{staff_id}/departure`.
///
/// Partial failure is still a 200; the body carries the per-client outcomes.
async fn handle_submit_departure(
    AxumState(app_state): AxumState<AppState>,
    Path(staff_id): Path<String>,
    Json(request): Json<SubmitDepartureRequest>,
) -> Result<Json<SubmitDepartureResponse>, HttpError> {
    info!(
        staff_id = %staff_id,
        decisions = request.decisions.len(),
        "Handling submit_departure request"
    );

    let response: SubmitDepartureResponse = submit_departure(
        &app_state.coordinator,
        &staff_id,
        &request,
        &app_state.shutdown,
    )
    .await?;

    if !response.full_success {
        warn!(
            staff_id = %staff_id,
            failed = response.failed,
            "Departure completed with failures"
        );
    }

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/staff", get(handle_list_staff))
        .route("/staff/{staff_id}/cases", get(handle_list_staff_cases))
        .route("/staff/{staff_id}/clients", get(handle_list_staff_clients))
        .route(
            "/staff/{staff_id}/client_cases",
            get(handle_get_client_case_map),
        )
        .route(
            "/staff/{staff_id}/reassignment_targets",
            get(handle_list_reassignment_targets),
        )
        .route("/staff/{staff_id}/past_clients", get(handle_list_past_clients))
        .route("/staff/{staff_id}/departure", post(handle_submit_departure))
        .with_state(app_state)
}

/// Resolves on Ctrl-C and cancels any queued departure work.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing LexDesk Server");

    let persistence: Persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        Persistence::new_with_mysql(url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let config: CoordinatorConfig = args.coordinator_config();
    info!(
        unit_timeout_secs = args.unit_timeout_secs,
        max_concurrency = config.effective_concurrency(),
        "Coordinator configured"
    );

    let app_state: AppState = AppState::new(persistence, config);
    let shutdown: CancellationToken = app_state.shutdown.clone();
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use lexdesk_domain::{Case, CaseId, Client, ClientId, Staff, StaffId};
    use tower::ServiceExt;

    /// Seeds staff X and Y, clients A and B, cases C1 (A) and C2 (A, B),
    /// with X handling both cases for every linked client.
    fn create_seeded_persistence() -> Persistence {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        for id in ["X", "Y"] {
            persistence
                .create_staff(&Staff::new(StaffId::new(id), &format!("Staff {id}"), "Lawyer"))
                .unwrap();
        }
        for id in ["A", "B"] {
            persistence
                .create_client(&Client::new(
                    ClientId::new(id),
                    &format!("Client {id}"),
                    "555-0100",
                ))
                .unwrap();
        }
        for id in ["C1", "C2"] {
            persistence
                .create_case(&Case::new(CaseId::new(id), &format!("Case {id}"), "civil"))
                .unwrap();
        }
        for (client, case) in [("A", "C1"), ("A", "C2"), ("B", "C2")] {
            persistence
                .link_client_case(&ClientId::new(client), &CaseId::new(case))
                .unwrap();
        }
        for case in ["C1", "C2"] {
            persistence
                .assign_staff_to_case(&StaffId::new("X"), &CaseId::new(case))
                .unwrap();
        }
        persistence
    }

    fn create_test_app_state() -> AppState {
        AppState::new(
            create_seeded_persistence(),
            CoordinatorConfig::new(Duration::from_secs(5), 4),
        )
    }

    async fn get_json(app: Router, uri: &str) -> (HttpStatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    async fn post_departure(
        app: Router,
        staff_id: &str,
        body: &serde_json::Value,
    ) -> (HttpStatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/staff/{staff_id}/departure"))
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_staff() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = get_json(app, "/staff").await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["staff"].as_array().unwrap().len(), 2);
        assert_eq!(body["staff"][0]["staffId"], "X");
    }

    #[tokio::test]
    async fn test_list_staff_cases() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = get_json(app, "/staff/X/cases").await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["cases"].as_array().unwrap().len(), 2);
        assert_eq!(body["cases"][0]["status"], "Active");
    }

    #[tokio::test]
    async fn test_list_staff_cases_unknown_staff_is_404() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = get_json(app, "/staff/NOBODY/cases").await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_list_staff_clients() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = get_json(app, "/staff/X/clients").await;

        assert_eq!(status, HttpStatusCode::OK);
        let ids: Vec<&str> = body["clients"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["clientId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_client_case_map() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = get_json(app, "/staff/X/client_cases").await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["clients"][0]["clientId"], "A");
        assert_eq!(body["clients"][0]["cases"].as_array().unwrap().len(), 2);
        assert_eq!(body["clients"][1]["clientId"], "B");
        assert_eq!(body["clients"][1]["cases"][0]["caseId"], "C2");
    }

    #[tokio::test]
    async fn test_reassignment_targets() {
        let app: Router = build_router(create_test_app_state());
        let (status, body) = get_json(app, "/staff/X/reassignment_targets").await;

        assert_eq!(status, HttpStatusCode::OK);
        let targets = body["targets"].as_array().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0]["staffId"], "Y");
    }

    #[tokio::test]
    async fn test_departure_then_past_clients() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let body = serde_json::json!({
            "decisions": [
                {"clientId": "A", "action": "past client"},
                {"clientId": "B", "action": "reassign", "targetStaffId": "Y"}
            ]
        });
        let (status, response) = post_departure(app.clone(), "X", &body).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["succeeded"], 2);
        assert_eq!(response["failed"], 0);
        assert_eq!(response["fullSuccess"], true);
        assert_eq!(response["message"], "Successfully processed 2 client(s)");
        assert_eq!(response["outcomes"][0]["status"], "success");

        let (status, past) = get_json(app.clone(), "/staff/X/past_clients").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(past["pastClients"].as_array().unwrap().len(), 2);

        let (_, remaining) = get_json(app, "/staff/X/clients").await;
        assert!(remaining["clients"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_departure_partial_failure_is_200() {
        let app: Router = build_router(create_test_app_state());
        let body = serde_json::json!({
            "decisions": [
                {"clientId": "A", "action": "retire"},
                {"clientId": "B", "action": "reassign", "targetStaffId": "Z"}
            ]
        });
        let (status, response) = post_departure(app, "X", &body).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["fullSuccess"], false);
        assert_eq!(response["message"], "Completed: 1 success, 1 failed");
        assert_eq!(response["outcomes"][1]["clientId"], "B");
        assert_eq!(response["outcomes"][1]["status"], "failure");
        assert_eq!(response["outcomes"][1]["errorKind"], "NotFoundError");
    }

    #[tokio::test]
    async fn test_departure_with_no_decisions_is_400() {
        let app: Router = build_router(create_test_app_state());
        let (status, response) =
            post_departure(app, "X", &serde_json::json!({"decisions": []})).await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(response["error"], true);
    }

    #[tokio::test]
    async fn test_departure_to_self_is_422() {
        let app: Router = build_router(create_test_app_state());
        let body = serde_json::json!({
            "decisions": [{"clientId": "A", "action": "reassign", "targetStaffId": "X"}]
        });
        let (status, _) = post_departure(app, "X", &body).await;

        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_departure_after_shutdown_reports_cancelled() {
        let app_state: AppState = create_test_app_state();
        app_state.shutdown.cancel();
        let app: Router = build_router(app_state);

        let body = serde_json::json!({
            "decisions": [{"clientId": "A", "action": "retire"}]
        });
        let (status, response) = post_departure(app, "X", &body).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response["outcomes"][0]["errorKind"], "CancelledError");
    }

    #[test]
    fn test_api_error_status_mapping() {
        let not_found: HttpError = ApiError::ResourceNotFound {
            resource_type: String::from("Staff"),
            message: String::from("staff 'Z' does not exist"),
        }
        .into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let internal: HttpError = ApiError::Internal {
            message: String::from("boom"),
        }
        .into();
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_args_defaults() {
        let args: Args = Args::parse_from(["lexdesk-server"]);
        assert_eq!(args.port, 3000);
        assert_eq!(args.unit_timeout_secs, 30);
        assert_eq!(args.max_concurrency, 8);
        assert!(args.database.is_none());
        assert!(args.mysql_url.is_none());
    }
}
