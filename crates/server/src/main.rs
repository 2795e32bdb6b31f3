use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::ApiContext;
use shared::{
    domain::{Employee, EmployeeForm, EmployeeId},
    error::{ApiError, ErrorCode},
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
const DELETED_BODY: &str = "Deleted Successfully";

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let storage = Storage::new(&settings.database_url)
        .await
        .map_err(|error| {
            error!(
                database_url = %settings.database_url,
                error = %format!("{error:#}"),
                "failed to open SQLite database; verify parent directory exists and permissions are correct"
            );
            error
        })?;
    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "employee api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("employee api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for shutdown signal");
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/employees",
            get(http_list_employees).post(http_create_employee),
        )
        .route(
            "/employees/:id",
            get(http_get_employee)
                .put(http_update_employee)
                .delete(http_delete_employee),
        )
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn failure(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(message = %err.message, "employee request failed");
    }
    (status, Json(err))
}

async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state
        .api
        .storage
        .health_check()
        .await
        .map_err(|e| failure(ApiError::internal(e.to_string())))?;
    Ok("ok")
}

async fn http_list_employees(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Employee>>> {
    info!("GET /employees");
    let employees = server_api::list_employees(&state.api)
        .await
        .map_err(failure)?;
    Ok(Json(employees))
}

async fn http_get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    info!(employee_id = %id, "GET /employees/:id");
    let employee = server_api::get_employee(&state.api, &EmployeeId(id))
        .await
        .map_err(failure)?;
    Ok(Json(employee))
}

async fn http_create_employee(
    State(state): State<Arc<AppState>>,
    Json(form): Json<EmployeeForm>,
) -> ApiResult<Json<Employee>> {
    info!("POST /employees");
    let employee = server_api::create_employee(&state.api, &form)
        .await
        .map_err(failure)?;
    Ok(Json(employee))
}

async fn http_update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(form): Json<EmployeeForm>,
) -> ApiResult<Json<Employee>> {
    info!(employee_id = %id, "PUT /employees/:id");
    let employee = server_api::update_employee(&state.api, &EmployeeId(id), &form)
        .await
        .map_err(failure)?;
    Ok(Json(employee))
}

async fn http_delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    info!(employee_id = %id, "DELETE /employees/:id");
    server_api::delete_employee(&state.api, &EmployeeId(id))
        .await
        .map_err(failure)?;
    Ok(DELETED_BODY)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
