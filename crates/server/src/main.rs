use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use server_api::{
    list_employees, load_dataset_file, paginated_transactions, set_transaction_approval,
    transactions_by_employee, ApiContext, Dataset,
};
use shared::{
    domain::{Employee, Transaction},
    error::{ApiError, ErrorCode},
    protocol::{
        PaginatedRequestParams, PaginatedTransactions, RequestByEmployeeParams,
        SetTransactionApprovalParams, EMPLOYEES_ROUTE, PAGINATED_TRANSACTIONS_ROUTE,
        SET_TRANSACTION_APPROVAL_ROUTE, TRANSACTIONS_BY_EMPLOYEE_ROUTE,
    },
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

type HttpResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let dataset = match &settings.dataset_path {
        Some(path) => load_dataset_file(path).await?,
        None => Dataset::sample(),
    };
    info!(
        employees = dataset.employees().len(),
        transactions = dataset.transactions().len(),
        page_size = settings.page_size,
        latency_ms = settings.latency_ms,
        "dataset loaded"
    );

    let api = ApiContext::new(dataset)
        .with_page_size(settings.page_size)
        .with_latency(settings.latency());
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(EMPLOYEES_ROUTE, post(http_list_employees))
        .route(PAGINATED_TRANSACTIONS_ROUTE, post(http_paginated_transactions))
        .route(TRANSACTIONS_BY_EMPLOYEE_ROUTE, post(http_transactions_by_employee))
        .route(SET_TRANSACTION_APPROVAL_ROUTE, post(http_set_transaction_approval))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn status_for(err: &ApiError) -> StatusCode {
    match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn into_http_error(err: ApiError) -> (StatusCode, Json<ApiError>) {
    tracing::warn!(code = ?err.code, message = %err.message, "request rejected");
    (status_for(&err), Json(err))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_employees(State(state): State<Arc<AppState>>) -> HttpResult<Vec<Employee>> {
    list_employees(&state.api)
        .await
        .map(Json)
        .map_err(into_http_error)
}

async fn http_paginated_transactions(
    State(state): State<Arc<AppState>>,
    Json(params): Json<PaginatedRequestParams>,
) -> HttpResult<PaginatedTransactions> {
    paginated_transactions(&state.api, params)
        .await
        .map(Json)
        .map_err(into_http_error)
}

async fn http_transactions_by_employee(
    State(state): State<Arc<AppState>>,
    Json(params): Json<RequestByEmployeeParams>,
) -> HttpResult<Vec<Transaction>> {
    transactions_by_employee(&state.api, params)
        .await
        .map(Json)
        .map_err(into_http_error)
}

async fn http_set_transaction_approval(
    State(state): State<Arc<AppState>>,
    Json(params): Json<SetTransactionApprovalParams>,
) -> HttpResult<serde_json::Value> {
    set_transaction_approval(&state.api, params)
        .await
        .map(|()| Json(serde_json::json!({})))
        .map_err(into_http_error)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
