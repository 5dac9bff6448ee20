use std::sync::Arc;

use super::*;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use server_api::{ApiContext, Dataset};
use shared::{
    domain::{EmployeeId, TransactionId},
    error::{ApiError, ErrorCode},
    protocol::{
        EMPLOYEES_ROUTE, PAGINATED_TRANSACTIONS_ROUTE, SET_TRANSACTION_APPROVAL_ROUTE,
        TRANSACTIONS_BY_EMPLOYEE_ROUTE,
    },
};
use tokio::net::TcpListener;

type HttpResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

async fn employees(State(ctx): State<ApiContext>) -> HttpResult<Vec<shared::domain::Employee>> {
    server_api::list_employees(&ctx).await.map(Json).map_err(reject)
}

async fn page(
    State(ctx): State<ApiContext>,
    Json(params): Json<PaginatedRequestParams>,
) -> HttpResult<PaginatedTransactions> {
    server_api::paginated_transactions(&ctx, params)
        .await
        .map(Json)
        .map_err(reject)
}

async fn by_employee(
    State(ctx): State<ApiContext>,
    Json(params): Json<RequestByEmployeeParams>,
) -> HttpResult<Vec<shared::domain::Transaction>> {
    server_api::transactions_by_employee(&ctx, params)
        .await
        .map(Json)
        .map_err(reject)
}

async fn approval(
    State(ctx): State<ApiContext>,
    Json(params): Json<SetTransactionApprovalParams>,
) -> HttpResult<serde_json::Value> {
    server_api::set_transaction_approval(&ctx, params)
        .await
        .map(|()| Json(serde_json::json!({})))
        .map_err(reject)
}

fn mock_routes(ctx: ApiContext) -> Router {
    Router::new()
        .route(EMPLOYEES_ROUTE, post(employees))
        .route(PAGINATED_TRANSACTIONS_ROUTE, post(page))
        .route(TRANSACTIONS_BY_EMPLOYEE_ROUTE, post(by_employee))
        .route(SET_TRANSACTION_APPROVAL_ROUTE, post(approval))
        .with_state(ctx)
}

async fn spawn_mock_server() -> (String, ApiContext) {
    let ctx = ApiContext::new(Dataset::sample());
    let (server_url, _) = serve(mock_routes(ctx.clone())).await;
    (server_url, ctx)
}

async fn serve(app: Router) -> (String, std::net::SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), addr)
}

fn http_api(server_url: &str) -> HttpTransactionsApi {
    let mut settings = ClientSettings::default();
    settings.set_server_url(server_url);
    HttpTransactionsApi::new(&settings).expect("client")
}

#[tokio::test]
async fn http_api_fetches_employees_and_pages() {
    let (server_url, _ctx) = spawn_mock_server().await;
    let api = http_api(&server_url);

    let employees = api.employees().await.expect("employees");
    assert_eq!(employees.len(), 4);

    let page = api
        .paginated_transactions(PaginatedRequestParams { page: Some(0) })
        .await
        .expect("page");
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.next_page, Some(1));
}

#[tokio::test]
async fn http_api_keeps_path_prefix_of_server_url() {
    let app = Router::new().nest("/api", mock_routes(ApiContext::new(Dataset::sample())));
    let (server_url, _) = serve(app).await;

    for base in [format!("{server_url}/api"), format!("{server_url}/api/")] {
        let api = http_api(&base);
        assert_eq!(api.base_url().path(), "/api/");
        let employees = api.employees().await.expect("employees");
        assert_eq!(employees.len(), 4);
    }
}

#[tokio::test]
async fn http_api_surfaces_api_error_envelope() {
    let (server_url, _ctx) = spawn_mock_server().await;
    let api = http_api(&server_url);

    let err = api
        .paginated_transactions(PaginatedRequestParams { page: Some(99) })
        .await
        .expect_err("should fail");
    match err {
        ClientError::Api { route, error } => {
            assert_eq!(route, PAGINATED_TRANSACTIONS_ROUTE);
            assert_eq!(error.code, ErrorCode::Validation);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn http_api_reports_transport_failure_when_server_is_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = http_api(&format!("http://{addr}"));
    let err = api.employees().await.expect_err("should fail");
    assert!(matches!(err, ClientError::Transport { .. }));
    assert_eq!(err.route(), Some(EMPLOYEES_ROUTE));
}

#[tokio::test]
async fn invalid_server_url_is_rejected_up_front() {
    let settings = ClientSettings {
        server_url: "not a url".to_string(),
        ..ClientSettings::default()
    };
    let err = HttpTransactionsApi::new(&settings).expect_err("should fail");
    assert!(matches!(err, ClientError::InvalidServerUrl { .. }));
}

#[tokio::test]
async fn coordinator_over_http_walks_pages_and_filters() {
    let (server_url, _ctx) = spawn_mock_server().await;
    let mut coordinator = ViewCoordinator::new(Arc::new(http_api(&server_url)));

    assert!(coordinator.bootstrap().await.expect("bootstrap"));
    assert_eq!(coordinator.transactions().len(), 5);
    assert!(coordinator.load_more(1).await.expect("page 2"));
    assert_eq!(coordinator.transactions().len(), 10);

    coordinator
        .load_transactions_by_employee(&EmployeeId::new("e-1"))
        .await
        .expect("by employee");
    assert!(coordinator
        .transactions()
        .iter()
        .all(|tx| tx.employee.id == EmployeeId::new("e-1")));
    assert!(!coordinator.has_more_pages());
}

#[tokio::test]
async fn approval_round_trips_through_server_state() {
    let (server_url, ctx) = spawn_mock_server().await;
    let api = http_api(&server_url);

    api.set_transaction_approval(SetTransactionApprovalParams {
        transaction_id: TransactionId::new("tx-002"),
        value: true,
    })
    .await
    .expect("approve");

    let dataset = ctx.dataset.read().await;
    assert!(dataset.transactions()[1].approved);
}
