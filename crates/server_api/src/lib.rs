use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::{
    domain::{Employee, Transaction},
    error::ApiError,
    protocol::{
        PaginatedRequestParams, PaginatedTransactions, RequestByEmployeeParams,
        SetTransactionApprovalParams,
    },
};
use tokio::sync::RwLock;

mod dataset;

pub use dataset::{Dataset, DatasetError};

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Clone)]
pub struct ApiContext {
    pub dataset: Arc<RwLock<Dataset>>,
    pub page_size: usize,
    pub latency: Duration,
}

impl ApiContext {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(dataset)),
            page_size: DEFAULT_PAGE_SIZE,
            latency: Duration::ZERO,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetFile {
    employees: Vec<Employee>,
    transactions: Vec<Transaction>,
}

pub async fn load_dataset_file(path: &Path) -> anyhow::Result<Dataset> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read dataset file '{}'", path.display()))?;
    let file: DatasetFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse dataset file '{}'", path.display()))?;
    Ok(Dataset::new(file.employees, file.transactions))
}

pub async fn list_employees(ctx: &ApiContext) -> Result<Vec<Employee>, ApiError> {
    ctx.simulate_latency().await;
    let dataset = ctx.dataset.read().await;
    Ok(dataset.employees().to_vec())
}

pub async fn paginated_transactions(
    ctx: &ApiContext,
    params: PaginatedRequestParams,
) -> Result<PaginatedTransactions, ApiError> {
    ctx.simulate_latency().await;
    let page = params.page.ok_or(DatasetError::MissingPage)?;
    let dataset = ctx.dataset.read().await;
    let response = dataset.page(page, ctx.page_size)?;
    tracing::debug!(
        page,
        count = response.data.len(),
        next_page = ?response.next_page,
        "served transactions page"
    );
    Ok(response)
}

pub async fn transactions_by_employee(
    ctx: &ApiContext,
    params: RequestByEmployeeParams,
) -> Result<Vec<Transaction>, ApiError> {
    ctx.simulate_latency().await;
    let dataset = ctx.dataset.read().await;
    let transactions = dataset.by_employee(&params.employee_id)?;
    tracing::debug!(
        employee_id = %params.employee_id,
        count = transactions.len(),
        "served transactions by employee"
    );
    Ok(transactions)
}

pub async fn set_transaction_approval(
    ctx: &ApiContext,
    params: SetTransactionApprovalParams,
) -> Result<(), ApiError> {
    ctx.simulate_latency().await;
    let mut dataset = ctx.dataset.write().await;
    dataset.set_approval(&params.transaction_id, params.value)?;
    tracing::info!(
        transaction_id = %params.transaction_id,
        approved = params.value,
        "transaction approval updated"
    );
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
