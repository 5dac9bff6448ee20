//! Remote collection adapters.
//!
//! Each adapter wraps one remote collection and tracks the last value it
//! fetched plus a loading flag. Adapters never merge results; that is the
//! coordinator's job.

use std::sync::Arc;

use shared::{
    domain::{Employee, EmployeeId, Transaction},
    protocol::{PaginatedRequestParams, PaginatedTransactions, RequestByEmployeeParams},
};

use crate::{error::ClientError, TransactionsApi};

pub struct EmployeesAdapter {
    api: Arc<dyn TransactionsApi>,
    data: Option<Vec<Employee>>,
    loading: bool,
}

impl EmployeesAdapter {
    pub fn new(api: Arc<dyn TransactionsApi>) -> Self {
        Self {
            api,
            data: None,
            loading: false,
        }
    }

    pub fn data(&self) -> Option<&[Employee]> {
        self.data.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn mark_loading(&mut self) {
        self.loading = true;
    }

    pub async fn fetch_all(&mut self) -> Result<&[Employee], ClientError> {
        self.loading = true;
        let result = self.api.employees().await;
        self.loading = false;

        let employees = result?;
        tracing::debug!(count = employees.len(), "employees fetched");
        Ok(self.data.insert(employees).as_slice())
    }

    pub fn invalidate(&mut self) {
        self.data = None;
    }
}

/// Cursor-driven pager over all transactions. Holds only the most recent page.
pub struct PaginatedTransactionsAdapter {
    api: Arc<dyn TransactionsApi>,
    data: Option<PaginatedTransactions>,
    loading: bool,
}

impl PaginatedTransactionsAdapter {
    pub fn new(api: Arc<dyn TransactionsApi>) -> Self {
        Self {
            api,
            data: None,
            loading: false,
        }
    }

    pub fn data(&self) -> Option<&PaginatedTransactions> {
        self.data.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn mark_loading(&mut self) {
        self.loading = true;
    }

    /// Page the next `fetch_all` will request, or `None` once the collection is exhausted.
    pub fn next_page_to_fetch(&self) -> Option<u32> {
        match &self.data {
            None => Some(0),
            Some(page) => page.next_page,
        }
    }

    /// Fetches the page after the last one fetched. Returns `Ok(None)` without
    /// touching the network when the previous page carried no cursor.
    pub async fn fetch_all(&mut self) -> Result<Option<PaginatedTransactions>, ClientError> {
        let Some(page) = self.next_page_to_fetch() else {
            self.loading = false;
            return Ok(None);
        };

        self.loading = true;
        let result = self
            .api
            .paginated_transactions(PaginatedRequestParams { page: Some(page) })
            .await;
        self.loading = false;

        let response = result?;
        tracing::debug!(
            page,
            count = response.data.len(),
            next_page = ?response.next_page,
            "transactions page fetched"
        );
        self.data = Some(response.clone());
        Ok(Some(response))
    }

    pub fn invalidate(&mut self) {
        self.data = None;
    }

    /// Puts back a page taken before an `invalidate` whose follow-up failed.
    pub fn restore(&mut self, data: Option<PaginatedTransactions>) {
        self.data = data;
    }
}

pub struct TransactionsByEmployeeAdapter {
    api: Arc<dyn TransactionsApi>,
    data: Option<Vec<Transaction>>,
    loading: bool,
}

impl TransactionsByEmployeeAdapter {
    pub fn new(api: Arc<dyn TransactionsApi>) -> Self {
        Self {
            api,
            data: None,
            loading: false,
        }
    }

    pub fn data(&self) -> Option<&[Transaction]> {
        self.data.as_deref()
    }

    pub fn data_mut(&mut self) -> Option<&mut Vec<Transaction>> {
        self.data.as_mut()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn mark_loading(&mut self) {
        self.loading = true;
    }

    pub async fn fetch_by_id(&mut self, employee_id: &EmployeeId) -> Result<&[Transaction], ClientError> {
        self.loading = true;
        let result = self
            .api
            .transactions_by_employee(RequestByEmployeeParams {
                employee_id: employee_id.clone(),
            })
            .await;
        self.loading = false;

        let transactions = result?;
        tracing::debug!(
            employee_id = %employee_id,
            count = transactions.len(),
            "transactions by employee fetched"
        );
        Ok(self.data.insert(transactions).as_slice())
    }

    pub fn invalidate(&mut self) {
        self.data = None;
    }
}

#[cfg(test)]
#[path = "tests/adapters_tests.rs"]
mod tests;
