//! View-state coordinator: merges the three adapters into one displayed list.

use std::sync::Arc;

use shared::{
    domain::{Employee, EmployeeId, Transaction, TransactionId},
    protocol::SetTransactionApprovalParams,
};
use tokio::sync::watch;

use crate::{
    adapters::{EmployeesAdapter, PaginatedTransactionsAdapter, TransactionsByEmployeeAdapter},
    error::ClientError,
    TransactionsApi,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryMode {
    #[default]
    AllTransactions,
    ByEmployee(EmployeeId),
}

/// Immutable view of the coordinator state handed to presentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub employees: Option<Vec<Employee>>,
    pub employees_loading: bool,
    pub transactions: Vec<Transaction>,
    pub paginated_loading: bool,
    pub by_employee_loading: bool,
    pub has_more_pages: bool,
    pub next_page: Option<u32>,
    pub mode: QueryMode,
    pub error: Option<String>,
}

impl ViewSnapshot {
    pub fn transactions_loading(&self) -> bool {
        self.paginated_loading || self.by_employee_loading
    }
}

pub struct ViewCoordinator {
    api: Arc<dyn TransactionsApi>,
    employees: EmployeesAdapter,
    paginated: PaginatedTransactionsAdapter,
    by_employee: TransactionsByEmployeeAdapter,
    transactions: Vec<Transaction>,
    mode: QueryMode,
    error: Option<String>,
    snapshots: watch::Sender<ViewSnapshot>,
}

impl ViewCoordinator {
    pub fn new(api: Arc<dyn TransactionsApi>) -> Self {
        let (snapshots, _) = watch::channel(ViewSnapshot::default());
        Self {
            employees: EmployeesAdapter::new(api.clone()),
            paginated: PaginatedTransactionsAdapter::new(api.clone()),
            by_employee: TransactionsByEmployeeAdapter::new(api.clone()),
            api,
            transactions: Vec::new(),
            mode: QueryMode::AllTransactions,
            error: None,
            snapshots,
        }
    }

    /// Receives a fresh snapshot after every state transition, including the
    /// loading-flag flips that precede each fetch.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            employees: self.employees.data().map(<[Employee]>::to_vec),
            employees_loading: self.employees.loading(),
            transactions: self.transactions.clone(),
            paginated_loading: self.paginated.loading(),
            by_employee_loading: self.by_employee.loading(),
            has_more_pages: self.has_more_pages(),
            next_page: self.paginated.data().and_then(|page| page.next_page),
            mode: self.mode.clone(),
            error: self.error.clone(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn employees(&self) -> Option<&[Employee]> {
        self.employees.data()
    }

    pub fn mode(&self) -> &QueryMode {
        &self.mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while the last fetched page is non-empty and carries a next cursor.
    pub fn has_more_pages(&self) -> bool {
        self.mode == QueryMode::AllTransactions
            && self
                .paginated
                .data()
                .is_some_and(|page| page.has_next_page() && !page.data.is_empty())
    }

    /// Loads the first page when nothing has been fetched yet. Returns whether a load ran.
    pub async fn bootstrap(&mut self) -> Result<bool, ClientError> {
        if self.employees.data().is_some() || self.employees.loading() {
            return Ok(false);
        }
        tracing::info!("bootstrapping transaction view");
        self.load_all_transactions().await?;
        Ok(true)
    }

    /// Refreshes employees, drops the by-employee result and appends the next
    /// page of all transactions to the displayed list.
    pub async fn load_all_transactions(&mut self) -> Result<(), ClientError> {
        let result = self.load_all_transactions_inner().await;
        self.finish(result)
    }

    async fn load_all_transactions_inner(&mut self) -> Result<(), ClientError> {
        self.employees.mark_loading();
        self.publish();
        self.employees.fetch_all().await?;
        self.publish();

        self.by_employee.invalidate();
        if self.mode != QueryMode::AllTransactions {
            self.mode = QueryMode::AllTransactions;
        }

        let restarting = self.paginated.data().is_none();
        if self.paginated.next_page_to_fetch().is_some() {
            self.paginated.mark_loading();
            self.publish();
        }
        let Some(page) = self.paginated.fetch_all().await? else {
            tracing::debug!("no further transaction pages");
            return Ok(());
        };

        if restarting {
            self.transactions.clear();
        }
        tracing::info!(
            appended = page.data.len(),
            total = self.transactions.len() + page.data.len(),
            next_page = ?page.next_page,
            "transactions page appended"
        );
        self.transactions.extend(page.data);
        Ok(())
    }

    /// "View More": loads the next page only if `expected_page` is still the
    /// page the pager would fetch. Stale requests (double clicks, or a filter
    /// change in between) are dropped and reported as `Ok(false)`.
    pub async fn load_more(&mut self, expected_page: u32) -> Result<bool, ClientError> {
        let pending = self.paginated.data().and_then(|page| page.next_page);
        if self.mode != QueryMode::AllTransactions || pending != Some(expected_page) {
            tracing::debug!(
                expected_page,
                pending = ?pending,
                "discarding stale load-more request"
            );
            return Ok(false);
        }
        self.load_all_transactions().await?;
        Ok(true)
    }

    /// Resets pagination and replaces the displayed list with every transaction of `employee_id`.
    /// On failure the pager is put back so the current list can keep paging.
    pub async fn load_transactions_by_employee(
        &mut self,
        employee_id: &EmployeeId,
    ) -> Result<(), ClientError> {
        let previous_page = self.paginated.data().cloned();
        let result = self.load_transactions_by_employee_inner(employee_id).await;
        if result.is_err() {
            self.paginated.restore(previous_page);
        }
        self.finish(result)
    }

    async fn load_transactions_by_employee_inner(
        &mut self,
        employee_id: &EmployeeId,
    ) -> Result<(), ClientError> {
        self.paginated.invalidate();
        self.by_employee.mark_loading();
        self.publish();

        let transactions = self.by_employee.fetch_by_id(employee_id).await?.to_vec();
        tracing::info!(
            employee_id = %employee_id,
            count = transactions.len(),
            "displaying transactions for employee"
        );
        self.transactions = transactions;
        self.mode = QueryMode::ByEmployee(employee_id.clone());
        Ok(())
    }

    pub async fn on_employee_selected(&mut self, employee: &Employee) -> Result<(), ClientError> {
        if employee.is_all_employees() {
            tracing::info!("all employees selected, loading all transactions");
            self.load_all_transactions().await
        } else {
            tracing::info!(
                employee_id = %employee.id,
                name = %employee.display_name(),
                "employee selected"
            );
            self.load_transactions_by_employee(&employee.id).await
        }
    }

    pub async fn set_transaction_approval(
        &mut self,
        transaction_id: &TransactionId,
        value: bool,
    ) -> Result<(), ClientError> {
        let result = self
            .api
            .set_transaction_approval(SetTransactionApprovalParams {
                transaction_id: transaction_id.clone(),
                value,
            })
            .await;
        if result.is_ok() {
            for tx in self
                .transactions
                .iter_mut()
                .chain(self.by_employee.data_mut().into_iter().flatten())
                .filter(|tx| &tx.id == transaction_id)
            {
                tx.approved = value;
            }
        }
        self.finish(result)
    }

    pub fn dismiss_error(&mut self) {
        if self.error.take().is_some() {
            self.publish();
        }
    }

    fn finish(&mut self, result: Result<(), ClientError>) -> Result<(), ClientError> {
        match &result {
            Ok(()) => self.error = None,
            Err(err) => {
                tracing::error!(error = %err, "transaction view fetch failed");
                self.error = Some(err.to_string());
            }
        }
        self.publish();
        result
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
