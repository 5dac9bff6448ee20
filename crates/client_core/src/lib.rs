use async_trait::async_trait;
use shared::{
    domain::{Employee, Transaction},
    protocol::{
        PaginatedRequestParams, PaginatedTransactions, RequestByEmployeeParams,
        SetTransactionApprovalParams,
    },
};

pub mod adapters;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod transport;

pub use adapters::{EmployeesAdapter, PaginatedTransactionsAdapter, TransactionsByEmployeeAdapter};
pub use config::ClientSettings;
pub use coordinator::{QueryMode, ViewCoordinator, ViewSnapshot};
pub use error::ClientError;
pub use transport::HttpTransactionsApi;

/// Remote collections backing the transaction view.
#[async_trait]
pub trait TransactionsApi: Send + Sync {
    async fn employees(&self) -> Result<Vec<Employee>, ClientError>;
    async fn paginated_transactions(
        &self,
        params: PaginatedRequestParams,
    ) -> Result<PaginatedTransactions, ClientError>;
    async fn transactions_by_employee(
        &self,
        params: RequestByEmployeeParams,
    ) -> Result<Vec<Transaction>, ClientError>;
    async fn set_transaction_approval(
        &self,
        params: SetTransactionApprovalParams,
    ) -> Result<(), ClientError>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/fake_api.rs"]
pub(crate) mod fake_api;
