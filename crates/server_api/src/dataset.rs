//! In-memory employees and transactions served by the mock API.

use chrono::{Duration, NaiveDate};
use shared::{
    domain::{Employee, EmployeeId, Transaction, TransactionId},
    error::{ApiError, ErrorCode},
    protocol::PaginatedTransactions,
};
use thiserror::Error;

const SAMPLE_MERCHANTS: &[&str] = &[
    "Blue Bottle Coffee",
    "Delta Air Lines",
    "Uber",
    "WeWork",
    "Staples",
    "Sweetgreen",
    "Amazon Web Services",
];

const SAMPLE_TRANSACTION_COUNT: usize = 22;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("page cannot be null")]
    MissingPage,
    #[error("invalid page {page}")]
    InvalidPage { page: u32 },
    #[error("employee id cannot be empty")]
    EmptyEmployeeId,
    #[error("invalid transaction to approve: {0}")]
    TransactionNotFound(TransactionId),
}

impl From<DatasetError> for ApiError {
    fn from(value: DatasetError) -> Self {
        let code = match value {
            DatasetError::TransactionNotFound(_) => ErrorCode::NotFound,
            DatasetError::MissingPage
            | DatasetError::InvalidPage { .. }
            | DatasetError::EmptyEmployeeId => ErrorCode::Validation,
        };
        ApiError::new(code, value.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    employees: Vec<Employee>,
    transactions: Vec<Transaction>,
}

impl Dataset {
    pub fn new(employees: Vec<Employee>, transactions: Vec<Transaction>) -> Self {
        Self {
            employees,
            transactions,
        }
    }

    /// Deterministic dataset used when no dataset file is configured.
    pub fn sample() -> Self {
        let employees = vec![
            Employee::new("e-1", "James", "Smith"),
            Employee::new("e-2", "Mary", "Johnson"),
            Employee::new("e-3", "Robert", "Williams"),
            Employee::new("e-4", "Patricia", "Brown"),
        ];
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap_or_default();

        let transactions = (0..SAMPLE_TRANSACTION_COUNT)
            .map(|i| {
                let employee = employees[i % employees.len()].clone();
                Transaction {
                    id: TransactionId::new(format!("tx-{:03}", i + 1)),
                    amount: ((i * 37 % 500) as f64) + 0.99,
                    employee,
                    merchant: SAMPLE_MERCHANTS[i % SAMPLE_MERCHANTS.len()].to_string(),
                    date: start + Duration::days(i as i64),
                    approved: i % 3 == 0,
                }
            })
            .collect();

        Self::new(employees, transactions)
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn page(&self, page: u32, page_size: usize) -> Result<PaginatedTransactions, DatasetError> {
        let page_size = page_size.max(1);
        let start = usize::try_from(page)
            .ok()
            .and_then(|page| page.checked_mul(page_size))
            .filter(|start| *start <= self.transactions.len())
            .ok_or(DatasetError::InvalidPage { page })?;
        let end = start.saturating_add(page_size).min(self.transactions.len());
        let next_page = (end < self.transactions.len()).then_some(page + 1);

        Ok(PaginatedTransactions {
            data: self.transactions[start..end].to_vec(),
            next_page,
        })
    }

    pub fn by_employee(&self, employee_id: &EmployeeId) -> Result<Vec<Transaction>, DatasetError> {
        if employee_id.as_str().is_empty() {
            return Err(DatasetError::EmptyEmployeeId);
        }
        Ok(self
            .transactions
            .iter()
            .filter(|tx| &tx.employee.id == employee_id)
            .cloned()
            .collect())
    }

    pub fn set_approval(
        &mut self,
        transaction_id: &TransactionId,
        value: bool,
    ) -> Result<(), DatasetError> {
        let transaction = self
            .transactions
            .iter_mut()
            .find(|tx| &tx.id == transaction_id)
            .ok_or_else(|| DatasetError::TransactionNotFound(transaction_id.clone()))?;
        transaction.approved = value;
        Ok(())
    }
}
