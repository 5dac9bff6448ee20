use serde::{Deserialize, Serialize};

use crate::domain::{EmployeeId, Transaction, TransactionId};

pub const EMPLOYEES_ROUTE: &str = "/employees";
pub const PAGINATED_TRANSACTIONS_ROUTE: &str = "/paginatedTransactions";
pub const TRANSACTIONS_BY_EMPLOYEE_ROUTE: &str = "/transactionsByEmployee";
pub const SET_TRANSACTION_APPROVAL_ROUTE: &str = "/setTransactionApproval";

/// A page of results plus the cursor of the page after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: T,
    pub next_page: Option<u32>,
}

impl<T> PaginatedResponse<T> {
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }
}

pub type PaginatedTransactions = PaginatedResponse<Vec<Transaction>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedRequestParams {
    pub page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestByEmployeeParams {
    pub employee_id: EmployeeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTransactionApprovalParams {
    pub transaction_id: TransactionId,
    pub value: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Employee;

    #[test]
    fn paginated_response_uses_camel_case_cursor() {
        let page: PaginatedResponse<Vec<u32>> = PaginatedResponse {
            data: vec![1, 2],
            next_page: None,
        };
        let json = serde_json::to_value(&page).expect("json");
        assert_eq!(json, serde_json::json!({ "data": [1, 2], "nextPage": null }));
        assert!(!page.has_next_page());
    }

    #[test]
    fn transaction_decodes_from_mock_api_shape() {
        let raw = serde_json::json!({
            "id": "tx-1",
            "amount": 12.5,
            "employee": { "id": "e-1", "firstName": "Ada", "lastName": "Lovelace" },
            "merchant": "Blue Bottle",
            "date": "2022-01-03",
            "approved": false
        });
        let tx: Transaction = serde_json::from_value(raw).expect("decode");
        assert_eq!(tx.id, TransactionId::new("tx-1"));
        assert_eq!(tx.employee, Employee::new("e-1", "Ada", "Lovelace"));
    }

    #[test]
    fn by_employee_params_use_employee_id_key() {
        let params = RequestByEmployeeParams {
            employee_id: EmployeeId::new("e-7"),
        };
        let json = serde_json::to_value(&params).expect("json");
        assert_eq!(json, serde_json::json!({ "employeeId": "e-7" }));
    }

    #[test]
    fn all_employees_placeholder_is_recognised() {
        let all = Employee::all_employees();
        assert!(all.is_all_employees());
        assert_eq!(all.display_name(), "All Employees");
        assert!(!Employee::new("e-1", "Ada", "Lovelace").is_all_employees());
    }
}
