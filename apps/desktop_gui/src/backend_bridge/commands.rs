//! Backend commands queued from UI to backend worker.

use shared::domain::{Employee, TransactionId};

#[derive(Debug, Clone)]
pub enum BackendCommand {
    Bootstrap,
    SelectEmployee(Employee),
    LoadMore { expected_page: u32 },
    SetApproval {
        transaction_id: TransactionId,
        value: bool,
    },
    DismissError,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::SelectEmployee(_) => "select_employee",
            Self::LoadMore { .. } => "load_more",
            Self::SetApproval { .. } => "set_approval",
            Self::DismissError => "dismiss_error",
        }
    }
}
