//! Backend-to-UI events and error modeling for the desktop controller.

use client_core::ViewSnapshot;

pub enum UiEvent {
    Info(String),
    Snapshot(ViewSnapshot),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadTransactions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("validation")
            || message_lower.contains("invalid")
            || message_lower.contains("cannot be")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("transport")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("unexpected status")
            || message_lower.contains("disconnected")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Banner text shown above the transaction list.
    pub fn banner_text(&self) -> String {
        let prefix = match self.category {
            UiErrorCategory::Transport => "Server unreachable; check the server URL and retry",
            UiErrorCategory::Validation => "Request rejected",
            UiErrorCategory::Unknown => "Something went wrong",
        };
        format!("{prefix}: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_transport_failures() {
        let err = UiError::from_message(
            UiErrorContext::LoadTransactions,
            "transport failure calling /employees: error sending request",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.banner_text().starts_with("Server unreachable"));
    }

    #[test]
    fn classifies_rejected_pages_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::LoadTransactions,
            "/paginatedTransactions rejected the request: Validation: invalid page 9",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::LoadTransactions);
    }

    #[test]
    fn unrecognised_messages_fall_back_to_unknown() {
        let err = UiError::from_message(UiErrorContext::BackendStartup, "boom");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.message(), "boom");
    }
}
