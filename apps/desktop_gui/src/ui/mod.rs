//! UI layer: app shell, panels and widgets.

pub mod app;
pub mod panels;
pub mod widgets;

pub use app::TransactionsApp;
