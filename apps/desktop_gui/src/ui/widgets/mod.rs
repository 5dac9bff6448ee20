pub mod input_select;

pub use input_select::{EmployeePresenter, InputSelect, ViewportListeners};
