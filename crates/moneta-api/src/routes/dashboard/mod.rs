//! Dashboard routes
//!
//! - page.rs: the monthly dashboard page (summary, navigation, filter tabs)
//! - api.rs: transaction-list fragment

pub mod api;
pub mod page;

pub use api::htmx_transactions_list;
pub use page::{page_dashboard, page_dashboard_month};
