//! Route modules for the API server
//!
//! All routes are organized into modules:
//! - categories: category tree, add form, delete
//! - dashboard: month navigation, filter, transaction-list fragment
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: Fragment and JSON endpoints
//! - page.rs: Full-page rendering

pub mod categories;
pub mod dashboard;
