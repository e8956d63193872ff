//! Category management routes
//!
//! - page.rs: the management page (tree, counts, add form)
//! - api.rs: list fragment, delete, create, JSON list

pub mod api;
pub mod page;

pub use api::{api_categories, delete_category, form_category_create, htmx_categories_list};
pub use page::page_categories;
