//! HTTP server with HTMX-style fragment routes
//!
//! Routes are organized into modules:
//! - routes::categories: category tree, add form, delete
//! - routes::dashboard: month navigation, filter, transaction-list fragment

pub mod error;
pub mod routes;

use axum::extract::Request;
use axum::routing::{delete, get, post};
use axum::{Router, ServiceExt};
use moneta_config::Config;
use moneta_core::Book;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub book: Arc<RwLock<Book>>,
    pub config: Config,
    /// Anti-forgery token required on mutating requests
    pub csrf_token: String,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::categories::{
        api_categories, delete_category, form_category_create, htmx_categories_list,
        page_categories,
    };
    use routes::dashboard::{htmx_transactions_list, page_dashboard, page_dashboard_month};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/categories", get(api_categories))
        .route("/api/summary", get(api_summary))
        .route("/api/reload", post(api_reload))
        // Pages
        .route("/", get(index_redirect))
        .route("/dashboard", get(page_dashboard))
        .route("/dashboard/:year/:month", get(page_dashboard_month))
        .route("/categories", get(page_categories))
        .route("/categories", post(form_category_create))
        // Fragment routes (for in-place updates)
        .route("/dashboard/transactions/list", get(htmx_transactions_list))
        .route("/categories/list", get(htmx_categories_list))
        // Category delete (AJAX, CSRF-guarded)
        .route("/category/delete/:id", delete(delete_category))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Get book summary (JSON API)
async fn api_summary(state: axum::extract::State<AppState>) -> String {
    let book = state.book.read().await;
    serde_json::to_string(&book.summary()).unwrap_or_default()
}

/// Reload book API endpoint
async fn api_reload(state: axum::extract::State<AppState>) -> String {
    let mut book = state.book.write().await;
    match book.reload() {
        Ok(_) => r#"{"success": true, "message": "Book reloaded"}"#.to_string(),
        Err(e) => format!(r#"{{"success": false, "message": "{}"}}"#, e),
    }
}

/// Root path is an alias for the dashboard
async fn index_redirect() -> axum::response::Redirect {
    axum::response::Redirect::permanent("/dashboard")
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, csrf_token: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="csrf-token" content="{}">
    <title>{} - Moneta</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .panel {{ display: none; }}
        .panel.active {{ display: block; }}
        .disabled {{ cursor: not-allowed; opacity: 0.5; pointer-events: none; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        csrf_token, title, content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/dashboard", "Dashboard", "dashboard"),
        ("/categories", "Categories", "categories"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Moneta</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, id) in &links {
        let is_active = current_path.starts_with(path);
        let active_class = if is_active {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        let icon = match *id {
            "dashboard" => "📊",
            "categories" => "🏷️",
            _ => "📄",
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Check if request is from a fragment-swapping client (partial page update)
fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or fragment response
pub fn page_response(
    headers: &axum::http::HeaderMap,
    csrf_token: &str,
    title: &str,
    current_path: &str,
    inner_content: &str,
) -> String {
    if is_htmx_request(headers) {
        format!(
            r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#,
            inner_content
        )
    } else {
        base_html(
            title,
            csrf_token,
            &format!(
                r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
                nav_sidebar(current_path),
                inner_content
            ),
        )
    }
}

// ==================== Text Helpers ====================

/// Escape text for interpolation into HTML markup
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Encode a JSON payload for embedding in an HTML data attribute
///
/// Quotes become entities so the payload survives single- or double-quoted
/// attributes; the browser hands the original JSON back through `dataset`.
pub fn encode_data_attr(json: &str) -> String {
    json.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Format an amount with thousands separators, e.g. "1,250,000"
pub fn format_amount(amount: Decimal, thousands_sep: &str) -> String {
    let s = amount.to_string();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(stripped) => ("-", stripped),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(thousands_sep);
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Generate the per-process CSRF token
pub fn generate_csrf_token() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{:x}", now)
}

// ==================== Server ====================

/// Start the HTTP server
///
/// Binds to the configured address and serves the router. Paths are
/// normalized so date-bearing URLs may carry a trailing slash
/// (`/dashboard/2025/11/`).
pub async fn start_server(config: Config, book: Arc<RwLock<Book>>) {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        book,
        config,
        csrf_token: generate_csrf_token(),
    };

    let router = create_router(state);
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };

    eprintln!("[INFO] Starting Moneta server on http://{}", addr);
    eprintln!("[INFO] Available routes:");
    eprintln!("[INFO]   - /dashboard (Monthly dashboard)");
    eprintln!("[INFO]   - /categories (Category management)");
    eprintln!("[INFO]   - /api/* (JSON API endpoints)");

    match axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await {
        Ok(_) => eprintln!("[INFO] Server stopped gracefully"),
        Err(e) => eprintln!("[ERROR] Server error: {}", e),
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"O'quv" & Co</b>"#),
            "&lt;b&gt;&quot;O&#39;quv&quot; &amp; Co&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_encode_data_attr_escapes_quotes() {
        let json = r#"[{"name": "O'quv"}]"#;
        let encoded = encode_data_attr(json);
        assert!(!encoded.contains('"'));
        assert!(!encoded.contains('\''));
        assert!(encoded.contains("&quot;name&quot;"));
        assert!(encoded.contains("O&#39;quv"));
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(Decimal::new(1_250_000, 0), ","), "1,250,000");
        assert_eq!(format_amount(Decimal::new(999, 0), ","), "999");
        assert_eq!(format_amount(Decimal::new(-40_000, 0), ","), "-40,000");
        assert_eq!(format_amount(Decimal::new(123_456_789, 2), ","), "1,234,567.89");
        assert_eq!(format_amount(Decimal::ZERO, ","), "0");
    }

    #[test]
    fn test_nav_sidebar_marks_active_link() {
        let nav = nav_sidebar("/categories");
        assert!(nav.contains("bg-indigo-50"));
        let nav = nav_sidebar("/dashboard");
        assert!(nav.contains(">Dashboard<"));
    }

    #[test]
    fn test_base_html_carries_csrf_meta() {
        let html = base_html("Dashboard", "tok123", "<p>hi</p>");
        assert!(html.contains(r#"<meta name="csrf-token" content="tok123">"#));
        assert!(html.contains("<p>hi</p>"));
    }
}
