//! Categories API endpoints - fragments and mutations
//!
//! Endpoints:
//! - htmx_categories_list: Category tree for one kind (HTML fragment)
//! - delete_category: AJAX delete, CSRF-guarded
//! - form_category_create: Add-form submission
//! - api_categories: Category list (JSON)

use crate::{ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use moneta_core::{CategoryKind, NewCategory};
use std::collections::HashMap;

/// Category tree fragment, filtered by `?type=`
pub async fn htmx_categories_list(
    state: State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let kind = params
        .get("type")
        .and_then(|s| s.parse().ok())
        .unwrap_or(CategoryKind::Expense);
    let book = state.book.read().await;
    super::page::render_category_tree(&book.category_tree(kind))
}

/// Category list (JSON API)
pub async fn api_categories(state: State<AppState>) -> String {
    let book = state.book.read().await;
    serde_json::to_string(&book.categories()).unwrap_or_default()
}

/// Delete one category
///
/// Responds with the updated per-kind counts so the page can refresh its
/// headline numbers without another round trip. Failure bodies are plain
/// text, shown to the user verbatim by the page script.
pub async fn delete_category(
    state: State<AppState>,
    path: Path<u64>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    check_csrf_header(&headers, &state.csrf_token)?;

    let book = state.book.write().await;
    let removed = book.delete_category(path.0)?;
    let counts = book.category_counts();

    let body = serde_json::json!({
        "success": true,
        "message": format!("Category \"{}\" deleted.", removed.name),
        "counts": counts,
    });
    Ok(axum::Json(body).into_response())
}

/// Handle the add-category form submission
pub async fn form_category_create(state: State<AppState>, body: String) -> Response {
    let params = parse_form(&body);

    let token = params.get("csrfmiddlewaretoken").map(|s| s.as_str()).unwrap_or("");
    if token.is_empty() || token != state.csrf_token {
        return ApiError::Forbidden {
            message: "CSRF token missing or invalid".to_string(),
        }
        .into_response();
    }

    let kind: CategoryKind = match params.get("type").map(|s| s.as_str()).unwrap_or("").parse() {
        Ok(kind) => kind,
        Err(_) => return redirect_with_error("Choose a category type."),
    };
    let parent_id = match params.get("parent").map(|s| s.as_str()).unwrap_or("") {
        "" => None,
        raw => match raw.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => return redirect_with_error("Parent category not found."),
        },
    };
    let new = NewCategory {
        name: params.get("name").cloned().unwrap_or_default(),
        kind,
        parent_id,
        is_active: params.get("is_active").map(|s| s == "on").unwrap_or(false),
    };

    let book = state.book.write().await;
    match book.create_category(new) {
        Ok(created) => Redirect::to(&format!(
            "/categories?created={}",
            urlencoding::encode(&created.name)
        ))
        .into_response(),
        Err(e) => {
            e.log("create_category");
            redirect_with_error(&e.to_string())
        }
    }
}

fn redirect_with_error(message: &str) -> Response {
    Redirect::to(&format!("/categories?error={}", urlencoding::encode(message))).into_response()
}

fn check_csrf_header(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let token = headers
        .get("x-csrftoken")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if token.is_empty() || token != expected {
        return Err(ApiError::Forbidden {
            message: "CSRF token missing or invalid".to_string(),
        });
    }
    Ok(())
}

/// Parse an application/x-www-form-urlencoded body
pub(crate) fn parse_form(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&') {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        let key = urlencoding::decode(key).unwrap_or_default().into_owned();
        let value = urlencoding::decode(&value.replace('+', " "))
            .unwrap_or_default()
            .into_owned();
        if !key.is_empty() {
            params.insert(key, value);
        }
    }
    params
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_form_decodes_fields() {
        let params = parse_form("name=Bus+tickets&type=EXPENSE&parent=&is_active=on");
        assert_eq!(params.get("name").unwrap(), "Bus tickets");
        assert_eq!(params.get("type").unwrap(), "EXPENSE");
        assert_eq!(params.get("parent").unwrap(), "");
        assert_eq!(params.get("is_active").unwrap(), "on");
    }

    #[test]
    fn test_parse_form_percent_escapes() {
        let params = parse_form("name=O%27quv%20%26%20Co");
        assert_eq!(params.get("name").unwrap(), "O'quv & Co");
    }

    #[test]
    fn test_csrf_header_check() {
        let mut headers = HeaderMap::new();
        assert!(check_csrf_header(&headers, "tok").is_err());

        headers.insert("X-CSRFToken", HeaderValue::from_static("wrong"));
        assert!(check_csrf_header(&headers, "tok").is_err());

        headers.insert("X-CSRFToken", HeaderValue::from_static("tok"));
        assert!(check_csrf_header(&headers, "tok").is_ok());
    }
}
