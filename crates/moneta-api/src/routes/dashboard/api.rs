//! Dashboard fragment endpoints
//!
//! Endpoints:
//! - htmx_transactions_list: Transaction list for one month, filtered by
//!   category kind (HTML fragment)

use crate::{escape_html, format_amount, AppState};
use axum::extract::{Query, State};
use moneta_core::{CategoryKind, MonthRef, TransactionView};
use std::collections::HashMap;

/// Transaction-list fragment
///
/// Query contract: `?year=YYYY&month=MM&type=INCOME|EXPENSE`. An unknown
/// type means no kind filter; bad dates come back as inline error
/// paragraphs, never as a non-2xx page.
pub async fn htmx_transactions_list(
    state: State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let year = params.get("year").and_then(|s| s.parse::<i32>().ok());
    let month = params.get("month").and_then(|s| s.parse::<u32>().ok());
    let (year, month) = match (year, month) {
        (Some(year), Some(month)) => (year, month),
        _ => return error_fragment("Invalid date."),
    };
    let month = match MonthRef::new(year, month) {
        Some(month) => month,
        None => return error_fragment("Invalid month."),
    };
    let filter = params.get("type").and_then(|s| s.parse::<CategoryKind>().ok());

    let book = state.book.read().await;
    let views =
        book.transactions_for_month(month, filter, state.config.pagination.records_per_page);
    render_transaction_rows(
        &views,
        &state.config.currency.code,
        &state.config.currency.thousands_separator,
    )
}

pub(crate) fn error_fragment(message: &str) -> String {
    format!(
        r#"<p class='p-4 text-center text-red-500'>{}</p>"#,
        escape_html(message)
    )
}

/// Render transaction rows for the dashboard list
pub fn render_transaction_rows(
    views: &[TransactionView],
    currency: &str,
    thousands_sep: &str,
) -> String {
    if views.is_empty() {
        return r#"<div class='text-center py-12 text-gray-500'><p>No transactions for this period.</p></div>"#
            .to_string();
    }

    let mut html = String::from("<div class='divide-y divide-gray-100'>");
    for view in views {
        let (sign, color) = match view.kind {
            Some(CategoryKind::Income) => ("+", "text-green-600"),
            Some(CategoryKind::Expense) => ("-", "text-red-600"),
            None => ("", "text-gray-500"),
        };
        let category = view.category_path.as_deref().unwrap_or("Uncategorized");
        let automated = if view.is_automated {
            " <span class='px-1.5 py-0.5 text-xs bg-blue-100 text-blue-700 rounded'>Auto</span>"
        } else {
            ""
        };
        let description = if view.description.is_empty() {
            String::new()
        } else {
            format!(" &middot; {}", escape_html(&view.description))
        };

        html.push_str(&format!(
            r#"<div class='flex items-center justify-between py-3'>
                <div class='flex-1 min-w-0'>
                    <div class='font-medium truncate'>{}{}</div>
                    <div class='text-sm text-gray-500'>{}{}</div>
                </div>
                <span class='font-medium flex-shrink-0 {}'>{}{} {}</span>
            </div>"#,
            escape_html(category),
            automated,
            view.date,
            description,
            color,
            sign,
            format_amount(view.amount, thousands_sep),
            currency
        ));
    }
    html.push_str("</div>");
    html
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn view(amount: i64, kind: Option<CategoryKind>, path: Option<&str>, description: &str) -> TransactionView {
        TransactionView {
            id: 1,
            date: NaiveDate::from_ymd_opt(2025, 11, 14).unwrap(),
            amount: Decimal::new(amount, 0),
            description: description.to_string(),
            is_automated: false,
            kind,
            category_path: path.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let html = render_transaction_rows(&[], "UZS", ",");
        assert!(html.contains("No transactions for this period."));
    }

    #[test]
    fn test_income_row_is_green_with_plus_sign() {
        let rows = [view(900_000, Some(CategoryKind::Income), Some("Salary"), "")];
        let html = render_transaction_rows(&rows, "UZS", ",");
        assert!(html.contains("text-green-600"));
        assert!(html.contains("+900,000 UZS"));
    }

    #[test]
    fn test_expense_row_is_red_with_minus_sign() {
        let rows = [view(40_000, Some(CategoryKind::Expense), Some("Transport > Fuel"), "")];
        let html = render_transaction_rows(&rows, "UZS", ",");
        assert!(html.contains("text-red-600"));
        assert!(html.contains("-40,000 UZS"));
        assert!(html.contains("Transport &gt; Fuel"));
    }

    #[test]
    fn test_uncategorized_row_has_no_sign() {
        let rows = [view(25_000, None, None, "")];
        let html = render_transaction_rows(&rows, "UZS", ",");
        assert!(html.contains("Uncategorized"));
        assert!(html.contains(">25,000 UZS<"));
    }

    #[test]
    fn test_description_is_escaped() {
        let rows = [view(1_000, Some(CategoryKind::Expense), Some("Food"), "<img src=x>")];
        let html = render_transaction_rows(&rows, "UZS", ",");
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn test_error_fragment_is_inline_paragraph() {
        let html = error_fragment("Invalid date.");
        assert!(html.starts_with("<p"));
        assert!(html.contains("Invalid date."));
    }
}
