//! Dashboard page rendering - Full page endpoints
//!
//! Endpoints:
//! - page_dashboard: Dashboard for the current month
//! - page_dashboard_month: Dashboard for an explicit /dashboard/{year}/{month}
//!
//! Helper functions:
//! - month_base_path / month_path: URL reconstruction for month navigation

use crate::{escape_html, format_amount, page_response, AppState};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::Html;
use chrono::{Local, NaiveDate};
use moneta_core::{CategoryKind, MonthRef, Selection};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Strip a trailing `/YYYY/M` or `/YYYY/MM` segment (with optional trailing
/// slash) from a path, guaranteeing exactly one trailing slash on the result.
/// Idempotent on date-free paths.
pub fn month_base_path(path: &str) -> String {
    let re = regex::Regex::new(r"(\d{4})/(\d{1,2})/?$").unwrap();
    let base = re.replace(path, "").into_owned();
    if base.ends_with('/') {
        base
    } else {
        format!("{}/", base)
    }
}

/// Full-page navigation target for a month: `{base}{year}/{month}/?filter=`
pub fn month_path(base: &str, month: MonthRef, filter: CategoryKind) -> String {
    format!("{}{}/{}/?filter={}", base, month.year, month.month, filter)
}

/// Dashboard for the current month
pub async fn page_dashboard(
    state: State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    params: Query<HashMap<String, String>>,
) -> Html<String> {
    let today = Local::now().date_naive();
    render_dashboard(state, headers, uri, params, MonthRef::containing(today), today).await
}

/// Dashboard for an explicit year/month path
///
/// An out-of-range month falls back to the current month rather than
/// erroring, so stale links keep working.
pub async fn page_dashboard_month(
    state: State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Path((year, month)): Path<(i32, u32)>,
    params: Query<HashMap<String, String>>,
) -> Html<String> {
    let today = Local::now().date_naive();
    let month = MonthRef::new(year, month).unwrap_or_else(|| MonthRef::containing(today));
    render_dashboard(state, headers, uri, params, month, today).await
}

async fn render_dashboard(
    state: State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    params: Query<HashMap<String, String>>,
    month: MonthRef,
    today: NaiveDate,
) -> Html<String> {
    let filter: CategoryKind = params
        .get("filter")
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            state
                .config
                .dashboard
                .default_filter
                .parse()
                .unwrap_or(CategoryKind::Income)
        });
    let selection = Selection::new(month, filter);

    let book = state.book.read().await;
    let summary = book.month_summary(month, today);
    let top = book.top_expense_categories(month, today, state.config.dashboard.top_categories);
    let views = book.transactions_for_month(
        month,
        Some(filter),
        state.config.pagination.records_per_page,
    );
    drop(book);

    let code = &state.config.currency.code;
    let sep = &state.config.currency.thousands_separator;

    let base = month_base_path(uri.path());
    let prev_href = month_path(&base, selection.prev_month().month, filter);
    let next_link = match selection.next_month(today) {
        Some(next) => format!(
            r#"<a id='next-month-btn' href='{}' class='px-3 py-1.5 border rounded-lg hover:bg-gray-100'>&rarr;</a>"#,
            month_path(&base, next.month, filter)
        ),
        None => String::from(
            r#"<span id='next-month-btn' class='px-3 py-1.5 border rounded-lg disabled'>&rarr;</span>"#,
        ),
    };

    let change_class = if summary.change < Decimal::ZERO {
        "text-red-600"
    } else {
        "text-green-600"
    };
    let change_sign = if summary.change > Decimal::ZERO { "+" } else { "" };

    let top_html: String = if top.is_empty() {
        String::from("<p class='text-sm text-gray-500'>No expenses this period.</p>")
    } else {
        top.iter()
            .map(|c| {
                format!(
                    "<div class='flex justify-between py-2 border-b last:border-0'><span class='truncate'>{}</span><span class='font-medium'>{} {}</span></div>",
                    escape_html(&c.name),
                    format_amount(c.total, sep),
                    code
                )
            })
            .collect()
    };

    let filter_tab = |kind: CategoryKind| -> String {
        let active = if kind == filter {
            match kind {
                CategoryKind::Income => " active-filter income-active",
                CategoryKind::Expense => " active-filter expense-active",
            }
        } else {
            ""
        };
        format!(
            r#"<button class='filter-tab px-4 py-2 border rounded-lg{}' data-filter='{}'>{}</button>"#,
            active,
            kind,
            kind.title()
        )
    };

    let mut inner = String::from(
        r#"<style>
.filter-tab.active-filter { color: #fff; }
.filter-tab.income-active { background-color: #16a34a; border-color: #16a34a; }
.filter-tab.expense-active { background-color: #dc2626; border-color: #dc2626; }
</style>"#,
    );

    inner.push_str(&format!(
        r#"
<div class='mb-6 flex items-center justify-between'>
    <h2 class='text-2xl font-bold'>Dashboard</h2>
    <div class='flex items-center gap-3'>
        <a id='prev-month-btn' href='{}' class='px-3 py-1.5 border rounded-lg hover:bg-gray-100'>&larr;</a>
        <span id='date-display-text' class='font-medium'>{}</span>
        {}
    </div>
</div>
<div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>
    <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Income</p><p class='text-2xl font-bold text-green-700'>{} {}</p></div>
    <div class='bg-red-50 p-4 rounded-lg border border-red-200'><p class='text-sm text-red-600'>Expenses</p><p class='text-2xl font-bold text-red-700'>{} {}</p></div>
    <div class='bg-indigo-50 p-4 rounded-lg border border-indigo-200'><p class='text-sm text-indigo-600'>Net balance</p><p class='text-2xl font-bold text-indigo-700'>{} {}</p></div>
    <div class='bg-yellow-50 p-4 rounded-lg border border-yellow-200'><p class='text-sm text-yellow-600'>vs last month</p><p class='text-2xl font-bold {}'>{}{} {}</p></div>
</div>
<div class='grid grid-cols-1 lg:grid-cols-3 gap-6'>
    <div class='lg:col-span-2 bg-white rounded-xl shadow-sm p-6'>
        <div class='flex items-center justify-between mb-4'>
            <h3 class='text-lg font-semibold'><span id='current-list-type'>{}</span></h3>
            <div class='flex gap-2'>{}{}</div>
        </div>
        <div id='report-data' class='hidden' data-current-year='{}' data-current-month='{}' data-current-filter='{}' data-partial-url='/dashboard/transactions/list'></div>
        <div id='transaction-list-container'>{}</div>
    </div>
    <div class='bg-white rounded-xl shadow-sm p-6'>
        <h3 class='text-lg font-semibold mb-4'>Top expense categories</h3>
        <div class='space-y-1'>{}</div>
    </div>
</div>"#,
        prev_href,
        month.label(today),
        next_link,
        format_amount(summary.income, sep),
        code,
        format_amount(summary.expense, sep),
        code,
        format_amount(summary.net, sep),
        code,
        change_class,
        change_sign,
        format_amount(summary.change, sep),
        code,
        filter.title(),
        filter_tab(CategoryKind::Income),
        filter_tab(CategoryKind::Expense),
        month.year,
        month.month,
        filter,
        super::api::render_transaction_rows(&views, code, sep),
        top_html
    ));

    inner.push_str(PAGE_SCRIPT);

    Html(page_response(
        &headers,
        &state.csrf_token,
        "Dashboard",
        "/dashboard",
        &inner,
    ))
}

const PAGE_SCRIPT: &str = r#"<script>
document.addEventListener('DOMContentLoaded', function () {
    const prevBtn = document.getElementById('prev-month-btn');
    const nextBtn = document.getElementById('next-month-btn');
    const dataContainer = document.getElementById('report-data');
    const listContainer = document.getElementById('transaction-list-container');
    const currentListType = document.getElementById('current-list-type');

    if (!prevBtn || !nextBtn || !dataContainer || !listContainer) {
        console.error('Dashboard init failed: required elements are missing.');
        return;
    }

    const currentYear = parseInt(dataContainer.dataset.currentYear, 10);
    const currentMonth = parseInt(dataContainer.dataset.currentMonth, 10);
    const partialUrl = dataContainer.dataset.partialUrl;
    let currentFilter = dataContainer.dataset.currentFilter || 'INCOME';

    const filterNames = { 'INCOME': 'Income', 'EXPENSE': 'Expenses' };

    // Monotonic token: a resolved response is dropped unless it belongs to
    // the most recent request, so out-of-order responses cannot win.
    let loadSeq = 0;

    function loadTransactions() {
        const seq = ++loadSeq;
        listContainer.innerHTML = "<div class='text-center p-10 text-gray-500'>Loading&hellip;</div>";

        const month = String(currentMonth).padStart(2, '0');
        const url = partialUrl + '?year=' + currentYear + '&month=' + month + '&type=' + currentFilter;

        fetch(url)
            .then(res => {
                if (!res.ok) throw new Error('Server error');
                return res.text();
            })
            .then(html => {
                if (seq !== loadSeq) return;
                listContainer.innerHTML = html;
            })
            .catch(err => {
                if (seq !== loadSeq) return;
                console.error('Transaction list load failed:', err);
                listContainer.innerHTML = "<div class='text-center p-10 text-red-500 bg-red-50 rounded-lg'>Could not load the transaction list.</div>";
            });
    }

    function updateFilterTabs() {
        if (currentListType) {
            currentListType.textContent = filterNames[currentFilter] || currentFilter;
        }
        document.querySelectorAll('.filter-tab').forEach(tab => {
            tab.classList.remove('active-filter', 'income-active', 'expense-active');
            if (tab.dataset.filter === currentFilter) {
                tab.classList.add('active-filter');
                tab.classList.add(currentFilter === 'INCOME' ? 'income-active' : 'expense-active');
            }
        });
    }

    function updateNavLinks() {
        [prevBtn, nextBtn].forEach(el => {
            if (el.href) {
                el.href = el.href.replace(/filter=[A-Z]+/, 'filter=' + currentFilter);
            }
        });
    }

    document.querySelectorAll('.filter-tab').forEach(tab => {
        tab.addEventListener('click', () => {
            const newFilter = tab.dataset.filter;
            if (newFilter === currentFilter) {
                return;
            }

            currentFilter = newFilter;
            updateFilterTabs();
            updateNavLinks();
            loadTransactions();
        });
    });
});
</script>"#;

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_strips_date_segment() {
        assert_eq!(month_base_path("/dashboard/2025/11/"), "/dashboard/");
        assert_eq!(month_base_path("/dashboard/2025/11"), "/dashboard/");
        assert_eq!(month_base_path("/dashboard/2025/3"), "/dashboard/");
    }

    #[test]
    fn test_base_path_is_idempotent_on_date_free_paths() {
        assert_eq!(month_base_path("/dashboard/"), "/dashboard/");
        assert_eq!(month_base_path("/dashboard"), "/dashboard/");
        assert_eq!(month_base_path("/"), "/");
        assert_eq!(month_base_path(month_base_path("/dashboard/2025/11/").as_str()), "/dashboard/");
    }

    #[test]
    fn test_month_path_embeds_month_and_filter() {
        let month = MonthRef { year: 2025, month: 12 };
        assert_eq!(
            month_path("/dashboard/", month, CategoryKind::Income),
            "/dashboard/2025/12/?filter=INCOME"
        );
        let month = MonthRef { year: 2026, month: 1 };
        assert_eq!(
            month_path("/dashboard/", month, CategoryKind::Expense),
            "/dashboard/2026/1/?filter=EXPENSE"
        );
    }

    #[test]
    fn test_round_trip_base_then_path() {
        let base = month_base_path("/dashboard/2025/11/");
        let month = MonthRef { year: 2025, month: 10 };
        assert_eq!(
            month_path(&base, month, CategoryKind::Income),
            "/dashboard/2025/10/?filter=INCOME"
        );
    }
}
