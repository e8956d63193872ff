//! Categories page rendering - Full page endpoint
//!
//! Endpoints:
//! - page_categories: Category management page (counts, tree, add form)
//!
//! Helper functions:
//! - render_category_tree: Render the two-level tree fragment
//! - render_empty_state: Fixed placeholder for an empty filtered set

use crate::{encode_data_attr, escape_html, page_response, AppState};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use moneta_core::{Category, CategoryKind, CategoryNode};
use std::collections::HashMap;

/// Render the two-level category tree as an HTML fragment
///
/// Roots arrive pre-sorted from the book; each root card is followed by an
/// indented block with its children. An empty set renders the fixed
/// placeholder and nothing else.
pub fn render_category_tree(tree: &[CategoryNode]) -> String {
    if tree.is_empty() {
        return render_empty_state("No categories of this type yet. Add one!");
    }

    let mut html = String::new();
    for node in tree {
        html.push_str(&render_category_card(&node.category, true));
        if !node.children.is_empty() {
            html.push_str("<div class='ml-6 mt-1 pl-2 border-l-2 border-dashed border-gray-300'>");
            for child in &node.children {
                html.push_str(&render_category_card(child, false));
            }
            html.push_str("</div>");
        }
    }
    html
}

/// Fixed empty-state placeholder
pub fn render_empty_state(message: &str) -> String {
    format!(
        r#"<div class='empty-state text-center py-12 text-gray-500'><p>{}</p></div>"#,
        escape_html(message)
    )
}

fn render_category_card(cat: &Category, is_root: bool) -> String {
    let (card_class, accent) = match cat.kind {
        CategoryKind::Expense => ("expense-card", "border-l-red-400"),
        CategoryKind::Income => ("income-card", "border-l-green-400"),
    };

    let badge = if is_root {
        String::from(
            r#"<span class='global-badge px-2 py-0.5 text-xs bg-gray-100 text-gray-600 rounded'>Root</span>"#,
        )
    } else {
        format!(
            r#"<span class='parent-path text-xs text-gray-500'>&uarr; {}</span>"#,
            escape_html(cat.parent_name.as_deref().unwrap_or("Unknown"))
        )
    };

    let status_badge = if cat.is_active {
        String::new()
    } else {
        String::from(
            r#"<span class='px-2 py-0.5 text-xs bg-gray-200 text-gray-500 rounded'>Inactive</span>"#,
        )
    };

    let action = if cat.user_owned {
        format!(
            r#"<button class='delete-btn px-2 py-1 text-sm text-red-600 hover:bg-red-50 rounded' data-id='{}' data-name='{}' title='Delete'>Delete</button>"#,
            cat.id,
            escape_html(&cat.name)
        )
    } else {
        String::from(
            r#"<span class='global-badge px-2 py-0.5 text-xs bg-gray-100 text-gray-600 rounded'>Global</span>"#,
        )
    };

    format!(
        r#"<div class='category-card {} flex items-center justify-between p-3 bg-white rounded-lg border border-l-4 {} mb-2'>
            <div class='category-info'>
                <h3 class='font-medium'>{}</h3>
                <div class='category-meta flex items-center gap-2 mt-1'>{}{}</div>
            </div>
            <div class='category-actions'>{}</div>
        </div>"#,
        card_class,
        accent,
        escape_html(&cat.name),
        badge,
        status_badge,
        action
    )
}

/// Category management page
pub async fn page_categories(
    state: State<AppState>,
    headers: HeaderMap,
    params: Query<HashMap<String, String>>,
) -> Html<String> {
    let book = state.book.read().await;
    let counts = book.category_counts();
    let tree = book.category_tree(CategoryKind::Expense);
    let parents = book.parent_candidates();
    let categories_json =
        serde_json::to_string(&book.categories()).unwrap_or_else(|_| "[]".to_string());
    drop(book);

    let banner = if let Some(name) = params.get("created") {
        format!(
            r#"<div class='msg bg-green-50 border border-green-200 text-green-700 px-4 py-3 rounded-lg mb-4'>Category &quot;{}&quot; added.</div>"#,
            escape_html(name)
        )
    } else if let Some(message) = params.get("error") {
        format!(
            r#"<div class='alert bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded-lg mb-4'>{}</div>"#,
            escape_html(message)
        )
    } else {
        String::new()
    };

    let parent_options: String = parents
        .iter()
        .map(|p| {
            format!(
                r#"<option value='{}' class='parent-option parent-{}' hidden>{}</option>"#,
                p.id,
                p.kind,
                escape_html(&p.name)
            )
        })
        .collect();

    let mut inner = String::from(
        r#"<style>
.tab-btn.active { background-color: #4f46e5; border-color: #4f46e5; color: #fff; }
.type-btn.active { background-color: #111827; border-color: #111827; color: #fff; }
</style>"#,
    );

    inner.push_str(&format!(
        r#"{}
<div class='mb-6 flex items-center justify-between'>
    <h2 class='text-2xl font-bold'>Categories</h2>
    <div class='flex gap-2'>
        <button class='tab-btn active px-4 py-2 border rounded-lg' data-tab='list'>List</button>
        <button class='tab-btn px-4 py-2 border rounded-lg' data-tab='add'>Add new</button>
    </div>
</div>
<div class='grid grid-cols-2 gap-4 mb-6'>
    <div class='bg-red-50 p-4 rounded-lg border border-red-200'><p class='text-sm text-red-600'>Expense categories</p><p id='expense-count' class='text-2xl font-bold text-red-700'>{}</p></div>
    <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Income categories</p><p id='income-count' class='text-2xl font-bold text-green-700'>{}</p></div>
</div>
<div id='panel-list' class='panel active'>
    <div class='flex gap-2 mb-4'>
        <button class='type-btn active px-3 py-1.5 text-sm border rounded-lg' data-type='EXPENSE'>Expenses</button>
        <button class='type-btn px-3 py-1.5 text-sm border rounded-lg' data-type='INCOME'>Income</button>
    </div>
    <div id='category-list'>{}</div>
</div>
<div id='panel-add' class='panel bg-white rounded-xl shadow-sm p-6'>
    <form method='post' action='/categories' class='space-y-4 max-w-lg'>
        <input type='hidden' name='csrfmiddlewaretoken' value='{}'>
        <div>
            <label class='block text-sm font-medium text-gray-700 mb-1'>Name</label>
            <input type='text' name='name' class='w-full px-3 py-2 border rounded-lg' placeholder='Category name'>
        </div>
        <div>
            <label class='block text-sm font-medium text-gray-700 mb-1'>Type</label>
            <select name='type' class='w-full px-3 py-2 border rounded-lg bg-white'>
                <option value=''>Choose a type</option>
                <option value='EXPENSE'>Expense</option>
                <option value='INCOME'>Income</option>
            </select>
        </div>
        <div id='parent-group' style='display: none;'>
            <label class='block text-sm font-medium text-gray-700 mb-1'>Parent category</label>
            <select name='parent' class='w-full px-3 py-2 border rounded-lg bg-white'>
                <option value=''>None (root category)</option>
                {}
            </select>
        </div>
        <label class='flex items-center gap-2'>
            <input type='checkbox' name='is_active' checked class='w-4 h-4 rounded border-gray-300'>
            <span class='text-sm text-gray-700'>Active</span>
        </label>
        <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Add category</button>
    </form>
</div>
<div id='category-data' data-categories='{}' class='hidden'></div>"#,
        banner,
        counts.expense,
        counts.income,
        render_category_tree(&tree),
        state.csrf_token,
        parent_options,
        encode_data_attr(&categories_json)
    ));

    inner.push_str(PAGE_SCRIPT);

    Html(page_response(
        &headers,
        &state.csrf_token,
        "Categories",
        "/categories",
        &inner,
    ))
}

const PAGE_SCRIPT: &str = r#"<script>
document.addEventListener('DOMContentLoaded', function () {
    // 1. Embedded payload check; a corrupt payload aborts initialization
    const dataNode = document.getElementById('category-data');
    try {
        const raw = dataNode ? (dataNode.dataset.categories || '') : '';
        if (raw) JSON.parse(raw);
    } catch (e) {
        console.error('Category payload parse error:', e);
        showEmptyState('Could not load categories.');
        return;
    }

    let currentType = 'EXPENSE';

    // 2. Panel switching
    document.querySelectorAll('.tab-btn').forEach(btn => {
        btn.addEventListener('click', () => {
            document.querySelectorAll('.tab-btn').forEach(b => b.classList.remove('active'));
            document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
            btn.classList.add('active');
            const panel = document.getElementById('panel-' + btn.dataset.tab);
            if (panel) panel.classList.add('active');

            if (btn.dataset.tab === 'list') reloadList();
            if (btn.dataset.tab === 'add') updateParentOptions();
        });
    });

    // 3. Type switching
    document.querySelectorAll('.type-btn').forEach(btn => {
        btn.addEventListener('click', () => {
            currentType = btn.dataset.type;
            document.querySelectorAll('.type-btn').forEach(b => b.classList.remove('active'));
            btn.classList.add('active');
            reloadList();
        });
    });

    // 4. Delete (AJAX)
    document.getElementById('category-list').addEventListener('click', async (e) => {
        const btn = e.target.closest('.delete-btn');
        if (!btn) return;

        if (!confirm('Delete category "' + btn.dataset.name + '"?')) return;

        try {
            const res = await fetch('/category/delete/' + btn.dataset.id + '/', {
                method: 'DELETE',
                headers: {
                    'X-CSRFToken': getCsrfToken(),
                    'Content-Type': 'application/json'
                }
            });

            if (res.ok) {
                const data = await res.json();
                updateCounts(data.counts);
                reloadList();
            } else {
                const err = await res.text();
                alert('Delete failed: ' + (err || 'Server error'));
            }
        } catch (err) {
            console.error(err);
            alert('Connection problem. Check your network and try again.');
        }
    });

    // 5. Parent options follow the selected type
    const typeSelect = document.querySelector('select[name="type"]');
    if (typeSelect) {
        typeSelect.addEventListener('change', updateParentOptions);
        updateParentOptions();
    }

    // 6. A banner means the add form was just used
    if (document.querySelector('.msg, .alert')) {
        const addTab = document.querySelector('[data-tab="add"]');
        if (addTab) addTab.click();
    }

    function reloadList() {
        fetch('/categories/list?type=' + currentType)
            .then(res => {
                if (!res.ok) throw new Error('Server error');
                return res.text();
            })
            .then(html => {
                document.getElementById('category-list').innerHTML = html;
            })
            .catch(() => showEmptyState('Could not load categories.'));
    }

    function updateCounts(counts) {
        if (!counts) return;
        const expEl = document.getElementById('expense-count');
        const incEl = document.getElementById('income-count');
        if (expEl) expEl.textContent = counts.expense;
        if (incEl) incEl.textContent = counts.income;
    }

    function showEmptyState(message) {
        const container = document.getElementById('category-list');
        if (!container) return;
        const wrap = document.createElement('div');
        wrap.className = 'empty-state text-center py-12 text-gray-500';
        const p = document.createElement('p');
        p.textContent = message;
        wrap.appendChild(p);
        container.innerHTML = '';
        container.appendChild(wrap);
    }

    function getCsrfToken() {
        const input = document.querySelector('input[name="csrfmiddlewaretoken"]');
        if (input && input.value) return input.value;
        const meta = document.querySelector('meta[name="csrf-token"]');
        return meta ? (meta.getAttribute('content') || '') : '';
    }

    function updateParentOptions() {
        const select = document.querySelector('select[name="type"]');
        const group = document.getElementById('parent-group');
        if (!select || !group) return;

        const type = select.value;
        group.querySelectorAll('.parent-option').forEach(opt => {
            opt.hidden = !(type && opt.classList.contains('parent-' + type));
        });
        group.style.display = type ? 'block' : 'none';
    }
});
</script>"#;

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: u64, name: &str, kind: CategoryKind, parent: Option<(u64, &str)>, owned: bool, active: bool) -> Category {
        Category {
            id,
            name: name.to_string(),
            kind,
            parent_id: parent.map(|(pid, _)| pid),
            parent_name: parent.map(|(_, pname)| pname.to_string()),
            is_active: active,
            user_owned: owned,
        }
    }

    fn node(category: Category, children: Vec<Category>) -> CategoryNode {
        CategoryNode { category, children }
    }

    #[test]
    fn test_empty_tree_renders_placeholder_only() {
        let html = render_category_tree(&[]);
        assert!(html.contains("empty-state"));
        assert!(html.contains("No categories of this type yet. Add one!"));
        assert!(!html.contains("category-card"));
    }

    #[test]
    fn test_nonempty_tree_has_no_placeholder() {
        let tree = vec![node(cat(1, "Food", CategoryKind::Expense, None, true, true), vec![])];
        let html = render_category_tree(&tree);
        assert!(!html.contains("empty-state"));
        assert!(html.contains("Food"));
    }

    #[test]
    fn test_global_category_shows_badge_not_delete() {
        let tree = vec![node(cat(1, "Salary", CategoryKind::Income, None, false, true), vec![])];
        let html = render_category_tree(&tree);
        assert!(html.contains(">Global<"));
        assert!(!html.contains("delete-btn"));
    }

    #[test]
    fn test_owned_category_exposes_delete_control() {
        let tree = vec![node(cat(4, "Taxi", CategoryKind::Expense, None, true, true), vec![])];
        let html = render_category_tree(&tree);
        assert!(html.contains("delete-btn"));
        assert!(html.contains("data-id='4'"));
        assert!(html.contains("data-name='Taxi'"));
    }

    #[test]
    fn test_child_carries_parent_badge_and_indent() {
        let root = cat(1, "Transport", CategoryKind::Expense, None, true, true);
        let child = cat(2, "Fuel", CategoryKind::Expense, Some((1, "Transport")), true, true);
        let html = render_category_tree(&[node(root, vec![child])]);

        assert!(html.contains("ml-6"));
        assert!(html.contains("parent-path"));
        // root badge appears exactly once
        assert_eq!(html.matches(">Root<").count(), 1);
    }

    #[test]
    fn test_inactive_marker() {
        let tree = vec![node(cat(1, "Old stuff", CategoryKind::Expense, None, true, false), vec![])];
        let html = render_category_tree(&tree);
        assert!(html.contains(">Inactive<"));
    }

    #[test]
    fn test_names_are_escaped() {
        let tree = vec![node(
            cat(1, "<script>alert(1)</script>", CategoryKind::Expense, None, true, true),
            vec![],
        )];
        let html = render_category_tree(&tree);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_preserves_given_order() {
        let tree = vec![
            node(cat(1, "apples", CategoryKind::Expense, None, true, true), vec![]),
            node(cat(2, "Bread", CategoryKind::Expense, None, true, true), vec![]),
        ];
        let html = render_category_tree(&tree);
        let apples = html.find("apples").unwrap();
        let bread = html.find("Bread").unwrap();
        assert!(apples < bread);
    }
}
