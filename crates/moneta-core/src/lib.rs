//! Core book state and business logic
//!
//! The [`Book`] owns the in-memory category and transaction data, loaded from
//! a JSON data file. Mutations (category create/delete) validate against the
//! ownership and tree rules, then write the file back.

pub mod error;
pub mod models;
pub mod time;
pub mod types;

use chrono::NaiveDate;
use moneta_config::Config;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use models::{Category, Transaction, TransactionView};
pub use time::{MonthRef, Selection, MONTH_NAMES};
pub use types::CategoryKind;

/// Main book structure
pub struct Book {
    config: Config,
    data: RwLock<BookData>,
    entry: Option<PathBuf>,
}

/// In-memory book data, mirroring the data file layout
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BookData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// A root category together with its sorted children
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<Category>,
}

/// Per-kind category counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub expense: usize,
    pub income: usize,
}

/// Totals for one reporting month
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    /// Net change against the previous full month
    pub change: Decimal,
}

/// Aggregated spend for one category
#[derive(Debug, Clone, Serialize)]
pub struct CategorySpend {
    pub name: String,
    pub total: Decimal,
}

/// Overall counts for the JSON summary endpoint
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub categories: CategoryCounts,
    pub transactions: usize,
}

/// Input for category creation
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
    pub parent_id: Option<u64>,
    pub is_active: bool,
}

fn sort_key(name: &str) -> String {
    name.to_lowercase()
}

impl Book {
    /// Create an empty book with config; data arrives via [`Book::load`]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            data: RwLock::new(BookData::default()),
            entry: None,
        }
    }

    /// Create a book directly from data, without a backing file
    pub fn with_data(config: Config, data: BookData) -> Self {
        let book = Self {
            config,
            data: RwLock::new(data),
            entry: None,
        };
        book.check_tree_invariants();
        book
    }

    /// Load the book from a JSON data file
    pub fn load(&mut self, entry: PathBuf) -> CoreResult<()> {
        let content = std::fs::read_to_string(&entry)?;
        let data: BookData = serde_json::from_str(&content)
            .map_err(|e| CoreError::ParseError { message: e.to_string() })?;

        {
            let mut guard = self.data.write().unwrap();
            *guard = data;
        }
        self.entry = Some(entry);
        self.check_tree_invariants();
        Ok(())
    }

    /// Reload the book from its backing file
    pub fn reload(&mut self) -> CoreResult<()> {
        match self.entry.clone() {
            Some(entry) if entry.exists() => self.load(entry),
            _ => Err(CoreError::NotLoaded),
        }
    }

    /// The configuration the book was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn check_tree_invariants(&self) {
        let data = self.data.read().unwrap();
        for cat in &data.categories {
            if let Some(parent_id) = cat.parent_id {
                match data.categories.iter().find(|c| c.id == parent_id) {
                    None => log::warn!(
                        "Category {} ({}) references missing parent {}",
                        cat.id, cat.name, parent_id
                    ),
                    Some(parent) if parent.kind != cat.kind => log::warn!(
                        "Category {} ({}) has a parent of a different kind",
                        cat.id, cat.name
                    ),
                    Some(parent) if parent.parent_id.is_some() => log::warn!(
                        "Category {} ({}) is nested deeper than two levels",
                        cat.id, cat.name
                    ),
                    Some(_) => {}
                }
            }
        }
    }

    fn persist(&self, data: &BookData) -> CoreResult<()> {
        let entry = match &self.entry {
            Some(entry) => entry,
            None => {
                log::debug!("Book has no backing file; skipping persist");
                return Ok(());
            }
        };
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| CoreError::InternalError { message: e.to_string() })?;
        std::fs::write(entry, content)?;
        Ok(())
    }

    // ==================== Categories ====================

    /// All categories
    pub fn categories(&self) -> Vec<Category> {
        self.data.read().unwrap().categories.clone()
    }

    /// A single category by id
    pub fn category(&self, id: u64) -> Option<Category> {
        self.data
            .read()
            .unwrap()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Categories of one kind
    pub fn categories_by_kind(&self, kind: CategoryKind) -> Vec<Category> {
        self.data
            .read()
            .unwrap()
            .categories
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect()
    }

    /// Per-kind counts over all categories
    pub fn category_counts(&self) -> CategoryCounts {
        let data = self.data.read().unwrap();
        CategoryCounts {
            expense: data.categories.iter().filter(|c| c.kind == CategoryKind::Expense).count(),
            income: data.categories.iter().filter(|c| c.kind == CategoryKind::Income).count(),
        }
    }

    /// The two-level tree for one kind: roots sorted case-insensitively by
    /// name, each with its children sorted the same way. Children whose
    /// parent is missing from the filtered set are dropped.
    pub fn category_tree(&self, kind: CategoryKind) -> Vec<CategoryNode> {
        let filtered = self.categories_by_kind(kind);

        let mut roots: Vec<Category> =
            filtered.iter().filter(|c| c.is_root()).cloned().collect();
        roots.sort_by_key(|c| sort_key(&c.name));

        roots
            .into_iter()
            .map(|root| {
                let mut children: Vec<Category> = filtered
                    .iter()
                    .filter(|c| c.is_child_of(root.id))
                    .cloned()
                    .collect();
                children.sort_by_key(|c| sort_key(&c.name));
                CategoryNode { category: root, children }
            })
            .collect()
    }

    /// Root categories of both kinds, for the parent selector in the add
    /// form; ordered by kind then name
    pub fn parent_candidates(&self) -> Vec<Category> {
        let mut roots: Vec<Category> = self
            .data
            .read()
            .unwrap()
            .categories
            .iter()
            .filter(|c| c.is_root())
            .cloned()
            .collect();
        roots.sort_by(|a, b| {
            a.kind
                .as_str()
                .cmp(b.kind.as_str())
                .then_with(|| sort_key(&a.name).cmp(&sort_key(&b.name)))
        });
        roots
    }

    /// Create a user-owned category after validating the tree rules
    pub fn create_category(&self, new: NewCategory) -> CoreResult<Category> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::ValidationError {
                message: "Category name must not be empty".to_string(),
            });
        }

        let mut data = self.data.write().unwrap();

        let parent = match new.parent_id {
            Some(parent_id) => {
                let parent = data
                    .categories
                    .iter()
                    .find(|c| c.id == parent_id)
                    .cloned()
                    .ok_or_else(|| CoreError::InvalidParent {
                        reason: "parent category not found".to_string(),
                    })?;
                if parent.kind != new.kind {
                    return Err(CoreError::InvalidParent {
                        reason: "parent must have the same kind".to_string(),
                    });
                }
                if !parent.is_root() {
                    return Err(CoreError::InvalidParent {
                        reason: "parent must be a root category".to_string(),
                    });
                }
                Some(parent)
            }
            None => None,
        };

        let duplicate = data.categories.iter().any(|c| {
            c.name == name && c.kind == new.kind && c.parent_id == new.parent_id
        });
        if duplicate {
            return Err(CoreError::DuplicateCategory { name });
        }

        let id = data.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let category = Category {
            id,
            name,
            kind: new.kind,
            parent_id: parent.as_ref().map(|p| p.id),
            parent_name: parent.as_ref().map(|p| p.name.clone()),
            is_active: new.is_active,
            user_owned: true,
        };
        data.categories.push(category.clone());
        self.persist(&data)?;
        log::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    /// Delete a user-owned category by id
    ///
    /// Exactly one record is removed. Global records, records with attached
    /// transactions, and records with children are refused.
    pub fn delete_category(&self, id: u64) -> CoreResult<Category> {
        let mut data = self.data.write().unwrap();

        let index = data
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::CategoryNotFound { id })?;

        let name = data.categories[index].name.clone();
        if !data.categories[index].user_owned {
            return Err(CoreError::CategoryNotOwned { name });
        }
        if data.transactions.iter().any(|t| t.category_id == Some(id)) {
            return Err(CoreError::CategoryInUse { name });
        }
        if data.categories.iter().any(|c| c.parent_id == Some(id)) {
            return Err(CoreError::CategoryHasChildren { name });
        }

        let removed = data.categories.remove(index);
        self.persist(&data)?;
        log::info!("Deleted category {} ({})", removed.id, removed.name);
        Ok(removed)
    }

    // ==================== Transactions ====================

    /// Transactions of one calendar month, newest first, optionally filtered
    /// by category kind. Transactions without a resolvable category carry no
    /// kind and are excluded from kind-filtered views.
    pub fn transactions_for_month(
        &self,
        month: MonthRef,
        filter: Option<CategoryKind>,
        limit: usize,
    ) -> Vec<TransactionView> {
        let data = self.data.read().unwrap();
        let categories: HashMap<u64, &Category> =
            data.categories.iter().map(|c| (c.id, c)).collect();

        let mut views: Vec<TransactionView> = data
            .transactions
            .iter()
            .filter(|t| month.contains(t.date))
            .map(|t| {
                let category = t.category_id.and_then(|id| categories.get(&id).copied());
                TransactionView {
                    id: t.id,
                    date: t.date,
                    amount: t.amount,
                    description: t.description.clone(),
                    is_automated: t.is_automated,
                    kind: category.map(|c| c.kind),
                    category_path: category.map(|c| c.full_path()),
                }
            })
            .filter(|v| match filter {
                Some(kind) => v.kind == Some(kind),
                None => true,
            })
            .collect();

        // newest first, then newest-created within a day
        let created: HashMap<u64, chrono::DateTime<chrono::Utc>> =
            data.transactions.iter().map(|t| (t.id, t.created_at)).collect();
        views.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| created.get(&b.id).cmp(&created.get(&a.id)))
        });
        views.truncate(limit);
        views
    }

    /// Income/expense totals for the reporting period of a month, plus the
    /// net change against the previous full month
    pub fn month_summary(&self, month: MonthRef, today: NaiveDate) -> MonthSummary {
        let data = self.data.read().unwrap();
        let categories: HashMap<u64, CategoryKind> =
            data.categories.iter().map(|c| (c.id, c.kind)).collect();

        let totals = |start: NaiveDate, end: NaiveDate| -> (Decimal, Decimal) {
            data.transactions
                .iter()
                .filter(|t| t.in_range(start, end))
                .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), t| {
                    match t.category_id.and_then(|id| categories.get(&id)) {
                        Some(CategoryKind::Income) => (income + t.amount, expense),
                        Some(CategoryKind::Expense) => (income, expense + t.amount),
                        None => (income, expense),
                    }
                })
        };

        let (income, expense) = totals(month.first_day(), month.report_end(today));
        let prev = month.prev();
        let (prev_income, prev_expense) = totals(prev.first_day(), prev.last_day());

        let net = income - expense;
        MonthSummary {
            income,
            expense,
            net,
            change: net - (prev_income - prev_expense),
        }
    }

    /// The heaviest expense categories of the reporting period
    pub fn top_expense_categories(
        &self,
        month: MonthRef,
        today: NaiveDate,
        limit: usize,
    ) -> Vec<CategorySpend> {
        let data = self.data.read().unwrap();
        let categories: HashMap<u64, &Category> =
            data.categories.iter().map(|c| (c.id, c)).collect();

        let start = month.first_day();
        let end = month.report_end(today);

        let mut spend: HashMap<u64, Decimal> = HashMap::new();
        for t in data.transactions.iter().filter(|t| t.in_range(start, end)) {
            if let Some(category) = t.category_id.and_then(|id| categories.get(&id)) {
                if category.kind == CategoryKind::Expense {
                    *spend.entry(category.id).or_insert(Decimal::ZERO) += t.amount;
                }
            }
        }

        let mut ranked: Vec<CategorySpend> = spend
            .into_iter()
            .filter_map(|(id, total)| {
                categories.get(&id).map(|c| CategorySpend { name: c.full_path(), total })
            })
            .collect();
        ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        ranked.truncate(limit);
        ranked
    }

    /// Overall counts for the JSON summary endpoint
    pub fn summary(&self) -> BookSummary {
        let transactions = self.data.read().unwrap().transactions.len();
        BookSummary {
            categories: self.category_counts(),
            transactions,
        }
    }
}

// ==================== Tests ====================
