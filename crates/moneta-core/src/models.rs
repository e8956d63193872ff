//! Core data models for categories and transactions

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::CategoryKind;

fn default_true() -> bool {
    true
}

fn default_created_at() -> DateTime<Utc> {
    Utc::now()
}

/// An income or expense category
///
/// Categories form a two-level tree: roots have no parent, children point at
/// a root of the same kind. Records without `user_owned` are global defaults
/// that cannot be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub user_owned: bool,
}

impl Category {
    /// Check if this is a root category
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this category is a child of the given root
    pub fn is_child_of(&self, root_id: u64) -> bool {
        self.parent_id == Some(root_id)
    }

    /// Full display path, e.g. "Housing > Rent"
    pub fn full_path(&self) -> String {
        match &self.parent_name {
            Some(parent) => format!("{} > {}", parent, self.name),
            None => self.name.clone(),
        }
    }
}

/// A single money movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub amount: Decimal,
    #[serde(default)]
    pub category_id: Option<u64>,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_automated: bool,
    #[serde(default = "default_created_at")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Check if the transaction falls on or between the given dates
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.date >= start && self.date <= end
    }
}

/// A transaction joined with its category, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: u64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub is_automated: bool,
    pub kind: Option<CategoryKind>,
    pub category_path: Option<String>,
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u64, name: &str, parent: Option<(u64, &str)>) -> Category {
        Category {
            id,
            name: name.to_string(),
            kind: CategoryKind::Expense,
            parent_id: parent.map(|(pid, _)| pid),
            parent_name: parent.map(|(_, pname)| pname.to_string()),
            is_active: true,
            user_owned: true,
        }
    }

    #[test]
    fn test_category_root_and_child() {
        let root = category(1, "Transport", None);
        let child = category(2, "Fuel", Some((1, "Transport")));

        assert!(root.is_root());
        assert!(!child.is_root());
        assert!(child.is_child_of(1));
        assert!(!child.is_child_of(2));
    }

    #[test]
    fn test_category_full_path() {
        let root = category(1, "Transport", None);
        let child = category(2, "Fuel", Some((1, "Transport")));

        assert_eq!(root.full_path(), "Transport");
        assert_eq!(child.full_path(), "Transport > Fuel");
    }

    #[test]
    fn test_category_wire_format() {
        let json = r#"{"id": 7, "name": "Rent", "type": "EXPENSE", "parent_id": null,
                       "parent_name": null, "user_owned": true}"#;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert_eq!(cat.kind, CategoryKind::Expense);
        // is_active defaults to true when the payload omits it
        assert!(cat.is_active);
        assert!(cat.is_root());
    }

    #[test]
    fn test_transaction_in_range() {
        let tx = Transaction {
            id: 1,
            amount: Decimal::new(125_000, 0),
            category_id: Some(3),
            date: NaiveDate::from_ymd_opt(2025, 11, 14).unwrap(),
            description: String::new(),
            is_automated: false,
            created_at: Utc::now(),
        };

        let start = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        assert!(tx.in_range(start, end));
        assert!(!tx.in_range(start, NaiveDate::from_ymd_opt(2025, 11, 13).unwrap()));
    }
}
