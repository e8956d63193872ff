//! Shared enumerations

use serde::{Deserialize, Serialize};

/// Category kind: money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    /// Wire name, as stored in the data file and carried in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "EXPENSE",
            CategoryKind::Income => "INCOME",
        }
    }

    /// Heading shown above the filtered transaction list
    pub fn title(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "Expenses",
            CategoryKind::Income => "Income",
        }
    }

    /// The opposite kind
    pub fn other(&self) -> CategoryKind {
        match self {
            CategoryKind::Expense => CategoryKind::Income,
            CategoryKind::Income => CategoryKind::Expense,
        }
    }
}

impl Default for CategoryKind {
    fn default() -> Self {
        CategoryKind::Expense
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EXPENSE" => Ok(CategoryKind::Expense),
            "INCOME" => Ok(CategoryKind::Income),
            _ => Err(format!("Invalid category kind: {}", s)),
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("EXPENSE".parse::<CategoryKind>().unwrap(), CategoryKind::Expense);
        assert_eq!("income".parse::<CategoryKind>().unwrap(), CategoryKind::Income);
        assert!("SAVINGS".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_kind_display_round_trip() {
        for kind in [CategoryKind::Expense, CategoryKind::Income] {
            assert_eq!(kind.to_string().parse::<CategoryKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_serde_wire_names() {
        assert_eq!(serde_json::to_string(&CategoryKind::Income).unwrap(), "\"INCOME\"");
        let kind: CategoryKind = serde_json::from_str("\"EXPENSE\"").unwrap();
        assert_eq!(kind, CategoryKind::Expense);
    }

    #[test]
    fn test_kind_other() {
        assert_eq!(CategoryKind::Expense.other(), CategoryKind::Income);
        assert_eq!(CategoryKind::Income.other(), CategoryKind::Expense);
    }
}
