//! Month navigation and reporting-period helpers

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::types::CategoryKind;

/// Month names for the dashboard heading
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl MonthRef {
    /// Create a month reference, rejecting out-of-range months
    pub fn new(year: i32, month: u32) -> Option<MonthRef> {
        if (1..=12).contains(&month) {
            Some(MonthRef { year, month })
        } else {
            None
        }
    }

    /// The month containing the given date
    pub fn containing(date: NaiveDate) -> MonthRef {
        MonthRef {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Previous month, rolling the year backward at January
    pub fn prev(self) -> MonthRef {
        if self.month == 1 {
            MonthRef {
                year: self.year - 1,
                month: 12,
            }
        } else {
            MonthRef {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Next month, rolling the year forward at December
    pub fn next(self) -> MonthRef {
        if self.month == 12 {
            MonthRef {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthRef {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Strict ordering against another month
    pub fn is_after(self, other: MonthRef) -> bool {
        (self.year, self.month) > (other.year, other.month)
    }

    /// First day of the month
    pub fn first_day(self) -> NaiveDate {
        // month is validated to 1..=12 at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// End of the reporting period: today for the running month, otherwise
    /// the last day of the month
    pub fn report_end(self, today: NaiveDate) -> NaiveDate {
        if self == MonthRef::containing(today) {
            today
        } else {
            self.last_day()
        }
    }

    /// Check whether the date falls inside this month
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// English month name
    pub fn name(self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Dashboard heading: "March 1 - 14, 2026" while the month is running,
    /// "March 2026" otherwise
    pub fn label(self, today: NaiveDate) -> String {
        if self == MonthRef::containing(today) {
            format!("{} 1 - {}, {}", self.name(), today.day(), self.year)
        } else {
            format!("{} {}", self.name(), self.year)
        }
    }
}

/// The dashboard's selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub month: MonthRef,
    pub filter: CategoryKind,
}

impl Selection {
    pub fn new(month: MonthRef, filter: CategoryKind) -> Selection {
        Selection { month, filter }
    }

    /// Step one month back; always allowed
    pub fn prev_month(self) -> Selection {
        Selection {
            month: self.month.prev(),
            ..self
        }
    }

    /// Step one month forward; refused when the result lies after the
    /// real-world current month
    pub fn next_month(self, today: NaiveDate) -> Option<Selection> {
        let next = self.month.next();
        if next.is_after(MonthRef::containing(today)) {
            None
        } else {
            Some(Selection { month: next, ..self })
        }
    }

    /// Switch the filter; selecting the active filter is a no-op
    pub fn with_filter(self, filter: CategoryKind) -> Option<Selection> {
        if filter == self.filter {
            None
        } else {
            Some(Selection { filter, ..self })
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_ref_validation() {
        assert!(MonthRef::new(2025, 0).is_none());
        assert!(MonthRef::new(2025, 13).is_none());
        assert_eq!(MonthRef::new(2025, 12), Some(MonthRef { year: 2025, month: 12 }));
    }

    #[test]
    fn test_prev_rolls_year_at_january() {
        let jan = MonthRef { year: 2026, month: 1 };
        assert_eq!(jan.prev(), MonthRef { year: 2025, month: 12 });
        let may = MonthRef { year: 2026, month: 5 };
        assert_eq!(may.prev(), MonthRef { year: 2026, month: 4 });
    }

    #[test]
    fn test_next_rolls_year_at_december() {
        let dec = MonthRef { year: 2025, month: 12 };
        assert_eq!(dec.next(), MonthRef { year: 2026, month: 1 });
    }

    #[test]
    fn test_month_bounds() {
        let feb = MonthRef { year: 2024, month: 2 };
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        // leap year
        assert_eq!(feb.last_day(), date(2024, 2, 29));

        let dec = MonthRef { year: 2025, month: 12 };
        assert_eq!(dec.last_day(), date(2025, 12, 31));
    }

    #[test]
    fn test_report_end_clamps_running_month() {
        let today = date(2026, 8, 4);
        let current = MonthRef { year: 2026, month: 8 };
        let past = MonthRef { year: 2026, month: 7 };

        assert_eq!(current.report_end(today), today);
        assert_eq!(past.report_end(today), date(2026, 7, 31));
    }

    #[test]
    fn test_label_for_running_and_past_months() {
        let today = date(2026, 3, 14);
        assert_eq!(MonthRef { year: 2026, month: 3 }.label(today), "March 1 - 14, 2026");
        assert_eq!(MonthRef { year: 2025, month: 11 }.label(today), "November 2025");
    }

    #[test]
    fn test_next_month_blocked_at_current_month() {
        let today = date(2026, 8, 4);
        let selection = Selection::new(MonthRef { year: 2026, month: 8 }, CategoryKind::Income);
        assert!(selection.next_month(today).is_none());

        let past = Selection::new(MonthRef { year: 2026, month: 7 }, CategoryKind::Income);
        let stepped = past.next_month(today).unwrap();
        assert_eq!(stepped.month, MonthRef { year: 2026, month: 8 });
    }

    #[test]
    fn test_next_month_blocked_across_year_boundary() {
        // December of the current year must not step into January of the next
        let today = date(2026, 12, 10);
        let selection = Selection::new(MonthRef { year: 2026, month: 12 }, CategoryKind::Expense);
        assert!(selection.next_month(today).is_none());
    }

    #[test]
    fn test_prev_month_always_allowed() {
        let selection = Selection::new(MonthRef { year: 2026, month: 1 }, CategoryKind::Expense);
        let stepped = selection.prev_month();
        assert_eq!(stepped.month, MonthRef { year: 2025, month: 12 });
        assert_eq!(stepped.filter, CategoryKind::Expense);
    }

    #[test]
    fn test_with_filter_noop_on_same_value() {
        let selection = Selection::new(MonthRef { year: 2026, month: 8 }, CategoryKind::Income);
        assert!(selection.with_filter(CategoryKind::Income).is_none());
        let switched = selection.with_filter(CategoryKind::Expense).unwrap();
        assert_eq!(switched.filter, CategoryKind::Expense);
        assert_eq!(switched.month, selection.month);
    }
}
