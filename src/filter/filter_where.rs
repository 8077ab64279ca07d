use serde::{Deserialize, Serialize};

use super::date::DateRange;
use crate::database::models::Expense;

/// Category value that the list view sends to mean "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Optional narrowing applied on top of owner scoping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub range: DateRange,
}

impl ExpenseFilter {
    pub fn new(category: Option<&str>, range: DateRange) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_string);
        Self { category, range }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.as_deref().map_or(true, |c| expense.category == c) && self.range.contains(&expense.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn expense(category: &str, day: u32) -> Expense {
        let date = Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap();
        Expense {
            id: Uuid::new_v4(),
            user: Uuid::new_v4(),
            amount: Decimal::from(5),
            description: "coffee".to_string(),
            category: category.to_string(),
            date,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn all_and_blank_mean_no_category_filter() {
        assert_eq!(ExpenseFilter::new(Some("all"), DateRange::default()).category, None);
        assert_eq!(ExpenseFilter::new(Some("  "), DateRange::default()).category, None);
        assert_eq!(
            ExpenseFilter::new(Some("Food"), DateRange::default()).category.as_deref(),
            Some("Food")
        );
    }

    #[test]
    fn category_is_exact_match() {
        let filter = ExpenseFilter::new(Some("Food"), DateRange::default());
        assert!(filter.matches(&expense("Food", 1)));
        assert!(!filter.matches(&expense("food", 1)));
        assert!(!filter.matches(&expense("Transport", 1)));
    }

    #[test]
    fn combines_category_and_range() {
        let range = DateRange::from_params(Some("2024-05-02"), Some("2024-05-03")).unwrap();
        let filter = ExpenseFilter::new(Some("Food"), range);
        assert!(!filter.matches(&expense("Food", 1)));
        assert!(filter.matches(&expense("Food", 2)));
        assert!(filter.matches(&expense("Food", 3)));
        assert!(!filter.matches(&expense("Transport", 3)));
    }
}
