use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::expense::Expense;
use crate::database::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_expense: Decimal,
    pub count: i64,
}

impl OverallSummary {
    pub fn empty() -> Self {
        Self {
            total_expenses: Decimal::ZERO,
            average_expense: Decimal::ZERO,
            count: 0,
        }
    }

    /// Average is `total / count`, and zero when nothing matched.
    pub fn from_totals(total: Decimal, count: i64) -> Self {
        if count <= 0 {
            return Self::empty();
        }
        let average = total
            .checked_div(Decimal::from(count))
            .unwrap_or(Decimal::ZERO)
            .normalize();
        Self {
            total_expenses: total,
            average_expense: average,
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CategoryTotal {
    #[serde(rename = "_id")]
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub overall: OverallSummary,
    pub by_category: Vec<CategoryTotal>,
}

impl ExpenseSummary {
    pub fn empty() -> Self {
        Self {
            overall: OverallSummary::empty(),
            by_category: Vec::new(),
        }
    }

    /// Aggregate already-filtered expenses.
    pub fn from_expenses<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Result<Self, DatabaseError> {
        let mut total = Decimal::ZERO;
        let mut count = 0i64;
        let mut groups: HashMap<&str, (Decimal, i64)> = HashMap::new();

        for expense in expenses {
            total = total
                .checked_add(expense.amount)
                .ok_or(DatabaseError::Overflow("expense amounts"))?;
            count += 1;
            let entry = groups.entry(expense.category.as_str()).or_insert((Decimal::ZERO, 0));
            entry.0 = entry
                .0
                .checked_add(expense.amount)
                .ok_or(DatabaseError::Overflow("category amounts"))?;
            entry.1 += 1;
        }

        let mut by_category: Vec<CategoryTotal> = groups
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category: category.to_string(),
                total,
                count,
            })
            .collect();
        sort_by_total(&mut by_category);

        Ok(Self {
            overall: OverallSummary::from_totals(total, count),
            by_category,
        })
    }
}

/// Descending total, ties broken by category name.
pub fn sort_by_total(totals: &mut [CategoryTotal]) {
    totals.sort_by(|a, b| match b.total.cmp(&a.total) {
        Ordering::Equal => a.category.cmp(&b.category),
        other => other,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewExpense;
    use chrono::Utc;
    use uuid::Uuid;

    fn expense(category: &str, amount: i64) -> Expense {
        expense_of(category, Decimal::from(amount))
    }

    fn expense_of(category: &str, amount: Decimal) -> Expense {
        NewExpense {
            user: Uuid::nil(),
            amount,
            description: "item".to_string(),
            category: category.to_string(),
            date: Utc::now(),
        }
        .into_expense(Utc::now())
    }

    #[test]
    fn empty_set_has_zero_average() {
        let summary = ExpenseSummary::from_expenses(&Vec::<Expense>::new()).unwrap();
        assert_eq!(summary, ExpenseSummary::empty());
        assert_eq!(OverallSummary::from_totals(Decimal::from(10), 0), OverallSummary::empty());
    }

    #[test]
    fn single_category_totals() {
        let rows = vec![expense("Food", 10), expense("Food", 20), expense("Food", 30)];
        let summary = ExpenseSummary::from_expenses(&rows).unwrap();

        assert_eq!(summary.overall.total_expenses, Decimal::from(60));
        assert_eq!(summary.overall.average_expense, Decimal::from(20));
        assert_eq!(summary.overall.count, 3);
        assert_eq!(
            summary.by_category,
            vec![CategoryTotal {
                category: "Food".to_string(),
                total: Decimal::from(60),
                count: 3,
            }]
        );
    }

    #[test]
    fn categories_sorted_by_descending_total() {
        let rows = vec![
            expense("Transport", 5),
            expense("Food", 10),
            expense("Rent", 500),
            expense("Food", 15),
            expense("Books", 5),
        ];
        let summary = ExpenseSummary::from_expenses(&rows).unwrap();
        let order: Vec<&str> = summary.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(order, vec!["Rent", "Food", "Books", "Transport"]);
        assert_eq!(summary.overall.count, 5);
        assert_eq!(summary.overall.average_expense, Decimal::from(107));
    }

    #[test]
    fn serializes_with_wire_names() {
        let rows = vec![expense("Food", 10), expense("Food", 20), expense("Food", 30)];
        let json = serde_json::to_value(ExpenseSummary::from_expenses(&rows).unwrap()).unwrap();
        assert_eq!(json["overall"]["totalExpenses"].as_f64(), Some(60.0));
        assert_eq!(json["overall"]["averageExpense"].as_f64(), Some(20.0));
        assert_eq!(json["byCategory"][0]["_id"], "Food");
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let rows = vec![expense_of("Food", Decimal::MAX), expense_of("Rent", Decimal::MAX)];
        assert!(matches!(
            ExpenseSummary::from_expenses(&rows),
            Err(DatabaseError::Overflow(_))
        ));
    }
}
