use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum length of an expense description, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new expense row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub user: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl NewExpense {
    pub fn into_expense(self, now: DateTime<Utc>) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            user: self.user,
            amount: self.amount,
            description: self.description,
            category: self.category,
            date: self.date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.description.is_none() && self.category.is_none() && self.date.is_none()
    }

    pub fn apply(self, expense: &mut Expense, now: DateTime<Utc>) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        expense.updated_at = now;
    }
}

/// One page of an owner's expenses plus the unpaged match count.
#[derive(Debug, Clone, Default)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub total: i64,
}

/// Body of `GET /api/expenses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}
