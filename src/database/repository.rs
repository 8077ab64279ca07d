use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Category, Expense, ExpensePage, ExpensePatch, ExpenseSummary, NewExpense, NewUser, User};
use crate::filter::{DateRange, ExpenseFilter, Pagination};

/// Expense rows. Every method is scoped by `owner`; a row owned by someone
/// else behaves exactly like a missing row.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, DatabaseError>;

    async fn find_expense(&self, owner: Uuid, id: Uuid) -> Result<Option<Expense>, DatabaseError>;

    async fn update_expense(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, DatabaseError>;

    /// Returns false when nothing owned by `owner` had that id.
    async fn delete_expense(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError>;

    /// Newest `date` first.
    async fn list_expenses(
        &self,
        owner: Uuid,
        filter: &ExpenseFilter,
        pagination: &Pagination,
    ) -> Result<ExpensePage, DatabaseError>;

    async fn summarize_expenses(&self, owner: Uuid, range: &DateRange) -> Result<ExpenseSummary, DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DatabaseError::Conflict` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn replace_categories(&self, id: Uuid, categories: Vec<Category>) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait Store: ExpenseRepository + UserRepository {
    async fn ping(&self) -> Result<(), DatabaseError>;

    fn backend(&self) -> &'static str;
}
