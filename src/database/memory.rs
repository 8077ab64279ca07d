use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Category, Expense, ExpensePage, ExpensePatch, ExpenseSummary, NewExpense, NewUser, User};
use super::repository::{ExpenseRepository, Store, UserRepository};
use crate::filter::{DateRange, ExpenseFilter, Pagination};

/// Process-local store with the same contract as the Postgres one.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    expenses: RwLock<HashMap<Uuid, Expense>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseRepository for MemoryStore {
    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, DatabaseError> {
        let expense = expense.into_expense(Utc::now());
        self.expenses.write().await.insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn find_expense(&self, owner: Uuid, id: Uuid) -> Result<Option<Expense>, DatabaseError> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(&id).filter(|e| e.user == owner).cloned())
    }

    async fn update_expense(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, DatabaseError> {
        let mut expenses = self.expenses.write().await;
        match expenses.get_mut(&id).filter(|e| e.user == owner) {
            Some(expense) => {
                patch.apply(expense, Utc::now());
                Ok(Some(expense.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_expense(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut expenses = self.expenses.write().await;
        if expenses.get(&id).is_some_and(|e| e.user == owner) {
            expenses.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_expenses(
        &self,
        owner: Uuid,
        filter: &ExpenseFilter,
        pagination: &Pagination,
    ) -> Result<ExpensePage, DatabaseError> {
        let expenses = self.expenses.read().await;
        let mut matching: Vec<&Expense> = expenses
            .values()
            .filter(|e| e.user == owner && filter.matches(e))
            .collect();

        matching.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(ExpensePage { expenses: page, total })
    }

    async fn summarize_expenses(&self, owner: Uuid, range: &DateRange) -> Result<ExpenseSummary, DatabaseError> {
        let expenses = self.expenses.read().await;
        ExpenseSummary::from_expenses(expenses.values().filter(|e| e.user == owner && range.contains(&e.date)))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict(format!("email {} already registered", user.email)));
        }
        let user = user.into_user(Utc::now());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn replace_categories(&self, id: Uuid, categories: Vec<Category>) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.categories = categories;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn new_expense(user: Uuid, amount: i64, category: &str, day: u32) -> NewExpense {
        NewExpense {
            user,
            amount: Decimal::from(amount),
            description: format!("{} on day {}", category, day),
            category: category.to_string(),
            date: Utc.with_ymd_and_hms(2024, 4, day, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn rows_are_invisible_to_other_owners() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let expense = store.insert_expense(new_expense(alice, 10, "Food", 1)).await.unwrap();

        assert!(store.find_expense(bob, expense.id).await.unwrap().is_none());
        assert!(store
            .update_expense(bob, expense.id, ExpensePatch { amount: Some(Decimal::ONE), ..Default::default() })
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_expense(bob, expense.id).await.unwrap());

        let still_there = store.find_expense(alice, expense.id).await.unwrap().unwrap();
        assert_eq!(still_there.amount, Decimal::from(10));
    }

    #[tokio::test]
    async fn lists_newest_first_with_paging() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for day in 1..=5 {
            store.insert_expense(new_expense(owner, day as i64, "Food", day)).await.unwrap();
        }
        store.insert_expense(new_expense(Uuid::new_v4(), 1, "Food", 9)).await.unwrap();

        let page = store
            .list_expenses(owner, &ExpenseFilter::default(), &Pagination::new(1, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        let days: Vec<i64> = page.expenses.iter().map(|e| e.amount.try_into().unwrap()).collect();
        assert_eq!(days, vec![5, 4]);

        let last = store
            .list_expenses(owner, &ExpenseFilter::default(), &Pagination::new(3, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(last.expenses.len(), 1);

        let beyond = store
            .list_expenses(owner, &ExpenseFilter::default(), &Pagination::new(4, 2).unwrap())
            .await
            .unwrap();
        assert!(beyond.expenses.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let user = NewUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
        };
        store.insert_user(user.clone()).await.unwrap();
        assert!(matches!(store.insert_user(user).await, Err(DatabaseError::Conflict(_))));
    }
}
