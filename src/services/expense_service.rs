use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::database::models::{Expense, ExpenseListResponse, ExpenseSummary};
use crate::database::Store;
use crate::error::ApiError;
use crate::filter::{ExpenseListQuery, SummaryQuery};
use crate::services::validation::{parse_expense_patch, parse_new_expense};

pub const EXPENSE_NOT_FOUND: &str = "Expense not found";
pub const EXPENSE_REMOVED: &str = "Expense removed";

/// Owner-scoped expense operations. Every call takes the authenticated user's
/// id and never sees rows belonging to anyone else.
#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<dyn Store>,
    pagination: PaginationConfig,
}

impl ExpenseService {
    pub fn new(store: Arc<dyn Store>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    pub async fn list(&self, owner: Uuid, query: &ExpenseListQuery) -> Result<ExpenseListResponse, ApiError> {
        let (filter, pagination) = query.parse(&self.pagination)?;
        let page = self.store.list_expenses(owner, &filter, &pagination).await?;

        tracing::debug!(
            "Listed {} of {} expenses for {} (page {}, limit {})",
            page.expenses.len(),
            page.total,
            owner,
            pagination.page,
            pagination.limit
        );

        Ok(ExpenseListResponse {
            expenses: page.expenses,
            total_pages: pagination.total_pages(page.total),
            current_page: pagination.page,
            total: page.total,
        })
    }

    pub async fn get(&self, owner: Uuid, id: &str) -> Result<Expense, ApiError> {
        let id = parse_expense_id(id)?;
        self.store
            .find_expense(owner, id)
            .await?
            .ok_or_else(|| ApiError::not_found(EXPENSE_NOT_FOUND))
    }

    pub async fn create(&self, owner: Uuid, payload: &Value) -> Result<Expense, ApiError> {
        let new_expense = parse_new_expense(payload, owner, Utc::now())?;
        let expense = self.store.insert_expense(new_expense).await?;
        tracing::info!("Created expense {} for {}", expense.id, owner);
        Ok(expense)
    }

    /// Validation runs before the ownership lookup, so a bad body is a 400 even
    /// for an id the caller does not own.
    pub async fn update(&self, owner: Uuid, id: &str, payload: &Value) -> Result<Expense, ApiError> {
        let patch = parse_expense_patch(payload)?;
        let id = parse_expense_id(id)?;
        let expense = self
            .store
            .update_expense(owner, id, patch)
            .await?
            .ok_or_else(|| ApiError::not_found(EXPENSE_NOT_FOUND))?;
        tracing::info!("Updated expense {} for {}", expense.id, owner);
        Ok(expense)
    }

    pub async fn delete(&self, owner: Uuid, id: &str) -> Result<(), ApiError> {
        let id = parse_expense_id(id)?;
        if !self.store.delete_expense(owner, id).await? {
            return Err(ApiError::not_found(EXPENSE_NOT_FOUND));
        }
        tracing::info!("Deleted expense {} for {}", id, owner);
        Ok(())
    }

    pub async fn summary(&self, owner: Uuid, query: &SummaryQuery) -> Result<ExpenseSummary, ApiError> {
        let range = query.parse()?;
        Ok(self.store.summarize_expenses(owner, &range).await?)
    }
}

/// A malformed id cannot name any row, so it is reported like a missing one.
fn parse_expense_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found(EXPENSE_NOT_FOUND))
}
