//! View-side state for the expense list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::api::{ApiClient, ClientError, ExpenseFilters, ExpenseInput, ExpenseUpdate, CLIENT_PAGE_SIZE};
use crate::database::models::{Expense, ExpenseSummary};

/// Outcome of a mutation, shown to the user as a transient message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub success: bool,
    pub message: String,
}

impl Banner {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    fn failed(fallback: &str, err: &ClientError) -> Self {
        let message = match err {
            ClientError::Api { message, .. } => message.clone(),
            _ => fallback.to_string(),
        };
        Self {
            success: false,
            message,
        }
    }
}

/// Current page of expenses plus the filters that produced it.
///
/// Mutations never patch `expenses` locally: each one performs its request
/// and then re-fetches the current page with the current filters.
pub struct ExpenseState {
    client: ApiClient,
    expenses: Vec<Expense>,
    loading: bool,
    error: Option<String>,
    filters: ExpenseFilters,
    current_page: i64,
    total_pages: i64,
    total: i64,
}

impl ExpenseState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            expenses: Vec::new(),
            loading: false,
            error: None,
            filters: ExpenseFilters::default(),
            current_page: 1,
            total_pages: 1,
            total: 0,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Last fetch failure, cleared by the next successful fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters(&self) -> &ExpenseFilters {
        &self.filters
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn total_pages(&self) -> i64 {
        self.total_pages
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// On failure the previous page stays visible and the error is recorded.
    pub async fn fetch_expenses(&mut self, page: i64, filters: ExpenseFilters) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.client.list_expenses(page, CLIENT_PAGE_SIZE, &filters).await;
        self.loading = false;

        match result {
            Ok(response) => {
                self.expenses = response.expenses;
                self.current_page = response.current_page;
                self.total_pages = response.total_pages;
                self.total = response.total;
                self.filters = filters;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to fetch expenses: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-fetch the current page with the current filters.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let filters = self.filters.clone();
        self.fetch_expenses(self.current_page, filters).await
    }

    pub async fn add_expense(&mut self, input: &ExpenseInput) -> Banner {
        match self.client.create_expense(input).await {
            Ok(_) => {
                let _ = self.refresh().await;
                Banner::ok("Expense added successfully")
            }
            Err(e) => Banner::failed("Failed to add expense", &e),
        }
    }

    pub async fn update_expense(&mut self, id: Uuid, update: &ExpenseUpdate) -> Banner {
        match self.client.update_expense(id, update).await {
            Ok(_) => {
                let _ = self.refresh().await;
                Banner::ok("Expense updated successfully")
            }
            Err(e) => Banner::failed("Failed to update expense", &e),
        }
    }

    pub async fn delete_expense(&mut self, id: Uuid) -> Banner {
        match self.client.delete_expense(id).await {
            Ok(_) => {
                let _ = self.refresh().await;
                Banner::ok("Expense deleted successfully")
            }
            Err(e) => Banner::failed("Failed to delete expense", &e),
        }
    }

    pub async fn expense_summary(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ExpenseSummary, ClientError> {
        self.client.expense_summary(start_date, end_date).await
    }
}
