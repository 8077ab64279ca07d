//! Typed REST client for the expense API.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::database::models::{Category, Expense, ExpenseListResponse, ExpenseSummary, User};
use crate::filter::{ExpenseListQuery, SummaryQuery};
use crate::middleware::MessageResponse;
use crate::services::{AuthResponse, CategoriesResponse};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Page size the client asks for when listing.
pub const CLIENT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("No category at position {0}")]
    CategoryIndex(usize),
}

impl ClientError {
    /// HTTP status when the server answered with an error body.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Body for creating an expense. `date` falls back to the server clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Body for a partial update. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Listing filters as the user picked them. Blank values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilters {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ExpenseFilters {
    fn to_query(&self, page: i64, limit: i64) -> ExpenseListQuery {
        ExpenseListQuery {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            category: self.category.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join("api/")?.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let mut builder = self.http.request(method, self.endpoint(path)?);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Error bodies are `{error, message, code, field_errors?}`; fall back to the status text.
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        let field_errors = body
            .get("field_errors")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        tracing::debug!("API error {}: {}", status, message);
        Err(ClientError::Api {
            status,
            message,
            field_errors,
        })
    }

    /// Probes `/health` at the server root.
    pub async fn health(&self) -> Result<Value, ClientError> {
        let url = self.base_url.join("health")?;
        self.send(self.http.get(url)).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({"name": name, "email": email, "password": password});
        self.send(self.request(Method::POST, "auth/register")?.json(&body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({"email": email, "password": password});
        self.send(self.request(Method::POST, "auth/login")?.json(&body)).await
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.send(self.request(Method::GET, "auth/me")?).await
    }

    pub async fn update_categories(&self, categories: &[Category]) -> Result<Vec<Category>, ClientError> {
        let body = json!({ "categories": categories });
        let response: CategoriesResponse = self
            .send(self.request(Method::PUT, "auth/update-categories")?.json(&body))
            .await?;
        Ok(response.categories)
    }

    pub async fn list_expenses(
        &self,
        page: i64,
        limit: i64,
        filters: &ExpenseFilters,
    ) -> Result<ExpenseListResponse, ClientError> {
        let query = filters.to_query(page, limit);
        self.send(self.request(Method::GET, "expenses")?.query(&query)).await
    }

    pub async fn get_expense(&self, id: Uuid) -> Result<Expense, ClientError> {
        self.send(self.request(Method::GET, &format!("expenses/{}", id))?).await
    }

    pub async fn create_expense(&self, input: &ExpenseInput) -> Result<Expense, ClientError> {
        self.send(self.request(Method::POST, "expenses")?.json(input)).await
    }

    pub async fn update_expense(&self, id: Uuid, update: &ExpenseUpdate) -> Result<Expense, ClientError> {
        self.send(self.request(Method::PUT, &format!("expenses/{}", id))?.json(update))
            .await
    }

    pub async fn delete_expense(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("expenses/{}", id))?).await
    }

    pub async fn expense_summary(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ExpenseSummary, ClientError> {
        let query = SummaryQuery {
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        };
        self.send(self.request(Method::GET, "expenses/summary/stats")?.query(&query))
            .await
    }
}
