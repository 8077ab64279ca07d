use serde::{Deserialize, Serialize};

use super::date::DateRange;
use super::error::FilterError;
use super::filter_where::ExpenseFilter;
use super::pagination::Pagination;
use crate::config::PaginationConfig;

/// Raw query string for `GET /api/expenses`. Values stay as strings so that
/// malformed input becomes a field-level validation error instead of an
/// extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ExpenseListQuery {
    pub fn parse(&self, config: &PaginationConfig) -> Result<(ExpenseFilter, Pagination), FilterError> {
        let range = DateRange::from_params(self.start_date.as_deref(), self.end_date.as_deref())?;
        let pagination = Pagination::from_params(self.page.as_deref(), self.limit.as_deref(), config)?;
        Ok((ExpenseFilter::new(self.category.as_deref(), range), pagination))
    }
}

/// Raw query string for `GET /api/expenses/summary/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SummaryQuery {
    pub fn parse(&self) -> Result<DateRange, FilterError> {
        DateRange::from_params(self.start_date.as_deref(), self.end_date.as_deref())
    }
}
