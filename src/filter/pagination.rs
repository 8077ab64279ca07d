use serde::{Deserialize, Serialize};

use super::error::FilterError;
use crate::config::PaginationConfig;

/// 1-based page window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Result<Self, FilterError> {
        if page < 1 {
            return Err(FilterError::InvalidPage(page.to_string()));
        }
        if limit < 1 {
            return Err(FilterError::InvalidLimit(limit.to_string()));
        }
        Ok(Self { page, limit })
    }

    /// Parse raw `page` / `limit` query values. Blank values fall back to
    /// page 1 and the configured default limit; limits above the configured
    /// maximum are clamped rather than rejected.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, FilterError> {
        let page = match page.map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| FilterError::InvalidPage(raw.to_string()))?,
        };

        let limit = match limit.map(str::trim) {
            None | Some("") => config.default_limit,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|l| *l >= 1)
                .ok_or_else(|| FilterError::InvalidLimit(raw.to_string()))?,
        };

        Self::new(page, limit.min(config.max_limit))
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`; an empty result set has zero pages.
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}
