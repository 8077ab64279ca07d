use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}

impl FilterError {
    /// Query parameter the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            FilterError::InvalidDate { field, .. } => field,
            FilterError::InvalidPage(_) => "page",
            FilterError::InvalidLimit(_) => "limit",
        }
    }
}
