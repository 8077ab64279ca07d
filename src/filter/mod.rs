pub mod date;
pub mod error;
pub mod filter_where;
pub mod pagination;
pub mod types;

pub use date::{parse_timestamp, DateRange};
pub use error::FilterError;
pub use filter_where::ExpenseFilter;
pub use pagination::Pagination;
pub use types::{ExpenseListQuery, SummaryQuery};
