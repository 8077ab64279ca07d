//! Client side of the REST API: a typed HTTP client and the state containers
//! a front end builds on.

pub mod api;
pub mod categories;
pub mod state;

pub use api::{ApiClient, ClientError, ExpenseFilters, ExpenseInput, ExpenseUpdate, CLIENT_PAGE_SIZE};
pub use categories::{default_categories, CategoryManager, DEFAULT_PALETTE};
pub use state::{Banner, ExpenseState};
