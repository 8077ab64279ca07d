pub mod account_service;
pub mod expense_service;
pub mod validation;

pub use account_service::{AccountService, AuthResponse, CategoriesResponse};
pub use expense_service::ExpenseService;
