pub mod expense;
pub mod summary;
pub mod user;

pub use expense::{Expense, ExpenseListResponse, ExpensePage, ExpensePatch, NewExpense, DESCRIPTION_MAX_LEN};
pub use summary::{CategoryTotal, ExpenseSummary, OverallSummary};
pub use user::{Category, NewUser, User, DEFAULT_CATEGORY_COLOR};
