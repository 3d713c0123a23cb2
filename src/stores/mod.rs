//! Storage of expense records, as a trait seam plus the SQLite backend.

mod expense;
mod sqlite;

pub use expense::ExpenseStore;
pub use sqlite::{SQLiteExpenseStore, SqlAppState, create_app_state};
