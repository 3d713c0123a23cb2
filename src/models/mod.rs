//! The domain models: currencies, the two household members, expense
//! categories, and the expense record itself.

mod category;
mod currency;
mod expense;
mod participant;

pub use category::Category;
pub use currency::{CURRENCIES, Currency, convert, format_amount};
pub use expense::{Expense, ExpenseUpdate, iso_date};
pub use participant::{PARTICIPANTS, Participant};
