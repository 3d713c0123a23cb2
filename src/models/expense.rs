//! The expense record, the sole persisted entity, and the optional-field
//! structure used for partial updates.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::{Category, Currency, Participant};

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// A single shared expense.
///
/// The `createdAt`/`updatedAt` timestamps live only in the persistence layer;
/// they are set and refreshed by the store and never cross the API boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Opaque unique identifier, assigned at creation and immutable after.
    pub id: String,
    /// Free-text label for the expense.
    pub description: String,
    /// The amount in the expense's native currency. Expected to be positive,
    /// but not enforced server-side.
    pub amount: f64,
    /// The currency the amount is denominated in.
    pub currency: Currency,
    /// Which household member fronted the money.
    pub paid_by: Participant,
    /// Which category the expense is filed under.
    pub category: Category,
    /// The ledger date (not the creation time).
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the debt for this item has been settled. This flag never
    /// affects the balance calculation.
    pub is_paid: bool,
}

/// A partial update for an expense.
///
/// Each mutable field has one optional slot; unsupplied slots leave the
/// stored record untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement amount.
    pub amount: Option<f64>,
    /// Replacement currency.
    pub currency: Option<Currency>,
    /// Replacement payer.
    pub paid_by: Option<Participant>,
    /// Replacement category.
    pub category: Option<Category>,
    /// Replacement ledger date.
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    /// Replacement settlement flag.
    pub is_paid: Option<bool>,
}

impl ExpenseUpdate {
    /// Merge the supplied fields onto `expense`, field by field.
    pub fn apply_to(self, expense: &mut Expense) {
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(currency) = self.currency {
            expense.currency = currency;
        }
        if let Some(paid_by) = self.paid_by {
            expense.paid_by = paid_by;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(is_paid) = self.is_paid {
            expense.is_paid = is_paid;
        }
    }
}
