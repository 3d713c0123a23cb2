//! Defines the expense store trait.

use crate::{
    Error,
    models::{Expense, ExpenseUpdate},
};

/// Handles the persistence of expense records.
///
/// Absence of a record is signalled with `None` (or `false` for
/// [delete](ExpenseStore::delete)), never with an error: only
/// storage-engine faults surface as [Error].
pub trait ExpenseStore {
    /// Retrieve every stored expense, ordered by ledger date descending with
    /// ties broken by creation time descending.
    fn get_all(&self) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expense with `id`, or `None` if there is no such record.
    fn get(&self, id: &str) -> Result<Option<Expense>, Error>;

    /// Store a new expense.
    ///
    /// The caller supplies the ID. Uniqueness is enforced by the storage
    /// engine, not pre-checked: a clash returns
    /// [Error::DuplicateExpenseId].
    fn insert(&mut self, expense: Expense) -> Result<Expense, Error>;

    /// Merge the supplied fields onto the stored record, persist the result
    /// and refresh its updated-at timestamp.
    ///
    /// Returns `None` if `id` does not exist. Enum validity of the merged
    /// fields is left to the storage engine's check constraints.
    fn update(&mut self, id: &str, update: ExpenseUpdate) -> Result<Option<Expense>, Error>;

    /// Remove the expense with `id`. Returns whether a record was actually
    /// removed.
    fn delete(&mut self, id: &str) -> Result<bool, Error>;

    /// Flip the settlement flag in place and refresh the updated-at
    /// timestamp.
    ///
    /// Returns the post-toggle record, or `None` if `id` does not exist.
    fn toggle_paid(&mut self, id: &str) -> Result<Option<Expense>, Error>;
}
