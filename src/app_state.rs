//! Implements a struct that holds the state of the REST server.

use crate::stores::ExpenseStore;

/// The state of the REST server.
///
/// The expense store is constructed explicitly by the caller and injected
/// here; route handlers never reach for an ambient global handle.
#[derive(Debug, Clone)]
pub struct AppState<E>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    /// The store for expense records.
    pub expense_store: E,
}

impl<E> AppState<E>
where
    E: ExpenseStore + Clone + Send + Sync,
{
    /// Create a new [AppState] with the given expense store.
    pub fn new(expense_store: E) -> Self {
        Self { expense_store }
    }
}
