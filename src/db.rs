//! Database schema initialization and row-mapping helpers.

use rusqlite::{Connection, Row};

/// Add the expenses table and its indexes to the database.
///
/// Safe to call on an already-initialized database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                currency TEXT NOT NULL CHECK(currency IN ('TWD', 'WON', 'YEN')),
                paidBy TEXT NOT NULL CHECK(paidBy IN ('Ron', 'Jin')),
                category TEXT NOT NULL CHECK(category IN ('food', 'utilities', 'rent', 'transport', 'entertainment', 'other')),
                date TEXT NOT NULL,
                isPaid INTEGER NOT NULL DEFAULT 0 CHECK(isPaid IN (0, 1)),
                createdAt TEXT NOT NULL DEFAULT (datetime('now')),
                updatedAt TEXT NOT NULL DEFAULT (datetime('now'))
                )",
        (),
    )?;

    connection.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date DESC);
         CREATE INDEX IF NOT EXISTS idx_expenses_paidBy ON expenses(paidBy);
         CREATE INDEX IF NOT EXISTS idx_expenses_isPaid ON expenses(isPaid);",
    )?;

    Ok(())
}

/// A trait for mapping a `rusqlite::Row` to a concrete rust type.
pub trait MapRow {
    /// The type that each row is mapped to.
    type ReturnType;

    /// Convert a row to the concrete type, assuming columns start at index zero.
    ///
    /// # Errors
    /// Returns an error if a column is missing or has an unexpected type.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row to the concrete type with the columns starting at `offset`.
    ///
    /// # Errors
    /// Returns an error if a column is missing or has an unexpected type.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}
