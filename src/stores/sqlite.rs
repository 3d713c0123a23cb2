//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    AppState, Error,
    db::{MapRow, initialize},
    models::{Expense, ExpenseUpdate},
    stores::ExpenseStore,
};

/// The column list shared by every query that materializes an [Expense].
const EXPENSE_COLUMNS: &str = "id, description, amount, currency, paidBy, category, date, isPaid";

/// Stores expenses in a SQLite database.
///
/// The store owns the connection for its lifetime. Construct it explicitly
/// and call [close](SQLiteExpenseStore::close) on shutdown; there is no
/// ambient global handle.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Close the underlying connection explicitly.
    ///
    /// If other clones of the store are still alive this is a no-op; the last
    /// clone to drop releases the connection regardless, so every exit path
    /// is covered.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if SQLite fails to close cleanly.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is poisoned.
    pub fn close(self) -> Result<(), Error> {
        match Arc::try_unwrap(self.connection) {
            Ok(mutex) => {
                let connection = mutex.into_inner().unwrap();
                connection.close().map_err(|(_, error)| error.into())
            }
            Err(_) => Ok(()),
        }
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Retrieve every stored expense, newest ledger date first.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    fn get_all(&self) -> Result<Vec<Expense>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY date DESC, createdAt DESC"
            ))?
            .query_map([], Self::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the expense with `id`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    fn get(&self, id: &str) -> Result<Option<Expense>, Error> {
        let connection = self.connection.lock().unwrap();

        select_expense(&connection, id)
    }

    /// Store a new expense.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateExpenseId] if the ID already exists in the database,
    /// - or [Error::SqlError] if there is some other SQL error (including
    ///   check-constraint violations).
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    fn insert(&mut self, expense: Expense) -> Result<Expense, Error> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO expenses (id, description, amount, currency, paidBy, category, date, isPaid)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                (
                    &expense.id,
                    &expense.description,
                    expense.amount,
                    expense.currency,
                    expense.paid_by,
                    expense.category,
                    expense.date,
                    expense.is_paid,
                ),
            )
            .map_err(|error| match error {
                // Codes 1555 and 2067 occur when a PRIMARY KEY or UNIQUE
                // constraint failed: the ID is already taken.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 1555 || sql_error.extended_code == 2067 =>
                {
                    Error::DuplicateExpenseId(expense.id.clone())
                }
                error => error.into(),
            })?;

        Ok(expense)
    }

    /// Merge `update` onto the stored record and persist the merged result.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error, e.g. a merged field violating a check constraint.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    fn update(&mut self, id: &str, update: ExpenseUpdate) -> Result<Option<Expense>, Error> {
        let connection = self.connection.lock().unwrap();

        let Some(mut expense) = select_expense(&connection, id)? else {
            return Ok(None);
        };

        update.apply_to(&mut expense);

        connection.execute(
            "UPDATE expenses
             SET description = ?1, amount = ?2, currency = ?3, paidBy = ?4, category = ?5,
                 date = ?6, isPaid = ?7, updatedAt = datetime('now')
             WHERE id = ?8",
            (
                &expense.description,
                expense.amount,
                expense.currency,
                expense.paid_by,
                expense.category,
                expense.date,
                expense.is_paid,
                id,
            ),
        )?;

        Ok(Some(expense))
    }

    /// Remove the expense with `id`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    fn delete(&mut self, id: &str) -> Result<bool, Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expenses WHERE id = ?1", [id])?;

        Ok(rows_deleted > 0)
    }

    /// Flip the settlement flag of the expense with `id` in place.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the same thread.
    fn toggle_paid(&mut self, id: &str) -> Result<Option<Expense>, Error> {
        let connection = self.connection.lock().unwrap();

        let rows_changed = connection.execute(
            "UPDATE expenses SET isPaid = NOT isPaid, updatedAt = datetime('now') WHERE id = ?1",
            [id],
        )?;

        if rows_changed == 0 {
            return Ok(None);
        }

        select_expense(&connection, id)
    }
}

fn select_expense(connection: &Connection, id: &str) -> Result<Option<Expense>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"
        ))?
        .query_row([id], SQLiteExpenseStore::map_row)
        .optional()
        .map_err(Error::SqlError)
}

impl MapRow for SQLiteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Expense {
            id: row.get(offset)?,
            description: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            currency: row.get(offset + 3)?,
            paid_by: row.get(offset + 4)?,
            category: row.get(offset + 5)?,
            date: row.get(offset + 6)?,
            is_paid: row.get(offset + 7)?,
        })
    }
}

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SqlAppState = AppState<SQLiteExpenseStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the expenses table if it
/// does not exist yet.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(db_connection: Connection) -> Result<SqlAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let expense_store = SQLiteExpenseStore::new(connection);

    Ok(AppState::new(expense_store))
}
