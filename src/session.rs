//! Client-side session state: the cached expense list plus the user's
//! locale, display currency, list filter and balance-view preferences.
//!
//! The cache follows a server-confirmed discipline: mutating user actions go
//! to the HTTP API first, and the matching `apply_*` method patches the cache
//! only once the server has confirmed the change.

use serde::{Deserialize, Serialize};
use time::macros::date;

use crate::{
    Error,
    ledger::{BalanceSummary, Settlement},
    models::{Category, Currency, Expense, Participant},
};

/// The UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Japanese.
    Ja,
    /// English.
    En,
}

/// Which expenses the list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaidFilter {
    /// Every expense.
    All,
    /// Only settled expenses.
    Paid,
    /// Only outstanding expenses.
    Unpaid,
}

/// The in-memory state a client renders from.
#[derive(Debug, Clone)]
pub struct Session {
    expenses: Vec<Expense>,
    /// The active UI language.
    pub locale: Locale,
    /// The currency summaries are converted to.
    pub display_currency: Currency,
    /// The active list filter.
    pub filter: PaidFilter,
    /// The member from whose perspective the balance is phrased.
    pub balance_view: Participant,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            expenses: Vec::new(),
            locale: Locale::Ja,
            display_currency: Currency::Yen,
            filter: PaidFilter::All,
            balance_view: Participant::Ron,
        }
    }
}

impl Session {
    /// The cached expense list, unfiltered.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Replace the cache with a freshly fetched list.
    ///
    /// A failed fetch falls back to the built-in sample dataset so the UI
    /// stays usable offline; this is degraded capability, not an error shown
    /// to the user.
    pub fn load(&mut self, fetched: Result<Vec<Expense>, Error>) {
        match fetched {
            Ok(expenses) => self.expenses = expenses,
            Err(error) => {
                tracing::warn!("Failed to load expenses, falling back to sample data: {error}");
                self.expenses = sample_expenses();
            }
        }
    }

    /// Prepend a server-confirmed new expense to the cache.
    pub fn apply_created(&mut self, expense: Expense) {
        self.expenses.insert(0, expense);
    }

    /// Replace the cached record matching the server-confirmed update.
    ///
    /// Does nothing if the record is no longer cached.
    pub fn apply_updated(&mut self, updated: Expense) {
        if let Some(cached) = self
            .expenses
            .iter_mut()
            .find(|expense| expense.id == updated.id)
        {
            *cached = updated;
        }
    }

    /// Drop a server-confirmed deletion from the cache.
    pub fn apply_removed(&mut self, id: &str) {
        self.expenses.retain(|expense| expense.id != id);
    }

    /// The cached expenses that pass the active paid filter.
    pub fn filtered(&self) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|expense| match self.filter {
                PaidFilter::All => true,
                PaidFilter::Paid => expense.is_paid,
                PaidFilter::Unpaid => !expense.is_paid,
            })
            .collect()
    }

    /// Recompute the balance summary from the full (unfiltered) cache.
    pub fn summary(&self) -> BalanceSummary {
        BalanceSummary::from_expenses(&self.expenses, self.display_currency)
    }

    /// The localized "who should pay whom" label for the current balance.
    ///
    /// The selected balance view only affects phrasing; it never changes who
    /// the debtor is.
    pub fn settlement_text(&self) -> String {
        match (self.summary().settlement(), self.locale) {
            (Settlement::Settled, Locale::En) => "settled".to_string(),
            (Settlement::Settled, Locale::Ja) => "精算済み".to_string(),
            (
                Settlement::Owes {
                    debtor, creditor, ..
                },
                Locale::En,
            ) => {
                if debtor == self.balance_view {
                    format!("You should pay {creditor}")
                } else {
                    format!("{debtor} should pay you")
                }
            }
            (
                Settlement::Owes {
                    debtor, creditor, ..
                },
                Locale::Ja,
            ) => format!("{debtor}が{creditor}に支払う"),
        }
    }
}

/// The fixed sample dataset used when the initial fetch fails.
pub fn sample_expenses() -> Vec<Expense> {
    vec![
        Expense {
            id: "1".to_string(),
            description: "スーパーで買い物".to_string(),
            amount: 3500.0,
            currency: Currency::Yen,
            paid_by: Participant::Ron,
            category: Category::Food,
            date: date!(2026 - 02 - 10),
            is_paid: false,
        },
        Expense {
            id: "2".to_string(),
            description: "전기요금".to_string(),
            amount: 45_000.0,
            currency: Currency::Won,
            paid_by: Participant::Jin,
            category: Category::Utilities,
            date: date!(2026 - 02 - 08),
            is_paid: true,
        },
        Expense {
            id: "3".to_string(),
            description: "晩ご飯 - レストラン".to_string(),
            amount: 8200.0,
            currency: Currency::Yen,
            paid_by: Participant::Jin,
            category: Category::Food,
            date: date!(2026 - 02 - 12),
            is_paid: false,
        },
        Expense {
            id: "4".to_string(),
            description: "交通カード チャージ".to_string(),
            amount: 500.0,
            currency: Currency::Twd,
            paid_by: Participant::Ron,
            category: Category::Transport,
            date: date!(2026 - 02 - 14),
            is_paid: false,
        },
        Expense {
            id: "5".to_string(),
            description: "Netflix 月額".to_string(),
            amount: 15_000.0,
            currency: Currency::Won,
            paid_by: Participant::Jin,
            category: Category::Entertainment,
            date: date!(2026 - 02 - 01),
            is_paid: true,
        },
    ]
}
