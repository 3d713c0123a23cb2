//! The fixed set of currencies the household records expenses in, the static
//! exchange-rate table between them, and display formatting.

use std::{fmt::Display, str::FromStr, sync::OnceLock};

use numfmt::{Formatter, Precision};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A currency an expense can be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// New Taiwan dollar.
    Twd,
    /// South Korean won.
    Won,
    /// Japanese yen.
    Yen,
}

/// All supported currencies.
pub const CURRENCIES: [Currency; 3] = [Currency::Twd, Currency::Won, Currency::Yen];

impl Currency {
    /// The currency code as stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Twd => "TWD",
            Currency::Won => "WON",
            Currency::Yen => "YEN",
        }
    }

    /// The symbol prefixed to formatted amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Twd => "NT$",
            Currency::Won => "₩",
            Currency::Yen => "¥",
        }
    }

    /// A human-readable label for currency pickers.
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Twd => "TWD (台湾ドル)",
            Currency::Won => "KRW (韓国ウォン)",
            Currency::Yen => "JPY (日本円)",
        }
    }

    /// The multiplicative rate for converting one unit of `self` into `to`.
    ///
    /// Rates are hardcoded approximations. They are not fetched live and have
    /// no staleness handling.
    pub fn rate(&self, to: Currency) -> f64 {
        match (self, to) {
            (Currency::Yen, Currency::Yen) => 1.0,
            (Currency::Yen, Currency::Twd) => 0.22,
            (Currency::Yen, Currency::Won) => 9.2,
            (Currency::Twd, Currency::Twd) => 1.0,
            (Currency::Twd, Currency::Yen) => 4.55,
            (Currency::Twd, Currency::Won) => 41.8,
            (Currency::Won, Currency::Won) => 1.0,
            (Currency::Won, Currency::Yen) => 0.109,
            (Currency::Won, Currency::Twd) => 0.024,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TWD" => Ok(Currency::Twd),
            "WON" => Ok(Currency::Won),
            "YEN" => Ok(Currency::Yen),
            other => Err(Error::InvalidCurrency(other.to_string())),
        }
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// Convert `amount` from one currency to another via the static rate table.
///
/// Returns `amount` unchanged when `from == to`.
pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
    if from == to {
        return amount;
    }

    amount * from.rate(to)
}

/// Render `amount` with the currency's symbol and thousands separators,
/// rounded to the nearest whole unit, e.g. `¥12,345` or `-₩1,000`.
///
/// Fractional minor units are never displayed, even though stored amounts may
/// be fractional.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let rounded = amount.round();

    if rounded == 0.0 {
        // Zero is hardcoded as "0" by numfmt, so we must format it ourselves.
        return format!("{}0", currency.symbol());
    }

    let formatted = whole_unit_formatter(currency).fmt_string(rounded.abs());

    if rounded < 0.0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

fn whole_unit_formatter(currency: Currency) -> &'static Formatter {
    static TWD_FMT: OnceLock<Formatter> = OnceLock::new();
    static WON_FMT: OnceLock<Formatter> = OnceLock::new();
    static YEN_FMT: OnceLock<Formatter> = OnceLock::new();

    let cell = match currency {
        Currency::Twd => &TWD_FMT,
        Currency::Won => &WON_FMT,
        Currency::Yen => &YEN_FMT,
    };

    cell.get_or_init(|| {
        Formatter::currency(currency.symbol())
            .unwrap()
            .precision(Precision::Decimals(0))
    })
}
