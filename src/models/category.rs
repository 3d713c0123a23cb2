//! The fixed set of categories an expense can be filed under.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A category for household expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Groceries and eating out.
    Food,
    /// Power, water, gas, internet.
    Utilities,
    /// Rent.
    Rent,
    /// Trains, buses, transport card top-ups.
    Transport,
    /// Streaming subscriptions, outings.
    Entertainment,
    /// Everything else.
    Other,
}

impl Category {
    /// The category name as stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Utilities => "utilities",
            Category::Rent => "rent",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Category::Food),
            "utilities" => Ok(Category::Utilities),
            "rent" => Ok(Category::Rent),
            "transport" => Ok(Category::Transport),
            "entertainment" => Ok(Category::Entertainment),
            "other" => Ok(Category::Other),
            unknown => Err(Error::InvalidCategory(unknown.to_string())),
        }
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod category_tests {
    use super::Category;

    #[test]
    fn parse_accepts_all_six_categories() {
        for name in [
            "food",
            "utilities",
            "rent",
            "transport",
            "entertainment",
            "other",
        ] {
            let category: Category = name.parse().expect("known category should parse");
            assert_eq!(category.as_str(), name);
        }
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let result: Result<Category, _> = "groceries".parse();

        assert!(result.is_err());
    }
}
