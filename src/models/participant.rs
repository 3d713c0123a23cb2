//! The two household members that split every expense.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the two people sharing the household ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    /// The first household member.
    Ron,
    /// The second household member.
    Jin,
}

/// Both household members.
pub const PARTICIPANTS: [Participant; 2] = [Participant::Ron, Participant::Jin];

impl Participant {
    /// The participant's name as stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Participant::Ron => "Ron",
            Participant::Jin => "Jin",
        }
    }

    /// The other household member.
    pub fn other(&self) -> Participant {
        match self {
            Participant::Ron => Participant::Jin,
            Participant::Jin => Participant::Ron,
        }
    }
}

impl Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Participant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ron" => Ok(Participant::Ron),
            "Jin" => Ok(Participant::Jin),
            other => Err(Error::InvalidParticipant(other.to_string())),
        }
    }
}

impl ToSql for Participant {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Participant {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}
