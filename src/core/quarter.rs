//! Fiscal quarter derivation.
//!
//! Quarters follow the calendar: January-March is Q1, October-December is Q4.
//! The label stored on each event is `"{year}Q{n}"`.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar year and quarter number (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quarter {
    year: i32,
    number: u32,
}

impl Quarter {
    /// Builds a quarter, rejecting numbers outside 1-4.
    pub fn new(year: i32, number: u32) -> Result<Self> {
        if (1..=4).contains(&number) {
            Ok(Self { year, number })
        } else {
            Err(Error::InvalidQuarter {
                value: format!("{year}Q{number}"),
            })
        }
    }

    /// The quarter a date falls in: `((month - 1) / 3) + 1`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            number: (date.month() - 1) / 3 + 1,
        }
    }

    /// Calendar year
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Quarter number, 1 through 4
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Label stored in `event_profiles.quarter`
    #[must_use]
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.number)
    }
}

impl FromStr for Quarter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidQuarter {
            value: s.to_string(),
        };
        let (year, number) = s.trim().split_once('Q').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let number = number.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, number).map_err(|_| invalid())
    }
}

/// Quarter label for a date, e.g. `2024-04-01` → `"2024Q2"`.
#[must_use]
pub fn quarter_label(date: NaiveDate) -> String {
    Quarter::from_date(date).label()
}
