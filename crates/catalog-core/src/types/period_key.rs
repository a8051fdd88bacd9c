//! Counter period key type.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::repo::{AttrValue, Item};

/// Attribute holding the year component of a period key.
pub const YEAR_ATTR: &str = "year";

/// Attribute holding the month component of a period key.
pub const MONTH_ATTR: &str = "month";

/// A composite (year, month) key bucketing counter entries by calendar month.
///
/// # Example
///
/// ```
/// use catalog_core::PeriodKey;
///
/// let period: PeriodKey = "2024-03".parse().unwrap();
/// assert_eq!(period.year(), 2024);
/// assert_eq!(period.month(), 3);
/// assert_eq!(period.to_string(), "2024-03");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    /// Create a new period key.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is outside `1..=12` or the year is
    /// outside `1..=9999`.
    pub fn new(year: i32, month: u32) -> Result<Self, Error> {
        if !(1..=9999).contains(&year) {
            return Err(InvalidInputError::PeriodKey {
                value: format!("{}-{}", year, month),
                reason: "year must be between 1 and 9999".to_string(),
            }
            .into());
        }

        if !(1..=12).contains(&month) {
            return Err(InvalidInputError::PeriodKey {
                value: format!("{}-{}", year, month),
                reason: "month must be between 1 and 12".to_string(),
            }
            .into());
        }

        Ok(Self { year, month })
    }

    /// The period containing the current UTC date.
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The store key for this period.
    pub fn to_key(&self) -> Item {
        let mut key = Item::new();
        key.insert(YEAR_ATTR.to_string(), AttrValue::from(i64::from(self.year)));
        key.insert(MONTH_ATTR.to_string(), AttrValue::from(i64::from(self.month)));
        key
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            Error::from(InvalidInputError::PeriodKey {
                value: s.to_string(),
                reason: reason.to_string(),
            })
        };

        let (year, month) = s.split_once('-').ok_or_else(|| invalid("expected YYYY-MM"))?;
        let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let month: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(period: PeriodKey) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_month() {
        let period: PeriodKey = "2025-11".parse().unwrap();
        assert_eq!(period, PeriodKey::new(2025, 11).unwrap());
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(PeriodKey::new(2025, 0).is_err());
        assert!(PeriodKey::new(2025, 13).is_err());
        assert!("2025-13".parse::<PeriodKey>().is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!("november".parse::<PeriodKey>().is_err());
        assert!("2025-xx".parse::<PeriodKey>().is_err());
    }

    #[test]
    fn key_has_both_components() {
        let key = PeriodKey::new(2024, 2).unwrap().to_key();
        assert_eq!(key.get(YEAR_ATTR), Some(&AttrValue::from(2024)));
        assert_eq!(key.get(MONTH_ATTR), Some(&AttrValue::from(2)));
        assert_eq!(key.len(), 2);
    }

    #[test]
    fn current_is_valid() {
        let period = PeriodKey::current();
        assert!(PeriodKey::new(period.year(), period.month()).is_ok());
    }
}
