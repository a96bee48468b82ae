//! Value objects: equality by value, not identity.
//!
//! Identifiers, tokens and manufacture dates carry no identity of their own; two
//! values with the same fields are interchangeable.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Year and month a stock batch was manufactured.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManufactureDate {
    year: i16,
    month: u8,
}

impl ManufactureDate {
    /// Build a manufacture date; `month` must lie in `1..=12`.
    pub fn new(year: i16, month: u8) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }
}

impl ValueObject for ManufactureDate {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_are_inclusive() {
        assert!(ManufactureDate::new(2023, 1).is_ok());
        assert!(ManufactureDate::new(2023, 12).is_ok());
        assert_eq!(
            ManufactureDate::new(2023, 0),
            Err(LedgerError::InvalidMonth(0))
        );
        assert_eq!(
            ManufactureDate::new(2023, 13),
            Err(LedgerError::InvalidMonth(13))
        );
    }

    #[test]
    fn equal_by_value() {
        let a = ManufactureDate::new(2021, 6).unwrap();
        let b = ManufactureDate::new(2021, 6).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.year(), 2021);
        assert_eq!(a.month(), 6);
    }
}
