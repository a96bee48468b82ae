//! Strongly-typed identifiers used across the ledger.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::value_object::ValueObject;

/// Identifier of a stock-keeping record.
///
/// Exactly 8 hexadecimal digits whose leading digit is `0`..=`7`, i.e. the text form
/// of a non-negative 32-bit value. Identity is the exact text: `"00abcdef"` and
/// `"00ABCDEF"` are both valid but distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    pub const LEN: usize = 8;

    /// Validate and wrap an identifier.
    pub fn parse(raw: &str) -> LedgerResult<Self> {
        if Self::is_valid(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(LedgerError::invalid_identifier(raw))
        }
    }

    /// Returns whether `raw` is a well-formed identifier.
    pub fn is_valid(raw: &str) -> bool {
        let bytes = raw.as_bytes();
        bytes.len() == Self::LEN
            && bytes.iter().all(u8::is_ascii_hexdigit)
            && matches!(bytes[0], b'0'..=b'7')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ItemId {}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidIdentifier(value))
        }
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Nine-digit handle of a live reservation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ReservationToken(u32);

impl ReservationToken {
    pub const MIN: u32 = 100_000_000;
    pub const MAX: u32 = 999_999_999;

    /// Wrap a raw token value.
    ///
    /// A value outside the nine-digit range can never name a live reservation, so it
    /// is reported as `UnknownReservation`.
    pub fn new(raw: u32) -> LedgerResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(LedgerError::UnknownReservation(raw))
        }
    }

    /// Number of distinct token values.
    pub const SPAN: u32 = Self::MAX - Self::MIN + 1;

    /// Token at `offset` positions above `MIN`, wrapping modulo `SPAN`.
    pub fn from_offset(offset: u32) -> Self {
        Self(Self::MIN + offset % Self::SPAN)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl ValueObject for ReservationToken {}

impl core::fmt::Display for ReservationToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u32> for ReservationToken {
    type Error = LedgerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReservationToken> for u32 {
    fn from(value: ReservationToken) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_lowest_and_highest_non_negative_ids() {
        assert!(ItemId::parse("00000000").is_ok());
        assert!(ItemId::parse("7fffffff").is_ok());
        assert!(ItemId::parse("00abcdef").is_ok());
    }

    #[test]
    fn rejects_negative_leading_digit() {
        for raw in ["80000000", "9abcdef0", "a0000000", "f0000000", "ffffffff"] {
            assert_eq!(
                ItemId::parse(raw),
                Err(LedgerError::InvalidIdentifier(raw.to_string()))
            );
        }
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        for raw in ["", "0000000", "000000000", "0000000g", "0000 000", "-0000000", "0x000000"] {
            assert!(ItemId::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn rejects_multibyte_text_of_the_right_char_count() {
        assert!(ItemId::parse("0000000é").is_err());
    }

    #[test]
    fn ids_deserialize_through_validation() {
        let ok: Result<ItemId, _> = String::from("01234567").try_into();
        assert!(ok.is_ok());
        let bad: Result<ItemId, _> = String::from("f1234567").try_into();
        assert!(bad.is_err());
    }

    #[test]
    fn token_range_is_nine_digits() {
        assert!(ReservationToken::new(ReservationToken::MIN).is_ok());
        assert!(ReservationToken::new(ReservationToken::MAX).is_ok());
        assert_eq!(
            ReservationToken::new(99_999_999),
            Err(LedgerError::UnknownReservation(99_999_999))
        );
        assert_eq!(
            ReservationToken::new(1_000_000_000),
            Err(LedgerError::UnknownReservation(1_000_000_000))
        );
    }

    #[test]
    fn offsets_wrap_inside_the_range() {
        assert_eq!(ReservationToken::from_offset(0).get(), ReservationToken::MIN);
        assert_eq!(
            ReservationToken::from_offset(ReservationToken::SPAN - 1).get(),
            ReservationToken::MAX
        );
        assert_eq!(
            ReservationToken::from_offset(ReservationToken::SPAN).get(),
            ReservationToken::MIN
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every 8-hex-digit string with a leading digit in 0..=7 is accepted.
        #[test]
        fn well_formed_ids_are_accepted(raw in "[0-7][0-9a-fA-F]{7}") {
            prop_assert!(ItemId::parse(&raw).is_ok());
        }

        /// Property: a leading digit in 8..=f is always rejected.
        #[test]
        fn negative_ids_are_rejected(raw in "[89a-fA-F][0-9a-f]{7}") {
            prop_assert!(ItemId::parse(&raw).is_err());
        }

        /// Property: any length other than 8 is rejected.
        #[test]
        fn wrong_lengths_are_rejected(raw in "[0-7][0-9a-f]{0,6}|[0-7][0-9a-f]{8,12}") {
            prop_assert!(ItemId::parse(&raw).is_err());
        }

        /// Property: a single non-hex character anywhere is rejected.
        #[test]
        fn non_hex_characters_are_rejected(
            prefix in "[0-7]",
            pos in 0usize..7,
            bad in "[g-zG-Z_ .]",
        ) {
            let mut raw: Vec<char> = format!("{prefix}0000000").chars().collect();
            raw[pos + 1] = bad.chars().next().unwrap();
            let raw: String = raw.into_iter().collect();
            prop_assert!(ItemId::parse(&raw).is_err());
        }
    }
}
