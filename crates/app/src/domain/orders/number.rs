//! Human-facing order numbers: `ORD-{year}-{six digits}`.

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};
use rand::Rng;

const SUFFIX_SPACE: u32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// A number for `year` with the given suffix, reduced into six digits.
    #[must_use]
    pub fn new(year: i16, suffix: u32) -> Self {
        Self(format!("ORD-{year}-{:06}", suffix % SUFFIX_SPACE))
    }

    /// A number for the current UTC year with a random suffix.
    ///
    /// Uniqueness is not guaranteed here; the `orders.order_number`
    /// constraint decides, and callers draw again on conflict.
    #[must_use]
    pub fn random() -> Self {
        let year = Timestamp::now().to_zoned(TimeZone::UTC).year();

        Self::new(year, rand::thread_rng().gen_range(0..SUFFIX_SPACE))
    }

    /// Wrap a number read back from storage.
    #[must_use]
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
