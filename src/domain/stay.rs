use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StayError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A half-open stay `[check_in, check_out)` at day granularity.
///
/// The check-out day is not occupied: a guest leaving on the 5th frees the
/// property for a guest arriving on the 5th.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayRange {
    /// Build a range, rejecting empty or inverted stays.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self> {
        if check_out <= check_in {
            return Err(StayError::InvalidParams {
                reason: format!("check-out {check_out} must be after check-in {check_in}"),
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Build a range without ordering checks. Used where the caller owns
    /// validation, e.g. ranges read back from the store.
    pub fn unchecked(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    pub fn parse(check_in: &str, check_out: &str) -> Result<Self> {
        Self::new(parse_date(check_in)?, parse_date(check_out)?)
    }

    /// Whole nights between check-in and check-out. Negative for inverted
    /// ranges built with [`StayRange::unchecked`].
    pub fn nights(&self) -> i64 {
        nights_between(self.check_in, self.check_out)
    }

    /// Whether this candidate stay conflicts with an existing one.
    pub fn conflicts_with(&self, existing: &StayRange) -> bool {
        overlaps(
            self.check_in,
            self.check_out,
            existing.check_in,
            existing.check_out,
        )
    }
}

impl std::fmt::Display for StayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.check_in, self.check_out)
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| StayError::InvalidParams {
        reason: format!("invalid date '{value}', expected YYYY-MM-DD"),
    })
}

pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// Conflict test between a candidate stay and an existing booking.
///
/// Three cases conflict: the candidate starts inside the booking, ends inside
/// it, or swallows it whole. Arriving on the booking's check-out day and
/// leaving on its check-in day are both allowed.
pub fn overlaps(
    check_in: NaiveDate,
    check_out: NaiveDate,
    booking_check_in: NaiveDate,
    booking_check_out: NaiveDate,
) -> bool {
    let starts_inside = check_in >= booking_check_in && check_in < booking_check_out;
    let ends_inside = check_out > booking_check_in && check_out <= booking_check_out;
    let contains = check_in <= booking_check_in && check_out >= booking_check_out;
    starts_inside || ends_inside || contains
}
