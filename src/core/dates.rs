//! Check-in / check-out arithmetic on local calendar dates.
//!
//! Dates carry no time of day and no timezone; nothing here converts between
//! zones.

use crate::domain::model::DateRange;
use crate::utils::error::{Result, VillaError};
use chrono::{Days, NaiveDate};

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `check_in` advanced by `nights` calendar days.
///
/// Returns `None` when `check_in` is absent, `nights <= 0`, or the result
/// would leave chrono's supported range.
pub fn derive_checkout(check_in: Option<NaiveDate>, nights: i64) -> Option<NaiveDate> {
    let check_in = check_in?;
    let nights = u64::try_from(nights).ok().filter(|n| *n > 0)?;
    check_in.checked_add_days(Days::new(nights))
}

/// Whole nights between two dates. `check_out` must be after `check_in`.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> Result<u32> {
    let days = (check_out - check_in).num_days();
    if days <= 0 {
        return Err(VillaError::invalid_range(format!(
            "check-out {} is not after check-in {}",
            check_out, check_in
        )));
    }
    u32::try_from(days).map_err(|_| VillaError::invalid_range("stay is too long"))
}

/// `11 Nov 2025`
pub fn format_short(date: NaiveDate) -> String {
    use chrono::Datelike;

    let month = MONTHS_SHORT[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Booking-form calculator: check-in plus a night count, check-out derived.
///
/// The derived check-out is rebuilt from both inputs on every change, so a
/// cleared or edited input can never leave a stale check-out behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StayCalculator {
    check_in: Option<NaiveDate>,
    nights: Option<i64>,
    check_out: Option<NaiveDate>,
}

impl StayCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_check_in(&mut self, check_in: Option<NaiveDate>) -> Option<NaiveDate> {
        self.check_in = check_in;
        self.recompute()
    }

    pub fn set_nights(&mut self, nights: Option<i64>) -> Option<NaiveDate> {
        self.nights = nights;
        self.recompute()
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    pub fn nights(&self) -> Option<i64> {
        self.nights
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    pub fn range(&self) -> Option<DateRange> {
        let check_out = self.check_out?;
        DateRange::new(self.check_in?, check_out).ok()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn recompute(&mut self) -> Option<NaiveDate> {
        self.check_out = self
            .nights
            .and_then(|nights| derive_checkout(self.check_in, nights));
        tracing::debug!(
            check_in = ?self.check_in,
            nights = ?self.nights,
            check_out = ?self.check_out,
            "Recomputed check-out"
        );
        self.check_out
    }
}
