//! Rental windows.

use crate::error::CommerceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one rental day.
pub const DAY_MS: i64 = 86_400_000;

/// Whole rental days between two instants.
///
/// Partial days round up and the result is never below one, so a same-day
/// rental is billed as a single day. The order of the arguments does not
/// matter.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use playrent_commerce::cart::days_between;
/// let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2025, 1, 4, 0, 0, 0).unwrap();
/// assert_eq!(days_between(start, end), 3);
/// ```
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = end
        .signed_duration_since(start)
        .num_milliseconds()
        .saturating_abs();
    let days = ms / DAY_MS + i64::from(ms % DAY_MS != 0);
    days.max(1)
}

/// An inclusive rental window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RentalPeriod {
    /// Create a rental window. The end must not precede the start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CommerceError> {
        if end < start {
            return Err(CommerceError::InvalidRentalPeriod);
        }
        Ok(Self { start, end })
    }

    /// Billable days.
    pub fn days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    /// Move the start, pulling the end along when the new start passes it.
    pub fn with_start(self, start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: if start > self.end { start } else { self.end },
        }
    }

    /// Move the end, pulling the start back when the new end precedes it.
    pub fn with_end(self, end: DateTime<Utc>) -> Self {
        Self {
            start: if end < self.start { end } else { self.start },
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_days_between_whole_days() {
        assert_eq!(days_between(day(1), day(4)), 3);
    }

    #[test]
    fn test_days_between_is_symmetric() {
        assert_eq!(days_between(day(4), day(1)), days_between(day(1), day(4)));
    }

    #[test]
    fn test_days_between_rounds_up() {
        assert_eq!(days_between(day(1), day(1) + Duration::hours(25)), 2);
    }

    #[test]
    fn test_days_between_floor_of_one() {
        assert_eq!(days_between(day(1), day(1)), 1);
        assert_eq!(days_between(day(1), day(1) + Duration::minutes(5)), 1);
    }

    #[test]
    fn test_period_rejects_inverted_window() {
        assert_eq!(
            RentalPeriod::new(day(4), day(1)),
            Err(CommerceError::InvalidRentalPeriod)
        );
    }

    #[test]
    fn test_with_start_pulls_end() {
        let period = RentalPeriod::new(day(1), day(3)).unwrap().with_start(day(5));
        assert_eq!(period.start, day(5));
        assert_eq!(period.end, day(5));
    }

    #[test]
    fn test_with_end_pulls_start() {
        let period = RentalPeriod::new(day(3), day(6)).unwrap().with_end(day(2));
        assert_eq!(period.start, day(2));
        assert_eq!(period.end, day(2));
    }

    #[test]
    fn test_with_end_keeps_start_when_later() {
        let period = RentalPeriod::new(day(3), day(6)).unwrap().with_end(day(9));
        assert_eq!(period.start, day(3));
        assert_eq!(period.end, day(9));
    }
}
