//! Consecutive-day streak calculation.

use chrono::NaiveDate;

/// Counts the trailing run of consecutive calendar days ending at the last date.
///
/// `dates` must be sorted ascending and distinct. Returns 0 only for an empty
/// slice.
#[must_use]
pub fn calc_streak(dates: &[NaiveDate]) -> usize {
    if dates.is_empty() {
        return 0;
    }

    let consecutive = dates
        .windows(2)
        .rev()
        .take_while(|pair| (pair[1] - pair[0]).num_days() == 1)
        .count();
    consecutive + 1
}
