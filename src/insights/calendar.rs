use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Whole days left after `today` in the current week and month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRemaining {
    /// Weeks start on Monday, so Sunday has 0 days left.
    pub days_left_in_week: u32,
    /// The last day of the month has 0 days left.
    pub days_left_in_month: u32,
}

impl TimeRemaining {
    pub fn from_date(today: NaiveDate) -> Self {
        let days_left_in_week = 6 - today.weekday().num_days_from_monday();
        let days_left_in_month = days_in_month(today) - today.day();
        Self {
            days_left_in_week,
            days_left_in_month,
        }
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monday_has_six_days_left_in_week() {
        // 2026-03-02 is a Monday.
        assert_eq!(TimeRemaining::from_date(date(2026, 3, 2)).days_left_in_week, 6);
    }

    #[test]
    fn sunday_has_none_left_in_week() {
        assert_eq!(TimeRemaining::from_date(date(2026, 3, 8)).days_left_in_week, 0);
    }

    #[test]
    fn counts_days_left_in_month() {
        assert_eq!(TimeRemaining::from_date(date(2026, 3, 2)).days_left_in_month, 29);
        assert_eq!(TimeRemaining::from_date(date(2026, 12, 31)).days_left_in_month, 0);
        assert_eq!(TimeRemaining::from_date(date(2028, 2, 1)).days_left_in_month, 28);
    }
}
