use chrono::{Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::Note;

/// Completion statistics over a set of notes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 when there are no notes.
    pub percentage: u8,
}

impl Progress {
    pub fn of(notes: &[Note]) -> Self {
        let total = notes.len();
        let completed = notes.iter().filter(|n| n.completed).count();
        let percentage = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u8
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// No notes were created that day.
    Empty,
    /// Notes were created, none of them completed yet.
    Pending,
    /// At least one note created that day is completed.
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub weekday: char,
    pub status: DayStatus,
}

/// The seven days ending with `today`, oldest first.
///
/// Notes are bucketed by the calendar day of `created_at` in `tz`.
pub fn week_activity<Tz: TimeZone>(notes: &[Note], today: NaiveDate, tz: &Tz) -> Vec<DayActivity> {
    (0..7)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let mut day_notes = notes
                .iter()
                .filter(|n| n.created_at.with_timezone(tz).date_naive() == date)
                .peekable();

            let status = if day_notes.peek().is_none() {
                DayStatus::Empty
            } else if day_notes.any(|n| n.completed) {
                DayStatus::Completed
            } else {
                DayStatus::Pending
            };

            DayActivity {
                date,
                weekday: weekday_initial(date),
                status,
            }
        })
        .collect()
}

fn weekday_initial(date: NaiveDate) -> char {
    const INITIALS: [char; 7] = ['S', 'M', 'T', 'W', 'T', 'F', 'S'];
    INITIALS[date.weekday().num_days_from_sunday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn note(day: u32, completed: bool) -> Note {
        let at = Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap();
        Note {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            content: "c".to_string(),
            completed,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn progress_of_empty_list_is_zero() {
        assert_eq!(Progress::of(&[]), Progress::default());
    }

    #[test]
    fn progress_rounds_percentage() {
        let notes = [note(1, true), note(1, false), note(2, false)];
        let progress = Progress::of(&notes);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percentage, 33);

        let notes = [note(1, true), note(1, true), note(2, false)];
        assert_eq!(Progress::of(&notes).percentage, 67);
    }

    #[test]
    fn week_activity_buckets_by_creation_day() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let notes = [note(7, false), note(5, false), note(5, true), note(1, true)];

        let week = week_activity(&notes, today, &Utc);

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(week[0].status, DayStatus::Completed);
        assert_eq!(week[1].status, DayStatus::Empty);
        assert_eq!(week[4].status, DayStatus::Completed);
        assert_eq!(week[6].date, today);
        assert_eq!(week[6].status, DayStatus::Pending);
    }

    #[test]
    fn weekday_initials_start_on_sunday() {
        // 2026-03-01 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(weekday_initial(sunday), 'S');
        assert_eq!(weekday_initial(sunday + Duration::days(1)), 'M');
    }
}
