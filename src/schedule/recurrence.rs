//! Recurrence evaluation — does a pattern put an occurrence on a day?

use chrono::{Datelike, NaiveDate};

use crate::routines::model::{DayCode, RecurrencePattern};

/// Whether `pattern` applies to `date`.
///
/// Pure and total: no side effects, no errors. Malformed (`Unknown`)
/// patterns fail closed and return false.
pub fn applies(pattern: &RecurrencePattern, date: NaiveDate) -> bool {
    match pattern {
        RecurrencePattern::Daily => true,
        RecurrencePattern::Weekly { days } => days.contains(&DayCode::from(date.weekday())),
        RecurrencePattern::Monthly { day_of_month } => date.day() == *day_of_month,
        RecurrencePattern::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_applies_every_day() {
        let start = day(2024, 2, 26);
        for offset in 0..14 {
            assert!(applies(&RecurrencePattern::Daily, start + Duration::days(offset)));
        }
    }

    #[test]
    fn weekly_empty_days_never_applies() {
        let pattern = RecurrencePattern::Weekly { days: vec![] };
        let start = day(2024, 2, 26);
        for offset in 0..14 {
            assert!(!applies(&pattern, start + Duration::days(offset)));
        }
    }

    #[test]
    fn weekly_matches_configured_weekdays() {
        let pattern = RecurrencePattern::Weekly {
            days: vec![DayCode::Tue, DayCode::Thu],
        };
        assert!(applies(&pattern, day(2024, 3, 5))); // Tuesday
        assert!(applies(&pattern, day(2024, 3, 7))); // Thursday
        assert!(!applies(&pattern, day(2024, 3, 6))); // Wednesday
        assert!(!applies(&pattern, day(2024, 3, 9))); // Saturday
    }

    #[test]
    fn monthly_matches_day_of_month() {
        let pattern = RecurrencePattern::Monthly { day_of_month: 15 };
        assert!(applies(&pattern, day(2024, 3, 15)));
        assert!(applies(&pattern, day(2024, 4, 15)));
        assert!(!applies(&pattern, day(2024, 3, 14)));
    }

    #[test]
    fn monthly_31_skips_short_months() {
        let pattern = RecurrencePattern::Monthly { day_of_month: 31 };
        assert!(applies(&pattern, day(2024, 3, 31)));
        // April has 30 days; the pattern fires on none of them.
        let mut date = day(2024, 4, 1);
        while date.month() == 4 {
            assert!(!applies(&pattern, date));
            date += Duration::days(1);
        }
    }

    #[test]
    fn unknown_pattern_fails_closed() {
        let start = day(2024, 2, 26);
        for offset in 0..14 {
            assert!(!applies(&RecurrencePattern::Unknown, start + Duration::days(offset)));
        }
    }

    #[test]
    fn unrecognized_persisted_pattern_fails_closed() {
        let pattern: RecurrencePattern =
            serde_json::from_str("{\"type\":\"every_other_week\"}").unwrap();
        assert!(!applies(&pattern, day(2024, 3, 5)));
    }
}
