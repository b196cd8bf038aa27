//! ISO-8601 week numbering with a configurable first day of the week.
//!
//! Week 1 is the week containing the 4th of January, equivalently the first
//! week whose pivot (4th) day falls in the new year. With the default Monday
//! start this is plain ISO-8601; other start days shift the week boundaries
//! but keep the pivot rule.

use crate::calendars::NativeCalendar;
use crate::civil::{CalendarDate, CivilCalendar, Reference};
use crate::consts::{
    DAYS_IN_WEEK, FIRST_WEEK_ANCHOR_DAY, MAX_YEAR, MIN_DAY, MIN_WEEK, MIN_YEAR, PIVOT_DAY,
    YEAR_END_PIVOT_SHIFT,
};
use crate::error::{Field, WeekDateError, check_range};
use crate::parse::parse_week_date;
use crate::types::{DayNumber, Scale};
use crate::weekdays::rotate_day_number;
use crate::WeekDate;
use chrono::{DateTime, TimeZone, Utc};
use tracing::trace;

/// Weekday of a proleptic Gregorian date by Zeller's congruence, Monday = 0.
pub(crate) fn zeller_weekday(year: i32, month: u8, day: u8) -> u8 {
    let (y, m) = if month <= 2 {
        (i64::from(year) - 1, i64::from(month) + 12)
    } else {
        (i64::from(year), i64::from(month))
    };
    let h = (i64::from(day) + (13 * (m + 1)) / 5 + y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400))
    .rem_euclid(7);
    // Zeller counts from Saturday
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let monday_based = ((h + 5) % 7) as u8;
    monday_based
}

/// Day number of January 1st of `year`.
pub(crate) fn rata_die_of_year_start(year: i32) -> i64 {
    let y = i64::from(year) - 1;
    365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) + 1
}

fn validate_start(week_start_day: u8) -> Result<DayNumber, WeekDateError> {
    DayNumber::new(week_start_day, Field::WeekStartDay)
}

/// Number of weeks (52 or 53) in the ISO week-numbering `year` when weeks
/// start on `week_start_day`.
///
/// # Errors
/// Returns a range error for a year outside -9999..=9999 or a start day outside 1..=7.
pub fn weeks_in_iso_year(year: i32, week_start_day: u8) -> Result<u8, WeekDateError> {
    check_range(Field::Year, year, MIN_YEAR, MAX_YEAR)?;
    let start = validate_start(week_start_day)?;

    let days_in_year = rata_die_of_year_start(year + 1) - rata_die_of_year_start(year);
    // The last pivot day of the year lies within three days of Dec 28
    let anchor_ordinal = days_in_year - YEAR_END_PIVOT_SHIFT;
    let iso_day = zeller_weekday(year, 12, 28) + 1;
    let day = rotate_day_number(iso_day, start.get())?;

    let pivot_ordinal = anchor_ordinal + i64::from(PIVOT_DAY) - i64::from(day);
    let weeks = (pivot_ordinal + i64::from(DAYS_IN_WEEK) - 1) / i64::from(DAYS_IN_WEEK);
    u8::try_from(weeks).map_err(|_| WeekDateError::DateOutOfRange(pivot_ordinal))
}

/// Day number of the given week date, after validating each component.
pub(crate) fn iso_week_rata_die(
    year: i32,
    week: u8,
    day: u8,
    week_start_day: u8,
) -> Result<i64, WeekDateError> {
    check_range(Field::Day, day, MIN_DAY, DAYS_IN_WEEK)?;
    check_range(Field::Year, year, MIN_YEAR, MAX_YEAR)?;
    let start = validate_start(week_start_day)?;
    let weeks = weeks_in_iso_year(year, start.get())?;
    check_range(Field::Week, week, MIN_WEEK, weeks)?;

    let jan4 = zeller_weekday(year, 1, FIRST_WEEK_ANCHOR_DAY);
    let shift = (i64::from(jan4) - i64::from(start.get() - 1)).rem_euclid(7);
    let first_week_ordinal = i64::from(FIRST_WEEK_ANCHOR_DAY) - shift;
    let ordinal =
        first_week_ordinal + i64::from(week - 1) * i64::from(DAYS_IN_WEEK) + i64::from(day - 1);
    let rata_die = rata_die_of_year_start(year) + ordinal - 1;
    trace!(year, week, day, week_start_day, first_week_ordinal, rata_die, "iso week resolved");
    Ok(rata_die)
}

/// Instant at which the ISO week date begins, adjusted by `reference`.
///
/// # Errors
/// Returns a range error naming the first invalid component.
pub fn instant_from_iso_week<Tz: TimeZone>(
    year: i32,
    week: u8,
    day: u8,
    week_start_day: u8,
    reference: &Reference<Tz>,
) -> Result<DateTime<Utc>, WeekDateError> {
    let rata_die = iso_week_rata_die(year, week, day, week_start_day)?;
    reference.instant_for(rata_die)
}

/// Parses a week-date string of the Gregorian scale and returns its instant.
///
/// # Errors
/// Returns a format error for malformed text and `ScaleMismatch` for a Hijri calendar tag.
pub fn instant_from_iso_week_string<Tz: TimeZone>(
    text: &str,
    reference: &Reference<Tz>,
) -> Result<DateTime<Utc>, WeekDateError> {
    let parts = parse_week_date(text)?;
    if parts.calendar.scale() != Scale::Gregorian {
        return Err(WeekDateError::ScaleMismatch {
            calendar: parts.calendar,
            scale: Scale::Gregorian,
        });
    }
    instant_from_iso_week(
        parts.year_of_week,
        parts.week_of_year,
        parts.day_of_week,
        parts.week_start_day,
        reference,
    )
}

/// Year and week of the week containing `date`, whose day-of-week is `day`.
/// The week belongs to the year of its pivot day.
pub(crate) fn week_of_pivot<C: CivilCalendar>(
    calendar: &C,
    date: CalendarDate,
    day: u8,
) -> Result<(i32, u8), WeekDateError> {
    let pivot = calendar.add_days(date, i64::from(PIVOT_DAY) - i64::from(day))?;
    let since_year_start = calendar.days_between(CalendarDate::new(pivot.year, 1, 1), pivot)?;
    let week = (since_year_start + i64::from(DAYS_IN_WEEK)) / i64::from(DAYS_IN_WEEK);
    let week = u8::try_from(week).map_err(|_| WeekDateError::DateOutOfRange(week))?;
    Ok((pivot.year, week))
}

/// Week date of a civil `date` in a Gregorian-scale calendar.
///
/// # Errors
/// Returns `ScaleMismatch` for a Hijri calendar, or a range error if the
/// resulting year-of-week leaves -9999..=9999.
pub fn iso_week_date(
    date: CalendarDate,
    calendar: NativeCalendar,
    week_start_day: u8,
) -> Result<WeekDate, WeekDateError> {
    if calendar.scale() != Scale::Gregorian {
        return Err(WeekDateError::ScaleMismatch {
            calendar: calendar.into(),
            scale: Scale::Gregorian,
        });
    }
    let start = validate_start(week_start_day)?;
    let day = rotate_day_number(calendar.day_of_week(date)?, start.get())?;
    let (year, week) = week_of_pivot(&calendar, date, day)?;
    WeekDate::new(year, week, day, calendar.into(), Some(start.get()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::utc;
    use chrono::NaiveTime;

    fn midnight(year: i32, week: u8, day: u8, start: u8) -> DateTime<Utc> {
        instant_from_iso_week(year, week, day, start, &Reference::utc()).unwrap()
    }

    #[test]
    fn test_zeller_weekday() {
        assert_eq!(zeller_weekday(2021, 1, 4), 0);
        assert_eq!(zeller_weekday(2023, 12, 31), 6);
        assert_eq!(zeller_weekday(2000, 2, 29), 1);
        // 0001-01-01 proleptic Gregorian was a Monday
        assert_eq!(zeller_weekday(1, 1, 1), 0);
        // Negative years use floor division
        assert_eq!(
            zeller_weekday(-1, 3, 1),
            crate::civil::iso_day_of_week(
                NativeCalendar::Iso8601
                    .to_rata_die(CalendarDate::new(-1, 3, 1))
                    .unwrap()
            ) - 1
        );
    }

    #[test]
    fn test_year_start_matches_civil_service() {
        for year in [-9999, -1, 0, 1, 1600, 1900, 1970, 2000, 2021, 9999] {
            assert_eq!(
                rata_die_of_year_start(year),
                NativeCalendar::Iso8601
                    .to_rata_die(CalendarDate::new(year, 1, 1))
                    .unwrap(),
                "year {year}"
            );
        }
    }

    #[test]
    fn test_first_week_instants() {
        struct TestCase {
            year: i32,
            expected: (i32, u32, u32),
        }

        let cases = [
            TestCase {
                year: 2021,
                expected: (2021, 1, 4),
            },
            TestCase {
                year: 2024,
                expected: (2024, 1, 1),
            },
            TestCase {
                year: 2023,
                expected: (2023, 1, 2),
            },
            TestCase {
                year: 2019,
                expected: (2018, 12, 31),
            },
            TestCase {
                year: 1980,
                expected: (1979, 12, 31),
            },
            TestCase {
                year: 2008,
                expected: (2007, 12, 31),
            },
            TestCase {
                year: 2009,
                expected: (2008, 12, 29),
            },
            TestCase {
                year: 2010,
                expected: (2010, 1, 4),
            },
        ];

        for case in &cases {
            let (y, m, d) = case.expected;
            assert_eq!(midnight(case.year, 1, 1, 1), utc(y, m, d, 0, 0, 0), "{}-W01-1", case.year);
        }
    }

    #[test]
    fn test_year_end_instants() {
        let cases = [
            ((2023, 52, 7), (2023, 12, 31)),
            ((1981, 53, 4), (1981, 12, 31)),
            ((1981, 53, 5), (1982, 1, 1)),
            ((1981, 53, 7), (1982, 1, 3)),
            ((1976, 53, 6), (1977, 1, 1)),
            ((2022, 52, 7), (2023, 1, 1)),
            ((2004, 53, 6), (2005, 1, 1)),
            ((2009, 53, 7), (2010, 1, 3)),
            ((2022, 26, 4), (2022, 6, 30)),
            ((2020, 9, 6), (2020, 2, 29)),
            ((1980, 52, 7), (1980, 12, 28)),
        ];

        for ((year, week, day), (y, m, d)) in cases {
            assert_eq!(
                midnight(year, week, day, 1),
                utc(y, m, d, 0, 0, 0),
                "{year}-W{week:02}-{day}"
            );
        }
    }

    #[test]
    fn test_first_week_by_start_day() {
        // 2021-W01-1 for each start day, Monday = 1
        let expected = [
            (1, (2021, 1, 4)),
            (2, (2020, 12, 29)),
            (3, (2020, 12, 30)),
            (4, (2020, 12, 31)),
            (5, (2021, 1, 1)),
            (6, (2021, 1, 2)),
            (7, (2021, 1, 3)),
        ];
        for (start, (y, m, d)) in expected {
            assert_eq!(midnight(2021, 1, 1, start), utc(y, m, d, 0, 0, 0), "start {start}");
        }
    }

    #[test]
    fn test_last_weeks_by_start_day() {
        assert_eq!(midnight(2021, 53, 1, 2), utc(2021, 12, 28, 0, 0, 0));
        let expected = [
            (3, 22),
            (4, 23),
            (5, 24),
            (6, 25),
            (7, 26),
        ];
        for (start, day) in expected {
            assert_eq!(midnight(2021, 52, 1, start), utc(2021, 12, day, 0, 0, 0), "start {start}");
        }
    }

    #[test]
    fn test_weeks_in_iso_year() {
        let cases = [
            (1976, 53),
            (1980, 52),
            (1981, 53),
            (2008, 52),
            (2009, 53),
            (2020, 53),
            (2021, 52),
            (2023, 52),
        ];
        for (year, weeks) in cases {
            assert_eq!(weeks_in_iso_year(year, 1).unwrap(), weeks, "year {year}");
        }
    }

    #[test]
    fn test_weeks_in_iso_year_by_start_day() {
        assert_eq!(weeks_in_iso_year(2021, 2).unwrap(), 53);
        for start in 3..=7 {
            assert_eq!(weeks_in_iso_year(2021, start).unwrap(), 52, "start {start}");
        }
    }

    #[test]
    fn test_weeks_in_year_is_52_or_53() {
        for year in (-9999..=9999).step_by(37) {
            for start in 1..=7 {
                let weeks = weeks_in_iso_year(year, start).unwrap();
                assert!(weeks == 52 || weeks == 53, "{year} start {start}: {weeks}");
            }
        }
    }

    #[test]
    fn test_validation_order() {
        let err = instant_from_iso_week(10000, 60, 0, 9, &Reference::utc()).unwrap_err();
        assert!(matches!(err, WeekDateError::OutOfRange { field: Field::Day, .. }));
        let err = instant_from_iso_week(10000, 60, 1, 9, &Reference::utc()).unwrap_err();
        assert!(matches!(err, WeekDateError::OutOfRange { field: Field::Year, .. }));
        let err = instant_from_iso_week(2021, 60, 1, 9, &Reference::utc()).unwrap_err();
        assert!(matches!(
            err,
            WeekDateError::OutOfRange {
                field: Field::WeekStartDay,
                ..
            }
        ));
        let err = instant_from_iso_week(2021, 53, 1, 1, &Reference::utc()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid week: 53 must be >= 1 and <= 52");
    }

    #[test]
    fn test_reference_time() {
        let time = NaiveTime::from_hms_opt(12, 30, 45).unwrap();
        let instant = instant_from_iso_week(2021, 1, 1, 1, &Reference::at(time)).unwrap();
        assert_eq!(instant, utc(2021, 1, 4, 12, 30, 45));
    }

    #[test]
    fn test_inverse_round_trip() {
        let calendar = NativeCalendar::Iso8601;
        for start in 1..=7 {
            for year in [1976, 1981, 2004, 2020, 2021, 2024] {
                let weeks = weeks_in_iso_year(year, start).unwrap();
                for week in [1, 2, 26, weeks - 1, weeks] {
                    for day in 1..=7 {
                        let rata_die = iso_week_rata_die(year, week, day, start).unwrap();
                        let date = calendar.from_rata_die(rata_die).unwrap();
                        let back = iso_week_date(date, calendar, start).unwrap();
                        assert_eq!(
                            (back.year_of_week(), back.week_of_year(), back.day_of_week()),
                            (year, week, day),
                            "{year}-W{week:02}-{day} start {start}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_inverse_of_dates() {
        let calendar = NativeCalendar::Gregorian;
        let date = iso_week_date(CalendarDate::new(2021, 1, 1), calendar, 1).unwrap();
        assert_eq!(
            (date.year_of_week(), date.week_of_year(), date.day_of_week()),
            (2020, 53, 5)
        );
        assert_eq!(date.calendar(), crate::CalendarId::Gregorian);

        let date = iso_week_date(CalendarDate::new(2021, 1, 1), calendar, 5).unwrap();
        assert_eq!(
            (date.year_of_week(), date.week_of_year(), date.day_of_week()),
            (2021, 1, 1)
        );
    }

    #[test]
    fn test_rejects_hijri_calendar() {
        let err = iso_week_date(CalendarDate::new(1444, 1, 1), NativeCalendar::IslamicCivil, 1)
            .unwrap_err();
        assert!(matches!(err, WeekDateError::ScaleMismatch { .. }));
    }

    #[test]
    fn test_instant_from_string() {
        let instant = instant_from_iso_week_string("2021-W01-1[SA]", &Reference::utc()).unwrap();
        assert_eq!(instant, utc(2021, 1, 2, 0, 0, 0));
        let instant =
            instant_from_iso_week_string("2021W011[u-ca=gregorian]", &Reference::utc()).unwrap();
        assert_eq!(instant, utc(2021, 1, 4, 0, 0, 0));
        let err = instant_from_iso_week_string("1442-W01-1[u-ca=islamic-civil]", &Reference::utc())
            .unwrap_err();
        assert!(matches!(err, WeekDateError::ScaleMismatch { .. }));
    }
}
