//! The civil-calendar service the week engines are built on.
//!
//! Day arithmetic is done on Rata Die numbers (0001-01-01 Gregorian is day 1).
//! Gregorian dates go through `chrono`, Hijri dates through `icu_calendar`.

use crate::calendars::NativeCalendar;
use crate::consts::{SECONDS_PER_DAY, UNIX_EPOCH_RATA_DIE};
use crate::error::WeekDateError;
use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Timelike,
    Utc,
};
use icu_calendar::islamic::{IslamicCivil, IslamicTabular, IslamicUmmAlQura};
use icu_calendar::{AsCalendar, Date, Iso};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A year/month/day triple in some native calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl CalendarDate {
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}-{:02}-{:02}", self.year.unsigned_abs(), self.month, self.day)
        } else {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        }
    }
}

/// Civil arithmetic for one calendar.
pub trait CivilCalendar {
    /// Day number of `date`.
    ///
    /// # Errors
    /// Returns `WeekDateError::InvalidDate` if the date does not exist.
    fn to_rata_die(&self, date: CalendarDate) -> Result<i64, WeekDateError>;

    /// Date for a day number.
    ///
    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` if the day cannot be represented.
    fn from_rata_die(&self, rata_die: i64) -> Result<CalendarDate, WeekDateError>;

    /// Number of days in `month` of `year`.
    ///
    /// # Errors
    /// Returns `WeekDateError::InvalidDate` if the month does not exist.
    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, WeekDateError>;

    /// ISO day-of-week of `date`, Monday = 1.
    fn day_of_week(&self, date: CalendarDate) -> Result<u8, WeekDateError> {
        Ok(iso_day_of_week(self.to_rata_die(date)?))
    }

    fn add_days(&self, date: CalendarDate, days: i64) -> Result<CalendarDate, WeekDateError> {
        self.from_rata_die(self.to_rata_die(date)? + days)
    }

    /// Signed number of days from `from` to `to`.
    fn days_between(&self, from: CalendarDate, to: CalendarDate) -> Result<i64, WeekDateError> {
        Ok(self.to_rata_die(to)? - self.to_rata_die(from)?)
    }
}

/// ISO day-of-week of a day number; day 1 was a Monday.
pub(crate) fn iso_day_of_week(rata_die: i64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let day = (rata_die - 1).rem_euclid(7) as u8;
    day + 1
}

pub(crate) fn naive_from_rata_die(rata_die: i64) -> Result<NaiveDate, WeekDateError> {
    i32::try_from(rata_die)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(WeekDateError::DateOutOfRange(rata_die))
}

pub(crate) fn rata_die_from_naive(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

#[allow(clippy::cast_possible_truncation)]
fn ymd_of<A: AsCalendar>(date: &Date<A>) -> CalendarDate {
    CalendarDate::new(
        date.year().number,
        date.month().ordinal as u8,
        date.day_of_month().0 as u8,
    )
}

fn invalid_date(calendar: NativeCalendar, date: CalendarDate) -> WeekDateError {
    WeekDateError::InvalidDate {
        calendar,
        year: date.year,
        month: date.month,
        day: date.day,
    }
}

impl NativeCalendar {
    fn hijri_to_iso(self, date: CalendarDate) -> Result<Date<Iso>, WeekDateError> {
        let CalendarDate { year, month, day } = date;
        let iso = match self {
            Self::IslamicUmalqura => {
                Date::try_new_ummalqura_date(year, month, day, IslamicUmmAlQura::new())
                    .map(|d| d.to_iso())
            }
            Self::IslamicCivil => {
                Date::try_new_islamic_civil_date_with_calendar(year, month, day, IslamicCivil::new())
                    .map(|d| d.to_iso())
            }
            Self::IslamicTbla => Date::try_new_islamic_tabular_date_with_calendar(
                year,
                month,
                day,
                IslamicTabular::new(),
            )
            .map(|d| d.to_iso()),
            Self::Iso8601 | Self::Gregorian => Date::try_new_iso_date(year, month, day),
        };
        iso.map_err(|_| invalid_date(self, date))
    }

    fn hijri_from_iso(self, iso: &Date<Iso>) -> CalendarDate {
        match self {
            Self::IslamicUmalqura => ymd_of(&iso.to_calendar(IslamicUmmAlQura::new())),
            Self::IslamicCivil => ymd_of(&iso.to_calendar(IslamicCivil::new())),
            Self::IslamicTbla => ymd_of(&iso.to_calendar(IslamicTabular::new())),
            Self::Iso8601 | Self::Gregorian => ymd_of(iso),
        }
    }
}

impl CivilCalendar for NativeCalendar {
    fn to_rata_die(&self, date: CalendarDate) -> Result<i64, WeekDateError> {
        let naive = match self {
            Self::Iso8601 | Self::Gregorian => NaiveDate::from_ymd_opt(
                date.year,
                u32::from(date.month),
                u32::from(date.day),
            ),
            Self::IslamicUmalqura | Self::IslamicCivil | Self::IslamicTbla => {
                let iso = self.hijri_to_iso(date)?;
                NaiveDate::from_ymd_opt(
                    iso.year().number,
                    iso.month().ordinal,
                    iso.day_of_month().0,
                )
            }
        };
        naive
            .map(rata_die_from_naive)
            .ok_or_else(|| invalid_date(*self, date))
    }

    fn from_rata_die(&self, rata_die: i64) -> Result<CalendarDate, WeekDateError> {
        let naive = naive_from_rata_die(rata_die)?;
        #[allow(clippy::cast_possible_truncation)]
        let gregorian = CalendarDate::new(naive.year(), naive.month() as u8, naive.day() as u8);
        match self {
            Self::Iso8601 | Self::Gregorian => Ok(gregorian),
            Self::IslamicUmalqura | Self::IslamicCivil | Self::IslamicTbla => {
                let iso = Date::try_new_iso_date(gregorian.year, gregorian.month, gregorian.day)
                    .map_err(|_| WeekDateError::DateOutOfRange(rata_die))?;
                Ok(self.hijri_from_iso(&iso))
            }
        }
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, WeekDateError> {
        let first = CalendarDate::new(year, month, 1);
        match self {
            Self::Iso8601 | Self::Gregorian => {
                let start = self.to_rata_die(first)?;
                let next = if month == 12 {
                    CalendarDate::new(year + 1, 1, 1)
                } else {
                    CalendarDate::new(year, month + 1, 1)
                };
                let days = self.to_rata_die(next)? - start;
                u8::try_from(days).map_err(|_| invalid_date(*self, first))
            }
            Self::IslamicUmalqura => {
                Date::try_new_ummalqura_date(year, month, 1, IslamicUmmAlQura::new())
                    .map(|d| d.days_in_month())
                    .map_err(|_| invalid_date(*self, first))
            }
            Self::IslamicCivil => {
                Date::try_new_islamic_civil_date_with_calendar(year, month, 1, IslamicCivil::new())
                    .map(|d| d.days_in_month())
                    .map_err(|_| invalid_date(*self, first))
            }
            Self::IslamicTbla => {
                Date::try_new_islamic_tabular_date_with_calendar(
                    year,
                    month,
                    1,
                    IslamicTabular::new(),
                )
                .map(|d| d.days_in_month())
                .map_err(|_| invalid_date(*self, first))
            }
        }
    }
}

/// Wall-clock time and time zone applied when a week date becomes an instant.
///
/// Without a time the instant is midnight; without a zone it is read as UTC.
#[derive(Debug, Clone)]
pub struct Reference<Tz: TimeZone = Utc> {
    pub time: Option<NaiveTime>,
    pub time_zone: Option<Tz>,
}

impl<Tz: TimeZone> Default for Reference<Tz> {
    fn default() -> Self {
        Self {
            time: None,
            time_zone: None,
        }
    }
}

impl Reference<Utc> {
    /// Midnight UTC
    pub const fn utc() -> Self {
        Self {
            time: None,
            time_zone: None,
        }
    }

    /// A wall-clock time read as UTC
    pub const fn at(time: NaiveTime) -> Self {
        Self {
            time: Some(time),
            time_zone: None,
        }
    }
}

impl<Tz: TimeZone> Reference<Tz> {
    /// Midnight in `time_zone`
    pub const fn in_zone(time_zone: Tz) -> Self {
        Self {
            time: None,
            time_zone: Some(time_zone),
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Converts a day number into an instant, overlaying the wall-clock time and
    /// subtracting the zone's offset at that moment.
    pub(crate) fn instant_for(&self, rata_die: i64) -> Result<DateTime<Utc>, WeekDateError> {
        let mut seconds = (rata_die - UNIX_EPOCH_RATA_DIE) * SECONDS_PER_DAY;
        let mut nanos = 0;
        if let Some(time) = self.time {
            seconds += i64::from(time.num_seconds_from_midnight());
            nanos = time.nanosecond();
        }
        if let Some(zone) = &self.time_zone {
            let wall = DateTime::from_timestamp(seconds, nanos)
                .ok_or(WeekDateError::DateOutOfRange(rata_die))?
                .naive_utc();
            let offset = zone.offset_from_utc_datetime(&wall).fix().local_minus_utc();
            seconds -= i64::from(offset);
        }
        DateTime::from_timestamp(seconds, nanos).ok_or(WeekDateError::DateOutOfRange(rata_die))
    }

    /// Converts a day number into an instant by resolving its local wall clock
    /// in the zone.
    ///
    /// A repeated wall clock takes the earlier instant. A skipped one is read
    /// with the offset in force before the transition, so it lands after it.
    pub(crate) fn local_instant_for(&self, rata_die: i64) -> Result<DateTime<Utc>, WeekDateError> {
        let Some(zone) = &self.time_zone else {
            return self.instant_for(rata_die);
        };
        let wall = naive_from_rata_die(rata_die)?.and_time(self.time.unwrap_or(NaiveTime::MIN));
        resolve_local(zone, wall).ok_or(WeekDateError::DateOutOfRange(rata_die))
    }
}

/// The instant a local wall clock names in `zone`.
fn resolve_local<Tz: TimeZone>(zone: &Tz, wall: NaiveDateTime) -> Option<DateTime<Utc>> {
    if let Some(local) = zone.from_local_datetime(&wall).earliest() {
        return Some(local.with_timezone(&Utc));
    }
    let before = wall.checked_sub_signed(TimeDelta::days(1))?;
    let offset = zone.offset_from_utc_datetime(&before).fix().local_minus_utc();
    wall.checked_sub_signed(TimeDelta::seconds(i64::from(offset)))
        .map(|utc| utc.and_utc())
}
