//! Civil dates that carry a week calendar.
//!
//! `PlainDate` is a day in some calendar, `PlainDateTime` adds a wall-clock
//! time and `ZonedDateTime` is an instant viewed in a time zone. Each one
//! reaches the week-date capabilities of its [`CalendarAdapter`].

use crate::WeekDate;
use crate::adapter::{CalendarAdapter, WeekCalendar};
use crate::calendars::{CalendarId, NativeCalendar};
use crate::civil::{CalendarDate, CivilCalendar, Reference, naive_from_rata_die, rata_die_from_naive};
use crate::consts::{CALENDAR_TAG_KEY, TAG_CLOSE, TAG_OPEN};
use crate::error::WeekDateError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt;

/// A calendar date with the week calendar used to number its weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainDate {
    date: CalendarDate,
    rata_die: i64,
    calendar: CalendarAdapter,
}

impl PlainDate {
    /// Creates a date from fields of the calendar's native super calendar.
    ///
    /// # Errors
    /// Returns `WeekDateError::InvalidDate` if the date does not exist.
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        calendar: CalendarAdapter,
    ) -> Result<Self, WeekDateError> {
        let date = CalendarDate::new(year, month, day);
        let rata_die = calendar.native().to_rata_die(date)?;
        Ok(Self {
            date,
            rata_die,
            calendar,
        })
    }

    /// Creates a date from a proleptic Gregorian date.
    ///
    /// # Errors
    /// Returns a range error if the day cannot be expressed in `calendar`.
    pub fn from_naive(date: NaiveDate, calendar: CalendarAdapter) -> Result<Self, WeekDateError> {
        Self::from_rata_die(rata_die_from_naive(date), calendar)
    }

    pub(crate) fn from_rata_die(
        rata_die: i64,
        calendar: CalendarAdapter,
    ) -> Result<Self, WeekDateError> {
        Ok(Self {
            date: calendar.native().from_rata_die(rata_die)?,
            rata_die,
            calendar,
        })
    }

    pub const fn year(&self) -> i32 {
        self.date.year
    }

    pub const fn month(&self) -> u8 {
        self.date.month
    }

    pub const fn day(&self) -> u8 {
        self.date.day
    }

    pub const fn calendar_date(&self) -> CalendarDate {
        self.date
    }

    pub const fn calendar(&self) -> CalendarAdapter {
        self.calendar
    }

    pub const fn calendar_id(&self) -> CalendarId {
        self.calendar.id()
    }

    /// Day number, 0001-01-01 Gregorian being day 1
    pub const fn rata_die(&self) -> i64 {
        self.rata_die
    }

    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` outside chrono's range.
    pub fn to_naive_date(&self) -> Result<NaiveDate, WeekDateError> {
        naive_from_rata_die(self.rata_die)
    }

    /// The same day as fields of `calendar`.
    ///
    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` if `calendar` cannot express the day.
    pub fn date_in(&self, calendar: NativeCalendar) -> Result<CalendarDate, WeekDateError> {
        if calendar == self.calendar.native() {
            return Ok(self.date);
        }
        calendar.from_rata_die(self.rata_die)
    }

    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` if the result cannot be represented.
    pub fn add_days(&self, days: i64) -> Result<Self, WeekDateError> {
        Self::from_rata_die(self.rata_die + days, self.calendar)
    }

    /// The same day attached to another calendar.
    ///
    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` if `calendar` cannot express the day.
    pub fn with_calendar(&self, calendar: CalendarAdapter) -> Result<Self, WeekDateError> {
        if calendar == self.calendar {
            return Ok(*self);
        }
        Self::from_rata_die(self.rata_die, calendar)
    }

    /// # Errors
    /// Propagates errors from the civil calendar.
    pub fn days_in_month(&self) -> Result<u8, WeekDateError> {
        self.calendar
            .native()
            .days_in_month(self.date.year, self.date.month)
    }

    /// # Errors
    /// Returns a range error if the year-of-week leaves -9999..=9999.
    pub fn week_date(&self) -> Result<WeekDate, WeekDateError> {
        self.calendar.week_date(self)
    }

    /// # Errors
    /// See [`PlainDate::week_date`].
    pub fn year_of_week(&self) -> Result<i32, WeekDateError> {
        self.calendar.year_of_week(self)
    }

    /// # Errors
    /// See [`PlainDate::week_date`].
    pub fn week_of_year(&self) -> Result<u8, WeekDateError> {
        self.calendar.week_of_year(self)
    }

    /// # Errors
    /// See [`PlainDate::week_date`].
    pub fn day_of_week(&self) -> Result<u8, WeekDateError> {
        self.calendar.day_of_week(self)
    }

    /// # Errors
    /// See [`PlainDate::week_date`].
    pub fn weeks_in_year(&self) -> Result<u8, WeekDateError> {
        self.calendar.weeks_in_year(self)
    }

    /// Attaches a wall-clock time, midnight when `None`.
    pub fn to_plain_date_time(&self, time: Option<NaiveTime>) -> PlainDateTime {
        PlainDateTime {
            date: *self,
            time: time.unwrap_or(NaiveTime::MIN),
        }
    }

    /// The instant this date starts (or reaches `time`) in `time_zone`.
    ///
    /// The wall clock is resolved in the zone: a repeated time takes the
    /// earlier instant and a skipped one lands after the transition.
    ///
    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` outside chrono's range.
    pub fn to_zoned<Tz: TimeZone>(
        &self,
        time_zone: &Tz,
        time: Option<NaiveTime>,
    ) -> Result<ZonedDateTime<Tz>, WeekDateError> {
        let reference = Reference {
            time,
            time_zone: Some(time_zone.clone()),
        };
        let instant = reference.local_instant_for(self.rata_die)?;
        Ok(ZonedDateTime::new(
            instant.with_timezone(time_zone),
            self.calendar,
        ))
    }
}

fn write_calendar_tag(f: &mut fmt::Formatter<'_>, calendar: CalendarAdapter) -> fmt::Result {
    match calendar.native() {
        NativeCalendar::Iso8601 => Ok(()),
        native => write!(f, "{TAG_OPEN}{CALENDAR_TAG_KEY}{native}{TAG_CLOSE}"),
    }
}

impl fmt::Display for PlainDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date)?;
        write_calendar_tag(f, self.calendar)
    }
}

/// A calendar date and a wall-clock time, without a time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainDateTime {
    date: PlainDate,
    time: NaiveTime,
}

impl PlainDateTime {
    pub const fn new(date: PlainDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    pub const fn date(&self) -> PlainDate {
        self.date
    }

    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` outside chrono's range.
    pub fn to_zoned<Tz: TimeZone>(&self, time_zone: &Tz) -> Result<ZonedDateTime<Tz>, WeekDateError> {
        self.date.to_zoned(time_zone, Some(self.time))
    }

    /// # Errors
    /// See [`PlainDate::week_date`].
    pub fn week_date(&self) -> Result<WeekDate, WeekDateError> {
        self.date.week_date()
    }
}

impl fmt::Display for PlainDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date.date, self.time)?;
        write_calendar_tag(f, self.date.calendar)
    }
}

/// An instant seen in a time zone, numbered by a week calendar.
#[derive(Debug, Clone)]
pub struct ZonedDateTime<Tz: TimeZone> {
    instant: DateTime<Tz>,
    calendar: CalendarAdapter,
}

impl<Tz: TimeZone> ZonedDateTime<Tz> {
    pub const fn new(instant: DateTime<Tz>, calendar: CalendarAdapter) -> Self {
        Self { instant, calendar }
    }

    pub const fn instant(&self) -> &DateTime<Tz> {
        &self.instant
    }

    pub fn to_instant(&self) -> DateTime<Utc> {
        self.instant.with_timezone(&Utc)
    }

    pub const fn calendar(&self) -> CalendarAdapter {
        self.calendar
    }

    /// The local calendar date in this zone.
    ///
    /// # Errors
    /// Returns a range error if the day cannot be expressed in the calendar.
    pub fn to_plain_date(&self) -> Result<PlainDate, WeekDateError> {
        PlainDate::from_naive(self.instant.date_naive(), self.calendar)
    }

    /// # Errors
    /// See [`ZonedDateTime::to_plain_date`].
    pub fn to_plain_date_time(&self) -> Result<PlainDateTime, WeekDateError> {
        let date = self.to_plain_date()?;
        Ok(PlainDateTime::new(date, self.instant.time()))
    }

    /// Week date of the local calendar date.
    ///
    /// # Errors
    /// See [`ZonedDateTime::to_plain_date`].
    pub fn week_date(&self) -> Result<WeekDate, WeekDateError> {
        self.to_plain_date()?.week_date()
    }
}

impl Copy for ZonedDateTime<FixedOffset> {}

impl<Tz: TimeZone> PartialEq for ZonedDateTime<Tz> {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant && self.calendar == other.calendar
    }
}
