mod adapter;
mod calendars;
mod civil;
mod consts;
mod date;
mod error;
mod hijri;
mod iso;
mod options;
mod parse;
mod prelude;
mod types;
mod weekdays;

pub use adapter::{CalendarAdapter, WeekCalendar};
pub use calendars::{
    CalendarId, NativeCalendar, calendar_for, calendar_from_id, calendar_super_id,
    is_supported_calendar, scale_of, weeks_in_year,
};
pub use civil::{CalendarDate, CivilCalendar, Reference};
pub use consts::*;
pub use date::{PlainDate, PlainDateTime, ZonedDateTime};
pub use error::{ErrorKind, Field, ParseError, WeekDateError};
pub use hijri::{
    hijri_week_date, instant_from_hijri_week, instant_from_hijri_week_string,
    weeks_in_hijri_year,
};
pub use iso::{instant_from_iso_week, instant_from_iso_week_string, iso_week_date, weeks_in_iso_year};
pub use options::{FromOptions, ToStringOptions, Visibility};
pub use parse::{WeekDateParts, parse_week_date, parse_week_date_with};
pub use types::{DayNumber, Scale, WeekOfYear, YearOfWeek};
pub use weekdays::{
    HWC_DAY_CODES, HWC_DAY_NAMES, HwcWeekDay, ISO_DAY_CODES, ISO_DAY_NAMES, IsoWeekDay,
    canonical_day_number, hwc_day_to_iso_day, iso_day_to_hwc_day, rotate_day_number,
    week_day_code, week_day_code_number, week_day_name, week_day_number,
};

use crate::prelude::*;
use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tracing::debug;

/// A validated week date: year-of-week, week-of-year and day-of-week in a
/// calendar whose weeks start on a given day.
///
/// Values are immutable; re-deriving for another calendar or start day
/// returns a new value computed from the underlying civil date. Equality and
/// hashing ignore the attached format options.
#[derive(Debug, Clone, Copy)]
pub struct WeekDate {
    year_of_week: YearOfWeek,
    week_of_year: WeekOfYear,
    day_of_week: DayNumber,
    calendar: CalendarId,
    week_start_day: DayNumber,
    format: ToStringOptions,
}

/// Plain structural form of a week date.
///
/// A missing calendar means `iso8601`; a missing start day means the scale's
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekDateFields {
    pub year_of_week: i32,
    pub week_of_year: u8,
    pub day_of_week: u8,
    #[serde(default)]
    pub calendar: Option<CalendarId>,
    #[serde(default)]
    pub week_start_day: Option<u8>,
}

/// Anything a week date can be built from.
#[derive(Debug, Clone, Copy, From)]
pub enum WeekDateSource<'a> {
    /// Week-date text such as `2021-W01-1[SA]`
    Text(&'a str),
    /// A civil date, numbered by its own calendar
    Civil(PlainDate),
    /// The date part of a civil date-time
    DateTime(PlainDateTime),
    /// The local date of a zoned date-time
    #[from(ignore)]
    Zoned(ZonedDateTime<FixedOffset>),
    WeekDate(WeekDate),
    Fields(WeekDateFields),
}

impl<Tz: TimeZone> From<ZonedDateTime<Tz>> for WeekDateSource<'_> {
    fn from(zoned: ZonedDateTime<Tz>) -> Self {
        Self::Zoned(ZonedDateTime::new(zoned.instant().fixed_offset(), zoned.calendar()))
    }
}

impl WeekDate {
    /// Creates a new week date, defaulting the start day to the scale's first day.
    ///
    /// # Errors
    /// Returns a range error naming the first component out of bounds: the
    /// year (-9999..=9999), the week (scale maximum, then the year's actual
    /// week count), the day or the start day (1..=7).
    pub fn new(
        year_of_week: i32,
        week_of_year: u8,
        day_of_week: u8,
        calendar: CalendarId,
        week_start_day: Option<u8>,
    ) -> Result<Self, WeekDateError> {
        let scale = calendar.scale();
        let year = YearOfWeek::new(year_of_week)?;
        let week = WeekOfYear::new(week_of_year, scale)?;
        let day = DayNumber::new(day_of_week, Field::Day)?;
        let start = DayNumber::new(
            week_start_day.unwrap_or_else(|| scale.default_week_start_day()),
            Field::WeekStartDay,
        )?;

        let weeks = weeks_in_year(year.get(), calendar, start.get())?;
        if week.get() > weeks {
            return Err(WeekDateError::OutOfRange {
                field: Field::Week,
                value: week.get().into(),
                min: MIN_WEEK.into(),
                max: weeks.into(),
            });
        }

        Ok(Self {
            year_of_week: year,
            week_of_year: week,
            day_of_week: day,
            calendar,
            week_start_day: start,
            format: ToStringOptions::default(),
        })
    }

    /// ISO-8601 week date with weeks starting on Monday
    ///
    /// # Errors
    /// See [`WeekDate::new`].
    pub fn iso(year_of_week: i32, week_of_year: u8, day_of_week: u8) -> Result<Self, WeekDateError> {
        Self::new(year_of_week, week_of_year, day_of_week, CalendarId::Iso8601, None)
    }

    /// Attaches the options used by `Display`.
    #[must_use]
    pub const fn with_format(mut self, format: ToStringOptions) -> Self {
        self.format = format;
        self
    }

    pub const fn year_of_week(&self) -> i32 {
        self.year_of_week.get()
    }

    pub const fn week_of_year(&self) -> u8 {
        self.week_of_year.get()
    }

    pub const fn day_of_week(&self) -> u8 {
        self.day_of_week.get()
    }

    pub const fn calendar(&self) -> CalendarId {
        self.calendar
    }

    pub const fn week_start_day(&self) -> u8 {
        self.week_start_day.get()
    }

    pub const fn scale(&self) -> Scale {
        self.calendar.scale()
    }

    pub const fn format_options(&self) -> ToStringOptions {
        self.format
    }

    pub const fn calendar_adapter(&self) -> CalendarAdapter {
        CalendarAdapter::from_parts(self.calendar, self.week_start_day)
    }

    pub const fn fields(&self) -> WeekDateFields {
        WeekDateFields {
            year_of_week: self.year_of_week(),
            week_of_year: self.week_of_year(),
            day_of_week: self.day_of_week(),
            calendar: Some(self.calendar),
            week_start_day: Some(self.week_start_day()),
        }
    }

    /// Name of the day, e.g. `Monday`
    pub const fn day_name(&self) -> &'static str {
        weekdays::day_name_of(self.day_of_week, self.scale(), self.week_start_day)
    }

    /// Two-letter code of the day, e.g. `MO`
    pub const fn day_code(&self) -> &'static str {
        weekdays::day_code_of(self.day_of_week, self.scale(), self.week_start_day)
    }

    /// Code of the day the weeks start on, as written in the start-day tag.
    pub const fn week_start_day_code(&self) -> &'static str {
        weekdays::day_code_of(self.week_start_day, self.scale(), DayNumber::FIRST)
    }

    /// Number of weeks in this date's week-numbering year.
    ///
    /// # Errors
    /// Propagates errors from the week engines.
    pub fn weeks_in_year(&self) -> Result<u8, WeekDateError> {
        weeks_in_year(self.year_of_week(), self.calendar, self.week_start_day())
    }

    /// Long form `yyyy-Www-d` (or `yyyy-Www`) with tags per `options`.
    pub fn to_string_with(&self, options: &ToStringOptions) -> String {
        Formatted {
            date: self,
            options,
            compact: false,
        }
        .to_string()
    }

    /// Compact form `yyyyWwwd` (or `yyyyWww`) with tags per `options`.
    pub fn to_string_compact(&self, options: &ToStringOptions) -> String {
        Formatted {
            date: self,
            options,
            compact: true,
        }
        .to_string()
    }

    fn rata_die(&self) -> Result<i64, WeekDateError> {
        let (year, week, day, start) = (
            self.year_of_week(),
            self.week_of_year(),
            self.day_of_week(),
            self.week_start_day(),
        );
        match self.scale() {
            Scale::Gregorian => iso::iso_week_rata_die(year, week, day, start),
            Scale::Hijri => {
                hijri::hijri_week_rata_die(year, week, day, self.calendar.native(), start)
            }
        }
    }

    /// The instant this week date starts, adjusted by `reference`.
    ///
    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` outside chrono's range.
    pub fn to_instant<Tz: TimeZone>(
        &self,
        reference: &Reference<Tz>,
    ) -> Result<DateTime<Utc>, WeekDateError> {
        let rata_die = self.rata_die()?;
        match self.scale() {
            Scale::Gregorian => reference.instant_for(rata_die),
            Scale::Hijri => reference.local_instant_for(rata_die),
        }
    }

    /// The civil date, attached to this date's calendar and start day.
    ///
    /// # Errors
    /// Returns a range error if the day cannot be represented.
    pub fn to_plain_date(&self) -> Result<PlainDate, WeekDateError> {
        PlainDate::from_rata_die(self.rata_die()?, self.calendar_adapter())
    }

    /// # Errors
    /// See [`WeekDate::to_plain_date`].
    pub fn to_plain_date_time(&self, time: Option<NaiveTime>) -> Result<PlainDateTime, WeekDateError> {
        Ok(self.to_plain_date()?.to_plain_date_time(time))
    }

    /// The instant this date starts in UTC, viewed in `time_zone`.
    ///
    /// # Errors
    /// Returns `WeekDateError::DateOutOfRange` outside chrono's range.
    pub fn to_zoned_date_time<Tz: TimeZone>(
        &self,
        time_zone: &Tz,
    ) -> Result<ZonedDateTime<Tz>, WeekDateError> {
        let instant = self.to_instant(&Reference::utc())?;
        Ok(ZonedDateTime::new(
            instant.with_timezone(time_zone),
            self.calendar_adapter(),
        ))
    }

    /// Re-derives this date in `calendar` with weeks starting on
    /// `week_start_day`.
    ///
    /// Without a start day the current one is kept when the scale does not
    /// change, and the new scale's default is used when it does.
    ///
    /// # Errors
    /// Returns a range error for an invalid start day or if the civil date
    /// cannot be expressed in `calendar`.
    pub fn with_calendar(
        &self,
        calendar: CalendarId,
        week_start_day: Option<u8>,
    ) -> Result<Self, WeekDateError> {
        let start = match week_start_day {
            Some(start) => start,
            None if calendar.scale() == self.scale() => self.week_start_day(),
            None => calendar.scale().default_week_start_day(),
        };
        if calendar == self.calendar && start == self.week_start_day() {
            return Ok(*self);
        }

        let adapter = CalendarAdapter::new(calendar, Some(start))?;
        let date = self.to_plain_date()?;
        let derived = adapter.week_date_of(date.date_in(adapter.native())?)?;
        debug!(from = %self, to = %derived, "re-derived week date");
        Ok(derived.with_format(self.format))
    }

    /// Re-derives this date with weeks starting on `week_start_day`.
    ///
    /// # Errors
    /// See [`WeekDate::with_calendar`].
    pub fn with_week_start_day(&self, week_start_day: u8) -> Result<Self, WeekDateError> {
        self.with_calendar(self.calendar, Some(week_start_day))
    }

    /// Builds a week date from any [`WeekDateSource`], then converts it into
    /// the calendar and start day requested by `options`.
    ///
    /// # Errors
    /// Returns the parse, range or calendar error of the source or the conversion.
    pub fn from_source<'a>(
        source: impl Into<WeekDateSource<'a>>,
        options: &FromOptions,
    ) -> Result<Self, WeekDateError> {
        let base = match source.into() {
            WeekDateSource::Text(text) => text.parse::<Self>()?,
            WeekDateSource::Civil(date) => date.week_date()?,
            WeekDateSource::DateTime(date_time) => date_time.week_date()?,
            WeekDateSource::Zoned(zoned) => zoned.week_date()?,
            WeekDateSource::WeekDate(date) => date,
            WeekDateSource::Fields(fields) => Self::try_from(fields)?,
        };
        base.with_calendar(
            options.calendar.unwrap_or(base.calendar),
            options.week_start_day,
        )
    }

    /// Orders two week dates by the instant they start, whatever their
    /// calendars or start days.
    ///
    /// # Errors
    /// Returns a range error if either date cannot be resolved to a day.
    pub fn compare(&self, other: &Self) -> Result<Ordering, WeekDateError> {
        Ok(self.rata_die()?.cmp(&other.rata_die()?))
    }

    /// Whether `other` (a week date, calendar id or scale) uses the same scale.
    pub fn same_scale(&self, other: impl Into<Scale>) -> bool {
        self.scale() == other.into()
    }
}

struct Formatted<'a> {
    date: &'a WeekDate,
    options: &'a ToStringOptions,
    compact: bool,
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.date;
        let year = date.year_of_week();
        if year < 0 {
            write!(f, "{DATE_SEPARATOR}{:04}", year.unsigned_abs())?;
        } else {
            write!(f, "{year:04}")?;
        }
        if !self.compact {
            f.write_char(DATE_SEPARATOR)?;
        }
        write!(f, "{WEEK_DESIGNATOR}{}", date.week_of_year)?;
        if !self.options.short_form {
            if !self.compact {
                f.write_char(DATE_SEPARATOR)?;
            }
            write!(f, "{}", date.day_of_week)?;
        }

        let native = date.calendar.native();
        if self.options.calendar_name.shows(native == NativeCalendar::Iso8601) {
            write!(f, "{TAG_OPEN}{CALENDAR_TAG_KEY}{native}{TAG_CLOSE}")?;
        }
        let default_start = date.week_start_day() == date.scale().default_week_start_day();
        if self.options.week_start_day.shows(default_start) {
            write!(f, "{TAG_OPEN}{}{TAG_CLOSE}", date.week_start_day_code())?;
        }
        Ok(())
    }
}

impl fmt::Display for WeekDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Formatted {
            date: self,
            options: &self.format,
            compact: false,
        }
        .fmt(f)
    }
}

impl PartialEq for WeekDate {
    fn eq(&self, other: &Self) -> bool {
        self.fields() == other.fields()
    }
}

impl Eq for WeekDate {}

impl Hash for WeekDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields().hash(state);
    }
}

impl FromStr for WeekDate {
    type Err = WeekDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_week_date(s)?;
        Self::new(
            parts.year_of_week,
            parts.week_of_year,
            parts.day_of_week,
            parts.calendar,
            Some(parts.week_start_day),
        )
    }
}

impl TryFrom<WeekDateFields> for WeekDate {
    type Error = WeekDateError;

    fn try_from(fields: WeekDateFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.year_of_week,
            fields.week_of_year,
            fields.day_of_week,
            fields.calendar.unwrap_or(CalendarId::Iso8601),
            fields.week_start_day,
        )
    }
}

impl From<WeekDate> for WeekDateFields {
    fn from(date: WeekDate) -> Self {
        date.fields()
    }
}

impl From<&WeekDate> for Scale {
    fn from(date: &WeekDate) -> Self {
        date.scale()
    }
}

impl serde::Serialize for WeekDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string_with(&ToStringOptions::default()))
    }
}

impl<'de> serde::Deserialize<'de> for WeekDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test_utils {
    use chrono::{DateTime, TimeZone, Utc};

    pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
            .unwrap()
    }
}
