use crate::WeekDate;
use crate::calendars::{CalendarId, NativeCalendar, weeks_in_year};
use crate::civil::CalendarDate;
use crate::date::PlainDate;
use crate::error::{Field, WeekDateError};
use crate::hijri::hijri_week_date;
use crate::iso::iso_week_date;
use crate::types::{DayNumber, Scale};
use std::fmt;

/// Week-date capabilities a calendar attaches to civil dates.
pub trait WeekCalendar {
    /// Week date of `date`, expressed in this calendar.
    ///
    /// # Errors
    /// Returns a range error if the date cannot be converted or its
    /// year-of-week leaves -9999..=9999.
    fn week_date(&self, date: &PlainDate) -> Result<WeekDate, WeekDateError>;

    /// Number of weeks in the week-numbering year containing `date`.
    ///
    /// # Errors
    /// See [`WeekCalendar::week_date`].
    fn weeks_in_year(&self, date: &PlainDate) -> Result<u8, WeekDateError>;

    /// # Errors
    /// See [`WeekCalendar::week_date`].
    fn day_of_week(&self, date: &PlainDate) -> Result<u8, WeekDateError> {
        Ok(self.week_date(date)?.day_of_week())
    }

    /// # Errors
    /// See [`WeekCalendar::week_date`].
    fn week_of_year(&self, date: &PlainDate) -> Result<u8, WeekDateError> {
        Ok(self.week_date(date)?.week_of_year())
    }

    /// # Errors
    /// See [`WeekCalendar::week_date`].
    fn year_of_week(&self, date: &PlainDate) -> Result<i32, WeekDateError> {
        Ok(self.week_date(date)?.year_of_week())
    }
}

/// A calendar id paired with the day its weeks start on.
///
/// One adapter type serves every id: the id selects the native super
/// calendar and the week engine, the start day parameterizes both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarAdapter {
    id: CalendarId,
    week_start_day: DayNumber,
}

impl CalendarAdapter {
    /// Creates an adapter, defaulting the start day to the scale's first day.
    ///
    /// # Errors
    /// Returns a range error if the start day is outside 1..=7.
    pub fn new(id: CalendarId, week_start_day: Option<u8>) -> Result<Self, WeekDateError> {
        let start = week_start_day.unwrap_or_else(|| id.scale().default_week_start_day());
        Ok(Self {
            id,
            week_start_day: DayNumber::new(start, Field::WeekStartDay)?,
        })
    }

    pub(crate) const fn from_parts(id: CalendarId, week_start_day: DayNumber) -> Self {
        Self { id, week_start_day }
    }

    pub const fn id(&self) -> CalendarId {
        self.id
    }

    /// The native calendar supplying civil arithmetic
    pub const fn super_id(&self) -> NativeCalendar {
        self.id.native()
    }

    pub const fn native(&self) -> NativeCalendar {
        self.id.native()
    }

    pub const fn scale(&self) -> Scale {
        self.id.scale()
    }

    pub const fn week_start_day(&self) -> u8 {
        self.week_start_day.get()
    }

    /// Week date of a date already expressed in this adapter's native calendar.
    pub(crate) fn week_date_of(&self, date: CalendarDate) -> Result<WeekDate, WeekDateError> {
        let start = self.week_start_day();
        let native = match self.scale() {
            Scale::Gregorian => iso_week_date(date, self.native(), start)?,
            Scale::Hijri => hijri_week_date(date, self.native(), start)?,
        };
        WeekDate::new(
            native.year_of_week(),
            native.week_of_year(),
            native.day_of_week(),
            self.id,
            Some(start),
        )
    }
}

impl WeekCalendar for CalendarAdapter {
    fn week_date(&self, date: &PlainDate) -> Result<WeekDate, WeekDateError> {
        self.week_date_of(date.date_in(self.native())?)
    }

    fn weeks_in_year(&self, date: &PlainDate) -> Result<u8, WeekDateError> {
        let year = self.year_of_week(date)?;
        weeks_in_year(year, self.id, self.week_start_day())
    }
}

impl fmt::Display for CalendarAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
