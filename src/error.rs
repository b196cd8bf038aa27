use crate::calendars::{CalendarId, NativeCalendar};
use crate::prelude::*;
use crate::types::Scale;

/// Names the numeric component that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Field {
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "week")]
    Week,
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "week start day")]
    WeekStartDay,
}

/// Syntax errors raised while reading a week-date string or a day name.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Empty week date string")]
    EmptyInput,
    #[display(fmt = "Invalid week date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year in week date: {_0}")]
    InvalidYear(String),
    #[display(fmt = "Invalid week {week} (must be 1-{max})")]
    InvalidWeek { week: u8, max: u8 },
    #[display(fmt = "Invalid weekday {_0} (must be 1-7)")]
    InvalidWeekday(u8),
    #[display(fmt = "Unknown week day code: {_0}")]
    UnknownDayCode(String),
    #[display(fmt = "Unknown week day name: {_0}")]
    UnknownDayName(String),
    #[display(fmt = "Duplicate {_0} tag")]
    DuplicateTag(String),
}

impl std::error::Error for ParseError {}

/// Broad error category, independent of the variant details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// A numeric component or date is outside its domain.
    #[display(fmt = "range")]
    Range,
    /// Malformed or semantically invalid text.
    #[display(fmt = "format")]
    Format,
    /// A calendar id that is unknown or not valid for the scale.
    #[display(fmt = "unsupported calendar")]
    UnsupportedCalendar,
}

/// Error type for week-date construction, conversion and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeekDateError {
    /// A component is outside its allowed bounds.
    #[error("Invalid {field}: {value} must be >= {min} and <= {max}")]
    OutOfRange {
        field: Field,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A year/month/day triple that does not exist in the calendar.
    #[error("Invalid date {year}-{month:02}-{day:02} in calendar {calendar}")]
    InvalidDate {
        calendar: NativeCalendar,
        year: i32,
        month: u8,
        day: u8,
    },

    /// A day number that the civil calendar or instant type cannot represent.
    #[error("Day {0} is outside the supported date range")]
    DateOutOfRange(i64),

    /// Error parsing week-date text.
    #[error(transparent)]
    Format(#[from] ParseError),

    /// Calendar id that is not one of the supported identifiers.
    #[error("Unsupported calendar: {0}")]
    UnsupportedCalendar(String),

    /// Calendar that exists but belongs to another week-numbering scale.
    #[error("Unsupported calendar: {calendar} is not a {scale} calendar")]
    ScaleMismatch { calendar: CalendarId, scale: Scale },
}

impl WeekDateError {
    /// Returns the broad category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfRange { .. } | Self::InvalidDate { .. } | Self::DateOutOfRange(_) => {
                ErrorKind::Range
            }
            Self::Format(_) => ErrorKind::Format,
            Self::UnsupportedCalendar(_) | Self::ScaleMismatch { .. } => {
                ErrorKind::UnsupportedCalendar
            }
        }
    }
}

/// Checks that `value` lies in `min..=max`, naming `field` on failure.
pub(crate) fn check_range<T>(field: Field, value: T, min: T, max: T) -> Result<(), WeekDateError>
where
    T: Into<i64> + PartialOrd + Copy,
{
    if value < min || value > max {
        return Err(WeekDateError::OutOfRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = check_range(Field::Day, 8_u8, 1, 7).unwrap_err();
        assert_eq!(err.to_string(), "Invalid day: 8 must be >= 1 and <= 7");
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_check_range_accepts_bounds() {
        assert!(check_range(Field::Year, -9999_i32, -9999, 9999).is_ok());
        assert!(check_range(Field::Year, 9999_i32, -9999, 9999).is_ok());
        assert!(check_range(Field::Year, 10000_i32, -9999, 9999).is_err());
    }

    #[test]
    fn test_field_names() {
        let names = [Field::Year, Field::Week, Field::Day, Field::WeekStartDay]
            .map(|field| field.to_string());
        assert_eq!(names, ["year", "week", "day", "week start day"]);
    }

    #[test]
    fn test_week_start_day_message() {
        let err = check_range(Field::WeekStartDay, 8_u8, 1, 7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid week start day: 8 must be >= 1 and <= 7"
        );
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err: WeekDateError = ParseError::InvalidWeekday(0).into();
        assert_eq!(err.to_string(), "Invalid weekday 0 (must be 1-7)");
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_calendar_error_kinds() {
        let unknown = WeekDateError::UnsupportedCalendar("julian".to_owned());
        assert_eq!(unknown.to_string(), "Unsupported calendar: julian");
        assert_eq!(unknown.kind(), ErrorKind::UnsupportedCalendar);

        let mismatch = WeekDateError::ScaleMismatch {
            calendar: CalendarId::IslamicCivil,
            scale: Scale::Gregorian,
        };
        assert_eq!(
            mismatch.to_string(),
            "Unsupported calendar: islamic-civil is not a Gregorian calendar"
        );
        assert_eq!(mismatch.kind(), ErrorKind::UnsupportedCalendar);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
        assert_send_sync::<WeekDateError>();
        assert_send_sync::<ParseError>();
    }
}
