use crate::consts::{
    DAYS_IN_WEEK, DEFAULT_WEEK_START_DAY, MAX_HIJRI_WEEK, MAX_ISO_WEEK, MAX_YEAR, MIN_DAY,
    MIN_WEEK, MIN_YEAR,
};
use crate::error::{Field, WeekDateError, check_range};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// Week-numbering family a calendar belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// ISO-8601 weeks over the Gregorian calendar, canonical days Monday..Sunday
    #[display(fmt = "Gregorian")]
    Gregorian,
    /// Hijri weeks over a lunar calendar, canonical days Saturday..Friday
    #[display(fmt = "Hijri")]
    Hijri,
}

impl Scale {
    /// Largest week number any year of this scale may contain
    pub const fn max_week(self) -> u8 {
        match self {
            Self::Gregorian => MAX_ISO_WEEK,
            Self::Hijri => MAX_HIJRI_WEEK,
        }
    }

    /// Start day used when none is given (Monday or Saturday)
    pub const fn default_week_start_day(self) -> u8 {
        DEFAULT_WEEK_START_DAY
    }
}

/// A year-of-week guaranteed to be in the range `MIN_YEAR..=MAX_YEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct YearOfWeek(i16);

impl YearOfWeek {
    /// Creates a new year-of-week.
    ///
    /// # Errors
    /// Returns `WeekDateError::OutOfRange` if the value is outside -9999..=9999.
    pub fn new(value: i32) -> Result<Self, WeekDateError> {
        check_range(Field::Year, value, MIN_YEAR, MAX_YEAR)?;
        let year = i16::try_from(value).map_err(|_| WeekDateError::OutOfRange {
            field: Field::Year,
            value: value.into(),
            min: MIN_YEAR.into(),
            max: MAX_YEAR.into(),
        })?;
        Ok(Self(year))
    }

    #[inline]
    pub const fn get(self) -> i32 {
        self.0 as i32
    }
}

impl TryFrom<i32> for YearOfWeek {
    type Error = WeekDateError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<YearOfWeek> for i32 {
    fn from(year: YearOfWeek) -> Self {
        year.get()
    }
}

impl fmt::Display for YearOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A week number, bounded by the scale it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekOfYear(NonZeroU8);

impl WeekOfYear {
    /// Creates a new week number valid for `scale`.
    ///
    /// # Errors
    /// Returns `WeekDateError::OutOfRange` if the value is 0 or above the scale maximum.
    pub fn new(value: u8, scale: Scale) -> Result<Self, WeekDateError> {
        check_range(Field::Week, value, MIN_WEEK, scale.max_week())?;
        NonZeroU8::new(value)
            .map(Self)
            .ok_or(WeekDateError::OutOfRange {
                field: Field::Week,
                value: value.into(),
                min: MIN_WEEK.into(),
                max: scale.max_week().into(),
            })
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

/// Context-free validation against the widest scale
impl TryFrom<u8> for WeekOfYear {
    type Error = WeekDateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value, Scale::Gregorian)
    }
}

impl From<WeekOfYear> for u8 {
    fn from(week: WeekOfYear) -> Self {
        week.get()
    }
}

impl fmt::Display for WeekOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A day number in `1..=7`, either a day-of-week relative to a start day or
/// a week-start day in a scale's canonical ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayNumber(NonZeroU8);

impl DayNumber {
    /// Day 1, the first day of a week or of a scale's canonical ordering
    pub const FIRST: Self = Self(NonZeroU8::MIN);

    /// Creates a new day number, naming `field` in the error.
    ///
    /// # Errors
    /// Returns `WeekDateError::OutOfRange` if the value is 0 or > 7.
    pub fn new(value: u8, field: Field) -> Result<Self, WeekDateError> {
        check_range(field, value, MIN_DAY, DAYS_IN_WEEK)?;
        NonZeroU8::new(value)
            .map(Self)
            .ok_or(WeekDateError::OutOfRange {
                field,
                value: value.into(),
                min: MIN_DAY.into(),
                max: DAYS_IN_WEEK.into(),
            })
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Zero-based index into the rotation tables
    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl TryFrom<u8> for DayNumber {
    type Error = WeekDateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value, Field::Day)
    }
}

impl From<DayNumber> for u8 {
    fn from(day: DayNumber) -> Self {
        day.get()
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bounds() {
        assert_eq!(YearOfWeek::new(-9999).unwrap().get(), -9999);
        assert_eq!(YearOfWeek::new(9999).unwrap().get(), 9999);
        assert_eq!(YearOfWeek::new(0).unwrap().get(), 0);
        assert!(YearOfWeek::new(10000).is_err());
        assert!(YearOfWeek::new(-10000).is_err());
    }

    #[test]
    fn test_year_error_names_field() {
        let err = YearOfWeek::new(10000).unwrap_err();
        assert_eq!(err.to_string(), "Invalid year: 10000 must be >= -9999 and <= 9999");
    }

    #[test]
    fn test_week_bounds_by_scale() {
        struct TestCase {
            week: u8,
            scale: Scale,
            valid: bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                week: 0,
                scale: Scale::Gregorian,
                valid: false,
                description: "week zero",
            },
            TestCase {
                week: 53,
                scale: Scale::Gregorian,
                valid: true,
                description: "long ISO year",
            },
            TestCase {
                week: 54,
                scale: Scale::Gregorian,
                valid: false,
                description: "beyond ISO maximum",
            },
            TestCase {
                week: 51,
                scale: Scale::Hijri,
                valid: true,
                description: "long Hijri year",
            },
            TestCase {
                week: 52,
                scale: Scale::Hijri,
                valid: false,
                description: "beyond Hijri maximum",
            },
        ];

        for case in &cases {
            assert_eq!(
                WeekOfYear::new(case.week, case.scale).is_ok(),
                case.valid,
                "week {} ({})",
                case.week,
                case.description
            );
        }
    }

    #[test]
    fn test_week_display_is_padded() {
        assert_eq!(WeekOfYear::new(5, Scale::Hijri).unwrap().to_string(), "05");
        assert_eq!(WeekOfYear::new(53, Scale::Gregorian).unwrap().to_string(), "53");
    }

    #[test]
    fn test_day_number_bounds() {
        for day in 1..=7 {
            assert_eq!(DayNumber::new(day, Field::Day).unwrap().get(), day);
        }
        assert!(DayNumber::new(0, Field::Day).is_err());
        let err = DayNumber::new(8, Field::WeekStartDay).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid week start day: 8 must be >= 1 and <= 7"
        );
    }

    #[test]
    fn test_day_number_index() {
        assert_eq!(DayNumber::new(1, Field::Day).unwrap().index(), 0);
        assert_eq!(DayNumber::new(7, Field::Day).unwrap().index(), 6);
        assert_eq!(DayNumber::FIRST.get(), 1);
    }

    #[test]
    fn test_serde() {
        let year = YearOfWeek::new(1444).unwrap();
        assert_eq!(serde_json::to_string(&year).unwrap(), "1444");
        assert!(serde_json::from_str::<YearOfWeek>("10000").is_err());

        let day: DayNumber = serde_json::from_str("3").unwrap();
        assert_eq!(day.get(), 3);
        assert!(serde_json::from_str::<DayNumber>("0").is_err());

        assert_eq!(serde_json::to_string(&Scale::Hijri).unwrap(), "\"hijri\"");
    }

    #[test]
    fn test_scale_defaults() {
        assert_eq!(Scale::Gregorian.max_week(), 53);
        assert_eq!(Scale::Hijri.max_week(), 51);
        assert_eq!(Scale::Gregorian.default_week_start_day(), 1);
        assert_eq!(Scale::Hijri.default_week_start_day(), 1);
        assert_eq!(Scale::Hijri.to_string(), "Hijri");
    }
}
