use crate::adapter::CalendarAdapter;
use crate::error::WeekDateError;
use crate::hijri::weeks_in_hijri_year;
use crate::iso::weeks_in_iso_year;
use crate::prelude::*;
use crate::types::Scale;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Calendars whose civil arithmetic is provided by the civil-calendar service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NativeCalendar {
    #[display(fmt = "iso8601")]
    Iso8601,
    #[display(fmt = "gregorian")]
    Gregorian,
    #[display(fmt = "islamic-umalqura")]
    IslamicUmalqura,
    #[display(fmt = "islamic-civil")]
    IslamicCivil,
    #[display(fmt = "islamic-tbla")]
    IslamicTbla,
}

impl NativeCalendar {
    pub const fn scale(self) -> Scale {
        match self {
            Self::Iso8601 | Self::Gregorian => Scale::Gregorian,
            Self::IslamicUmalqura | Self::IslamicCivil | Self::IslamicTbla => Scale::Hijri,
        }
    }
}

/// Every calendar identifier accepted by the crate.
///
/// The `iso-extended` and `hwc-*` identifiers are week-calendar forms layered
/// on a native super calendar; they share its civil arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarId {
    #[display(fmt = "iso8601")]
    Iso8601,
    #[display(fmt = "gregorian")]
    Gregorian,
    #[display(fmt = "islamic-umalqura")]
    IslamicUmalqura,
    #[display(fmt = "islamic-civil")]
    IslamicCivil,
    #[display(fmt = "islamic-tbla")]
    IslamicTbla,
    #[display(fmt = "iso-extended")]
    IsoExtended,
    #[display(fmt = "hwc-islamic-umalqura")]
    HwcIslamicUmalqura,
    #[display(fmt = "hwc-islamic-civil")]
    HwcIslamicCivil,
    #[display(fmt = "hwc-islamic-tbla")]
    HwcIslamicTbla,
}

impl CalendarId {
    pub const ALL: [Self; 9] = [
        Self::Iso8601,
        Self::Gregorian,
        Self::IslamicUmalqura,
        Self::IslamicCivil,
        Self::IslamicTbla,
        Self::IsoExtended,
        Self::HwcIslamicUmalqura,
        Self::HwcIslamicCivil,
        Self::HwcIslamicTbla,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Iso8601 => "iso8601",
            Self::Gregorian => "gregorian",
            Self::IslamicUmalqura => "islamic-umalqura",
            Self::IslamicCivil => "islamic-civil",
            Self::IslamicTbla => "islamic-tbla",
            Self::IsoExtended => "iso-extended",
            Self::HwcIslamicUmalqura => "hwc-islamic-umalqura",
            Self::HwcIslamicCivil => "hwc-islamic-civil",
            Self::HwcIslamicTbla => "hwc-islamic-tbla",
        }
    }

    /// The native calendar supplying civil arithmetic for this id
    pub const fn native(self) -> NativeCalendar {
        match self {
            Self::Iso8601 | Self::IsoExtended => NativeCalendar::Iso8601,
            Self::Gregorian => NativeCalendar::Gregorian,
            Self::IslamicUmalqura | Self::HwcIslamicUmalqura => NativeCalendar::IslamicUmalqura,
            Self::IslamicCivil | Self::HwcIslamicCivil => NativeCalendar::IslamicCivil,
            Self::IslamicTbla | Self::HwcIslamicTbla => NativeCalendar::IslamicTbla,
        }
    }

    pub const fn scale(self) -> Scale {
        self.native().scale()
    }

    /// True for the week-calendar forms (`iso-extended`, `hwc-*`)
    pub const fn is_extended(self) -> bool {
        matches!(
            self,
            Self::IsoExtended
                | Self::HwcIslamicUmalqura
                | Self::HwcIslamicCivil
                | Self::HwcIslamicTbla
        )
    }
}

impl From<NativeCalendar> for CalendarId {
    fn from(native: NativeCalendar) -> Self {
        match native {
            NativeCalendar::Iso8601 => Self::Iso8601,
            NativeCalendar::Gregorian => Self::Gregorian,
            NativeCalendar::IslamicUmalqura => Self::IslamicUmalqura,
            NativeCalendar::IslamicCivil => Self::IslamicCivil,
            NativeCalendar::IslamicTbla => Self::IslamicTbla,
        }
    }
}

impl From<CalendarId> for Scale {
    fn from(id: CalendarId) -> Self {
        id.scale()
    }
}

impl From<NativeCalendar> for Scale {
    fn from(native: NativeCalendar) -> Self {
        native.scale()
    }
}

impl FromStr for CalendarId {
    type Err = WeekDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| WeekDateError::UnsupportedCalendar(trimmed.to_owned()))
    }
}

/// Returns the native super calendar of `id`.
pub const fn calendar_super_id(id: CalendarId) -> NativeCalendar {
    id.native()
}

/// Returns the week-numbering scale of `id`.
pub const fn scale_of(id: CalendarId) -> Scale {
    id.scale()
}

/// Whether `id` names one of the supported calendars.
pub fn is_supported_calendar(id: &str) -> bool {
    id.parse::<CalendarId>().is_ok()
}

/// Number of weeks in `year` of `calendar` with weeks starting on `week_start_day`.
///
/// # Errors
/// Propagates range errors from the week engines.
pub fn weeks_in_year(
    year: i32,
    calendar: CalendarId,
    week_start_day: u8,
) -> Result<u8, WeekDateError> {
    match calendar.scale() {
        Scale::Gregorian => weeks_in_iso_year(year, week_start_day),
        Scale::Hijri => weeks_in_hijri_year(year, calendar.native(), week_start_day),
    }
}

/// Builds the week-calendar adapter for `id`, starting weeks on
/// `week_start_day` (or the scale default).
///
/// # Errors
/// Returns a range error if the start day is outside 1..=7.
pub fn calendar_for(
    id: CalendarId,
    week_start_day: Option<u8>,
) -> Result<CalendarAdapter, WeekDateError> {
    CalendarAdapter::new(id, week_start_day)
}

/// Like [`calendar_for`] but resolves the id from text.
///
/// # Errors
/// Returns `WeekDateError::UnsupportedCalendar` for an unknown id.
pub fn calendar_from_id(
    id: &str,
    week_start_day: Option<u8>,
) -> Result<CalendarAdapter, WeekDateError> {
    calendar_for(id.parse()?, week_start_day)
}
