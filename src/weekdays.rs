//! Week-day naming and numbering under arbitrary week-start days.
//!
//! Both scales number their days 1..=7 from a canonical first day: Monday for
//! the ISO week calendar and Saturday for the Hijri week calendar. A week that
//! starts on another day renumbers the days relative to that start; the
//! rotation and cross-scale tables below map between the numberings.

use crate::consts::DAYS_IN_WEEK;
use crate::error::{Field, ParseError, WeekDateError};
use crate::types::{DayNumber, Scale};
use serde::{Deserialize, Serialize};

/// Day names in the ISO canonical order
pub const ISO_DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Two-letter day codes in the ISO canonical order
pub const ISO_DAY_CODES: [&str; 7] = ["MO", "TU", "WE", "TH", "FR", "SA", "SU"];

/// Day names in the Hijri canonical order
pub const HWC_DAY_NAMES: [&str; 7] = [
    "Saturday",
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
];

/// Two-letter day codes in the Hijri canonical order
pub const HWC_DAY_CODES: [&str; 7] = ["SA", "SU", "MO", "TU", "WE", "TH", "FR"];

const fn rotation_table(forward: bool) -> [[u8; 7]; 7] {
    let mut table = [[0_u8; 7]; 7];
    let mut start = 0;
    while start < 7 {
        let mut day = 0;
        while day < 7 {
            table[start][day] = if forward {
                ((start + day) % 7) as u8
            } else {
                ((day + 7 - start) % 7) as u8
            };
            day += 1;
        }
        start += 1;
    }
    table
}

/// `[start - 1][relative day - 1]` → canonical index
const NAMES_OFFSET: [[u8; 7]; 7] = rotation_table(true);

/// `[start - 1][canonical index]` → relative day - 1
const NUMBERS_OFFSET: [[u8; 7]; 7] = rotation_table(false);

/// `[hwc start - 1][iso start - 1]` → offset added to an ISO day number
const HWC_FROM_ISO_OFFSETS: [[u8; 7]; 7] = [
    [2, 3, 4, 5, 6, 7, 1],
    [1, 2, 3, 4, 5, 6, 7],
    [7, 1, 2, 3, 4, 5, 6],
    [6, 7, 1, 2, 3, 4, 5],
    [5, 6, 7, 1, 2, 3, 4],
    [4, 5, 6, 7, 1, 2, 3],
    [3, 4, 5, 6, 7, 1, 2],
];

/// `[iso start - 1][hwc start - 1]` → offset added to a Hijri day number
const ISO_FROM_HWC_OFFSETS: [[u8; 7]; 7] = [
    [5, 6, 7, 1, 2, 3, 4],
    [4, 5, 6, 7, 1, 2, 3],
    [3, 4, 5, 6, 7, 1, 2],
    [2, 3, 4, 5, 6, 7, 1],
    [1, 2, 3, 4, 5, 6, 7],
    [7, 1, 2, 3, 4, 5, 6],
    [6, 7, 1, 2, 3, 4, 5],
];

const fn day_names(scale: Scale) -> &'static [&'static str; 7] {
    match scale {
        Scale::Gregorian => &ISO_DAY_NAMES,
        Scale::Hijri => &HWC_DAY_NAMES,
    }
}

const fn day_codes(scale: Scale) -> &'static [&'static str; 7] {
    match scale {
        Scale::Gregorian => &ISO_DAY_CODES,
        Scale::Hijri => &HWC_DAY_CODES,
    }
}

const fn canonical_index(day: DayNumber, week_start_day: DayNumber) -> usize {
    NAMES_OFFSET[week_start_day.index()][day.index()] as usize
}

fn validated(day: u8, week_start_day: u8) -> Result<(DayNumber, DayNumber), WeekDateError> {
    Ok((
        DayNumber::new(day, Field::Day)?,
        DayNumber::new(week_start_day, Field::WeekStartDay)?,
    ))
}

/// Name of an already validated relative day
pub(crate) const fn day_name_of(day: DayNumber, scale: Scale, week_start_day: DayNumber) -> &'static str {
    day_names(scale)[canonical_index(day, week_start_day)]
}

/// Code of an already validated relative day
pub(crate) const fn day_code_of(day: DayNumber, scale: Scale, week_start_day: DayNumber) -> &'static str {
    day_codes(scale)[canonical_index(day, week_start_day)]
}

fn relative_number(index: usize, week_start_day: u8) -> Result<u8, WeekDateError> {
    let start = DayNumber::new(week_start_day, Field::WeekStartDay)?;
    Ok(NUMBERS_OFFSET[start.index()][index] + 1)
}

/// Name of the `day`-th day of a week starting on `week_start_day`.
///
/// # Errors
/// Returns a range error if either number is outside 1..=7.
pub fn week_day_name(day: u8, scale: Scale, week_start_day: u8) -> Result<&'static str, WeekDateError> {
    let (day, start) = validated(day, week_start_day)?;
    Ok(day_name_of(day, scale, start))
}

/// Two-letter code of the `day`-th day of a week starting on `week_start_day`.
///
/// # Errors
/// Returns a range error if either number is outside 1..=7.
pub fn week_day_code(day: u8, scale: Scale, week_start_day: u8) -> Result<&'static str, WeekDateError> {
    let (day, start) = validated(day, week_start_day)?;
    Ok(day_code_of(day, scale, start))
}

/// Day number of `name` in a week starting on `week_start_day`.
/// Matching is ASCII case-insensitive.
///
/// # Errors
/// Returns a format error for an unknown name and a range error for a bad start day.
pub fn week_day_number(name: &str, scale: Scale, week_start_day: u8) -> Result<u8, WeekDateError> {
    let index = day_names(scale)
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .ok_or_else(|| ParseError::UnknownDayName(name.to_owned()))?;
    relative_number(index, week_start_day)
}

/// Day number of the two-letter `code` in a week starting on `week_start_day`.
///
/// # Errors
/// Returns a format error for an unknown code and a range error for a bad start day.
pub fn week_day_code_number(
    code: &str,
    scale: Scale,
    week_start_day: u8,
) -> Result<u8, WeekDateError> {
    let index = day_codes(scale)
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(code))
        .ok_or_else(|| ParseError::UnknownDayCode(code.to_owned()))?;
    relative_number(index, week_start_day)
}

/// Renumbers a canonical day (1 = the scale's first day) relative to `week_start_day`.
///
/// # Errors
/// Returns a range error if either number is outside 1..=7.
pub fn rotate_day_number(canonical_day: u8, week_start_day: u8) -> Result<u8, WeekDateError> {
    let day = DayNumber::new(canonical_day, Field::Day)?;
    relative_number(day.index(), week_start_day)
}

/// Inverse of [`rotate_day_number`]: the canonical number of a relative day.
///
/// # Errors
/// Returns a range error if either number is outside 1..=7.
pub fn canonical_day_number(day: u8, week_start_day: u8) -> Result<u8, WeekDateError> {
    let (day, start) = validated(day, week_start_day)?;
    Ok(NAMES_OFFSET[start.index()][day.index()] + 1)
}

fn shift_day(day: u8, offset: u8) -> u8 {
    match (day + offset) % DAYS_IN_WEEK {
        0 => DAYS_IN_WEEK,
        shifted => shifted,
    }
}

/// Converts an ISO day number (relative to `iso_start`) to the Hijri number
/// of the same weekday relative to `hwc_start`.
///
/// # Errors
/// Returns a range error if any number is outside 1..=7.
pub fn iso_day_to_hwc_day(iso_day: u8, hwc_start: u8, iso_start: u8) -> Result<u8, WeekDateError> {
    let day = DayNumber::new(iso_day, Field::Day)?;
    let hwc = DayNumber::new(hwc_start, Field::WeekStartDay)?;
    let iso = DayNumber::new(iso_start, Field::WeekStartDay)?;
    Ok(shift_day(day.get(), HWC_FROM_ISO_OFFSETS[hwc.index()][iso.index()]))
}

/// Converts a Hijri day number (relative to `hwc_start`) to the ISO number
/// of the same weekday relative to `iso_start`.
///
/// # Errors
/// Returns a range error if any number is outside 1..=7.
pub fn hwc_day_to_iso_day(hwc_day: u8, iso_start: u8, hwc_start: u8) -> Result<u8, WeekDateError> {
    let day = DayNumber::new(hwc_day, Field::Day)?;
    let iso = DayNumber::new(iso_start, Field::WeekStartDay)?;
    let hwc = DayNumber::new(hwc_start, Field::WeekStartDay)?;
    Ok(shift_day(day.get(), ISO_FROM_HWC_OFFSETS[iso.index()][hwc.index()]))
}

/// ISO week days in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum IsoWeekDay {
    Monday = 1,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Hijri week days in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HwcWeekDay {
    Saturday = 1,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl IsoWeekDay {
    const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        ISO_DAY_NAMES[self as usize - 1]
    }

    pub const fn code(self) -> &'static str {
        ISO_DAY_CODES[self as usize - 1]
    }
}

impl HwcWeekDay {
    const ALL: [Self; 7] = [
        Self::Saturday,
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        HWC_DAY_NAMES[self as usize - 1]
    }

    pub const fn code(self) -> &'static str {
        HWC_DAY_CODES[self as usize - 1]
    }
}

impl TryFrom<u8> for IsoWeekDay {
    type Error = WeekDateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let day = DayNumber::new(value, Field::Day)?;
        Ok(Self::ALL[day.index()])
    }
}

impl TryFrom<u8> for HwcWeekDay {
    type Error = WeekDateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let day = DayNumber::new(value, Field::Day)?;
        Ok(Self::ALL[day.index()])
    }
}

impl From<IsoWeekDay> for u8 {
    fn from(day: IsoWeekDay) -> Self {
        day.number()
    }
}

impl From<HwcWeekDay> for u8 {
    fn from(day: HwcWeekDay) -> Self {
        day.number()
    }
}

impl From<chrono::Weekday> for IsoWeekDay {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl From<IsoWeekDay> for HwcWeekDay {
    fn from(day: IsoWeekDay) -> Self {
        // Saturday is index 5 in ISO order and index 0 in Hijri order
        Self::ALL[(day as usize + 1) % 7]
    }
}

impl From<HwcWeekDay> for IsoWeekDay {
    fn from(day: HwcWeekDay) -> Self {
        Self::ALL[(day as usize + 4) % 7]
    }
}
