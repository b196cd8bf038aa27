use crate::calendars::{CalendarId, weeks_in_year};
use crate::consts::{
    CALENDAR_TAG_KEY, DATE_SEPARATOR, DAYS_IN_WEEK, DEFAULT_WEEK_START_DAY, MIN_DAY, TAG_CLOSE,
    TAG_OPEN, WEEK_DESIGNATOR,
};
use crate::error::{ParseError, WeekDateError};
use crate::weekdays::week_day_code_number;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Components read from a week-date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekDateParts {
    pub year_of_week: i32,
    pub week_of_year: u8,
    pub day_of_week: u8,
    pub calendar: CalendarId,
    pub week_start_day: u8,
}

/// Parses `yyyy-Www-d`, `yyyyWwwd` or their short forms, followed by optional
/// `[u-ca=<calendar>]` and `[<day code>]` tags.
///
/// # Errors
/// Returns a format error for malformed text, an out-of-range week or day, or
/// an unknown day code, and `UnsupportedCalendar` for an unknown calendar.
pub fn parse_week_date(input: &str) -> Result<WeekDateParts, WeekDateError> {
    parse_week_date_with(input, weeks_in_year)
}

/// Like [`parse_week_date`], with the per-year week count supplied by the caller.
///
/// # Errors
/// See [`parse_week_date`]; errors from `weeks_in_year` are propagated.
pub fn parse_week_date_with<F>(input: &str, weeks_in_year: F) -> Result<WeekDateParts, WeekDateError>
where
    F: Fn(i32, CalendarId, u8) -> Result<u8, WeekDateError>,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput.into());
    }

    let (body, tags) = match trimmed.find(TAG_OPEN) {
        Some(index) => trimmed.split_at(index),
        None => (trimmed, ""),
    };
    let tags = parse_tags(tags)?;

    let calendar = match tags.calendar {
        Some(id) => id.parse::<CalendarId>()?,
        None => CalendarId::Iso8601,
    };
    let scale = calendar.scale();
    let week_start_day = match tags.day_code {
        Some(code) => week_day_code_number(code, scale, DEFAULT_WEEK_START_DAY)?,
        None => DEFAULT_WEEK_START_DAY,
    };

    let (year_of_week, week_of_year, day_of_week) = parse_body(body)?;

    if week_of_year == 0 || week_of_year > scale.max_week() {
        return Err(ParseError::InvalidWeek {
            week: week_of_year,
            max: scale.max_week(),
        }
        .into());
    }
    if day_of_week < MIN_DAY || day_of_week > DAYS_IN_WEEK {
        return Err(ParseError::InvalidWeekday(day_of_week).into());
    }
    let max = weeks_in_year(year_of_week, calendar, week_start_day)?;
    if week_of_year > max {
        return Err(ParseError::InvalidWeek {
            week: week_of_year,
            max,
        }
        .into());
    }

    debug!(input = trimmed, year_of_week, week_of_year, day_of_week, %calendar, week_start_day, "parsed week date");
    Ok(WeekDateParts {
        year_of_week,
        week_of_year,
        day_of_week,
        calendar,
        week_start_day,
    })
}

#[derive(Default)]
struct Tags<'a> {
    calendar: Option<&'a str>,
    day_code: Option<&'a str>,
}

fn parse_tags(mut rest: &str) -> Result<Tags<'_>, WeekDateError> {
    let mut tags = Tags::default();
    while !rest.is_empty() {
        let inner = rest
            .strip_prefix(TAG_OPEN)
            .ok_or_else(|| ParseError::InvalidFormat(rest.to_owned()))?;
        let close = inner
            .find(TAG_CLOSE)
            .ok_or_else(|| ParseError::InvalidFormat(rest.to_owned()))?;
        let content = inner[..close].trim();
        rest = &inner[close + 1..];

        if let Some(id) = content.strip_prefix(CALENDAR_TAG_KEY) {
            if tags.calendar.replace(id).is_some() {
                return Err(ParseError::DuplicateTag("calendar".to_owned()).into());
            }
        } else if tags.day_code.replace(content).is_some() {
            return Err(ParseError::DuplicateTag("week start day".to_owned()).into());
        }
    }
    Ok(tags)
}

/// Splits `[sign]digits[-]Www[[-]d]` into its numbers; a missing day is 1.
fn parse_body(body: &str) -> Result<(i32, u8, u8), WeekDateError> {
    let invalid = || WeekDateError::from(ParseError::InvalidFormat(body.to_owned()));

    let (negative, unsigned) = match body.strip_prefix(DATE_SEPARATOR) {
        Some(rest) => (true, rest),
        None => (false, body.strip_prefix('+').unwrap_or(body)),
    };

    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    if digits == 0 {
        return Err(ParseError::InvalidYear(body.to_owned()).into());
    }
    let magnitude: i32 = unsigned[..digits]
        .parse()
        .map_err(|_| ParseError::InvalidYear(unsigned[..digits].to_owned()))?;
    let year = if negative { -magnitude } else { magnitude };

    let rest = &unsigned[digits..];
    let rest = rest.strip_prefix(DATE_SEPARATOR).unwrap_or(rest);
    let rest = rest
        .strip_prefix(WEEK_DESIGNATOR)
        .or_else(|| rest.strip_prefix(WEEK_DESIGNATOR.to_ascii_lowercase()))
        .ok_or_else(invalid)?;

    let week_digits = rest.get(..2).filter(|w| w.bytes().all(|b| b.is_ascii_digit()));
    let week: u8 = week_digits.ok_or_else(invalid)?.parse().map_err(|_| invalid())?;

    let day_part = &rest[2..];
    let day = if day_part.is_empty() {
        MIN_DAY
    } else {
        let digit = day_part.strip_prefix(DATE_SEPARATOR).unwrap_or(day_part);
        match digit.as_bytes() {
            [d] if d.is_ascii_digit() => d - b'0',
            _ => return Err(invalid()),
        }
    };

    Ok((year, week, day))
}
