use crate::calendars::CalendarId;
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// When an annotation tag is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only when the value differs from the default
    #[default]
    #[display(fmt = "auto")]
    Auto,
    #[display(fmt = "never")]
    Never,
    #[display(fmt = "always")]
    Always,
}

impl Visibility {
    /// Whether the tag is written for a value that is (or is not) the default.
    pub const fn shows(self, is_default: bool) -> bool {
        match self {
            Self::Auto => !is_default,
            Self::Never => false,
            Self::Always => true,
        }
    }
}

/// Formatting of a week date as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToStringOptions {
    /// Omit the day-of-week (`2021-W01` instead of `2021-W01-1`)
    pub short_form: bool,
    /// Visibility of the `[u-ca=...]` tag; its default is `iso8601`
    pub calendar_name: Visibility,
    /// Visibility of the week-start day code tag; its default is the scale's first day
    pub week_start_day: Visibility,
}

impl ToStringOptions {
    /// Long form with both tags always written
    pub const fn explicit() -> Self {
        Self {
            short_form: false,
            calendar_name: Visibility::Always,
            week_start_day: Visibility::Always,
        }
    }

    #[must_use]
    pub const fn short(mut self) -> Self {
        self.short_form = true;
        self
    }
}

/// Calendar and week-start day to convert into when building a week date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FromOptions {
    pub calendar: Option<CalendarId>,
    pub week_start_day: Option<u8>,
}

impl FromOptions {
    pub const fn calendar(calendar: CalendarId) -> Self {
        Self {
            calendar: Some(calendar),
            week_start_day: None,
        }
    }

    pub const fn week_start_day(week_start_day: u8) -> Self {
        Self {
            calendar: None,
            week_start_day: Some(week_start_day),
        }
    }
}
