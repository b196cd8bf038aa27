/// Minimum valid year-of-week (inclusive)
pub const MIN_YEAR: i32 = -9999;

/// Maximum valid year-of-week (inclusive)
pub const MAX_YEAR: i32 = 9999;

/// Number of days in a week
pub const DAYS_IN_WEEK: u8 = 7;

/// First valid day-of-week / week-start day number
pub const MIN_DAY: u8 = 1;

/// First week of any week-numbering year
pub const MIN_WEEK: u8 = 1;

/// Upper bound for weeks in an ISO week-numbering year
pub const MAX_ISO_WEEK: u8 = 53;

/// Upper bound for weeks in a Hijri week-numbering year.
/// Lunar years have 354 or 355 days, so at most 51 pivot days fall inside one.
pub const MAX_HIJRI_WEEK: u8 = 51;

/// Week-start day number used when none is given.
/// Monday in the ISO ordering, Saturday in the Hijri ordering.
pub const DEFAULT_WEEK_START_DAY: u8 = 1;

/// Offset from a day to its week's pivot day (the 4th day of the week)
pub(crate) const PIVOT_DAY: u8 = 4;

/// Day of January (or of the first Hijri month) that always falls in week 1
pub(crate) const FIRST_WEEK_ANCHOR_DAY: u8 = 4;

/// Days between the pivot-aligned anchor and the last day of the year
pub(crate) const YEAR_END_PIVOT_SHIFT: i64 = 3;

/// Rata Die number of 1970-01-01 (0001-01-01 is day 1)
pub(crate) const UNIX_EPOCH_RATA_DIE: i64 = 719_163;

/// Seconds in a civil day
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Week-date component separator (ISO 8601 extended format)
pub const DATE_SEPARATOR: char = '-';
/// Week designator
pub const WEEK_DESIGNATOR: char = 'W';
/// Opening bracket of an annotation tag
pub const TAG_OPEN: char = '[';
/// Closing bracket of an annotation tag
pub const TAG_CLOSE: char = ']';
/// Key prefix of the calendar annotation tag
pub const CALENDAR_TAG_KEY: &str = "u-ca=";
