use std::ops::Range;

/// Character count of the current serial layout.
pub const SERIAL_LEN: usize = 14;
/// Character count of the legacy Touch 1000 layout.
pub const LEGACY_SERIAL_LEN: usize = 10;

pub const YEAR_RANGE: Range<usize> = 0..2;
pub const WEEK_RANGE: Range<usize> = 2..4;
pub const TYPE_OFFSET: usize = 4;
pub const GENERATION_OFFSET: usize = 5;
pub const RADIO_OFFSET: usize = 6;
pub const HARDWARE_OFFSET: usize = 7;
pub const CHANGELOG_RANGE: Range<usize> = 8..10;
pub const SEQUENCE_LEN: usize = 4;

/// Legacy Touch 1000: type marker plus one revision character.
pub const LEGACY_SUBCODE_RANGE: Range<usize> = 4..6;

pub const CENTURY_PREFIX: &str = "20";

/// Default last production year (two digits) for legacy Touch 1100/3100
/// serials when the schema does not set `until_year`.
pub const LEGACY_TOUCH_UNTIL_YEAR: u8 = 19;

pub const UNKNOWN: &str = "Unknown";
pub const SHAREPOINT_REFERENCE: &str = "Refer to Sharepoint document";
