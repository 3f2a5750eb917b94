pub mod booking;
pub mod class;
pub mod slot;
pub mod user;

/// Wire format for calendar dates, e.g. `2026-10-19`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Wire format for wall-clock times, e.g. `08:00`.
pub const TIME_FORMAT: &str = "%H:%M";
/// Wire format for booking timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
