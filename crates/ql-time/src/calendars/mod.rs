//! Exchange and settlement calendars.

/// TARGET settlement calendar.
pub mod target;

pub use target::Target;
