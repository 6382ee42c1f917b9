pub mod coerce;
pub mod file_helpers;

pub use file_helpers::content_checksum;
