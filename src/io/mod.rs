pub mod csv;
pub mod json;

pub use csv::{write_log, write_log_file};
pub use json::{write_summary, write_summary_file, FlightSummary};
