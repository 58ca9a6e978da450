pub mod csv;
pub mod json;

pub use self::csv::{write_telemetry, write_telemetry_file};
pub use self::json::{write_summary, write_summary_file, FlightSummary};
