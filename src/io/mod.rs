pub mod csv;
pub mod json;

pub use csv::{write_trace, write_trace_file};
pub use json::{write_summary, write_summary_file, EventRecord, FlightSummary};
