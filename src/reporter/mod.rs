//! Reporter module for output formatting

pub mod console;
pub mod csv_report;
pub mod html;
pub mod json;

pub use console::ConsoleReporter;
pub use csv_report::{InfluencerRow, RecommendationRow};
pub use html::HtmlReporter;
pub use json::JsonReporter;
