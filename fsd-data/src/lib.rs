//! Field extraction and dataset building for floating solar projects.
//!
//! Turns the paragraph text of a detail page into raw fields, then coerces
//! the accumulated fields into typed records and writes them out as CSV.

pub mod dataset;
pub mod error;
pub mod extract;
