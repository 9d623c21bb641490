#[cfg(feature = "api")]
pub mod client;
pub mod error;
pub mod listing;
pub mod page;
pub mod project;
