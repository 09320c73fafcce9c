//! Output rendering for search results.
//!
//! # Submodules
//!
//! - [`csv`]: Serializes article sets to CSV files with timestamped names
//! - [`text`]: Renders results and history listings for the terminal

pub mod csv;
pub mod text;
