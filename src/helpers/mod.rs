//! Helper functions for the external renderer
//!
//! Formatting shared by exported post records.

mod date;

pub use date::*;
