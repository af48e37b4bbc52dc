//! Aligns the rows of two AHB tables and classifies every aligned pair.
//!
//! [`align`] is the single entry point used by the ingest/output layers: it
//! walks both tables once, pairing rows by whitespace-insensitive section
//! name, and returns the merged sequence in reading order.

#![deny(unsafe_code)]

pub mod align;
pub mod fields;
pub mod normalize;
pub mod summary;

pub use align::align;
pub use fields::{compare_fields, compare_rows, field_list_for, resolve_field_list};
pub use normalize::normalize;
pub use summary::summarize;
