//! I/O utilities for file processing and data handling.
//!
//! This module provides readers for the pageview dataset in CSV, NDJSON and
//! JSON form.

pub mod dataset;
pub mod ndjson;

// Re-export commonly used types and functions
pub use dataset::{load_dataset, read_dataset, DatasetError, DatasetFormat, RawRecord};
pub use ndjson::parse_ndjson_reader;
