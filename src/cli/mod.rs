//! CLI-specific utilities for butterfly-encode
//!
//! Record parsing and result reporting live here, separate from the core
//! library functionality.

pub mod input;
pub mod report;

pub use input::read_records;
pub use report::{encode_record, Summary};
