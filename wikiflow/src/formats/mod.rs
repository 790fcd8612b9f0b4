//! Format implementations
//!
//! This module contains the formats that read and write event streams.

pub mod json;
pub mod tag;

pub use json::JsonFormat;
pub use tag::TagFormat;
