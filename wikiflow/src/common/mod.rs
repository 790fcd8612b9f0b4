//! Rewrites and checks that operate on the event stream, independent of any
//! serialization format.

pub mod balance;
pub mod headings;
