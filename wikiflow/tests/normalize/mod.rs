//! Heading normalization over whole pages.

mod chunks;
mod pages;
mod properties;
