//! Format trait definition
//!
//! This module defines the core Format trait that all stream formats implement.
//! The trait provides a uniform interface for reading and writing event streams.

use crate::error::FormatError;
use crate::ir::events::Event;
use std::collections::HashMap;

/// Trait for event stream formats
///
/// Implementors convert between a textual representation and a flat list of
/// [`Event`]s. Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, events: &[Event]) -> Result<String, FormatError> {
///         Ok(events.iter().map(|e| e.kind.name()).collect::<Vec<_>>().join("\n"))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "json", "tag")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → events)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (events → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into events
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<Vec<Event>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize events into text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _events: &[Event]) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize events, optionally using extra parameters.
    ///
    /// Formats without options can rely on the default implementation, which
    /// delegates to [`Format::serialize`] and rejects any parameter.
    fn serialize_with_options(
        &self,
        events: &[Event],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(events)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}

/// Reads a boolean format option; absent means `default`.
pub(crate) fn bool_option(
    options: &HashMap<String, String>,
    key: &str,
    default: bool,
) -> Result<bool, FormatError> {
    match options.get(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(value) => match value.as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(FormatError::NotSupported(format!(
                "Option '{key}' expects a boolean, got '{value}'"
            ))),
        },
    }
}

/// Rejects options a format does not know about.
pub(crate) fn reject_unknown_options(
    format: &str,
    options: &HashMap<String, String>,
    known: &[&str],
) -> Result<(), FormatError> {
    let mut unknown: Vec<&str> = options
        .keys()
        .map(String::as_str)
        .filter(|key| !known.contains(key))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(FormatError::NotSupported(format!(
        "Format '{format}' does not support parameter(s): {}",
        unknown.join(", ")
    )))
}
