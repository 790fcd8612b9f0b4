//! JSON event stream format
//!
//! The on-disk form of an event stream: a JSON array of events, as derived by
//! serde on [`Event`]. It is the only format that can be parsed back.
//!
//! ```text
//! [
//!   { "kind": "heading", "state": "unmatched", "context": "outline",
//!     "attributes": { "level": "1" }, "span": [0, 8] },
//!   { "kind": "paragraph_open", "state": "none", "span": [0, 0] },
//!   { "kind": "text", "state": "none", "span": [8, 13], "content": "Intro" },
//!   { "kind": "paragraph_close", "state": "none", "span": [0, 0] }
//! ]
//! ```

use crate::error::FormatError;
use crate::format::{bool_option, reject_unknown_options, Format};
use crate::ir::events::Event;
use std::collections::HashMap;

/// Format implementation for JSON event streams
#[derive(Debug, Clone)]
pub struct JsonFormat {
    /// Indent the output.
    pub pretty: bool,
}

impl Default for JsonFormat {
    fn default() -> Self {
        JsonFormat { pretty: true }
    }
}

impl JsonFormat {
    fn write(&self, events: &[Event], pretty: bool) -> Result<String, FormatError> {
        let mut output = if pretty {
            serde_json::to_string_pretty(events)
        } else {
            serde_json::to_string(events)
        }
        .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        output.push('\n');
        Ok(output)
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "JSON array of parse events"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<Event>, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, events: &[Event]) -> Result<String, FormatError> {
        self.write(events, self.pretty)
    }

    fn serialize_with_options(
        &self,
        events: &[Event],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        reject_unknown_options(self.name(), options, &["pretty"])?;
        let pretty = bool_option(options, "pretty", self.pretty)?;
        self.write(events, pretty)
    }
}
