//! Defines the flat event stream representation of a parsed wiki page.
//!
//! The upstream markup parser emits one [`Event`] per matched syntax construct,
//! in source order. Recursive constructs (headings, sections, paragraphs) are
//! bracketed by ENTER/EXIT events, everything else is a single event.

use crate::ir::media::{InternalMedia, Linking};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Context value that marks a heading as taking part in document sectioning.
pub const OUTLINE_CONTEXT: &str = "outline";

/// Attribute key holding a heading or section level.
pub const LEVEL_ATTRIBUTE: &str = "level";

/// Attribute key under which the text of an outline heading is stored.
pub const HEADING_TEXT_ATTRIBUTE: &str = "heading_text";

/// Half-open range of character offsets `[first, last)` in the page source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Span {
    pub first: usize,
    pub last: usize,
}

impl Span {
    pub fn new(first: usize, last: usize) -> Self {
        Span { first, last }
    }

    /// Empty span used by synthetic events.
    pub fn at(position: usize) -> Self {
        Span {
            first: position,
            last: position,
        }
    }
}

impl From<(usize, usize)> for Span {
    fn from((first, last): (usize, usize)) -> Self {
        Span { first, last }
    }
}

impl From<Span> for (usize, usize) {
    fn from(span: Span) -> Self {
        (span.first, span.last)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.first, self.last)
    }
}

/// Whether an occurrence of a construct opens, closes, or stands alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    Enter,
    Exit,
    /// A single, non-nesting match of a stateful construct.
    Unmatched,
    /// The construct is not stateful at all (text, native calls).
    #[default]
    None,
}

/// The syntactic construct an event was matched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Heading marker. Upstream emits it unmatched; normalization pairs it.
    Heading,
    /// Native media call with positional arguments.
    InternalMedia(InternalMedia),
    /// Component media call; its linking lives in the event attributes.
    Media,
    ParagraphOpen,
    ParagraphClose,
    SectionOpen,
    SectionClose,
    Text,
    /// Any other construct, by upstream component name. Passed through.
    Other(String),
}

impl EventKind {
    /// Short, stable name used by the text formats.
    pub fn name(&self) -> &str {
        match self {
            EventKind::Heading => "heading",
            EventKind::InternalMedia(_) => "internal-media",
            EventKind::Media => "media",
            EventKind::ParagraphOpen => "paragraph-open",
            EventKind::ParagraphClose => "paragraph-close",
            EventKind::SectionOpen => "section-open",
            EventKind::SectionClose => "section-close",
            EventKind::Text => "text",
            EventKind::Other(name) => name,
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, EventKind::InternalMedia(_) | EventKind::Media)
    }
}

/// String-keyed event attributes.
///
/// Keys are kept sorted so that serialized streams are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Inserts or replaces an attribute, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Copy of these attributes without `key`.
    pub fn without(&self, key: &str) -> Attributes {
        let mut copy = self.clone();
        copy.remove(key);
        copy
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One matched markup construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    #[serde(default)]
    pub state: EventState,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

impl Event {
    pub fn new(kind: EventKind, state: EventState) -> Self {
        Event {
            kind,
            state,
            attributes: Attributes::new(),
            context: None,
            span: Span::default(),
            content: String::new(),
        }
    }

    /// Event created by a rewrite rather than matched from the source.
    pub fn synthetic(kind: EventKind, position: usize) -> Self {
        Event::new(kind, EventState::None).with_span(Span::at(position))
    }

    /// Unmatched heading marker as the upstream parser emits it.
    pub fn heading(level: usize, context: Option<&str>, span: Span) -> Self {
        let mut event = Event::new(EventKind::Heading, EventState::Unmatched).with_span(span);
        event.attributes.insert(LEVEL_ATTRIBUTE, level.to_string());
        event.context = context.map(str::to_string);
        event
    }

    pub fn text(content: impl Into<String>, span: Span) -> Self {
        Event::new(EventKind::Text, EventState::None)
            .with_span(span)
            .with_content(content)
    }

    /// Paragraph delimiters never carry a source position.
    pub fn paragraph_open() -> Self {
        Event::new(EventKind::ParagraphOpen, EventState::None)
    }

    pub fn paragraph_close() -> Self {
        Event::new(EventKind::ParagraphClose, EventState::None)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn has_context(&self, context: &str) -> bool {
        self.context.as_deref() == Some(context)
    }

    pub fn level(&self) -> Option<usize> {
        self.attributes.get(LEVEL_ATTRIBUTE)?.trim().parse().ok()
    }

    /// The linking capability of a media event, whatever its payload.
    pub fn linking_mut(&mut self) -> Option<&mut dyn Linking> {
        match &mut self.kind {
            EventKind::InternalMedia(media) => Some(media),
            EventKind::Media => Some(&mut self.attributes),
            _ => None,
        }
    }

    pub fn linking(&self) -> Option<&dyn Linking> {
        match &self.kind {
            EventKind::InternalMedia(media) => Some(media),
            EventKind::Media => Some(&self.attributes),
            _ => None,
        }
    }
}
