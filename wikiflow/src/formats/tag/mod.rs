//! XML-like event stream view
//!
//! Renders a flat event stream as indented tags so the nesting implied by
//! ENTER/EXIT pairs and section boundaries becomes visible. Output only; there
//! is no parser for it.
//!
//! ## Format
//!
//! - ENTER events and `section-open`/`paragraph-open` → opening tag, indent +1
//! - EXIT events and `section-close`/`paragraph-close` → closing tag, indent -1
//! - Everything else → one self-contained tag, with the event content as text
//! - Context, attributes and span → tag attributes
//!
//! ## Example
//!
//! ```text
//! <heading context="outline" heading_text="Intro" level="1" span="0..8">
//!   <text span="8..13">Intro</text>
//! </heading>
//! <section level="1" span="0..0">
//! </section>
//! ```

use crate::error::FormatError;
use crate::format::{bool_option, reject_unknown_options, Format};
use crate::ir::events::{Event, EventKind, EventState};
use std::collections::HashMap;

/// Where a tag sits in the nesting.
enum Shape<'a> {
    Open(&'a str),
    Close(&'a str),
    Leaf(&'a str),
}

fn shape(event: &Event) -> Shape<'_> {
    match (&event.kind, event.state) {
        (EventKind::SectionOpen, _) => Shape::Open("section"),
        (EventKind::SectionClose, _) => Shape::Close("section"),
        (EventKind::ParagraphOpen, _) => Shape::Open("paragraph"),
        (EventKind::ParagraphClose, _) => Shape::Close("paragraph"),
        (kind, EventState::Enter) => Shape::Open(kind.name()),
        (kind, EventState::Exit) => Shape::Close(kind.name()),
        (kind, _) => Shape::Leaf(kind.name()),
    }
}

/// Tag attributes for an event, in display order.
fn tag_attributes(event: &Event, show_attributes: bool, show_spans: bool) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if show_attributes {
        if let Some(context) = &event.context {
            pairs.push(("context", context.clone()));
        }
        if let EventKind::InternalMedia(media) = &event.kind {
            pairs.push(("src", media.src.clone()));
            for (key, value) in [
                ("title", &media.title),
                ("align", &media.align),
                ("width", &media.width),
                ("height", &media.height),
                ("cache", &media.cache),
            ] {
                if let Some(value) = value {
                    pairs.push((key, value.clone()));
                }
            }
            pairs.push(("linking", media.linking.to_string()));
        }
        for (key, value) in &event.attributes {
            pairs.push((key.as_str(), value.clone()));
        }
    }
    if event.state == EventState::Unmatched {
        pairs.push(("state", "unmatched".to_string()));
    }
    if show_spans {
        pairs.push(("span", event.span.to_string()));
    }

    pairs
        .iter()
        .map(|(key, value)| format!(" {key}=\"{}\"", escape_xml(value)))
        .collect()
}

/// Serialize events to the tag view
pub fn serialize_events(events: &[Event]) -> String {
    render(events, true, true)
}

fn render(events: &[Event], show_attributes: bool, show_spans: bool) -> String {
    let mut output = String::new();
    let mut depth = 0usize;

    for event in events {
        let attrs = tag_attributes(event, show_attributes, show_spans);
        match shape(event) {
            Shape::Open(tag) => {
                output.push_str(&format!("{}<{tag}{attrs}>\n", "  ".repeat(depth)));
                depth += 1;
            }
            Shape::Close(tag) => {
                // Stray closers in malformed streams stay at the left margin.
                depth = depth.saturating_sub(1);
                output.push_str(&format!("{}</{tag}>\n", "  ".repeat(depth)));
            }
            Shape::Leaf(tag) if event.content.is_empty() => {
                output.push_str(&format!("{}<{tag}{attrs}/>\n", "  ".repeat(depth)));
            }
            Shape::Leaf(tag) => {
                output.push_str(&format!(
                    "{}<{tag}{attrs}>{}</{tag}>\n",
                    "  ".repeat(depth),
                    escape_xml(&event.content)
                ));
            }
        }
    }

    output
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}

/// Format implementation for the XML-like tag view
#[derive(Debug, Clone)]
pub struct TagFormat {
    pub show_spans: bool,
    pub show_attributes: bool,
}

impl Default for TagFormat {
    fn default() -> Self {
        TagFormat {
            show_spans: true,
            show_attributes: true,
        }
    }
}

impl Format for TagFormat {
    fn name(&self) -> &str {
        "tag"
    }

    fn description(&self) -> &str {
        "XML-like view of the event nesting"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tag"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, events: &[Event]) -> Result<String, FormatError> {
        Ok(render(events, self.show_attributes, self.show_spans))
    }

    fn serialize_with_options(
        &self,
        events: &[Event],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        reject_unknown_options(self.name(), options, &["show-spans", "show-attributes"])?;
        let show_spans = bool_option(options, "show-spans", self.show_spans)?;
        let show_attributes = bool_option(options, "show-attributes", self.show_attributes)?;
        Ok(render(events, show_attributes, show_spans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::events::{Span, OUTLINE_CONTEXT};
    use crate::ir::media::{InternalMedia, LinkingMode};

    fn normalized_intro() -> Vec<Event> {
        vec![
            Event::new(EventKind::Heading, EventState::Enter)
                .with_context(OUTLINE_CONTEXT)
                .with_attribute("level", "1")
                .with_attribute("heading_text", "Intro")
                .with_span(Span::new(0, 8)),
            Event::text("Intro", Span::new(8, 13)),
            Event::new(EventKind::Heading, EventState::Exit)
                .with_context(OUTLINE_CONTEXT)
                .with_attribute("level", "1")
                .with_span(Span::at(13)),
            Event::synthetic(EventKind::SectionOpen, 0).with_attribute("level", "1"),
            Event::synthetic(EventKind::SectionClose, 13),
        ]
    }

    #[test]
    fn test_serialize_normalized_heading() {
        let output = serialize_events(&normalized_intro());
        insta::assert_snapshot!(output, @r###"
        <heading context="outline" heading_text="Intro" level="1" span="0..8">
          <text span="8..13">Intro</text>
        </heading>
        <section level="1" span="0..0">
        </section>
        "###);
    }

    #[test]
    fn test_hide_spans_and_attributes() {
        let mut options = HashMap::new();
        options.insert("show-spans".to_string(), "false".to_string());
        options.insert("show-attributes".to_string(), "no".to_string());

        let output = TagFormat::default()
            .serialize_with_options(&normalized_intro(), &options)
            .unwrap();
        assert_eq!(
            output,
            "<heading>\n  <text>Intro</text>\n</heading>\n<section>\n</section>\n"
        );
    }

    #[test]
    fn test_unmatched_heading_is_marked() {
        let events = vec![Event::heading(2, None, Span::new(3, 6))];
        let output = serialize_events(&events);
        assert_eq!(output, "<heading level=\"2\" state=\"unmatched\" span=\"3..6\"/>\n");
    }

    #[test]
    fn test_internal_media_payload() {
        let mut media = InternalMedia::new("wiki:a&b.png");
        media.width = Some("200".to_string());
        media.linking = LinkingMode::NoLink;
        let events = vec![Event::new(EventKind::InternalMedia(media), EventState::None)];

        let mut options = HashMap::new();
        options.insert("show-spans".to_string(), "false".to_string());
        let output = TagFormat::default()
            .serialize_with_options(&events, &options)
            .unwrap();
        assert_eq!(
            output,
            "<internal-media src=\"wiki:a&amp;b.png\" width=\"200\" linking=\"nolink\"/>\n"
        );
    }

    #[test]
    fn test_stray_close_does_not_underflow() {
        let events = vec![
            Event::synthetic(EventKind::SectionClose, 0),
            Event::paragraph_open(),
            Event::text("a < b", Span::new(0, 5)),
            Event::paragraph_close(),
        ];
        let mut options = HashMap::new();
        options.insert("show-spans".to_string(), "false".to_string());
        let output = TagFormat::default()
            .serialize_with_options(&events, &options)
            .unwrap();
        assert_eq!(
            output,
            "</section>\n<paragraph>\n  <text>a &lt; b</text>\n</paragraph>\n"
        );
    }

    #[test]
    fn test_invalid_option_value() {
        let mut options = HashMap::new();
        options.insert("show-spans".to_string(), "maybe".to_string());
        let result = TagFormat::default().serialize_with_options(&[], &options);
        assert!(matches!(result, Err(FormatError::NotSupported(_))));
    }
}
