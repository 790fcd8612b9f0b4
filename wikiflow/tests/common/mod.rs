//! Page builders shared by the integration tests.
//!
//! Events are laid out the way the upstream parser emits them: a heading line
//! is an unmatched marker followed by its body wrapped in a paragraph, and
//! paragraph delimiters carry no position.

use wikiflow::ir::events::{Event, Span, OUTLINE_CONTEXT};

#[derive(Debug, Default)]
pub struct PageBuilder {
    events: Vec<Event>,
    position: usize,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A heading line, `==` style: the marker takes `level + 1` characters.
    pub fn heading(mut self, level: usize, outline: bool, text: &str) -> Self {
        let context = outline.then_some(OUTLINE_CONTEXT);
        let marker = Span::new(self.position, self.position + level + 1);
        self.position = marker.last;
        self.events.push(Event::heading(level, context, marker));
        self.wrapped_text(text);
        self
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.wrapped_text(text);
        self
    }

    pub fn build(self) -> Vec<Event> {
        self.events
    }

    fn wrapped_text(&mut self, text: &str) {
        let span = Span::new(self.position, self.position + text.len());
        self.position = span.last + 1;
        self.events.push(Event::paragraph_open());
        self.events.push(Event::text(text, span));
        self.events.push(Event::paragraph_close());
    }
}
