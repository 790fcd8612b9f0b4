//! Pairs heading markers and wraps outline headings in sections.
//!
//! # The High-Level Concept
//!
//! The upstream parser matches a heading line as a single, unmatched heading
//! marker followed by the heading body, and it wraps that body in a paragraph
//! as if it were ordinary text. Renderers, on the other hand, expect a heading
//! to be an ENTER/EXIT pair around its content, and expect every outline
//! heading to open a document section that lasts until the next outline
//! heading or the end of the page.
//!
//! This pass rewrites the stream in place in one forward walk. The heading
//! marker becomes the ENTER event; the paragraph close that ends the heading
//! body becomes the EXIT event (plus the section open for outline headings);
//! the paragraph delimiters the parser put around the body are dropped.
//!
//! # The Algorithm
//!
//! 1. **Initialization:**
//!    - Heading mode is outside, no section opened, empty text buffer
//!    - Move the stream to its start
//!
//! 2. **Every Event:**
//!    - Track the last end position of real events. Paragraph delimiters are
//!      always at position 0 and never move it back.
//!    - An existing section close marks the section as closed.
//!
//! 3. **Heading Marker:**
//!    - Tag it ENTER and remember it as the open heading
//!    - For an outline heading, close the section left open by the previous
//!      one (the parse context says whether there is one)
//!
//! 4. **Inside a Heading:**
//!    - Media are rendered without link
//!    - Paragraph open: dropped
//!    - Paragraph close: replaced by the heading EXIT. For outline headings,
//!      the collected text is stored on the ENTER event and a section open
//!      follows the EXIT
//!    - Anything else: unmatched constructs are folded into the heading and
//!      text is collected
//!
//! 5. **Completion:**
//!    - A section opened by this pass is closed at the last end position
//!
//! Example, for an outline heading of level 1 on a page with no open section:
//! ```text
//! heading(unmatched)      ->  heading(enter, heading_text="Intro")
//! paragraph-open          ->  text "Intro"
//! text "Intro"            ->  heading(exit)
//! paragraph-close         ->  section-open(level=1)
//!                             section-close
//! ```

use crate::ir::events::{
    Event, EventKind, EventState, Span, HEADING_TEXT_ATTRIBUTE, LEVEL_ATTRIBUTE, OUTLINE_CONTEXT,
};
use crate::ir::stream::{EventStream, StreamError};

/// Error type for heading normalization
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// The heading markers and paragraph delimiters do not pair up.
    #[error("malformed heading sequence at position {position}: {reason}")]
    MalformedHeadingSequence { position: usize, reason: String },
}

/// State of the page being parsed that outlives a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// A section is open and has not been closed yet.
    pub section_open: bool,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section_open(section_open: bool) -> Self {
        ParseContext { section_open }
    }
}

/// Names the pass uses to recognize and annotate headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Heading context that takes part in sectioning.
    pub outline_context: String,
    /// Attribute receiving the text of an outline heading.
    pub text_attribute: String,
    /// Attribute holding the heading level, copied onto the section open.
    pub level_attribute: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions {
            outline_context: OUTLINE_CONTEXT.to_string(),
            text_attribute: HEADING_TEXT_ATTRIBUTE.to_string(),
            level_attribute: LEVEL_ATTRIBUTE.to_string(),
        }
    }
}

/// Runs [`HeadingNormalizer`] with the default options.
pub fn normalize(stream: &mut EventStream, context: &mut ParseContext) -> Result<(), NormalizeError> {
    HeadingNormalizer::default().run(stream, context)
}

/// The heading and section rewrite pass.
#[derive(Debug, Clone, Default)]
pub struct HeadingNormalizer {
    options: NormalizeOptions,
}

impl HeadingNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        HeadingNormalizer { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Rewrites `stream` in place. `context` is read and updated as sections
    /// are closed and opened.
    pub fn run(
        &self,
        stream: &mut EventStream,
        context: &mut ParseContext,
    ) -> Result<(), NormalizeError> {
        let mut pass = Pass::new(&self.options);
        stream.move_to_start();
        while stream.advance().is_some() {
            pass.visit(stream, context)?;
        }
        pass.finish(stream, context)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingMode {
    Outside,
    /// Index of the ENTER event in the stream.
    Inside { heading: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionMode {
    None,
    OpenedByUs,
    Closed,
}

/// Transient state of one walk over a stream.
struct Pass<'a> {
    options: &'a NormalizeOptions,
    heading: HeadingMode,
    section: SectionMode,
    text: String,
    last_end: Option<usize>,
}

impl<'a> Pass<'a> {
    fn new(options: &'a NormalizeOptions) -> Self {
        Pass {
            options,
            heading: HeadingMode::Outside,
            section: SectionMode::None,
            text: String::new(),
            last_end: None,
        }
    }

    fn visit(
        &mut self,
        stream: &mut EventStream,
        context: &mut ParseContext,
    ) -> Result<(), NormalizeError> {
        let event = stream.current_mut()?;
        self.track_end(event.span);

        if event.kind == EventKind::Heading {
            return self.enter_heading(stream, context);
        }

        if event.kind == EventKind::SectionClose {
            if self.section == SectionMode::OpenedByUs {
                context.section_open = false;
            }
            self.section = SectionMode::Closed;
        }

        if let HeadingMode::Inside { .. } = self.heading {
            if event.kind.is_media() {
                if let Some(media) = event.linking_mut() {
                    media.disable_linking();
                }
                return Ok(());
            }
            match event.kind {
                EventKind::ParagraphOpen => {
                    stream.delete_current_and_previous()?;
                }
                EventKind::ParagraphClose => {
                    return self.exit_heading(stream, context);
                }
                _ => {
                    let is_text = event.kind == EventKind::Text;
                    if event.state == EventState::Unmatched {
                        log::trace!("folding unmatched {} into heading", event.kind.name());
                        event.kind = EventKind::Heading;
                    }
                    if is_text {
                        self.collect_text(&event.content);
                    }
                }
            }
        }

        Ok(())
    }

    fn finish(self, stream: &mut EventStream, context: &mut ParseContext) -> Result<(), NormalizeError> {
        if let HeadingMode::Inside { heading } = self.heading {
            let position = stream.get(heading).map_or(0, |event| event.span.first);
            return Err(NormalizeError::MalformedHeadingSequence {
                position,
                reason: "the stream ended before the heading body was closed".to_string(),
            });
        }

        if self.section == SectionMode::OpenedByUs {
            let position = self.last_end.unwrap_or(0);
            log::debug!("closing the last section at {position}");
            context.section_open = false;
            stream.push(Event::synthetic(EventKind::SectionClose, position));
        }

        Ok(())
    }

    /// Paragraph delimiters sit at position 0 and are skipped by the
    /// `first >= last_end` test.
    fn track_end(&mut self, span: Span) {
        match self.last_end {
            Some(last) if span.first < last => {}
            _ => self.last_end = Some(span.last),
        }
    }

    fn enter_heading(
        &mut self,
        stream: &mut EventStream,
        context: &mut ParseContext,
    ) -> Result<(), NormalizeError> {
        let event = stream.current_mut()?;

        if let HeadingMode::Inside { .. } = self.heading {
            return Err(NormalizeError::MalformedHeadingSequence {
                position: event.span.first,
                reason: "a heading starts before the previous heading body was closed"
                    .to_string(),
            });
        }

        event.state = EventState::Enter;
        let outline = event.has_context(&self.options.outline_context);
        let span = event.span;
        log::debug!(
            "heading at {span} (level {})",
            event.attributes.get(&self.options.level_attribute).unwrap_or("?")
        );

        if outline && context.section_open {
            log::debug!("closing the previous section at {}", span.last);
            stream.insert_before(Event::synthetic(EventKind::SectionClose, span.last))?;
            context.section_open = false;
            self.section = SectionMode::Closed;
        }

        self.text.clear();
        self.heading = HeadingMode::Inside {
            heading: stream.position()?,
        };
        Ok(())
    }

    fn exit_heading(
        &mut self,
        stream: &mut EventStream,
        context: &mut ParseContext,
    ) -> Result<(), NormalizeError> {
        let HeadingMode::Inside { heading } = self.heading else {
            return Ok(());
        };
        let Some(opening) = stream.get(heading).cloned() else {
            return Err(NormalizeError::MalformedHeadingSequence {
                position: self.last_end.unwrap_or(0),
                reason: format!("the opened heading at event {heading} is gone"),
            });
        };

        let mut exit = Event::new(EventKind::Heading, EventState::Exit)
            .with_attributes(opening.attributes.clone())
            .with_span(Span::at(self.last_end.unwrap_or(opening.span.last)));
        exit.context = opening.context.clone();
        stream.insert_before(exit)?;

        if opening.has_context(&self.options.outline_context) {
            let text = std::mem::take(&mut self.text);
            if let Some(enter) = stream.get_mut(heading) {
                enter
                    .attributes
                    .insert(self.options.text_attribute.as_str(), text);
            }

            let mut open = Event::synthetic(EventKind::SectionOpen, opening.span.first);
            if let Some(level) = opening.attributes.get(&self.options.level_attribute) {
                open.attributes
                    .insert(self.options.level_attribute.as_str(), level);
            }
            log::debug!("opening a section at {}", opening.span.first);
            stream.insert_before(open)?;
            context.section_open = true;
            self.section = SectionMode::OpenedByUs;
        }

        self.heading = HeadingMode::Outside;
        self.text.clear();
        stream.delete_current_and_previous()?;
        Ok(())
    }

    fn collect_text(&mut self, content: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(content.trim());
    }
}
