//! A page normalized in several passes that share one parse context.

use crate::common::PageBuilder;
use wikiflow::ir::events::{Event, EventKind};
use wikiflow::{normalize, EventStream, ParseContext};

fn pass(events: Vec<Event>, context: &mut ParseContext) -> Vec<&'static str> {
    let mut stream = EventStream::new(events);
    normalize(&mut stream, context).expect("Failed to normalize");
    stream
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::SectionOpen => Some("open"),
            EventKind::SectionClose => Some("close"),
            _ => None,
        })
        .collect()
}

#[test]
fn test_section_left_open_by_caller_spans_chunks() {
    let mut context = ParseContext::with_section_open(true);

    // No outline heading: the open section is left alone.
    let first = PageBuilder::new()
        .paragraph("Still in the previous section.")
        .heading(4, false, "Aside")
        .build();
    assert!(pass(first, &mut context).is_empty());
    assert!(context.section_open);

    // The next outline heading closes it before opening its own.
    let second = PageBuilder::new()
        .heading(1, true, "Fresh start")
        .paragraph("Body")
        .build();
    assert_eq!(pass(second, &mut context), vec!["close", "open", "close"]);
    assert!(!context.section_open);
}

#[test]
fn test_each_chunk_closes_its_own_sections() {
    let mut context = ParseContext::new();
    for title in ["One", "Two", "Three"] {
        let chunk = PageBuilder::new().heading(2, true, title).build();
        assert_eq!(pass(chunk, &mut context), vec!["open", "close"]);
        assert!(!context.section_open);
    }
}

#[test]
fn test_empty_chunk_keeps_context() {
    let mut context = ParseContext::with_section_open(true);
    assert!(pass(Vec::new(), &mut context).is_empty());
    assert!(context.section_open);
}
