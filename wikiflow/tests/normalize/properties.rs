//! Invariants that hold for every well-formed page.

use crate::common::PageBuilder;
use proptest::prelude::*;
use wikiflow::ir::events::{EventKind, EventState, HEADING_TEXT_ATTRIBUTE, OUTLINE_CONTEXT};
use wikiflow::{check_balance, normalize, EventStream, NormalizeOptions, ParseContext};

#[derive(Debug, Clone)]
enum Block {
    Heading {
        level: usize,
        outline: bool,
        text: String,
    },
    Paragraph(String),
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        (1usize..=6, any::<bool>(), "[a-z]{1,8}").prop_map(|(level, outline, text)| {
            Block::Heading {
                level,
                outline,
                text,
            }
        }),
        "[a-z ]{0,12}[a-z]".prop_map(Block::Paragraph),
    ]
}

fn page(blocks: &[Block]) -> PageBuilder {
    blocks
        .iter()
        .fold(PageBuilder::new(), |builder, block| match block {
            Block::Heading {
                level,
                outline,
                text,
            } => builder.heading(*level, *outline, text),
            Block::Paragraph(text) => builder.paragraph(text),
        })
}

proptest! {
    #[test]
    fn normalized_pages_are_balanced(
        blocks in prop::collection::vec(block(), 0..12),
        section_open in any::<bool>(),
    ) {
        let mut stream = EventStream::new(page(&blocks).build());
        let mut context = ParseContext::with_section_open(section_open);
        normalize(&mut stream, &mut context).unwrap();

        let report = check_balance(stream.as_slice(), section_open, &NormalizeOptions::default());
        prop_assert!(report.is_ok(), "unbalanced: {:?}", report);
        let report = report.unwrap();

        let headings = blocks.iter().filter(|b| matches!(b, Block::Heading { .. })).count();
        let outlines = blocks
            .iter()
            .filter(|b| matches!(b, Block::Heading { outline: true, .. }))
            .count();
        prop_assert_eq!(report.headings, headings);
        prop_assert_eq!(report.sections_opened, outlines);
        prop_assert_eq!(report.section_open_at_end, context.section_open);
        if outlines > 0 {
            prop_assert!(!context.section_open);
        } else {
            prop_assert_eq!(context.section_open, section_open);
        }
    }

    #[test]
    fn heading_bodies_lose_their_paragraphs(blocks in prop::collection::vec(block(), 0..12)) {
        let mut stream = EventStream::new(page(&blocks).build());
        normalize(&mut stream, &mut ParseContext::new()).unwrap();

        let paragraphs = blocks.iter().filter(|b| matches!(b, Block::Paragraph(_))).count();
        let opens = stream.iter().filter(|e| e.kind == EventKind::ParagraphOpen).count();
        let closes = stream.iter().filter(|e| e.kind == EventKind::ParagraphClose).count();
        prop_assert_eq!(opens, paragraphs);
        prop_assert_eq!(closes, paragraphs);
    }

    #[test]
    fn outline_headings_carry_their_text(blocks in prop::collection::vec(block(), 0..12)) {
        let mut stream = EventStream::new(page(&blocks).build());
        normalize(&mut stream, &mut ParseContext::new()).unwrap();

        let expected: Vec<Option<&str>> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading { outline, text, .. } => Some(outline.then_some(text.as_str())),
                Block::Paragraph(_) => None,
            })
            .collect();
        let mut actual: Vec<Option<&str>> = Vec::new();
        for enter in stream
            .iter()
            .filter(|e| e.kind == EventKind::Heading && e.state == EventState::Enter)
        {
            prop_assert_eq!(
                enter.has_context(OUTLINE_CONTEXT),
                enter.attributes.contains_key(HEADING_TEXT_ATTRIBUTE)
            );
            actual.push(enter.attributes.get(HEADING_TEXT_ATTRIBUTE));
        }
        prop_assert_eq!(actual, expected);
    }
}
