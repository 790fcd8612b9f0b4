//! Verifies that a normalized stream nests properly.
//!
//! Renderers rely on two guarantees after heading normalization: every heading
//! ENTER has exactly one matching EXIT carrying the same attributes (the ENTER
//! may additionally hold the collected heading text), and section boundaries
//! alternate open/close. This module checks both in one walk, using a stack of
//! open headings the same way the tree builder tracks open containers.

use crate::common::headings::NormalizeOptions;
use crate::ir::events::{Attributes, Event, EventKind, EventState};
use serde::Serialize;

/// Error type for balance checking
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    /// A heading EXIT with no heading open.
    #[error("heading exit at event {index} has no matching enter")]
    UnexpectedExit { index: usize },
    /// A heading EXIT whose attributes differ from its ENTER.
    #[error("heading exit at event {index} does not match the enter at event {enter}")]
    MismatchedHeading { index: usize, enter: usize },
    /// Headings still open at the end of the stream.
    #[error("{count} heading(s) left open")]
    UnclosedHeading { count: usize },
    #[error("section opened at event {index} while another section is open")]
    SectionAlreadyOpen { index: usize },
    #[error("section closed at event {index} while no section is open")]
    UnexpectedSectionClose { index: usize },
}

/// Counts gathered by a successful check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    /// Matched heading ENTER/EXIT pairs.
    pub headings: usize,
    pub sections_opened: usize,
    pub sections_closed: usize,
    /// A section is still open after the last event.
    pub section_open_at_end: bool,
}

/// Walks `events` and checks heading and section balance.
///
/// `section_open_on_entry` mirrors the parse context before the pass: when a
/// section was already open, the stream may start by closing it.
pub fn check_balance(
    events: &[Event],
    section_open_on_entry: bool,
    options: &NormalizeOptions,
) -> Result<BalanceReport, BalanceError> {
    let mut report = BalanceReport::default();
    let mut open_headings: Vec<(usize, Attributes)> = Vec::new();
    let mut section_open = section_open_on_entry;

    for (index, event) in events.iter().enumerate() {
        match (&event.kind, event.state) {
            (EventKind::Heading, EventState::Enter) => {
                open_headings.push((index, event.attributes.without(&options.text_attribute)));
            }
            (EventKind::Heading, EventState::Exit) => {
                let (enter, attributes) = open_headings
                    .pop()
                    .ok_or(BalanceError::UnexpectedExit { index })?;
                if attributes != event.attributes.without(&options.text_attribute) {
                    return Err(BalanceError::MismatchedHeading { index, enter });
                }
                report.headings += 1;
            }
            (EventKind::SectionOpen, _) => {
                if section_open {
                    return Err(BalanceError::SectionAlreadyOpen { index });
                }
                section_open = true;
                report.sections_opened += 1;
            }
            (EventKind::SectionClose, _) => {
                if !section_open {
                    return Err(BalanceError::UnexpectedSectionClose { index });
                }
                section_open = false;
                report.sections_closed += 1;
            }
            _ => {}
        }
    }

    if !open_headings.is_empty() {
        return Err(BalanceError::UnclosedHeading {
            count: open_headings.len(),
        });
    }

    report.section_open_at_end = section_open;
    Ok(report)
}
