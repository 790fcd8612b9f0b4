use std::collections::HashMap;
use wikiflow::ir::events::{EventKind, Span};
use wikiflow::ir::media::LinkingMode;
use wikiflow::{
    check_balance, normalize, EventStream, FormatRegistry, NormalizeOptions, ParseContext,
};

const TOUR: &str = include_str!("fixtures/tour.json");

fn normalized_tour() -> (EventStream, ParseContext) {
    let registry = FormatRegistry::default();
    let events = registry.parse(TOUR, "json").expect("Failed to parse fixture");
    let mut stream = EventStream::new(events);
    let mut context = ParseContext::new();
    normalize(&mut stream, &mut context).expect("Failed to normalize");
    (stream, context)
}

#[test]
fn test_tour_tag_view() {
    let (stream, _) = normalized_tour();

    let mut options = HashMap::new();
    options.insert("show-spans".to_string(), "false".to_string());
    let view = FormatRegistry::default()
        .serialize_with_options(stream.as_slice(), "tag", &options)
        .unwrap();

    insta::assert_snapshot!(view, @r###"
    <heading context="outline" heading_text="Getting started" level="1">
      <text>Getting started</text>
    </heading>
    <section level="1">
      <paragraph>
        <text>Install the tool.</text>
      </paragraph>
      <heading level="3">
        <text>Aside</text>
      </heading>
    </section>
    <heading context="outline" heading_text="Logo" level="2">
      <text>Logo</text>
      <internal-media src="wiki:logo.png" linking="nolink"/>
    </heading>
    <section level="2">
      <paragraph>
        <text>The end.</text>
      </paragraph>
    </section>
    "###);
}

#[test]
fn test_tour_positions() {
    let (stream, context) = normalized_tour();
    let events = stream.as_slice();
    assert!(!context.section_open);

    let positions: Vec<(&str, Span)> = events
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                EventKind::Heading | EventKind::SectionOpen | EventKind::SectionClose
            )
        })
        .map(|e| (e.kind.name(), e.span))
        .collect();

    assert_eq!(
        positions,
        vec![
            ("heading", Span::new(0, 2)),
            ("heading", Span::at(17)),
            ("section-open", Span::at(0)),
            ("heading", Span::new(36, 40)),
            ("heading", Span::at(45)),
            ("section-close", Span::at(49)),
            ("heading", Span::new(46, 49)),
            ("heading", Span::at(70)),
            ("section-open", Span::at(46)),
            ("section-close", Span::at(79)),
        ]
    );
}

#[test]
fn test_tour_is_balanced() {
    let (stream, _) = normalized_tour();
    let report = check_balance(stream.as_slice(), false, &NormalizeOptions::default()).unwrap();

    assert_eq!(report.headings, 3);
    assert_eq!(report.sections_opened, 2);
    assert_eq!(report.sections_closed, 2);
    assert!(!report.section_open_at_end);
}

#[test]
fn test_tour_media_loses_its_link() {
    let (stream, _) = normalized_tour();
    let media = stream
        .iter()
        .find_map(|e| match &e.kind {
            EventKind::InternalMedia(media) => Some(media),
            _ => None,
        })
        .expect("media survives normalization");

    assert_eq!(media.src, "wiki:logo.png");
    assert_eq!(media.linking, LinkingMode::NoLink);
}

#[test]
fn test_tour_output_reads_back() {
    let (stream, _) = normalized_tour();
    let registry = FormatRegistry::default();

    let json = registry.serialize(stream.as_slice(), "json").unwrap();
    let events = registry.parse(&json, "json").unwrap();
    assert_eq!(events, stream.into_events());
}
