//! Heading and section normalization for wiki-markup event streams
//!
//!     The upstream markup parser turns a page into a flat list of events, one per matched
//!     syntax construct. Headings arrive as single unmatched markers followed by their inline
//!     content and the paragraph close that ends the line. Renderers want something else: a
//!     heading bracketed by ENTER/EXIT events, with the paragraph wrapping removed and every
//!     outline heading opening a section that the next one (or the end of the page) closes.
//!     This crate performs that rewrite, in place, in a single forward pass.
//!
//!     This is a pure lib, that is, it powers wikiflow-cli but is shell agnostic: no code
//!     here should suppose a shell environment, be it std print, env vars etc.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # Format errors
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── json                # Event streams as JSON arrays (read and write)
//!     │   └── tag                 # Indented tag view (write only)
//!     ├── lib.rs
//!     ├── ir                      # Events, the cursor stream, media payloads
//!     └── common                  # Heading normalization and balance checks
//!
//! Core Algorithm
//!
//!     See ./common/headings.rs. The pass keeps a two-state heading mode and a flag telling
//!     whether it opened a section that is still pending. Everything it inserts is placed
//!     behind the cursor, so inserted events are never revisited.
//!
//!     The parse context outlives a single pass: a page can be normalized in chunks, and a
//!     section left open by one chunk is closed by the next outline heading, or by the end
//!     of the chunk that finds it open.
//!
//!     ./common/balance.rs verifies the result: headings pair up with identical attributes,
//!     and section boundaries alternate.
//!
//! Formats
//!
//!     Stream formats implement the Format trait, a name, file extensions and
//!     parse()/serialize(), and are looked up through the FormatRegistry.
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common                  # Page builder
//!     └── normalize
//!         ├── pages.rs            # A fixture page through parse, normalize and render
//!         ├── chunks.rs           # One parse context across several passes
//!         ├── properties.rs       # proptest invariants over generated pages
//!         └── fixtures

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod registry;

pub use common::balance::{check_balance, BalanceError, BalanceReport};
pub use common::headings::{
    normalize, HeadingNormalizer, NormalizeError, NormalizeOptions, ParseContext,
};
pub use error::FormatError;
pub use format::Format;
pub use ir::events::{Attributes, Event, EventKind, EventState, Span};
pub use ir::media::{InternalMedia, Linking, LinkingMode};
pub use ir::stream::{EventStream, StreamError};
pub use registry::FormatRegistry;
