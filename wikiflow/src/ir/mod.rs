//! Intermediate Representation (IR) for wiki-markup parse results.
//!
//! A parsed page is a flat, ordered stream of [`events::Event`]s as the
//! upstream markup parser emits them. The [`stream::EventStream`] wraps that
//! sequence with a cursor so rewrites can splice events in place, and
//! [`media`] holds the payloads of media calls together with the linking
//! capability they share.

pub mod events;
pub mod media;
pub mod stream;
