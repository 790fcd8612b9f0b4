//! A cursor over a mutable event sequence.
//!
//! Rewrites walk the stream forward once and splice events in and out around
//! the cursor. Every splice leaves the cursor so that the next [`EventStream::advance`]
//! returns the event that followed the mutation point; callers never re-seek.

use crate::ir::events::Event;
use std::slice;

/// Misuse of the stream cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// The cursor is before the first event or past the last one.
    #[error("no current event: the cursor is not on an event")]
    NoCurrentEvent,
    /// The current event has no predecessor to step back to.
    #[error("no previous event before the cursor")]
    NoPreviousEvent,
}

/// Ordered, cursor-addressable sequence of events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStream {
    events: Vec<Event>,
    /// Index of the current event. `None` is the position before the first
    /// event; `Some(len)` means the stream is exhausted.
    cursor: Option<usize>,
}

impl EventStream {
    pub fn new(events: Vec<Event>) -> Self {
        EventStream {
            events,
            cursor: None,
        }
    }

    /// Places the cursor before the first event.
    pub fn move_to_start(&mut self) {
        self.cursor = None;
    }

    /// Moves to the next event and returns it, or `None` once exhausted.
    pub fn advance(&mut self) -> Option<&mut Event> {
        let next = self.cursor.map_or(0, |index| (index + 1).min(self.events.len()));
        self.cursor = Some(next);
        self.events.get_mut(next)
    }

    /// Index of the current event.
    pub fn position(&self) -> Result<usize, StreamError> {
        match self.cursor {
            Some(index) if index < self.events.len() => Ok(index),
            _ => Err(StreamError::NoCurrentEvent),
        }
    }

    pub fn current(&self) -> Result<&Event, StreamError> {
        let index = self.position()?;
        Ok(&self.events[index])
    }

    pub fn current_mut(&mut self) -> Result<&mut Event, StreamError> {
        let index = self.position()?;
        Ok(&mut self.events[index])
    }

    /// Inserts `event` just before the current one.
    ///
    /// The cursor keeps pointing at the same event, so the inserted one is
    /// never visited by this pass.
    pub fn insert_before(&mut self, event: Event) -> Result<(), StreamError> {
        let index = self.position()?;
        self.events.insert(index, event);
        self.cursor = Some(index + 1);
        Ok(())
    }

    /// Inserts `event` just after the current one; the next advance returns it.
    pub fn insert_after(&mut self, event: Event) -> Result<(), StreamError> {
        let index = self.position()?;
        self.events.insert(index + 1, event);
        Ok(())
    }

    /// Removes the current event and steps the cursor back to the previous one.
    ///
    /// The next advance resumes with the event that followed the removed one.
    /// Returns the removed event.
    pub fn delete_current_and_previous(&mut self) -> Result<Event, StreamError> {
        let index = self.position()?;
        if index == 0 {
            return Err(StreamError::NoPreviousEvent);
        }
        let removed = self.events.remove(index);
        self.cursor = Some(index - 1);
        Ok(removed)
    }

    /// Appends `event` at the end of the stream without moving the cursor.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Event> {
        self.events.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl From<Vec<Event>> for EventStream {
    fn from(events: Vec<Event>) -> Self {
        EventStream::new(events)
    }
}

impl From<EventStream> for Vec<Event> {
    fn from(stream: EventStream) -> Self {
        stream.events
    }
}

impl FromIterator<Event> for EventStream {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        EventStream::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EventStream {
    type Item = &'a Event;
    type IntoIter = slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::events::{EventKind, Span};

    fn other(name: &str) -> Event {
        Event::new(EventKind::Other(name.to_string()), Default::default())
    }

    fn names(stream: &EventStream) -> Vec<String> {
        stream.iter().map(|e| e.kind.name().to_string()).collect()
    }

    fn stream_of(names: &[&str]) -> EventStream {
        names.iter().map(|name| other(name)).collect()
    }

    #[test]
    fn test_advance_visits_all_then_stops() {
        let mut stream = stream_of(&["a", "b"]);
        assert_eq!(stream.advance().map(|e| e.kind.name().to_string()), Some("a".into()));
        assert_eq!(stream.advance().map(|e| e.kind.name().to_string()), Some("b".into()));
        assert!(stream.advance().is_none());
        assert!(stream.advance().is_none());
        assert_eq!(stream.current(), Err(StreamError::NoCurrentEvent));
    }

    #[test]
    fn test_current_before_first_advance() {
        let mut stream = stream_of(&["a"]);
        assert_eq!(stream.current(), Err(StreamError::NoCurrentEvent));
        assert_eq!(
            stream.insert_before(other("x")),
            Err(StreamError::NoCurrentEvent)
        );
        stream.advance();
        stream.move_to_start();
        assert_eq!(stream.current(), Err(StreamError::NoCurrentEvent));
    }

    #[test]
    fn test_insert_before_is_not_revisited() {
        let mut stream = stream_of(&["a", "b", "c"]);
        stream.advance();
        stream.advance();
        stream.insert_before(other("x")).unwrap();
        assert_eq!(stream.current().unwrap().kind.name(), "b");
        assert_eq!(stream.advance().unwrap().kind.name(), "c");
        assert_eq!(names(&stream), vec!["a", "x", "b", "c"]);
    }

    #[test]
    fn test_insert_after_is_visited_next() {
        let mut stream = stream_of(&["a", "b"]);
        stream.advance();
        stream.insert_after(other("x")).unwrap();
        assert_eq!(stream.current().unwrap().kind.name(), "a");
        assert_eq!(stream.advance().unwrap().kind.name(), "x");
        assert_eq!(stream.advance().unwrap().kind.name(), "b");
        assert!(stream.advance().is_none());
    }

    #[test]
    fn test_delete_resumes_with_following_event() {
        let mut stream = stream_of(&["a", "b", "c"]);
        stream.advance();
        stream.advance();
        let removed = stream.delete_current_and_previous().unwrap();
        assert_eq!(removed.kind.name(), "b");
        assert_eq!(stream.current().unwrap().kind.name(), "a");
        assert_eq!(stream.advance().unwrap().kind.name(), "c");
        assert_eq!(names(&stream), vec!["a", "c"]);
    }

    #[test]
    fn test_delete_last_event_exhausts() {
        let mut stream = stream_of(&["a", "b"]);
        stream.advance();
        stream.advance();
        stream.delete_current_and_previous().unwrap();
        assert!(stream.advance().is_none());
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn test_delete_without_previous_event() {
        let mut stream = stream_of(&["a", "b"]);
        stream.advance();
        assert_eq!(
            stream.delete_current_and_previous(),
            Err(StreamError::NoPreviousEvent)
        );
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn test_push_after_exhaustion() {
        let mut stream = stream_of(&["a"]);
        while stream.advance().is_some() {}
        stream.push(Event::synthetic(EventKind::SectionClose, 7));
        assert_eq!(stream.get(1).map(|e| e.span), Some(Span::at(7)));
        assert!(stream.advance().is_none());
    }

    #[test]
    fn test_empty_stream() {
        let mut stream = EventStream::default();
        assert!(stream.is_empty());
        assert!(stream.advance().is_none());
        assert_eq!(stream.position(), Err(StreamError::NoCurrentEvent));
    }
}
