use crate::VirtualKey;

use std::{fmt, slice, time::Duration};

/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Key pressed (or auto-repeated while held).
    Down,
    /// Key released.
    Up,
}

/// A single captured key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that changed state.
    pub key: VirtualKey,
    /// Whether the key went down or up.
    pub transition: Transition,
    /// Elapsed time since recording started.
    pub timestamp: Duration,
}

impl KeyEvent {
    /// Create an event at `timestamp` after the start of recording.
    pub fn new(key: VirtualKey, transition: Transition, timestamp: Duration) -> Self {
        Self {
            key,
            transition,
            timestamp,
        }
    }

    /// Shorthand for a `Down` event at `millis` milliseconds.
    pub fn down(key: VirtualKey, millis: u64) -> Self {
        Self::new(key, Transition::Down, Duration::from_millis(millis))
    }

    /// Shorthand for an `Up` event at `millis` milliseconds.
    pub fn up(key: VirtualKey, millis: u64) -> Self {
        Self::new(key, Transition::Up, Duration::from_millis(millis))
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} at {}ms",
            self.transition,
            self.key,
            self.timestamp.as_millis()
        )
    }
}

/// Ordered record of key transitions produced by capture.
///
/// Append-only while a recording is running; once handed to translation it is
/// only ever read. Consecutive `Down` events for a held key are normal OS
/// auto-repeat and are kept here verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEventStream {
    events: Vec<KeyEvent>,
}

impl KeyEventStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Timestamps earlier than the last event are raised to
    /// it so the stream stays non-decreasing.
    pub fn push(&mut self, mut event: KeyEvent) {
        if let Some(last) = self.events.last() {
            event.timestamp = event.timestamp.max(last.timestamp);
        }
        self.events.push(event);
    }

    /// Number of captured events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate events in capture order.
    pub fn iter(&self) -> slice::Iter<'_, KeyEvent> {
        self.events.iter()
    }

    /// Borrow the events as a slice.
    pub fn as_slice(&self) -> &[KeyEvent] {
        &self.events
    }
}

impl FromIterator<KeyEvent> for KeyEventStream {
    fn from_iter<T: IntoIterator<Item = KeyEvent>>(iter: T) -> Self {
        let mut stream = KeyEventStream::new();
        for event in iter {
            stream.push(event);
        }
        stream
    }
}

impl<'a> IntoIterator for &'a KeyEventStream {
    type Item = &'a KeyEvent;
    type IntoIter = slice::Iter<'a, KeyEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
