//! Linear play queue
//!
//! The queue is replaced wholesale whenever the listener picks a new browsing
//! context ("play this artist's tracks"). A cursor marks the current element
//! and only ever moves by one; stepping past either end is refused rather than
//! wrapping around.
//!
//! ```text
//!   [ A ][ B ][ C ][ D ]
//!          ^
//!        cursor = Some(1)
//! ```

use crate::error::{PlaybackError, Result};
use encore_core::Track;

/// Ordered tracks plus a cursor (`None` while empty)
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all tracks and position the cursor at `start`
    ///
    /// `start` must address an element; for an empty list only `0` is
    /// accepted and the cursor becomes `None`. On error the queue is left
    /// untouched.
    pub fn replace(&mut self, tracks: Vec<Track>, start: usize) -> Result<()> {
        if tracks.is_empty() {
            if start != 0 {
                return Err(PlaybackError::IndexOutOfBounds {
                    index: start,
                    len: 0,
                });
            }
            self.clear();
            return Ok(());
        }

        if start >= tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index: start,
                len: tracks.len(),
            });
        }

        self.tracks = tracks;
        self.cursor = Some(start);
        Ok(())
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = None;
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Whether the cursor can move forward
    pub fn has_next(&self) -> bool {
        self.cursor.is_some_and(|i| i + 1 < self.tracks.len())
    }

    /// Whether the cursor can move backward
    pub fn has_previous(&self) -> bool {
        self.cursor.is_some_and(|i| i > 0)
    }

    /// Move the cursor forward by one
    ///
    /// Returns `None` (cursor unchanged) at the last element.
    pub fn advance(&mut self) -> Option<&Track> {
        if !self.has_next() {
            return None;
        }
        let next = self.cursor.map_or(0, |i| i + 1);
        self.cursor = Some(next);
        self.tracks.get(next)
    }

    /// Move the cursor backward by one
    ///
    /// Returns `None` (cursor unchanged) at the first element.
    pub fn retreat(&mut self) -> Option<&Track> {
        if !self.has_previous() {
            return None;
        }
        let prev = self.cursor.map_or(0, |i| i - 1);
        self.cursor = Some(prev);
        self.tracks.get(prev)
    }

    /// Jump the cursor to `index`
    pub fn select(&mut self, index: usize) -> Result<&Track> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index,
                len: self.tracks.len(),
            });
        }
        self.cursor = Some(index);
        Ok(&self.tracks[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::ArtistId;

    fn track(title: &str) -> Track {
        Track::new(
            ArtistId::new("artist"),
            title,
            format!("https://cdn/{}.mp3", title),
            120,
        )
    }

    fn abc() -> Vec<Track> {
        vec![track("A"), track("B"), track("C")]
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
        assert!(queue.current().is_none());
    }

    #[test]
    fn replace_sets_cursor() {
        let mut queue = Queue::new();
        queue.replace(abc(), 2).unwrap();
        assert_eq!(queue.current_index(), Some(2));
        assert_eq!(queue.current().unwrap().title, "C");
    }

    #[test]
    fn replace_rejects_out_of_range_start() {
        let mut queue = Queue::new();
        queue.replace(abc(), 0).unwrap();

        let err = queue.replace(vec![track("X")], 1).unwrap_err();
        assert!(matches!(
            err,
            PlaybackError::IndexOutOfBounds { index: 1, len: 1 }
        ));

        // Previous contents survive
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current().unwrap().title, "A");
    }

    #[test]
    fn replace_with_empty_clears() {
        let mut queue = Queue::new();
        queue.replace(abc(), 1).unwrap();
        queue.replace(Vec::new(), 0).unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);

        assert!(queue.replace(Vec::new(), 1).is_err());
    }

    #[test]
    fn advance_stops_at_end() {
        let mut queue = Queue::new();
        queue.replace(abc(), 0).unwrap();

        assert_eq!(queue.advance().unwrap().title, "B");
        assert_eq!(queue.advance().unwrap().title, "C");
        assert!(queue.advance().is_none());
        assert_eq!(queue.current_index(), Some(2));
    }

    #[test]
    fn retreat_stops_at_start() {
        let mut queue = Queue::new();
        queue.replace(abc(), 1).unwrap();

        assert_eq!(queue.retreat().unwrap().title, "A");
        assert!(queue.retreat().is_none());
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn empty_queue_never_moves() {
        let mut queue = Queue::new();
        assert!(queue.advance().is_none());
        assert!(queue.retreat().is_none());
        assert!(!queue.has_next());
        assert!(!queue.has_previous());
    }

    #[test]
    fn select_jumps() {
        let mut queue = Queue::new();
        queue.replace(abc(), 0).unwrap();
        assert_eq!(queue.select(2).unwrap().title, "C");
        assert!(queue.select(3).is_err());
        assert_eq!(queue.current_index(), Some(2));
    }
}
