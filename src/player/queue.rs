//! Ordered play queue with a current position.
//!
//! The queue only ever stores playable tracks. Positions wrap in both
//! directions; shuffle picks a uniformly random position for forward moves
//! only.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Direction, Track};

pub struct Queue {
    tracks: Vec<Track>,
    current: usize,
    rng: StdRng,
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// A queue whose shuffle picks are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            tracks: Vec::new(),
            current: 0,
            rng,
        }
    }

    /// Replace the contents with the playable subset of `tracks`, keeping
    /// their order, and rewind to the first position.
    pub fn set(&mut self, tracks: Vec<Track>) {
        let offered = tracks.len();
        self.tracks = tracks.into_iter().filter(Track::is_playable).collect();
        self.current = 0;
        info!(
            "queue set with {} tracks ({} dropped without url)",
            self.tracks.len(),
            offered - self.tracks.len()
        );
    }

    /// Append `track` if it is playable. The current position is untouched.
    pub fn push(&mut self, track: Track) -> bool {
        if !track.is_playable() {
            debug!("refusing to queue {:?}: no url", track.id);
            return false;
        }
        debug!("queued {}", track.display());
        self.tracks.push(track);
        true
    }

    /// Move the current position and return the track now under it.
    pub fn advance(&mut self, direction: Direction, shuffled: bool) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        self.current = match direction {
            Direction::Next if shuffled => self.rng.random_range(0..len),
            Direction::Next => (self.current + 1) % len,
            // Previous never shuffles.
            Direction::Previous => (self.current + len - 1) % len,
        };
        self.tracks.get(self.current)
    }

    /// Point at `index` when it is in range; out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn current_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    pub fn is_last(&self) -> bool {
        !self.tracks.is_empty() && self.current + 1 == self.tracks.len()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// An owned copy of the queued tracks.
    pub fn snapshot(&self) -> Vec<Track> {
        self.tracks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(id: &str, url: &str) -> Track {
        Track::new(id, url)
    }

    fn ids(q: &Queue) -> Vec<String> {
        q.snapshot().into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn set_keeps_only_tracks_with_url_in_order() {
        let mut q = Queue::with_seed(1);
        q.set(vec![
            t("a", "a.mp3"),
            t("b", ""),
            t("c", "c.mp3"),
            t("d", "   "),
            t("e", "e.ogg"),
        ]);
        assert_eq!(ids(&q), vec!["a", "c", "e"]);
        assert_eq!(q.current_index(), Some(0));
    }

    #[test]
    fn set_with_no_valid_tracks_leaves_queue_empty() {
        let mut q = Queue::with_seed(1);
        q.set(vec![t("a", ""), t("b", "")]);
        assert!(q.is_empty());
        assert_eq!(q.current_index(), None);
        assert!(q.current().is_none());
    }

    #[test]
    fn set_resets_position() {
        let mut q = Queue::with_seed(1);
        q.set(vec![t("a", "a"), t("b", "b"), t("c", "c")]);
        q.jump_to(2);
        q.set(vec![t("x", "x"), t("y", "y")]);
        assert_eq!(q.current_index(), Some(0));
    }

    #[test]
    fn push_rejects_missing_url_and_keeps_position() {
        let mut q = Queue::with_seed(1);
        q.set(vec![t("a", "a"), t("b", "b")]);
        q.jump_to(1);

        assert!(!q.push(t("bad", "")));
        assert!(q.push(t("c", "c")));
        assert_eq!(ids(&q), vec!["a", "b", "c"]);
        assert_eq!(q.current_index(), Some(1));
    }

    #[test]
    fn next_wraps_to_start_and_previous_wraps_to_end() {
        let mut q = Queue::with_seed(1);
        q.set(vec![t("a", "a"), t("b", "b"), t("c", "c")]);

        q.jump_to(2);
        assert_eq!(q.advance(Direction::Next, false).unwrap().id, "a");
        assert_eq!(q.current_index(), Some(0));

        assert_eq!(q.advance(Direction::Previous, false).unwrap().id, "c");
        assert_eq!(q.current_index(), Some(2));
    }

    #[test]
    fn advance_on_empty_queue_is_a_no_op() {
        let mut q = Queue::with_seed(1);
        assert!(q.advance(Direction::Next, false).is_none());
        assert!(q.advance(Direction::Next, true).is_none());
        assert!(q.advance(Direction::Previous, false).is_none());
    }

    #[test]
    fn shuffled_next_stays_in_bounds() {
        for len in 1..8 {
            let mut q = Queue::with_seed(len as u64);
            q.set((0..len).map(|i| t(&i.to_string(), "u")).collect());
            for _ in 0..200 {
                q.advance(Direction::Next, true);
                let i = q.current_index().unwrap();
                assert!(i < len);
                if len == 1 {
                    assert_eq!(i, 0);
                }
            }
        }
    }

    #[test]
    fn previous_ignores_shuffle() {
        let mut q = Queue::with_seed(7);
        q.set(vec![t("a", "a"), t("b", "b"), t("c", "c"), t("d", "d")]);
        q.jump_to(2);
        assert_eq!(q.advance(Direction::Previous, true).unwrap().id, "b");
        assert_eq!(q.advance(Direction::Previous, true).unwrap().id, "a");
    }

    #[test]
    fn jump_to_ignores_out_of_range() {
        let mut q = Queue::with_seed(1);
        q.set(vec![t("a", "a"), t("b", "b")]);
        assert!(q.jump_to(1));
        assert!(!q.jump_to(2));
        assert!(!q.jump_to(usize::MAX));
        assert_eq!(q.current_index(), Some(1));
    }

    #[test]
    fn is_last_tracks_final_position() {
        let mut q = Queue::with_seed(1);
        assert!(!q.is_last());
        q.set(vec![t("a", "a"), t("b", "b")]);
        assert!(!q.is_last());
        q.jump_to(1);
        assert!(q.is_last());
    }
}
