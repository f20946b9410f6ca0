//! Temporal value container - one quantity's timeline plus a lookup cursor
//!
//! A [`ValueContainer`] answers "what is the value at time T" for a single
//! quantity (a position, a speed, a player state). It remembers where the
//! previous query landed and starts the next search from there, so a
//! simulation stepping forward through time pays amortized O(1) per query.
//!
//! Two kinds of writes exist:
//! - [`set_end`](ValueContainer::set_end) is an authoritative correction: it
//!   forgets every predicted keyframe after the new one.
//! - [`set_insert`](ValueContainer::set_insert) is a speculative extension:
//!   it adds a keyframe and keeps everything else.
//!
//! # Example
//!
//! ```rust
//! use tube_core::ValueContainer;
//!
//! let mut speed: ValueContainer<i32> = ValueContainer::new();
//! speed.set_end(0.0, 1).unwrap();
//!
//! // Predict a bounce, then learn about an earlier collision instead
//! speed.set_insert(10.0, -1).unwrap();
//! assert_eq!(speed.at(12.0), -1);
//!
//! speed.set_end(5.0, 3).unwrap();
//! assert_eq!(speed.at(12.0), 3);
//! ```

use crate::interpolation::{Discrete, Interpolation};
use crate::time::TubeTime;
use crate::timeline::{Keyframe, KeyframeId, KeyframeTimeline};
use crate::Result;
use tracing::trace;

/// A time-varying value of type `T`, read through strategy `I`
///
/// Queries move an internal cursor and therefore take `&mut self`.
/// [`current`](Self::current) reads at the cursor without moving it.
#[derive(Debug)]
pub struct ValueContainer<T, I = Discrete> {
    /// Ground truth for this quantity
    timeline: KeyframeTimeline<T>,
    /// Keyframe found at `now`, the starting point of the next search
    cursor: KeyframeId,
    /// Last time the cursor was moved to
    now: TubeTime,
    /// How values between keyframes are computed
    interpolation: I,
}

impl<T: Default, I: Default> ValueContainer<T, I> {
    /// Create a container whose initial value is `T::default()`
    pub fn new() -> Self {
        Self::with_interpolation(I::default())
    }
}

impl<T: Default, I: Default> Default for ValueContainer<T, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default, I> ValueContainer<T, I> {
    /// Create a container that reads values through `interpolation`
    pub fn with_interpolation(interpolation: I) -> Self {
        Self::from_parts(KeyframeTimeline::new(), interpolation)
    }
}

impl<T, I: Default> ValueContainer<T, I> {
    /// Create a container whose value before any keyframe is `initial`
    pub fn with_initial(initial: T) -> Self {
        Self::from_parts(KeyframeTimeline::with_sentinel(initial), I::default())
    }
}

impl<T, I> ValueContainer<T, I> {
    fn from_parts(timeline: KeyframeTimeline<T>, interpolation: I) -> Self {
        let cursor = timeline.begin();
        Self {
            timeline,
            cursor,
            now: 0.0,
            interpolation,
        }
    }

    /// Time of the last cursor move
    pub fn now(&self) -> TubeTime {
        self.now
    }

    /// Read-only access to the underlying keyframes
    pub fn timeline(&self) -> &KeyframeTimeline<T> {
        &self.timeline
    }

    /// The interpolation strategy in use
    pub fn interpolation(&self) -> &I {
        &self.interpolation
    }

    /// The keyframe in effect at [`now`](Self::now)
    pub fn current_keyframe(&self) -> &Keyframe<T> {
        self.timeline.node(self.cursor)
    }

    /// Move the cursor to the keyframe in effect at `time`.
    ///
    /// No data is changed.
    pub fn set_now(&mut self, time: TubeTime) {
        self.now = time;
        self.cursor = self.timeline.last(time, Some(self.cursor));
        trace!(time, "cursor moved");
    }

    /// Check whether a new keyframe has to be computed to cover `time`.
    ///
    /// Returns false when a keyframe sits exactly at `time`, or when the
    /// timeline already extends beyond the keyframe in effect at `time`
    /// (a prediction covering this instant exists). The cursor is used as a
    /// hint but does not move.
    pub fn needs_update(&self, time: TubeTime) -> bool {
        let e = self.timeline.node(self.timeline.last(time, Some(self.cursor)));
        !(e.time() == time || e.next().is_some())
    }

    /// Record an authoritative value at `time` and forget everything after.
    ///
    /// Keyframes already at `time` are kept; the new one is placed after
    /// them and wins. Fails without touching the timeline if `time` is NaN.
    pub fn set_end(&mut self, time: TubeTime, value: T) -> Result<KeyframeId> {
        let id = self.timeline.allocate(time, value)?;

        // Find the insertion point before discarding anything
        let at = self.timeline.last(time, Some(self.cursor));
        self.timeline.erase_after(at);
        self.timeline.insert(id, Some(at));

        self.refresh_cursor(id);
        Ok(id)
    }

    /// Add a predicted value at `time`, keeping every existing keyframe.
    pub fn set_insert(&mut self, time: TubeTime, value: T) -> Result<KeyframeId> {
        let id = self.timeline.create(time, value, Some(self.cursor))?;
        self.refresh_cursor(id);
        Ok(id)
    }

    /// Re-resolve the cursor after a write, which may have freed it or
    /// placed a keyframe between it and `now`
    fn refresh_cursor(&mut self, written: KeyframeId) {
        self.cursor = self.timeline.last(self.now, Some(written));
    }
}

impl<T, I: Interpolation<T>> ValueContainer<T, I> {
    /// Value at `time`; moves the cursor there first.
    ///
    /// Queries at steadily increasing times are the cheap case.
    pub fn at(&mut self, time: TubeTime) -> T {
        self.set_now(time);
        self.current()
    }

    /// Value at the cursor, as computed by the interpolation strategy
    pub fn current(&self) -> T {
        let current = self.current_keyframe();
        let next = current.next().and_then(|id| self.timeline.get(id));
        self.interpolation.value(current, next, self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::NEG_INFINITY;
    use std::cell::Cell;
    use std::rc::Rc;
    use test_log::test;

    fn container_with(entries: &[(TubeTime, char)]) -> ValueContainer<char> {
        let mut container = ValueContainer::with_initial('-');
        for (time, value) in entries {
            container.set_insert(*time, *value).unwrap();
        }
        container
    }

    fn contents<I>(container: &ValueContainer<char, I>) -> Vec<(TubeTime, char)> {
        container
            .timeline()
            .iter()
            .map(|k| (k.time(), *k.value()))
            .collect()
    }

    fn is_ordered<T, I>(container: &ValueContainer<T, I>) -> bool {
        let times: Vec<_> = container.timeline().iter().map(|k| k.time()).collect();
        times.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_fresh_container_returns_default() {
        let mut container: ValueContainer<i64> = ValueContainer::new();
        for time in [-1e300, -1e9, -1.0, 0.0, 1.0, 1e9] {
            assert_eq!(container.at(time), 0);
            assert_eq!(container.timeline().last(time, None), container.timeline().begin());
        }
    }

    #[test]
    fn test_with_initial() {
        let mut container: ValueContainer<&str> = ValueContainer::with_initial("idle");
        assert_eq!(container.at(-50.0), "idle");
        assert_eq!(container.current(), "idle");
    }

    #[test]
    fn test_set_end_truncates_future() {
        let mut container = container_with(&[(0.0, 'A'), (10.0, 'B'), (20.0, 'C')]);

        container.set_end(5.0, 'X').unwrap();

        assert_eq!(contents(&container), vec![(0.0, 'A'), (5.0, 'X')]);
        assert_eq!(container.at(15.0), 'X');
        assert_eq!(container.at(2.0), 'A');
    }

    #[test]
    fn test_set_end_before_everything() {
        let mut container = container_with(&[(0.0, 'A'), (10.0, 'B')]);

        container.set_end(-5.0, 'X').unwrap();

        assert_eq!(contents(&container), vec![(-5.0, 'X')]);
        assert_eq!(container.at(-10.0), '-');
        assert_eq!(container.at(100.0), 'X');
    }

    #[test]
    fn test_set_end_at_existing_time_wins() {
        let mut container = container_with(&[(0.0, 'A'), (10.0, 'B')]);

        container.set_end(10.0, 'X').unwrap();

        assert_eq!(contents(&container), vec![(0.0, 'A'), (10.0, 'B'), (10.0, 'X')]);
        assert_eq!(container.at(10.0), 'X');
    }

    #[test]
    fn test_set_insert_keeps_existing() {
        let mut container = container_with(&[(0.0, 'A'), (10.0, 'B')]);

        container.set_insert(5.0, 'X').unwrap();

        assert_eq!(contents(&container), vec![(0.0, 'A'), (5.0, 'X'), (10.0, 'B')]);
        assert_eq!(container.at(7.0), 'X');
        assert_eq!(container.at(12.0), 'B');
    }

    #[test]
    fn test_needs_update_boundary() {
        let mut container = container_with(&[(0.0, 'A')]);

        assert!(!container.needs_update(0.0));
        assert!(container.needs_update(5.0));

        container.set_insert(5.0, 'Y').unwrap();

        assert!(!container.needs_update(3.0));
        assert!(!container.needs_update(5.0));
        assert!(container.needs_update(6.0));
    }

    #[test]
    fn test_needs_update_does_not_move_cursor() {
        let mut container = container_with(&[(0.0, 'A'), (10.0, 'B')]);
        container.set_now(12.0);

        container.needs_update(3.0);

        assert_eq!(container.now(), 12.0);
        assert_eq!(container.current(), 'B');
    }

    #[test]
    fn test_current_keyframe_follows_cursor() {
        let mut container = container_with(&[(0.0, 'A'), (10.0, 'B')]);

        container.set_now(4.0);
        assert_eq!(container.current_keyframe().time(), 0.0);
        assert!(container.current_keyframe().next().is_some());

        container.set_now(30.0);
        assert_eq!(*container.current_keyframe().value(), 'B');
        assert!(container.current_keyframe().next().is_none());
    }

    #[test]
    fn test_nan_write_is_rejected_without_side_effects() {
        let mut container = container_with(&[(0.0, 'A'), (10.0, 'B')]);

        assert!(container.set_end(f64::NAN, 'X').is_err());
        assert!(container.set_insert(f64::NAN, 'X').is_err());

        assert_eq!(contents(&container), vec![(0.0, 'A'), (10.0, 'B')]);
    }

    #[test]
    fn test_cursor_survives_truncation() {
        let mut container = container_with(&[(0.0, 'A'), (10.0, 'B'), (20.0, 'C')]);
        container.set_now(25.0);
        assert_eq!(container.current(), 'C');

        // The cursor's keyframe is erased; it must now see the correction
        container.set_end(5.0, 'X').unwrap();
        assert_eq!(container.now(), 25.0);
        assert_eq!(container.current(), 'X');
    }

    #[test]
    fn test_cursor_sees_insert_before_now() {
        let mut container = container_with(&[(0.0, 'A')]);
        container.set_now(8.0);

        container.set_insert(5.0, 'X').unwrap();
        assert_eq!(container.current(), 'X');

        // A prediction after now leaves the current value alone
        container.set_insert(9.0, 'Y').unwrap();
        assert_eq!(container.current(), 'X');
    }

    #[test]
    fn test_hinted_queries_match_unhinted() {
        let mut container: ValueContainer<u32> = ValueContainer::new();
        // Uneven spacing, including repeated times
        let times = [0.0, 0.5, 0.5, 3.0, 3.25, 7.0, 7.0, 7.0, 12.0, 40.0];
        for (i, time) in times.iter().enumerate() {
            container.set_insert(*time, i as u32 + 1).unwrap();
        }

        let mut t = -2.0;
        while t < 45.0 {
            let hinted = container.at(t);
            let found = container.timeline().last(t, None);
            let unhinted = *container.timeline().get(found).unwrap().value();
            assert_eq!(hinted, unhinted, "diverged at t={t}");
            t += 0.25;
        }

        // And walking back down
        while t > -2.0 {
            let hinted = container.at(t);
            let found = container.timeline().last(t, None);
            assert_eq!(hinted, *container.timeline().get(found).unwrap().value());
            t -= 0.75;
        }
    }

    #[test]
    fn test_ordering_after_mixed_writes() {
        let mut container: ValueContainer<i32> = ValueContainer::new();
        let writes = [
            (5.0, true),
            (1.0, false),
            (9.0, false),
            (3.0, false),
            (7.0, true),
            (2.0, false),
            (2.0, false),
            (8.0, false),
            (0.5, true),
            (6.0, false),
            (4.0, false),
        ];
        for (i, (time, end)) in writes.iter().enumerate() {
            if *end {
                container.set_end(*time, i as i32).unwrap();
            } else {
                container.set_insert(*time, i as i32).unwrap();
            }
            assert!(is_ordered(&container), "out of order after write {i}");
        }
        assert_eq!(container.timeline().len(), 3);
    }

    #[test]
    fn test_state_machine_stable_predicted_stable() {
        let mut ball = container_with(&[(0.0, 'S')]);
        ball.set_now(1.0);
        assert!(ball.needs_update(1.0));

        // Predicted: the future is known
        ball.set_insert(4.0, 'P').unwrap();
        ball.set_insert(8.0, 'Q').unwrap();
        assert!(!ball.needs_update(2.0));

        // Corrected: back to a timeline that ends at the correction
        ball.set_end(2.0, 'C').unwrap();
        assert_eq!(contents(&ball), vec![(0.0, 'S'), (2.0, 'C')]);
        assert!(ball.needs_update(3.0));
    }

    #[test]
    fn test_closure_interpolation() {
        let linear = |current: &Keyframe<f64>, next: Option<&Keyframe<f64>>, now: TubeTime| {
            match next {
                Some(next) if current.time() > NEG_INFINITY => {
                    let span = next.time() - current.time();
                    let alpha = (now - current.time()) / span;
                    current.value() + (next.value() - current.value()) * alpha
                }
                _ => *current.value(),
            }
        };
        let mut position = ValueContainer::with_interpolation(linear);
        position.set_insert(0.0, 0.0).unwrap();
        position.set_insert(10.0, 100.0).unwrap();

        assert_eq!(position.at(-1.0), 0.0);
        assert_eq!(position.at(2.5), 25.0);
        assert_eq!(position.at(10.0), 100.0);
        assert_eq!(position.at(20.0), 100.0);
    }

    #[test]
    fn test_drop_releases_all_keyframes() {
        #[derive(Debug)]
        struct Tracked(Rc<Cell<usize>>);

        impl Tracked {
            fn new(live: &Rc<Cell<usize>>) -> Self {
                live.set(live.get() + 1);
                Self(live.clone())
            }
        }

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() - 1);
            }
        }

        let live = Rc::new(Cell::new(0));
        {
            let mut container: ValueContainer<Tracked> =
                ValueContainer::with_initial(Tracked::new(&live));
            for i in 0..10 {
                container
                    .set_insert(i as TubeTime, Tracked::new(&live))
                    .unwrap();
            }
            container.set_now(3.5);
            assert_eq!(live.get(), 11);

            container.set_end(4.0, Tracked::new(&live)).unwrap();
            assert_eq!(live.get(), 7);
        }
        assert_eq!(live.get(), 0);
    }
}
