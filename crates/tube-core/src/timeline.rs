//! Keyframe timeline - ordered, hinted storage for one time-varying quantity
//!
//! A timeline is a doubly-linked sequence of keyframes kept in time order.
//! Lookups are not exact: [`KeyframeTimeline::last`] returns the keyframe
//! closest to, but not after, the requested time. Every timeline starts with
//! a sentinel keyframe at negative infinity, so that lookup always succeeds.
//!
//! Keyframes live in an arena of slots addressed by [`KeyframeId`]. Links and
//! hints are ids rather than references; a freed slot bumps its generation,
//! so an id that outlived its keyframe resolves to nothing instead of to
//! whatever reuses the slot.
//!
//! # Example
//!
//! ```rust
//! use tube_core::KeyframeTimeline;
//!
//! let timeline: KeyframeTimeline<i32> = KeyframeTimeline::new();
//!
//! // Only the sentinel exists, and it answers every query
//! let found = timeline.last(-1e9, None);
//! assert_eq!(found, timeline.begin());
//! assert_eq!(timeline.get(found).map(|k| *k.value()), Some(0));
//! ```

use crate::time::{is_orderable, TubeTime, NEG_INFINITY};
use crate::{Error, Result};
use tracing::{debug, trace, warn};

/// Stable handle to a keyframe in a [`KeyframeTimeline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyframeId {
    index: usize,
    generation: u32,
}

/// A single (time, value) fact on a timeline
///
/// The time is fixed at creation; the value may be changed in place.
#[derive(Debug, Clone)]
pub struct Keyframe<T> {
    time: TubeTime,
    value: T,
    prev: Option<KeyframeId>,
    next: Option<KeyframeId>,
}

impl<T> Keyframe<T> {
    /// Time at which this keyframe takes effect
    pub fn time(&self) -> TubeTime {
        self.time
    }

    /// Value recorded at this keyframe
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutable access to the recorded value
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// The keyframe directly before this one
    pub fn prev(&self) -> Option<KeyframeId> {
        self.prev
    }

    /// The keyframe directly after this one
    pub fn next(&self) -> Option<KeyframeId> {
        self.next
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    keyframe: Option<Keyframe<T>>,
}

/// Time-ordered keyframes of a single quantity
///
/// Walking forward from [`begin`](Self::begin) always yields non-decreasing
/// times. Keyframes sharing a time keep their insertion order.
#[derive(Debug, Clone)]
pub struct KeyframeTimeline<T> {
    /// Keyframe storage, indexed by `KeyframeId::index`
    slots: Vec<Slot<T>>,
    /// Indices of vacant slots, reused before the arena grows
    free: Vec<usize>,
    /// The sentinel at negative infinity
    begin: KeyframeId,
    /// The latest keyframe (the sentinel while the timeline is empty)
    end: KeyframeId,
    /// Number of keyframes, sentinel excluded
    len: usize,
}

impl<T: Default> KeyframeTimeline<T> {
    /// Create a timeline whose sentinel holds `T::default()`
    pub fn new() -> Self {
        Self::with_sentinel(T::default())
    }
}

impl<T: Default> Default for KeyframeTimeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyframeTimeline<T> {
    /// Create a timeline whose sentinel holds `value`
    ///
    /// The sentinel is the answer for any query that precedes every other
    /// keyframe, so its value is the quantity's initial state.
    pub fn with_sentinel(value: T) -> Self {
        let sentinel = KeyframeId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                keyframe: Some(Keyframe {
                    time: NEG_INFINITY,
                    value,
                    prev: None,
                    next: None,
                }),
            }],
            free: Vec::new(),
            begin: sentinel,
            end: sentinel,
            len: 0,
        }
    }

    /// The sentinel keyframe
    pub fn begin(&self) -> KeyframeId {
        self.begin
    }

    /// The latest keyframe
    pub fn end(&self) -> KeyframeId {
        self.end
    }

    /// Number of keyframes, not counting the sentinel
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether only the sentinel is present
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up a keyframe, `None` if the id is stale
    pub fn get(&self, id: KeyframeId) -> Option<&Keyframe<T>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.keyframe.as_ref())
    }

    /// Mutable lookup, `None` if the id is stale
    ///
    /// Only the value can be changed; time and links stay private.
    pub fn get_mut(&mut self, id: KeyframeId) -> Option<&mut Keyframe<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.keyframe.as_mut())
    }

    /// Iterate over keyframes in time order, sentinel excluded
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            timeline: self,
            cursor: self.node(self.begin).next,
        }
    }

    /// Get the last keyframe with `keyframe.time <= time`.
    ///
    /// The search starts at `hint` when it is live, otherwise at the
    /// sentinel. It walks forward when `time` is at or after the hint and
    /// backward when it is before, so queries near the previous one stay
    /// cheap. A NaN time resolves to the sentinel.
    pub fn last(&self, time: TubeTime, hint: Option<KeyframeId>) -> KeyframeId {
        if !is_orderable(time) {
            return self.begin;
        }

        if self.node(self.begin).time > time {
            panic!("internal error: there is always a keyframe at -inf");
        }

        let mut e = hint
            .filter(|id| self.get(*id).is_some())
            .unwrap_or(self.begin);

        if time >= self.node(e).time {
            // Moving forward over equal times lands on the newest of them
            while let Some(next) = self.node(e).next {
                if self.node(next).time > time {
                    break;
                }
                e = next;
            }
        } else {
            while self.node(e).time > time {
                match self.node(e).prev {
                    Some(prev) => e = prev,
                    None => break,
                }
            }
        }

        e
    }

    /// Create a keyframe and insert it in time order
    ///
    /// `hint` only speeds up finding the insertion point.
    pub(crate) fn create(
        &mut self,
        time: TubeTime,
        value: T,
        hint: Option<KeyframeId>,
    ) -> Result<KeyframeId> {
        let id = self.allocate(time, value)?;
        self.insert(id, hint);
        Ok(id)
    }

    /// Store a keyframe without linking it into the sequence yet
    pub(crate) fn allocate(&mut self, time: TubeTime, value: T) -> Result<KeyframeId> {
        if !is_orderable(time) {
            return Err(Error::InvalidTime(time));
        }

        let keyframe = Keyframe {
            time,
            value,
            prev: None,
            next: None,
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.keyframe = Some(keyframe);
                KeyframeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    keyframe: Some(keyframe),
                });
                KeyframeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        Ok(id)
    }

    /// Link an allocated keyframe directly after its predecessor in time.
    ///
    /// The keyframe is placed after every existing keyframe with the same
    /// time, so the newest write at an instant is the one `last` finds.
    pub(crate) fn insert(&mut self, id: KeyframeId, hint: Option<KeyframeId>) {
        let time = self.node(id).time;
        debug_assert!(self.node(id).prev.is_none() && self.node(id).next.is_none());

        let at = self.last(time, hint.filter(|h| *h != id));
        let next = self.node(at).next;

        {
            let e = self.node_mut(id);
            e.prev = Some(at);
            e.next = next;
        }
        self.node_mut(at).next = Some(id);
        match next {
            Some(next) => self.node_mut(next).prev = Some(id),
            None => self.end = id,
        }
        self.len += 1;

        trace!(time, len = self.len, "inserted keyframe");
    }

    /// Erase every keyframe strictly after `last_valid`.
    ///
    /// Walks from the end back to `last_valid`. Returns the number of
    /// keyframes removed; a stale `last_valid` removes nothing.
    pub(crate) fn erase_after(&mut self, last_valid: KeyframeId) -> usize {
        if self.get(last_valid).is_none() {
            return 0;
        }

        let mut removed = 0;
        let mut e = self.end;
        while e != last_valid {
            let prev = self.node(e).prev;
            if self.erase(e).is_some() {
                removed += 1;
            }
            match prev {
                Some(prev) => e = prev,
                None => break,
            }
        }

        if removed > 0 {
            debug!(
                after = self.node(last_valid).time,
                removed, "truncated timeline"
            );
        }
        removed
    }

    /// Unlink a keyframe and release it, returning its value.
    ///
    /// Stale ids are ignored. The sentinel is never removed.
    pub(crate) fn erase(&mut self, id: KeyframeId) -> Option<T> {
        if id == self.begin {
            warn!("refusing to erase the sentinel keyframe");
            return None;
        }

        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let keyframe = slot.keyframe.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        if let Some(prev) = keyframe.prev {
            self.node_mut(prev).next = keyframe.next;
        }
        match keyframe.next {
            Some(next) => self.node_mut(next).prev = keyframe.prev,
            None => self.end = keyframe.prev.unwrap_or(self.begin),
        }
        self.len -= 1;

        Some(keyframe.value)
    }

    /// Resolve a link that must be live
    pub(crate) fn node(&self, id: KeyframeId) -> &Keyframe<T> {
        match self.get(id) {
            Some(keyframe) => keyframe,
            None => panic!("internal error: dangling keyframe link {id:?}"),
        }
    }

    fn node_mut(&mut self, id: KeyframeId) -> &mut Keyframe<T> {
        match self.get_mut(id) {
            Some(keyframe) => keyframe,
            None => panic!("internal error: dangling keyframe link {id:?}"),
        }
    }
}

/// Forward iterator over the keyframes of a timeline
pub struct Iter<'a, T> {
    timeline: &'a KeyframeTimeline<T>,
    cursor: Option<KeyframeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Keyframe<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let keyframe = self.timeline.get(self.cursor?)?;
        self.cursor = keyframe.next;
        Some(keyframe)
    }
}

impl<'a, T> IntoIterator for &'a KeyframeTimeline<T> {
    type Item = &'a Keyframe<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
