//! Strategies for reading a value between keyframes
//!
//! A [`ValueContainer`](crate::ValueContainer) stores raw keyframes; what the
//! quantity is worth at an instant between two of them is decided by an
//! [`Interpolation`] strategy chosen at compile time. The core only ships
//! [`Discrete`]. Continuous quantities bring their own math, either as a
//! type implementing the trait or as a closure.
//!
//! # Example
//!
//! ```rust
//! use tube_core::{Keyframe, TubeTime, ValueContainer};
//!
//! // Hold the last value, but report zero once the timeline has run out
//! let strategy = |current: &Keyframe<f64>, next: Option<&Keyframe<f64>>, _now: TubeTime| {
//!     if next.is_some() { *current.value() } else { 0.0 }
//! };
//! let mut speed = ValueContainer::with_interpolation(strategy);
//! speed.set_insert(0.0, 2.0).unwrap();
//! speed.set_insert(10.0, 4.0).unwrap();
//!
//! assert_eq!(speed.at(5.0), 2.0);
//! assert_eq!(speed.at(15.0), 0.0);
//! ```

use crate::time::TubeTime;
use crate::timeline::Keyframe;

/// Rule that turns the keyframes around `now` into a value
pub trait Interpolation<T> {
    /// Compute the value at `now`.
    ///
    /// `current` is the last keyframe at or before `now`; `next` is the one
    /// after it, if the timeline extends past `now`.
    fn value(&self, current: &Keyframe<T>, next: Option<&Keyframe<T>>, now: TubeTime) -> T;
}

/// Step interpolation: the value of the last keyframe holds until the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Discrete;

impl<T: Clone> Interpolation<T> for Discrete {
    fn value(&self, current: &Keyframe<T>, _next: Option<&Keyframe<T>>, _now: TubeTime) -> T {
        current.value().clone()
    }
}

impl<T, F> Interpolation<T> for F
where
    F: Fn(&Keyframe<T>, Option<&Keyframe<T>>, TubeTime) -> T,
{
    fn value(&self, current: &Keyframe<T>, next: Option<&Keyframe<T>>, now: TubeTime) -> T {
        self(current, next, now)
    }
}
