//! Tube Core - Temporal value timelines
//!
//! This crate stores the history and predicted future of values that change
//! at discrete moments, and answers "what is the value at time T" without
//! exact-time lookups:
//! - Keyframe timelines keyed by continuous time (`KeyframeTimeline`)
//! - Per-quantity containers with a lookup cursor (`ValueContainer`)
//! - Compile-time interpolation strategies (`Interpolation`, `Discrete`)
//!
//! ## Corrections and Predictions
//!
//! Simulation code extrapolates quantities into the future and corrects them
//! when new facts arrive:
//! - `set_insert` - Add a predicted keyframe, keep everything else
//! - `set_end` - Record an authoritative keyframe, drop the predicted future
//! - `needs_update` - Check whether an instant is already covered
//!
//! ```text
//!  -inf        0          10          20
//!   │──────────●───────────●───────────●──▶  set_insert: predictions pile up
//!   │──────────●─────●                       set_end(5): future is rewritten
//! ```
//!
//! A container is single-owner: queries move its cursor and take
//! `&mut self`, so sharing one across threads needs external locking.

mod error;
pub mod interpolation;
pub mod time;
pub mod timeline;
mod value;

pub use error::{Error, Result};
pub use interpolation::{Discrete, Interpolation};
pub use time::{TubeTime, NEG_INFINITY};
pub use timeline::{Keyframe, KeyframeId, KeyframeTimeline};
pub use value::ValueContainer;
