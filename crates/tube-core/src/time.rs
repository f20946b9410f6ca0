//! Continuous time for timelines
//!
//! Timelines are keyed by a continuous timestamp rather than by discrete
//! ticks, so lookups never need to know an exact stored time:
//! - `TubeTime` - Floating-point timestamp used as the ordering key
//! - `NEG_INFINITY` - Time of the sentinel keyframe every timeline starts with

/// A point in simulation time
pub type TubeTime = f64;

/// Time of the sentinel keyframe that precedes every other keyframe
pub const NEG_INFINITY: TubeTime = f64::NEG_INFINITY;

/// Check whether a time can be ordered against other times.
///
/// Every value except NaN is orderable, including both infinities.
pub fn is_orderable(time: TubeTime) -> bool {
    !time.is_nan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orderable() {
        assert!(is_orderable(0.0));
        assert!(is_orderable(-1e300));
        assert!(is_orderable(NEG_INFINITY));
        assert!(is_orderable(f64::INFINITY));
        assert!(!is_orderable(f64::NAN));
    }

    #[test]
    fn test_sentinel_precedes_everything() {
        assert!(NEG_INFINITY < f64::MIN);
        assert!(NEG_INFINITY <= NEG_INFINITY);
    }
}
