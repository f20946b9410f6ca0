//! Two-dimensional vectors and the linear interpolation used for motion

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};
use tube_core::{Interpolation, Keyframe, TubeTime};

/// A point or velocity on the playing field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Values that can be blended linearly
pub trait Lerp: Clone {
    /// Blend towards `other`; `alpha` 0.0 is `self`, 1.0 is `other`
    fn lerp(&self, other: &Self, alpha: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, alpha: f64) -> Self {
        self + (other - self) * alpha
    }
}

impl Lerp for Vec2 {
    fn lerp(&self, other: &Self, alpha: f64) -> Self {
        *self + (*other - *self) * alpha
    }
}

/// Straight-line motion between keyframes, holding after the last one
///
/// The sentinel has no finite time to blend from, so values before the
/// first keyframe hold the initial value too.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl<T: Lerp> Interpolation<T> for Linear {
    fn value(&self, current: &Keyframe<T>, next: Option<&Keyframe<T>>, now: TubeTime) -> T {
        match next {
            Some(next) if current.time().is_finite() && next.time() > current.time() => {
                let alpha = (now - current.time()) / (next.time() - current.time());
                current.value().lerp(next.value(), alpha.clamp(0.0, 1.0))
            }
            _ => current.value().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tube_core::ValueContainer;

    #[test]
    fn test_vec2_ops() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(b - a, Vec2::new(2.0, -3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
    }

    #[test]
    fn test_linear_between_keyframes() {
        let mut position: ValueContainer<Vec2, Linear> =
            ValueContainer::with_initial(Vec2::new(5.0, 5.0));
        position.set_insert(0.0, Vec2::ZERO).unwrap();
        position.set_insert(4.0, Vec2::new(8.0, -4.0)).unwrap();

        assert_eq!(position.at(-3.0), Vec2::new(5.0, 5.0));
        assert_eq!(position.at(1.0), Vec2::new(2.0, -1.0));
        assert_eq!(position.at(4.0), Vec2::new(8.0, -4.0));
        assert_eq!(position.at(9.0), Vec2::new(8.0, -4.0));
    }

    #[test]
    fn test_linear_same_time_keyframes_hold() {
        let mut value: ValueContainer<f64, Linear> = ValueContainer::new();
        value.set_insert(2.0, 1.0).unwrap();
        value.set_insert(2.0, 3.0).unwrap();
        assert_eq!(value.at(2.0), 3.0);
        assert_eq!(value.at(2.5), 3.0);
    }
}
