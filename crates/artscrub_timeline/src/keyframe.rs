// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for the timeline.
//!
//! A [`KeyframeTrack`] is a step function over the scrub axis: querying a
//! time returns the latest keyframe at or before it, and nothing before the
//! first keyframe. Values between keyframes are never interpolated here;
//! smoothing happens in the entity's easing state.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Center of an artwork in origin-centered canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Position {
    /// Create a new position
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rendered extent of an artwork
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in canvas units
    pub width: f32,
    /// Height in canvas units
    pub height: f32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Rotation in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(pub f32);

impl Rotation {
    /// Angle in degrees
    pub fn degrees(self) -> f32 {
        self.0
    }
}

/// Opaque reference to an image owned by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(pub String);

impl ImageHandle {
    /// Create a handle from a path or key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key the renderer resolves
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Numeric attribute values that can converge toward a target.
///
/// `blend` moves `self` by `progress` of the remaining distance to `target`.
/// A progress of `1.0` lands on the target up to float rounding.
pub trait Blend: Copy + PartialEq {
    /// Blend toward `target`
    fn blend(self, target: Self, progress: f32) -> Self;
}

impl Blend for Position {
    fn blend(self, target: Self, progress: f32) -> Self {
        Position::new(
            Interpolation::lerp(self.x, target.x, progress),
            Interpolation::lerp(self.y, target.y, progress),
        )
    }
}

impl Blend for Size {
    fn blend(self, target: Self, progress: f32) -> Self {
        Size::new(
            Interpolation::lerp(self.width, target.width, progress),
            Interpolation::lerp(self.height, target.height, progress),
        )
    }
}

impl Blend for Rotation {
    fn blend(self, target: Self, progress: f32) -> Self {
        Rotation(Interpolation::lerp(self.0, target.0, progress))
    }
}

/// A keyframe in a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<V> {
    /// Position on the scrub axis
    pub time: f32,
    /// Value at this keyframe
    pub value: V,
}

impl<V> Keyframe<V> {
    /// Create a new keyframe
    pub fn new(time: f32, value: V) -> Self {
        Self { time, value }
    }
}

/// Why a track's timestamps cannot be used as a step axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDefect {
    /// Timestamp is NaN or infinite
    NonFinite(usize),
    /// Timestamp is smaller than its predecessor
    Decreasing(usize),
}

/// An ordered, timestamp-indexed sequence of attribute values.
///
/// Timestamps are expected to be non-decreasing; equal timestamps resolve to
/// the keyframe ingested last. Ordering is checked by the owning entity at
/// construction, not on every push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeTrack<V> {
    keyframes: Vec<Keyframe<V>>,
}

impl<V> Default for KeyframeTrack<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> KeyframeTrack<V> {
    /// Create an empty track
    pub fn new() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }

    /// Create a track from keyframes in ingestion order
    pub fn from_keyframes(keyframes: Vec<Keyframe<V>>) -> Self {
        Self { keyframes }
    }

    /// Append a keyframe
    pub fn push(&mut self, time: f32, value: V) {
        self.keyframes.push(Keyframe::new(time, value));
    }

    /// Index of the latest keyframe whose time is at or before `time`.
    ///
    /// Returns `None` when `time` precedes the first keyframe.
    pub fn step_index(&self, time: f32) -> Option<usize> {
        self.keyframes
            .partition_point(|k| k.time <= time)
            .checked_sub(1)
    }

    /// Value held at `time`
    pub fn step_value(&self, time: f32) -> Option<&V> {
        self.step_index(time).and_then(|idx| self.value_at(idx))
    }

    /// Value of the keyframe at `index`
    pub fn value_at(&self, index: usize) -> Option<&V> {
        self.keyframes.get(index).map(|k| &k.value)
    }

    /// Timestamp of the keyframe at `index`
    pub fn time_at(&self, index: usize) -> Option<f32> {
        self.keyframes.get(index).map(|k| k.time)
    }

    /// Overwrite the value of the earliest keyframe.
    ///
    /// This is the only mutation allowed during playback. Returns the value
    /// it replaced, or `None` on an empty track.
    pub fn commit_as_origin(&mut self, value: V) -> Option<V> {
        self.keyframes
            .first_mut()
            .map(|k| std::mem::replace(&mut k.value, value))
    }

    /// Check that timestamps are finite and non-decreasing
    pub fn check_order(&self) -> Result<(), OrderDefect> {
        let mut previous = f32::NEG_INFINITY;
        for (idx, kf) in self.keyframes.iter().enumerate() {
            if !kf.time.is_finite() {
                return Err(OrderDefect::NonFinite(idx));
            }
            if kf.time < previous {
                return Err(OrderDefect::Decreasing(idx));
            }
            previous = kf.time;
        }
        Ok(())
    }

    /// First and last timestamp
    pub fn time_range(&self) -> Option<(f32, f32)> {
        Some((self.keyframes.first()?.time, self.keyframes.last()?.time))
    }

    /// Timestamps in track order
    pub fn times(&self) -> impl Iterator<Item = f32> + '_ {
        self.keyframes.iter().map(|k| k.time)
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe<V>] {
        &self.keyframes
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

impl<V> FromIterator<(f32, V)> for KeyframeTrack<V> {
    fn from_iter<I: IntoIterator<Item = (f32, V)>>(iter: I) -> Self {
        Self {
            keyframes: iter
                .into_iter()
                .map(|(time, value)| Keyframe::new(time, value))
                .collect(),
        }
    }
}
