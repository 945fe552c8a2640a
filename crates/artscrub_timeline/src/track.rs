// SPDX-License-Identifier: MIT OR Apache-2.0
//! Attribute tracks attached to a timeline entity.

use crate::keyframe::{KeyframeTrack, OrderDefect, Position, Rotation, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// Image swaps, also the entity's time axis
    Image,
    /// Center position
    Position,
    /// Width and height
    Size,
    /// Rotation in degrees
    Rotation,
}

impl TrackKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Position => "position",
            Self::Size => "size",
            Self::Rotation => "rotation",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric attribute track.
///
/// Entities hold an ordered list of these instead of fixed fields, so an
/// entity without rotation simply has no rotation track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeTrack {
    /// Position keyframes
    Position(KeyframeTrack<Position>),
    /// Size keyframes
    Size(KeyframeTrack<Size>),
    /// Rotation keyframes
    Rotation(KeyframeTrack<Rotation>),
}

impl AttributeTrack {
    /// Kind of this track
    pub fn kind(&self) -> TrackKind {
        match self {
            Self::Position(_) => TrackKind::Position,
            Self::Size(_) => TrackKind::Size,
            Self::Rotation(_) => TrackKind::Rotation,
        }
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        match self {
            Self::Position(t) => t.len(),
            Self::Size(t) => t.len(),
            Self::Rotation(t) => t.len(),
        }
    }

    /// Whether the track has no keyframes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Timestamp of the keyframe at `index`
    pub fn time_at(&self, index: usize) -> Option<f32> {
        match self {
            Self::Position(t) => t.time_at(index),
            Self::Size(t) => t.time_at(index),
            Self::Rotation(t) => t.time_at(index),
        }
    }

    /// Check that timestamps are finite and non-decreasing
    pub fn check_order(&self) -> Result<(), OrderDefect> {
        match self {
            Self::Position(t) => t.check_order(),
            Self::Size(t) => t.check_order(),
            Self::Rotation(t) => t.check_order(),
        }
    }
}

impl From<KeyframeTrack<Position>> for AttributeTrack {
    fn from(track: KeyframeTrack<Position>) -> Self {
        Self::Position(track)
    }
}

impl From<KeyframeTrack<Size>> for AttributeTrack {
    fn from(track: KeyframeTrack<Size>) -> Self {
        Self::Size(track)
    }
}

impl From<KeyframeTrack<Rotation>> for AttributeTrack {
    fn from(track: KeyframeTrack<Rotation>) -> Self {
        Self::Rotation(track)
    }
}
