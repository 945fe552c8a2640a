// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe timeline engine for artscrub.
//!
//! This crate animates independently keyframed artworks along a scrub axis:
//! - Step-function keyframe tracks for image, position, size and rotation
//! - Change-triggered easing with one shared counter per entity
//! - Drag override that suspends the timeline and commits into keyframe 0
//! - A scene owning the entities and the scrub cursor
//!
//! ## Architecture
//!
//! The engine is frame driven and single threaded. Each tick the scene calls
//! [`TimelineEntity::advance`] with the cursor and hands the resulting
//! [`RenderSnapshot`]s to an external renderer. Pointer input goes through
//! the scene to the hit entity's [`DragController`].

pub mod keyframe;
pub mod track;
pub mod drag;
pub mod entity;
pub mod scene;

pub use keyframe::{
    Keyframe, KeyframeTrack, OrderDefect, Interpolation, Blend,
    Position, Size, Rotation, ImageHandle,
};
pub use track::{AttributeTrack, TrackKind};
pub use drag::{Bounds, DragController, DragState};
pub use entity::{
    TimelineEntity, EntityBuilder, EntityId, Channel, RenderSnapshot, HoverLabel,
    ValidationError, DEFAULT_EASING_FRAMES,
};
pub use scene::{Scene, SceneError};
