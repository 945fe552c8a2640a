// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline entities: keyframe selection, easing and drag override.
//!
//! Each call to [`TimelineEntity::advance`] is one frame:
//! - The image track resolves the step index for the scrub time
//! - Numeric tracks at that index become the new targets
//! - Any target change restarts the single shared easing counter
//! - Live values blend toward their targets and snap on the last frame
//!
//! The blend is a recurrence on the live value
//! (`current += (target - current) * elapsed / duration`), not a linear
//! ease from a fixed start. The last frame has progress `1.0` and forces an
//! exact copy of the target.

use crate::drag::{Bounds, DragController};
use crate::keyframe::{Blend, ImageHandle, KeyframeTrack, OrderDefect, Position, Rotation, Size};
use crate::track::{AttributeTrack, TrackKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Easing length in frames: 0.2 seconds at 60 frames per second
pub const DEFAULT_EASING_FRAMES: u32 = 12;

/// Identity of a timeline entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create an entity ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Rejected entity definition
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The image track has no keyframes
    #[error("entity '{entity}' has no keyframes")]
    EmptyTimeline {
        /// Offending entity
        entity: EntityId,
    },

    /// A track does not share the image track's length
    #[error("entity '{entity}': {track} track has {found} keyframes, expected {expected}")]
    LengthMismatch {
        /// Offending entity
        entity: EntityId,
        /// Offending track
        track: TrackKind,
        /// Keyframe count of the image track
        expected: usize,
        /// Keyframe count of the offending track
        found: usize,
    },

    /// A track's timestamps differ from the image track's
    #[error("entity '{entity}': {track} track timestamp {index} differs from the image track")]
    TimestampMismatch {
        /// Offending entity
        entity: EntityId,
        /// Offending track
        track: TrackKind,
        /// Keyframe index
        index: usize,
    },

    /// Timestamps go backwards
    #[error("entity '{entity}': {track} track timestamp {index} is earlier than its predecessor")]
    NonMonotonic {
        /// Offending entity
        entity: EntityId,
        /// Offending track
        track: TrackKind,
        /// Keyframe index
        index: usize,
    },

    /// Timestamp is NaN or infinite
    #[error("entity '{entity}': {track} track timestamp {index} is not finite")]
    NonFiniteTimestamp {
        /// Offending entity
        entity: EntityId,
        /// Offending track
        track: TrackKind,
        /// Keyframe index
        index: usize,
    },

    /// Two tracks animate the same attribute
    #[error("entity '{entity}' has more than one {track} track")]
    DuplicateTrack {
        /// Offending entity
        entity: EntityId,
        /// Duplicated track
        track: TrackKind,
    },

    /// Drag commits need a position track to write into
    #[error("entity '{entity}' is draggable but has no position track")]
    DraggableWithoutPosition {
        /// Offending entity
        entity: EntityId,
    },
}

impl ValidationError {
    fn from_defect(entity: &EntityId, track: TrackKind, defect: OrderDefect) -> Self {
        match defect {
            OrderDefect::NonFinite(index) => Self::NonFiniteTimestamp {
                entity: entity.clone(),
                track,
                index,
            },
            OrderDefect::Decreasing(index) => Self::NonMonotonic {
                entity: entity.clone(),
                track,
                index,
            },
        }
    }
}

/// Live state of one numeric attribute
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Channel<V> {
    /// Displayed value, possibly mid-transition
    pub current: V,
    /// Most recently selected keyframe value
    pub target: V,
}

impl<V: Blend> Channel<V> {
    /// Adopt `value` as the target. Returns whether it differed.
    fn retarget(&mut self, value: V) -> bool {
        if self.target == value {
            return false;
        }
        self.target = value;
        true
    }

    fn blend(&mut self, progress: f32) {
        self.current = self.current.blend(self.target, progress);
    }

    fn settle(&mut self) {
        self.current = self.target;
    }

    /// Whether the live value equals the target
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

fn retarget_from<V: Blend>(channel: &mut Channel<V>, track: &KeyframeTrack<V>, index: usize) -> bool {
    match track.value_at(index) {
        Some(value) => channel.retarget(*value),
        None => false,
    }
}

/// What the renderer draws for one entity this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Entity ID
    pub id: EntityId,
    /// Image to draw, `None` before the first keyframe
    pub image: Option<ImageHandle>,
    /// Center of the image
    pub position: Position,
    /// Drawn extent, `None` when the entity has no size track
    pub size: Option<Size>,
    /// Rotation around the center
    pub rotation: Rotation,
    /// Whether the position is under pointer control
    pub dragging: bool,
}

/// Identification readout for the entity under the pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverLabel {
    /// Entity ID
    pub id: EntityId,
    /// Target position
    pub position: Position,
    /// Target size
    pub size: Size,
}

impl fmt::Display for HoverLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.0}, {:.0}) {:.0}x{:.0}",
            self.id, self.position.x, self.position.y, self.size.width, self.size.height
        )
    }
}

/// Builder for [`TimelineEntity`]; validation happens in [`Self::build`]
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    id: EntityId,
    images: KeyframeTrack<ImageHandle>,
    tracks: Vec<AttributeTrack>,
    draggable: bool,
    easing_duration: u32,
}

impl EntityBuilder {
    /// Attach a numeric attribute track
    pub fn track(mut self, track: impl Into<AttributeTrack>) -> Self {
        self.tracks.push(track.into());
        self
    }

    /// Allow pointer dragging
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Easing length in frames
    pub fn easing_duration(mut self, frames: u32) -> Self {
        self.easing_duration = frames;
        self
    }

    /// Validate the tracks and create the entity
    pub fn build(self) -> Result<TimelineEntity, ValidationError> {
        let id = self.id;
        let expected = self.images.len();
        if expected == 0 {
            return Err(ValidationError::EmptyTimeline { entity: id });
        }
        self.images
            .check_order()
            .map_err(|defect| ValidationError::from_defect(&id, TrackKind::Image, defect))?;

        for (pos, track) in self.tracks.iter().enumerate() {
            let kind = track.kind();
            if self.tracks[..pos].iter().any(|t| t.kind() == kind) {
                return Err(ValidationError::DuplicateTrack { entity: id, track: kind });
            }
            if track.len() != expected {
                return Err(ValidationError::LengthMismatch {
                    entity: id,
                    track: kind,
                    expected,
                    found: track.len(),
                });
            }
            track
                .check_order()
                .map_err(|defect| ValidationError::from_defect(&id, kind, defect))?;
            let mismatch = self
                .images
                .times()
                .enumerate()
                .find(|&(index, time)| track.time_at(index) != Some(time));
            if let Some((index, _)) = mismatch {
                return Err(ValidationError::TimestampMismatch { entity: id, track: kind, index });
            }
        }

        let has_position = self.tracks.iter().any(|t| t.kind() == TrackKind::Position);
        if self.draggable && !has_position {
            return Err(ValidationError::DraggableWithoutPosition { entity: id });
        }

        tracing::debug!(
            entity = %id,
            keyframes = expected,
            tracks = self.tracks.len(),
            draggable = self.draggable,
            "Timeline entity created"
        );

        Ok(TimelineEntity {
            id,
            images: self.images,
            tracks: self.tracks,
            draggable: self.draggable,
            easing_duration: self.easing_duration,
            easing_elapsed: 0,
            current_image: None,
            position: Channel::default(),
            size: Channel::default(),
            rotation: Channel::default(),
            drag: DragController::new(),
        })
    }
}

/// A keyframed artwork with live easing and drag state
#[derive(Debug, Clone)]
pub struct TimelineEntity {
    id: EntityId,
    /// Image keyframes; their timestamps are the entity's time axis
    images: KeyframeTrack<ImageHandle>,
    tracks: Vec<AttributeTrack>,
    draggable: bool,
    easing_duration: u32,
    easing_elapsed: u32,
    current_image: Option<ImageHandle>,
    position: Channel<Position>,
    size: Channel<Size>,
    rotation: Channel<Rotation>,
    drag: DragController,
}

impl TimelineEntity {
    /// Start building an entity around its image track
    pub fn builder(id: impl Into<EntityId>, images: KeyframeTrack<ImageHandle>) -> EntityBuilder {
        EntityBuilder {
            id: id.into(),
            images,
            tracks: Vec::new(),
            draggable: false,
            easing_duration: DEFAULT_EASING_FRAMES,
        }
    }

    /// Reconcile live state with the keyframe at `timestamp` and run one
    /// easing frame.
    ///
    /// Before the first keyframe the targets are left alone. While a drag is
    /// active the position channel is frozen; size, rotation and image keep
    /// following the timeline.
    pub fn advance(&mut self, timestamp: f32) {
        let dragging = self.drag.is_dragging();

        if let Some(index) = self.images.step_index(timestamp) {
            let mut retargeted = false;
            for track in &self.tracks {
                retargeted |= match track {
                    AttributeTrack::Position(t) if !dragging => {
                        retarget_from(&mut self.position, t, index)
                    }
                    AttributeTrack::Position(_) => false,
                    AttributeTrack::Size(t) => retarget_from(&mut self.size, t, index),
                    AttributeTrack::Rotation(t) => retarget_from(&mut self.rotation, t, index),
                };
            }
            if retargeted {
                tracing::trace!(entity = %self.id, index, timestamp, "New keyframe target");
                self.easing_elapsed = 0;
            }
            self.current_image = self.images.value_at(index).cloned();
        }

        if self.easing_elapsed < self.easing_duration {
            self.easing_elapsed += 1;
            let progress = self.easing_elapsed as f32 / self.easing_duration as f32;
            if !dragging {
                self.position.blend(progress);
            }
            self.size.blend(progress);
            self.rotation.blend(progress);
        }

        if self.easing_elapsed == self.easing_duration {
            if !dragging {
                self.position.settle();
            }
            self.size.settle();
            self.rotation.settle();
        }
    }

    /// Axis-aligned box around the live position and size
    pub fn bounds(&self) -> Bounds {
        Bounds::around(self.position.current, self.size.current)
    }

    /// Whether `point` lies in the live bounding box
    pub fn contains(&self, point: Position) -> bool {
        self.bounds().contains(point)
    }

    /// Grab the entity at `pointer`.
    ///
    /// No-op returning `false` for non-draggable entities, misses, or an
    /// already active drag.
    pub fn start_drag(&mut self, pointer: Position) -> bool {
        if !self.draggable {
            return false;
        }
        let bounds = self.bounds();
        let started = self.drag.begin(pointer, self.position.current, &bounds);
        if started {
            tracing::debug!(entity = %self.id, x = pointer.x, y = pointer.y, "Drag started");
        }
        started
    }

    /// Move the grabbed entity with the pointer. Returns whether it moved.
    pub fn drag(&mut self, pointer: Position) -> bool {
        match self.drag.follow(pointer) {
            Some(position) => {
                self.position.current = position;
                true
            }
            None => false,
        }
    }

    /// Release the drag and bake the live position into keyframe 0.
    ///
    /// Returns the committed position, or `None` when no drag was active.
    /// When the release point differs from the position target the easing
    /// counter restarts, so the timeline reclaims the position smoothly when
    /// the scrub time is past the first keyframe.
    pub fn stop_drag(&mut self) -> Option<Position> {
        if !self.drag.release() {
            return None;
        }
        let committed = self.position.current;
        for track in &mut self.tracks {
            if let AttributeTrack::Position(positions) = track {
                positions.commit_as_origin(committed);
            }
        }
        if self.position.current != self.position.target {
            self.easing_elapsed = 0;
        }
        tracing::debug!(
            entity = %self.id,
            x = committed.x,
            y = committed.y,
            "Drag committed to first keyframe"
        );
        Some(committed)
    }

    /// Label for the hover readout when `pointer` is over the entity
    pub fn hover_label(&self, pointer: Position) -> Option<HoverLabel> {
        self.contains(pointer).then(|| HoverLabel {
            id: self.id.clone(),
            position: self.position.target,
            size: self.size.target,
        })
    }

    /// Values to draw this frame
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            id: self.id.clone(),
            image: self.current_image.clone(),
            position: self.position.current,
            size: self.has_track(TrackKind::Size).then_some(self.size.current),
            rotation: self.rotation.current,
            dragging: self.drag.is_dragging(),
        }
    }

    /// Entity ID
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Whether pointer dragging is allowed
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Whether a drag is active
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Drag controller state
    pub fn drag_controller(&self) -> &DragController {
        &self.drag
    }

    /// Frames elapsed in the current easing
    pub fn easing_elapsed(&self) -> u32 {
        self.easing_elapsed
    }

    /// Easing length in frames
    pub fn easing_duration(&self) -> u32 {
        self.easing_duration
    }

    /// Whether every channel has reached its target
    pub fn is_settled(&self) -> bool {
        self.position.is_settled() && self.size.is_settled() && self.rotation.is_settled()
    }

    /// Image shown at the last advance
    pub fn current_image(&self) -> Option<&ImageHandle> {
        self.current_image.as_ref()
    }

    /// Position channel
    pub fn position(&self) -> &Channel<Position> {
        &self.position
    }

    /// Size channel
    pub fn size(&self) -> &Channel<Size> {
        &self.size
    }

    /// Rotation channel
    pub fn rotation(&self) -> &Channel<Rotation> {
        &self.rotation
    }

    /// Image keyframes
    pub fn images(&self) -> &KeyframeTrack<ImageHandle> {
        &self.images
    }

    /// Numeric attribute tracks in attachment order
    pub fn tracks(&self) -> &[AttributeTrack] {
        &self.tracks
    }

    /// Whether a track of `kind` is attached
    pub fn has_track(&self, kind: TrackKind) -> bool {
        kind == TrackKind::Image || self.tracks.iter().any(|t| t.kind() == kind)
    }

    /// Position keyframes, if attached
    pub fn position_track(&self) -> Option<&KeyframeTrack<Position>> {
        self.tracks.iter().find_map(|t| match t {
            AttributeTrack::Position(positions) => Some(positions),
            _ => None,
        })
    }

    /// First and last keyframe time
    pub fn time_range(&self) -> Option<(f32, f32)> {
        self.images.time_range()
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(times: &[f32]) -> KeyframeTrack<ImageHandle> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| (t, ImageHandle::new(format!("img-{i}.jpg"))))
            .collect()
    }

    fn track<V: Copy>(times: &[f32], values: &[V]) -> KeyframeTrack<V> {
        times.iter().copied().zip(values.iter().copied()).collect()
    }

    /// Three keyframes at 0, 10 and 20 with position, size and rotation
    fn artwork() -> TimelineEntity {
        let times = [0.0, 10.0, 20.0];
        TimelineEntity::builder("series-a", images(&times))
            .track(track(
                &times,
                &[
                    Position::new(100.0, 100.0),
                    Position::new(-40.0, 20.0),
                    Position::new(-40.0, 20.0),
                ],
            ))
            .track(track(
                &times,
                &[Size::new(40.0, 40.0), Size::new(40.0, 40.0), Size::new(40.0, 40.0)],
            ))
            .track(track(&times, &[Rotation(0.0), Rotation(0.0), Rotation(45.0)]))
            .draggable(true)
            .build()
            .unwrap()
    }

    fn settle(entity: &mut TimelineEntity, timestamp: f32) {
        for _ in 0..entity.easing_duration() {
            entity.advance(timestamp);
        }
    }

    #[test]
    fn test_convergence_is_exact_after_duration() {
        let mut entity = artwork();
        let mut previous = Position::default();

        for frame in 1..=12 {
            entity.advance(5.0);
            let current = entity.position().current;
            assert!(current.x <= 100.0 && current.y <= 100.0, "overshoot at frame {frame}");
            assert!(current.x >= previous.x && current.y >= previous.y);
            if frame < 12 {
                assert!(current.x < 100.0, "arrived early at frame {frame}");
            }
            previous = current;
        }

        assert_eq!(entity.easing_elapsed(), 12);
        assert_eq!(entity.position().current, Position::new(100.0, 100.0));
        assert!(entity.is_settled());
    }

    #[test]
    fn test_blend_is_recursive_not_linear() {
        let mut entity = artwork();
        entity.advance(0.0);
        // Frame 1: 0 + 100 * 1/12
        let first = entity.position().current.x;
        assert!((first - 100.0 / 12.0).abs() < 1e-4);
        entity.advance(0.0);
        // Frame 2 blends from the frame-1 value, not from the start
        let expected = first + (100.0 - first) * (2.0 / 12.0);
        assert!((entity.position().current.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_reset_on_rotation_only_change() {
        let times = [0.0, 10.0, 20.0];
        let mut entity = TimelineEntity::builder("spinner", images(&times))
            .track(track(&times, &[Position::new(5.0, -5.0); 3]))
            .track(track(&times, &[Size::new(30.0, 10.0); 3]))
            .track(track(&times, &[Rotation(0.0), Rotation(30.0), Rotation(60.0)]))
            .build()
            .unwrap();
        settle(&mut entity, 0.0);
        let position = entity.position().current;
        let size = entity.size().current;

        for _ in 0..5 {
            entity.advance(10.0);
        }
        assert_eq!(entity.easing_elapsed(), 5);

        entity.advance(20.0);
        // Reset to 0, then one frame of progress in the same call
        assert_eq!(entity.easing_elapsed(), 1);
        assert_eq!(entity.rotation().target, Rotation(60.0));
        assert_eq!(entity.position().current, position);
        assert_eq!(entity.size().current, size);
    }

    #[test]
    fn test_mid_easing_change_restarts_counter() {
        let mut entity = artwork();
        settle(&mut entity, 10.0);
        entity.advance(0.0);
        for _ in 0..4 {
            entity.advance(0.0);
        }
        assert_eq!(entity.easing_elapsed(), 5);

        entity.advance(10.0);
        assert_eq!(entity.easing_elapsed(), 1);
        assert_eq!(entity.position().target, Position::new(-40.0, 20.0));
    }

    #[test]
    fn test_before_first_keyframe_keeps_default() {
        let times = [5.0, 10.0];
        let mut entity = TimelineEntity::builder("late", images(&times))
            .track(track(&times, &[Position::new(1.0, 1.0), Position::new(2.0, 2.0)]))
            .build()
            .unwrap();

        for _ in 0..20 {
            entity.advance(0.0);
        }
        assert_eq!(entity.current_image(), None);
        assert_eq!(entity.position().current, Position::default());
        assert_eq!(entity.position().target, Position::default());
    }

    #[test]
    fn test_image_swaps_without_easing() {
        let mut entity = artwork();
        entity.advance(0.0);
        assert_eq!(entity.current_image(), Some(&ImageHandle::new("img-0.jpg")));
        entity.advance(10.0);
        assert_eq!(entity.current_image(), Some(&ImageHandle::new("img-1.jpg")));
    }

    #[test]
    fn test_idempotent_after_convergence() {
        let mut entity = artwork();
        settle(&mut entity, 20.0);
        let settled = entity.snapshot();
        for _ in 0..30 {
            entity.advance(20.0);
            assert_eq!(entity.snapshot(), settled);
        }
        assert_eq!(entity.easing_elapsed(), entity.easing_duration());
    }

    #[test]
    fn test_drag_suspends_timeline_position() {
        let mut entity = artwork();
        settle(&mut entity, 0.0);
        assert!(entity.start_drag(Position::new(110.0, 90.0)));
        assert!(entity.drag(Position::new(0.0, 0.0)));
        let dragged = Position::new(-10.0, 10.0);
        assert_eq!(entity.position().current, dragged);

        for t in [0.0, 10.0, 20.0, 15.0, 3.0] {
            entity.advance(t);
            assert_eq!(entity.position().current, dragged);
        }
        // Rotation keeps following the timeline while dragging
        assert_eq!(entity.rotation().target, Rotation(0.0));
        entity.advance(20.0);
        assert_eq!(entity.rotation().target, Rotation(45.0));
        assert_eq!(entity.position().current, dragged);
    }

    #[test]
    fn test_drag_commit_rewrites_first_keyframe() {
        let mut entity = artwork();
        settle(&mut entity, 10.0);
        // Live position is (-40, 20), box is 40x40
        assert!(entity.start_drag(Position::new(-30.0, 25.0)));
        entity.drag(Position::new(60.0, -15.0));
        let released = entity.position().current;
        assert_eq!(released, Position::new(50.0, -20.0));

        assert_eq!(entity.stop_drag(), Some(released));
        assert!(!entity.is_dragging());
        let positions = entity.position_track().unwrap();
        assert_eq!(positions.value_at(0), Some(&released));
        assert_eq!(positions.value_at(1), Some(&Position::new(-40.0, 20.0)));

        entity.advance(5.0);
        assert_eq!(entity.position().current, released);
        settle(&mut entity, 5.0);
        assert_eq!(entity.position().current, released);
    }

    #[test]
    fn test_release_past_first_keyframe_eases_back() {
        let mut entity = artwork();
        settle(&mut entity, 10.0);
        entity.start_drag(Position::new(-40.0, 20.0));
        entity.drag(Position::new(0.0, 0.0));
        entity.stop_drag();

        entity.advance(10.0);
        assert_ne!(entity.position().current, Position::new(-40.0, 20.0));
        settle(&mut entity, 10.0);
        assert_eq!(entity.position().current, Position::new(-40.0, 20.0));
    }

    #[test]
    fn test_release_on_target_keeps_running_ease() {
        let mut entity = artwork();
        settle(&mut entity, 10.0);
        for _ in 0..3 {
            entity.advance(20.0);
        }
        assert_eq!(entity.easing_elapsed(), 3);

        // Grab and let go without moving
        assert!(entity.start_drag(Position::new(-35.0, 25.0)));
        assert!(entity.drag(Position::new(-35.0, 25.0)));
        assert_eq!(entity.stop_drag(), Some(Position::new(-40.0, 20.0)));
        assert_eq!(entity.easing_elapsed(), 3);

        entity.advance(20.0);
        assert_eq!(entity.easing_elapsed(), 4);

        // A real move restarts the shared counter for the ease back
        assert!(entity.start_drag(Position::new(-40.0, 20.0)));
        entity.drag(Position::new(0.0, 0.0));
        entity.stop_drag();
        assert_eq!(entity.easing_elapsed(), 0);
    }

    #[test]
    fn test_drag_noops() {
        let mut entity = artwork();
        settle(&mut entity, 0.0);
        assert_eq!(entity.stop_drag(), None);
        assert!(!entity.drag(Position::new(0.0, 0.0)));
        assert!(!entity.start_drag(Position::new(500.0, 500.0)));

        let times = [0.0];
        let mut fixed = TimelineEntity::builder("fixed", images(&times))
            .track(track(&times, &[Position::new(0.0, 0.0)]))
            .track(track(&times, &[Size::new(50.0, 50.0)]))
            .build()
            .unwrap();
        settle(&mut fixed, 0.0);
        assert!(!fixed.start_drag(Position::new(0.0, 0.0)));
        assert_eq!(fixed.position_track().unwrap().value_at(0), Some(&Position::new(0.0, 0.0)));
    }

    #[test]
    fn test_hover_reports_target_values() {
        let mut entity = artwork();
        settle(&mut entity, 0.0);
        entity.advance(10.0);

        let label = entity.hover_label(entity.position().current).unwrap();
        assert_eq!(label.position, Position::new(-40.0, 20.0));
        assert_eq!(label.size, Size::new(40.0, 40.0));
        assert_eq!(label.to_string(), "series-a (-40, 20) 40x40");
        assert!(entity.hover_label(Position::new(-500.0, 0.0)).is_none());
    }

    #[test]
    fn test_snapshot_without_size_track() {
        let times = [0.0];
        let mut entity = TimelineEntity::builder("bare", images(&times)).build().unwrap();
        entity.advance(0.0);
        let snapshot = entity.snapshot();
        assert_eq!(snapshot.size, None);
        assert_eq!(snapshot.rotation, Rotation(0.0));
        assert_eq!(snapshot.image, Some(ImageHandle::new("img-0.jpg")));
    }

    #[test]
    fn test_snapshot_serializes_for_renderer() {
        let mut entity = artwork();
        settle(&mut entity, 20.0);
        let json = serde_json::to_value(entity.snapshot()).unwrap();
        assert_eq!(json["id"], "series-a");
        assert_eq!(json["image"], "img-2.jpg");
        assert_eq!(json["rotation"], 45.0);
        assert_eq!(json["position"]["x"], -40.0);
        assert_eq!(json["dragging"], false);
    }

    #[test]
    fn test_zero_duration_snaps_immediately() {
        let times = [0.0];
        let mut entity = TimelineEntity::builder("instant", images(&times))
            .track(track(&times, &[Position::new(7.0, 9.0)]))
            .easing_duration(0)
            .build()
            .unwrap();
        entity.advance(0.0);
        assert_eq!(entity.position().current, Position::new(7.0, 9.0));
    }

    #[test]
    fn test_validation_errors() {
        let empty = TimelineEntity::builder("empty", KeyframeTrack::new()).build();
        assert_eq!(
            empty.unwrap_err(),
            ValidationError::EmptyTimeline { entity: "empty".into() }
        );

        let short = TimelineEntity::builder("short", images(&[0.0, 1.0]))
            .track(track(&[0.0], &[Size::new(1.0, 1.0)]))
            .build();
        assert_eq!(
            short.unwrap_err(),
            ValidationError::LengthMismatch {
                entity: "short".into(),
                track: TrackKind::Size,
                expected: 2,
                found: 1,
            }
        );

        let backwards = TimelineEntity::builder("backwards", images(&[0.0, 2.0, 1.0])).build();
        assert_eq!(
            backwards.unwrap_err(),
            ValidationError::NonMonotonic {
                entity: "backwards".into(),
                track: TrackKind::Image,
                index: 2,
            }
        );

        let skewed = TimelineEntity::builder("skewed", images(&[0.0, 1.0]))
            .track(track(&[0.0, 3.0], &[Rotation(0.0), Rotation(1.0)]))
            .build();
        assert_eq!(
            skewed.unwrap_err(),
            ValidationError::TimestampMismatch {
                entity: "skewed".into(),
                track: TrackKind::Rotation,
                index: 1,
            }
        );

        let doubled = TimelineEntity::builder("doubled", images(&[0.0]))
            .track(track(&[0.0], &[Rotation(0.0)]))
            .track(track(&[0.0], &[Rotation(1.0)]))
            .build();
        assert!(matches!(doubled, Err(ValidationError::DuplicateTrack { .. })));

        let loose = TimelineEntity::builder("loose", images(&[0.0])).draggable(true).build();
        let err = loose.unwrap_err();
        assert_eq!(err.to_string(), "entity 'loose' is draggable but has no position track");
    }
}
