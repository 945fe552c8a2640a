// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene owning the entities and the shared scrub cursor.

use crate::entity::{EntityId, HoverLabel, RenderSnapshot, TimelineEntity, ValidationError};
use crate::keyframe::Position;
use indexmap::IndexMap;

/// Scene construction error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// An entity with this ID is already in the scene
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(EntityId),

    /// Entity failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Collection of timeline entities driven by one scrub cursor.
///
/// Entities keep insertion order, which is also draw order: the last entity
/// inserted is drawn on top and wins pointer hits.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entities: IndexMap<EntityId, TimelineEntity>,
    /// Scrub position shared by every entity
    cursor: f32,
    /// Entity currently under pointer control
    active_drag: Option<EntityId>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity
    pub fn add_entity(&mut self, entity: TimelineEntity) -> Result<(), SceneError> {
        if self.entities.contains_key(entity.id()) {
            return Err(SceneError::DuplicateEntity(entity.id().clone()));
        }
        tracing::debug!(entity = %entity.id(), "Entity added to scene");
        self.entities.insert(entity.id().clone(), entity);
        Ok(())
    }

    /// Get an entity
    pub fn entity(&self, id: &EntityId) -> Option<&TimelineEntity> {
        self.entities.get(id)
    }

    /// Get all entities in draw order
    pub fn entities(&self) -> impl Iterator<Item = &TimelineEntity> {
        self.entities.values()
    }

    /// Get entity count
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Earliest and latest keyframe time over all entities
    pub fn time_range(&self) -> Option<(f32, f32)> {
        self.entities
            .values()
            .filter_map(TimelineEntity::time_range)
            .reduce(|(lo, hi), (start, end)| (lo.min(start), hi.max(end)))
    }

    /// Distinct keyframe times over all entities, ascending
    pub fn keyframe_times(&self) -> Vec<f32> {
        let mut times: Vec<f32> = self
            .entities
            .values()
            .flat_map(|e| e.images().times())
            .collect();
        times.sort_by(f32::total_cmp);
        times.dedup();
        times
    }

    /// Current scrub position
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Move the scrub cursor, clamped to [`Self::time_range`].
    ///
    /// Non-finite input is ignored. Returns the cursor actually applied.
    pub fn set_cursor(&mut self, time: f32) -> f32 {
        if !time.is_finite() {
            return self.cursor;
        }
        self.cursor = match self.time_range() {
            Some((start, end)) => time.clamp(start, end),
            None => time,
        };
        self.cursor
    }

    /// Advance every entity one frame at the cursor and collect what to draw
    pub fn tick(&mut self) -> Vec<RenderSnapshot> {
        let cursor = self.cursor;
        self.entities
            .values_mut()
            .map(|entity| {
                entity.advance(cursor);
                entity.snapshot()
            })
            .collect()
    }

    /// Run `frames` ticks, discarding snapshots
    pub fn settle(&mut self, frames: u32) {
        for _ in 0..frames {
            self.tick();
        }
    }

    /// Snapshots without advancing
    pub fn snapshots(&self) -> Vec<RenderSnapshot> {
        self.entities.values().map(TimelineEntity::snapshot).collect()
    }

    /// Start dragging the topmost draggable entity under `pointer`.
    ///
    /// Non-draggable entities do not block the pointer. Returns the grabbed
    /// entity, or `None` when nothing was hit or a drag is already active.
    pub fn pointer_pressed(&mut self, pointer: Position) -> Option<EntityId> {
        if self.active_drag.is_some() {
            return None;
        }
        let grabbed = self
            .entities
            .values_mut()
            .rev()
            .find_map(|entity| entity.start_drag(pointer).then(|| entity.id().clone()))?;
        self.active_drag = Some(grabbed.clone());
        Some(grabbed)
    }

    /// Move the active drag. Returns whether an entity moved.
    pub fn pointer_moved(&mut self, pointer: Position) -> bool {
        let Some(id) = &self.active_drag else {
            return false;
        };
        self.entities
            .get_mut(id)
            .is_some_and(|entity| entity.drag(pointer))
    }

    /// Release the active drag, committing it to the entity's first keyframe
    pub fn pointer_released(&mut self) -> Option<(EntityId, Position)> {
        let id = self.active_drag.take()?;
        let committed = self.entities.get_mut(&id)?.stop_drag()?;
        Some((id, committed))
    }

    /// Entity under pointer control
    pub fn active_drag(&self) -> Option<&EntityId> {
        self.active_drag.as_ref()
    }

    /// Hover readout for the topmost entity under `pointer`
    pub fn hover(&self, pointer: Position) -> Option<HoverLabel> {
        self.entities
            .values()
            .rev()
            .find_map(|entity| entity.hover_label(pointer))
    }
}
