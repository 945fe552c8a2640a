// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer drag override for entity positions.

use crate::keyframe::{Position, Size};

/// Axis-aligned box centered on an entity's live position.
///
/// Edges are inclusive: a point exactly on an edge is inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub min_x: f32,
    /// Top edge
    pub min_y: f32,
    /// Right edge
    pub max_x: f32,
    /// Bottom edge
    pub max_y: f32,
}

impl Bounds {
    /// Box of `size` centered on `center`
    pub fn around(center: Position, size: Size) -> Self {
        let half_w = size.width.abs() / 2.0;
        let half_h = size.height.abs() / 2.0;
        Self {
            min_x: center.x - half_w,
            min_y: center.y - half_h,
            max_x: center.x + half_w,
            max_y: center.y + half_h,
        }
    }

    /// Whether `point` lies inside or on the edge
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Drag state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Not dragging
    #[default]
    Idle,
    /// Position follows the pointer
    Dragging {
        /// Live position minus the pointer at grab time
        offset: Position,
    },
}

/// Two-state drag machine embedded in every entity.
///
/// The controller only owns the drag sub-state. The entity decides whether
/// it is draggable, applies the positions returned by [`Self::follow`] and
/// commits on release.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a drag is active
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Grab offset of the active drag
    pub fn offset(&self) -> Option<Position> {
        match self.state {
            DragState::Dragging { offset } => Some(offset),
            DragState::Idle => None,
        }
    }

    /// Idle -> Dragging when `pointer` hits `bounds`.
    ///
    /// Returns `false` without changing state when already dragging or when
    /// the pointer misses.
    pub fn begin(&mut self, pointer: Position, position: Position, bounds: &Bounds) -> bool {
        match self.state {
            DragState::Idle if bounds.contains(pointer) => {
                self.state = DragState::Dragging {
                    offset: position - pointer,
                };
                true
            }
            _ => false,
        }
    }

    /// Position the dragged entity should take for `pointer`
    pub fn follow(&self, pointer: Position) -> Option<Position> {
        self.offset().map(|offset| pointer + offset)
    }

    /// Dragging -> Idle. Returns whether a drag was active.
    pub fn release(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}
