// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe document loading and save-back.
//!
//! The document is a JSON array of series, each a list of artwork records.
//! Records may omit position, size or rotation; missing values repeat the
//! previous record's value. The first record is seeded with position
//! `(0, 0)`, size `100x100` and rotation `0`.

use crate::settings::Settings;
use artscrub_timeline::{
    EntityId, ImageHandle, KeyframeTrack, Position, Rotation, Scene, SceneError, Size,
    TimelineEntity, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Position seed before the first record
pub const SEED_POSITION: Position = Position::new(0.0, 0.0);

/// Size seed before the first record
pub const SEED_SIZE: Size = Size::new(100.0, 100.0);

/// Document load/save error
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON
    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),
    /// A series failed validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// Series could not be added to the scene
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Position with optional fields, filled independently
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Horizontal coordinate
    #[serde(default)]
    pub x: Option<f32>,
    /// Vertical coordinate
    #[serde(default)]
    pub y: Option<f32>,
}

impl PositionRecord {
    fn fill(&self, last: Position) -> Position {
        Position::new(self.x.unwrap_or(last.x), self.y.unwrap_or(last.y))
    }
}

impl From<Position> for PositionRecord {
    fn from(p: Position) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
        }
    }
}

/// Size with optional fields, filled independently
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeRecord {
    /// Width
    #[serde(default)]
    pub width: Option<f32>,
    /// Height
    #[serde(default)]
    pub height: Option<f32>,
}

impl SizeRecord {
    fn fill(&self, last: Size) -> Size {
        Size::new(
            self.width.unwrap_or(last.width),
            self.height.unwrap_or(last.height),
        )
    }
}

/// One keyframe of a series as stored in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    /// Image path handed to the renderer
    pub image: String,
    /// Scrub time
    pub timestamp: f32,
    /// Center position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionRecord>,
    /// Drawn size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeRecord>,
    /// Rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

/// A series of artworks animated as one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Series ID
    pub id: String,
    /// Overrides the default draggable setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    /// Keyframe records
    pub artworks: Vec<ArtworkRecord>,
}

impl SeriesRecord {
    /// Record indices in keyframe order; equal timestamps keep document order
    fn keyframe_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.artworks.len()).collect();
        order.sort_by(|&a, &b| {
            self.artworks[a]
                .timestamp
                .total_cmp(&self.artworks[b].timestamp)
        });
        order
    }

    /// Write `position` into the record that feeds keyframe 0.
    ///
    /// Later records that inherit their position from the origin get the
    /// old filled value written out first, up to the first record that sets
    /// both coordinates itself. Returns `false` for an empty series.
    fn commit_origin(&mut self, position: Position) -> bool {
        let order = self.keyframe_order();
        let Some((&origin, rest)) = order.split_first() else {
            return false;
        };

        let mut filled = self.artworks[origin]
            .position
            .map_or(SEED_POSITION, |p| p.fill(SEED_POSITION));
        for &idx in rest {
            let record = &mut self.artworks[idx];
            let own = record.position.unwrap_or_default();
            if own.x.is_some() && own.y.is_some() {
                break;
            }
            filled = own.fill(filled);
            record.position = Some(filled.into());
        }

        self.artworks[origin].position = Some(position.into());
        true
    }

    /// Forward-fill the records and build a validated entity.
    ///
    /// Records are sorted by timestamp; equal timestamps keep document order.
    pub fn to_entity(
        &self,
        easing_frames: u32,
        draggable_default: bool,
    ) -> Result<TimelineEntity, ValidationError> {

        let mut images = KeyframeTrack::new();
        let mut positions = KeyframeTrack::new();
        let mut sizes = KeyframeTrack::new();
        let mut rotations = KeyframeTrack::new();

        let mut position = SEED_POSITION;
        let mut size = SEED_SIZE;
        let mut rotation = Rotation(0.0);

        for record in self.keyframe_order().into_iter().map(|idx| &self.artworks[idx]) {
            if let Some(p) = &record.position {
                position = p.fill(position);
            }
            if let Some(s) = &record.size {
                size = s.fill(size);
            }
            if let Some(r) = record.rotation {
                rotation = Rotation(r);
            }
            images.push(record.timestamp, ImageHandle::new(record.image.as_str()));
            positions.push(record.timestamp, position);
            sizes.push(record.timestamp, size);
            rotations.push(record.timestamp, rotation);
        }

        let mut builder = TimelineEntity::builder(self.id.as_str(), images)
            .track(positions)
            .draggable(self.draggable.unwrap_or(draggable_default))
            .easing_duration(easing_frames);
        if self.artworks.iter().any(|a| a.size.is_some()) {
            builder = builder.track(sizes);
        }
        if self.artworks.iter().any(|a| a.rotation.is_some()) {
            builder = builder.track(rotations);
        }
        builder.build()
    }
}

/// The whole keyframe document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    /// Series in draw order
    pub series: Vec<SeriesRecord>,
}

impl Document {
    /// Parse from a JSON string
    pub fn from_json(s: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize to a pretty JSON string
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document from a file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = std::fs::read_to_string(path)?;
        let document = Self::from_json(&contents)?;
        tracing::info!("Loaded {} series from {:?}", document.series.len(), path);
        Ok(document)
    }

    /// Save the document to a file
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Saved document to {:?}", path);
        Ok(())
    }

    /// Build a scene with one entity per series
    pub fn build_scene(&self, settings: &Settings) -> Result<Scene, DocumentError> {
        let easing_frames = settings.playback.easing_frames();
        let draggable = settings.interaction.draggable_by_default;

        let mut scene = Scene::new();
        for series in &self.series {
            scene.add_entity(series.to_entity(easing_frames, draggable)?)?;
        }
        if let Some((start, _)) = scene.time_range() {
            scene.set_cursor(start);
        }
        Ok(scene)
    }

    /// Write a committed drag into the record that feeds keyframe 0.
    ///
    /// The rest of the series keeps the positions it had before the commit.
    /// Returns `false` when the series is unknown or empty.
    pub fn commit_origin(&mut self, id: &EntityId, position: Position) -> bool {
        self.series
            .iter_mut()
            .find(|s| s.id == id.as_str())
            .is_some_and(|series| series.commit_origin(position))
    }
}
