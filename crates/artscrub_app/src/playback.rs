// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless playback session.
//!
//! A session loads the document named in the settings, builds the scene and
//! drives it the way an interactive front end would: the scrub cursor moves
//! between keyframe times, each stop is rendered for a number of frames, and
//! pointer gestures go through the scene's drag routing.

use crate::document::Document;
use crate::error::AppError;
use crate::settings::Settings;
use artscrub_timeline::{
    AttributeTrack, EntityId, HoverLabel, Position, RenderSnapshot, Scene, TrackKind,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// One rendered frame as emitted by `play`
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    /// Frame counter since playback start
    pub frame: u64,
    /// Scrub position for this frame
    pub cursor: f32,
    /// What to draw
    pub entities: Vec<RenderSnapshot>,
}

/// Summary line for `inspect`
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummary {
    /// Entity ID
    pub id: EntityId,
    /// Keyframe count
    pub keyframes: usize,
    /// First and last keyframe time
    pub time_range: Option<(f32, f32)>,
    /// Attached tracks
    pub tracks: Vec<TrackKind>,
    /// Whether the entity can be dragged
    pub draggable: bool,
}

/// Result of a pointer drag gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    /// Entity that was grabbed
    pub id: EntityId,
    /// Position written into keyframe 0
    pub committed: Position,
}

/// Loaded document plus the scene built from it
pub struct Session {
    settings: Settings,
    data_path: PathBuf,
    document: Document,
    scene: Scene,
}

impl Session {
    /// Load the document named in `settings`
    pub fn open(settings: Settings) -> Result<Self, AppError> {
        let data_path = settings.data_path.clone();
        let document = Document::load(&data_path)?;
        Self::from_document(settings, data_path, document)
    }

    /// Build a session from an already parsed document
    pub fn from_document(
        settings: Settings,
        data_path: PathBuf,
        document: Document,
    ) -> Result<Self, AppError> {
        let scene = document.build_scene(&settings)?;
        if scene.is_empty() {
            return Err(AppError::EmptyScene(data_path));
        }
        Ok(Self {
            settings,
            data_path,
            document,
            scene,
        })
    }

    /// Per-entity summaries in draw order
    pub fn inspect(&self) -> Vec<EntitySummary> {
        self.scene
            .entities()
            .map(|entity| EntitySummary {
                id: entity.id().clone(),
                keyframes: entity.keyframe_count(),
                time_range: entity.time_range(),
                tracks: std::iter::once(TrackKind::Image)
                    .chain(entity.tracks().iter().map(AttributeTrack::kind))
                    .collect(),
                draggable: entity.is_draggable(),
            })
            .collect()
    }

    /// Move the cursor to `time` and run frames until easing completes
    pub fn settle_at(&mut self, time: f32) -> f32 {
        let cursor = self.scene.set_cursor(time);
        self.scene.settle(self.settings.playback.easing_frames().max(1));
        cursor
    }

    /// Scrub across keyframe times from `from` to `to`, writing one JSON line
    /// per frame.
    ///
    /// Scrubs backwards when `from` is after `to`. Returns the number of
    /// frames written.
    pub fn play<W: Write>(
        &mut self,
        from: Option<f32>,
        to: Option<f32>,
        hold: Option<u32>,
        out: &mut W,
    ) -> Result<u64, AppError> {
        let Some((start, end)) = self.scene.time_range() else {
            return Ok(0);
        };
        let from = from.unwrap_or(start);
        let to = to.unwrap_or(end);
        let hold = hold.unwrap_or(self.settings.playback.hold_frames).max(1);

        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let mut stops: Vec<f32> = self
            .scene
            .keyframe_times()
            .into_iter()
            .filter(|t| (lo..=hi).contains(t))
            .collect();
        if from > to {
            stops.reverse();
        }
        tracing::info!(
            "Playing {} stops from {} to {}, {} frames each",
            stops.len(),
            from,
            to,
            hold
        );

        let mut frame = 0;
        for stop in stops {
            let cursor = self.scene.set_cursor(stop);
            for _ in 0..hold {
                let record = FrameRecord {
                    frame,
                    cursor,
                    entities: self.scene.tick(),
                };
                serde_json::to_writer(&mut *out, &record)?;
                out.write_all(b"\n")?;
                frame += 1;
            }
        }
        out.flush()?;
        Ok(frame)
    }

    /// Press at `grab`, move to `release` in `steps` moves, and release.
    ///
    /// The scene ticks once per move, so the timeline keeps running while
    /// the pointer holds the entity. The commit is mirrored into the
    /// document.
    pub fn drag(
        &mut self,
        at: f32,
        grab: Position,
        release: Position,
        steps: u32,
    ) -> Result<DragOutcome, AppError> {
        self.settle_at(at);
        let id = self
            .scene
            .pointer_pressed(grab)
            .ok_or(AppError::NothingGrabbed { x: grab.x, y: grab.y })?;

        let steps = steps.max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            let pointer = Position::new(
                grab.x + (release.x - grab.x) * t,
                grab.y + (release.y - grab.y) * t,
            );
            self.scene.pointer_moved(pointer);
            self.scene.tick();
        }

        let (id, committed) = self
            .scene
            .pointer_released()
            .ok_or(AppError::DragLost(id))?;
        self.document.commit_origin(&id, committed);
        tracing::info!("Committed {} keyframe 0 to ({}, {})", id, committed.x, committed.y);
        Ok(DragOutcome { id, committed })
    }

    /// Hover readout at `pointer` after settling at `at`
    pub fn hover(&mut self, at: f32, pointer: Position) -> Option<HoverLabel> {
        self.settle_at(at);
        self.scene.hover(pointer)
    }

    /// Write the document back to its file
    pub fn save(&self) -> Result<(), AppError> {
        self.document.save(&self.data_path)?;
        Ok(())
    }
}
