// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application error type.

use crate::document::DocumentError;
use crate::settings::SettingsError;
use artscrub_timeline::EntityId;
use std::path::PathBuf;

/// Errors surfaced by the command line driver
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Settings error
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Document error
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Output error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding error
    #[error("Failed to encode frame: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no series
    #[error("No series in {0:?}")]
    EmptyScene(PathBuf),

    /// No draggable entity under the pointer
    #[error("Nothing draggable at ({x}, {y})")]
    NothingGrabbed {
        /// Pointer x
        x: f32,
        /// Pointer y
        y: f32,
    },

    /// The active drag disappeared before release
    #[error("Drag on {0} was lost before release")]
    DragLost(EntityId),

    /// Refused to overwrite an existing file
    #[error("{0:?} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}
