//! Export pipeline errors.

use thiserror::Error;

/// Errors surfaced by the export pipeline.
///
/// Unlike storage and sync failures, these propagate to the caller so it
/// can offer a retry affordance.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No rasterizer is available; the one actionable case, surfaced with
    /// a specific message rather than a generic "try again".
    #[error("no rasterizer is configured; set raster_command in the config to enable PDF export")]
    RendererUnavailable,
    /// The rasterizer ran and failed.
    #[error("rasterization failed: {0}")]
    Rasterize(String),
    /// The rasterizer produced data this pipeline cannot read.
    #[error("malformed bitmap data: {0}")]
    Bitmap(String),
}
