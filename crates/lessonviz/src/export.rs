//! Export functionality for lessonviz scenes.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! painting a laid-out [`Scene`] onto an output format. It is the final stage
//! of the rendering pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! DiagramRequest
//!     ↓ decode
//! VariantParameters
//!     ↓ layout
//! Scene (layered primitives)
//!     ↓ export (this module)
//! Output String
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] — SVG output via [`svg::SvgSurface`]

/// SVG export backend.
pub mod svg;

use thiserror::Error;

use lessonviz_core::draw::Scene;

/// Abstraction for drawing surfaces.
///
/// Implementors paint a [`Scene`] into a specific output format. Painting
/// never changes the scene.
pub trait Exporter {
    /// Paints the scene and returns the serialized document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scene cannot be painted, such as a
    /// canvas with a non-finite or non-positive size.
    fn export_scene(&self, scene: &Scene) -> Result<String, Error>;
}

/// Errors that can occur while painting a scene.
///
/// This type is converted into [`LessonVizError::Export`] at the crate
/// boundary.
///
/// [`LessonVizError::Export`]: crate::LessonVizError::Export
#[derive(Debug, Error)]
pub enum Error {
    /// A rendering failure described by `message`.
    #[error("Render error: {0}")]
    Render(String),
}
