//! Layout engines for every diagram variant.
//!
//! Each engine turns one typed parameter struct into a [`Scene`]: a fixed-size
//! canvas of layered primitives. Engines are pure; the same parameters always
//! produce the same scene.
//!
//! # Pipeline Position
//!
//! ```text
//! DiagramRequest
//!     ↓ decode (request)
//! VariantParameters
//!     ↓ layout (this module)
//! Scene
//!     ↓ export
//! SVG
//! ```
//!
//! # Submodules
//!
//! - [`set`] - Set diagrams in list, box and circle modes
//! - [`percentage_grid`] - Hundred-square grids
//! - [`percentage_bar`] - Horizontal percentage bars with brackets
//! - [`stacked_bar`] - One stacked bar with a total bracket
//! - [`unitary_table`] - Proportional reasoning tables
//! - [`number_line`] - Number lines with intervals and points
//! - [`cartesian`] - Coordinate planes
//! - [`function_graph`] - Plots of arithmetic expressions
//! - [`opposite_angles`] - Vertically opposite angles
//!
//! Parameter structs live beside their engine and are public so that hosts
//! can build and inspect them; the engines themselves are internal and reached
//! through [`DiagramRenderer`](crate::DiagramRenderer).

pub mod cartesian;
pub(crate) mod common;
pub mod function_graph;
pub mod number_line;
pub mod opposite_angles;
pub mod percentage_bar;
pub mod percentage_grid;
pub(crate) mod plane;
pub mod set;
pub mod stacked_bar;
pub mod unitary_table;

use lessonviz_core::draw::Scene;

use crate::error::LessonVizError;

/// Interface shared by the per-variant layout engines.
pub(crate) trait LayoutEngine {
    /// The decoded parameters this engine lays out.
    type Params;

    /// Calculate the scene for one set of parameters.
    ///
    /// # Errors
    ///
    /// Returns [`LessonVizError::MalformedParameters`] when the parameters
    /// decode but violate a constraint of the variant, such as an empty range.
    fn calculate(&self, params: &Self::Params) -> Result<Scene, LessonVizError>;
}
