//! Lessonviz - declarative diagrams for math lesson pages.
//!
//! A lesson page asks for a diagram by tool name and a JSON parameter object.
//! Lessonviz decodes the parameters, lays the diagram out as a [`Scene`] of
//! positioned primitives and paints the scene as SVG.
//!
//! # Example
//!
//! ```
//! use lessonviz::{DiagramRenderer, request::DiagramRequest};
//!
//! let request = DiagramRequest::from_json(
//!     r#"{
//!         "toolName": "setBox",
//!         "parameters": {"setName": "A", "elements": [1, 2, 3, 4, 6, 12]},
//!         "caption": "Factors of 12"
//!     }"#,
//! )
//! .unwrap();
//!
//! let svg = DiagramRenderer::default().render_svg(&request).unwrap();
//! assert!(svg.contains("Factors of 12"));
//! ```
//!
//! [`Scene`]: lessonviz_core::draw::Scene

pub mod config;
pub mod export;
pub mod expr;
pub mod layout;
pub mod params;
pub mod request;

mod error;
mod notation;
mod renderer;

pub use lessonviz_core::{color, draw, geometry};

pub use error::LessonVizError;
pub use renderer::{DiagramRenderer, ERROR_MESSAGE_ROLE, ERROR_TITLE_ROLE};
