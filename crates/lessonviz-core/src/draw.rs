//! Drawable building blocks shared by every layout engine.
//!
//! Engines describe a diagram as a [`Scene`] of [`Primitive`]s, each assigned
//! to a [`RenderLayer`]. Styles ([`StrokeDefinition`], [`TextDefinition`],
//! [`ShapeStyle`]) are plain values resolved by the engine; nothing here
//! knows about lesson content.

mod layer;
mod primitive;
mod scene;
mod stroke;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use primitive::{Primitive, PrimitiveKind, ShapeStyle};
pub use scene::Scene;
pub use stroke::{StrokeCap, StrokeDefinition, StrokeStyle};
pub use text::{TextAnchor, TextBaseline, TextDefinition};
