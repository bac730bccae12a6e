//! Lessonviz Core Types and Definitions
//!
//! This crate provides the variant-agnostic building blocks of the lessonviz
//! diagram renderer:
//!
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Draw**: Styles, primitives, layers and scenes ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
