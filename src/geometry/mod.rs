//! Parametric polygon generation for node rendering
//!
//! Pure, deterministic geometry: outputs depend only on (shape class, size
//! tier). No rendering or platform dependencies.

pub mod polygon;

pub use polygon::{
    Chord, PolygonCache, PolygonSpec, ShapeClass, SizeSpec, SizeTier, generate, path_data,
};
