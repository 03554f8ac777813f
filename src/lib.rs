//! Hex Tunnel - stylized dashboard rendering core
//!
//! Core modules:
//! - `engine`: Deterministic tunnel animation (segment pool, perspective projection)
//! - `geometry`: Parametric polygon and star-chord generation for hub/node shapes
//! - `layout`: Viewport classification and node transform parameters
//! - `render`: WebGPU rendering pipeline
//! - `settings`: Quality presets and preferences

pub mod engine;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod settings;

pub use engine::{DrawCmd, EngineState, FrameInput, advance_frame};
pub use geometry::{PolygonCache, PolygonSpec, ShapeClass, SizeTier};
pub use layout::{ViewportClass, ViewportSize, classify};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Engine tuning constants
pub mod consts {
    /// Default number of segments in the tunnel pool
    pub const SEGMENT_COUNT: usize = 300;
    /// Far plane: recycled segments respawn at this depth
    pub const DEPTH_MAX: f32 = 1500.0;
    /// Depth travelled toward the camera per frame
    pub const DEPTH_STEP: f32 = 1.5;
    /// Perspective near plane: scale = NEAR_PLANE / (NEAR_PLANE + depth)
    pub const NEAR_PLANE: f32 = 400.0;
    /// Tunnel wall radius in pixels at unit perspective scale
    pub const TUNNEL_RADIUS: f32 = 800.0;

    /// Segment polar radius range [min, min + span)
    pub const SEGMENT_RADIUS_MIN: f32 = 0.5;
    pub const SEGMENT_RADIUS_SPAN: f32 = 0.5;
    /// Base glyph size range [min, min + span)
    pub const GLYPH_SIZE_MIN: f32 = 10.0;
    pub const GLYPH_SIZE_SPAN: f32 = 20.0;

    /// Per-frame full-canvas black fill alpha (the sole trail mechanism)
    pub const TRAIL_FADE_ALPHA: f32 = 0.1;
    /// Radial clear zone: fully transparent inside inner, fading out at outer
    pub const CLEAR_INNER_RADIUS: f32 = 100.0;
    pub const CLEAR_OUTER_RADIUS: f32 = 250.0;

    /// Glyph alphabet drawn by tunnel segments
    pub const GLYPHS: [char; 2] = ['0', '1'];

    /// Viewport width at or below which layout is Compact (px)
    pub const COMPACT_BREAKPOINT: f32 = 768.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
