//! Tunnel segment pool entries
//!
//! A segment is one particle in polar space: an angle around the tunnel
//! axis, a normalized wall radius, a base glyph size, and a pseudo-z depth.
//! Segments are never deallocated, only recycled, so the pool population is
//! constant for the life of the engine.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One particle in the tunnel's fixed-size pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Polar angle around the tunnel axis (radians, [0, 2π))
    pub angle: f32,
    /// Normalized distance from the tunnel axis, in [0.5, 1.0)
    pub radius: f32,
    /// Base glyph size before perspective scaling, in [10, 30)
    pub size: f32,
    /// Pseudo-z distance from the camera
    pub depth: f32,
}

impl Segment {
    /// Spawn with randomized angle/radius/size and a depth anywhere in the
    /// visible range, so the tunnel starts populated instead of empty.
    pub fn spawn(rng: &mut impl Rng) -> Self {
        Self {
            angle: rng.random::<f32>() * std::f32::consts::TAU,
            radius: SEGMENT_RADIUS_MIN + rng.random::<f32>() * SEGMENT_RADIUS_SPAN,
            size: GLYPH_SIZE_MIN + rng.random::<f32>() * GLYPH_SIZE_SPAN,
            depth: rng.random::<f32>() * DEPTH_MAX,
        }
    }

    /// Reset in place after exiting the visible depth range: depth snaps to
    /// the far plane and angle/radius re-roll. Base size is kept.
    pub fn recycle(&mut self, rng: &mut impl Rng) {
        self.depth = DEPTH_MAX;
        self.angle = rng.random::<f32>() * std::f32::consts::TAU;
        self.radius = SEGMENT_RADIUS_MIN + rng.random::<f32>() * SEGMENT_RADIUS_SPAN;
    }

    /// Perspective scale at this segment's depth
    #[inline]
    pub fn perspective(&self) -> f32 {
        NEAR_PLANE / (NEAR_PLANE + self.depth)
    }
}
