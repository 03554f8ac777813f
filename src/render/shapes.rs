//! CPU tessellation of draw commands and polygon outlines
//!
//! Everything here produces plain vertex lists in canvas pixel coordinates;
//! the pipeline maps them to NDC at upload time.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::engine::DrawCmd;
use crate::geometry::{Chord, PolygonSpec};
use crate::polar_to_cartesian;

/// Triangle fan resolution for glyph rings and the clear-zone mask
const RING_SEGMENTS: u32 = 16;

/// Tessellated output for one frame, split by blend mode
#[derive(Debug, Default)]
pub struct FrameVertices {
    /// Alpha-blended geometry (fade fill, glyphs)
    pub paint: Vec<Vertex>,
    /// Destination-out geometry (radial clear zone)
    pub erase: Vec<Vertex>,
}

/// Convert an engine draw list into renderable triangles
pub fn tessellate(cmds: &[DrawCmd], width: f32, height: f32) -> FrameVertices {
    let mut out = FrameVertices::default();

    for cmd in cmds {
        match cmd {
            DrawCmd::FadeRect { alpha } => {
                quad(
                    &mut out.paint,
                    Vec2::ZERO,
                    Vec2::new(width, height),
                    [0.0, 0.0, 0.0, *alpha],
                );
            }
            DrawCmd::Glyph { ch, pos, px, color } => {
                glyph(&mut out.paint, *ch, *pos, *px, *color);
            }
            DrawCmd::ClearZone {
                center,
                inner,
                outer,
            } => {
                clear_zone(&mut out.erase, *center, *inner, *outer);
            }
        }
    }

    out
}

/// Axis-aligned quad from min to max corner, two triangles
pub fn quad(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));

    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
    out.push(Vertex::new(min.x, max.y, color));
}

/// One tunnel glyph. '0' renders as a ring, '1' (and anything else) as a
/// vertical bar; both fit an `px`-sized cell centered on `pos`.
fn glyph(out: &mut Vec<Vertex>, ch: char, pos: Vec2, px: f32, color: [f32; 4]) {
    match ch {
        '0' => ring(out, pos, px * 0.28, px * 0.45, color, RING_SEGMENTS),
        _ => {
            let half = Vec2::new(px * 0.15, px * 0.45);
            quad(out, pos - half, pos + half, color);
        }
    }
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        let p1 = center + polar_to_cartesian(radius, theta1);
        out.push(Vertex::new(p1.x, p1.y, color));
        let p2 = center + polar_to_cartesian(radius, theta2);
        out.push(Vertex::new(p2.x, p2.y, color));
    }
}

/// Hollow ring between two radii, single color
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    annulus(
        out,
        center,
        inner_radius,
        outer_radius,
        color,
        color,
        segments,
    );
}

/// Ring with independently colored inner and outer edges; the rasterizer
/// interpolates between them, giving a radial gradient
pub fn annulus(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    inner_color: [f32; 4],
    outer_color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = center + polar_to_cartesian(inner_radius, theta1);
        let outer1 = center + polar_to_cartesian(outer_radius, theta1);
        let inner2 = center + polar_to_cartesian(inner_radius, theta2);
        let outer2 = center + polar_to_cartesian(outer_radius, theta2);

        out.push(Vertex::new(inner1.x, inner1.y, inner_color));
        out.push(Vertex::new(outer1.x, outer1.y, outer_color));
        out.push(Vertex::new(inner2.x, inner2.y, inner_color));

        out.push(Vertex::new(inner2.x, inner2.y, inner_color));
        out.push(Vertex::new(outer1.x, outer1.y, outer_color));
        out.push(Vertex::new(outer2.x, outer2.y, outer_color));
    }
}

/// Radial clear mask: full-strength erase inside `inner`, fading to no
/// effect at `outer`. Drawn with the destination-out pipeline.
fn clear_zone(out: &mut Vec<Vertex>, center: Vec2, inner: f32, outer: f32) {
    let full = [0.0, 0.0, 0.0, 1.0];
    let none = [0.0, 0.0, 0.0, 0.0];
    circle(out, center, inner, full, RING_SEGMENTS * 2);
    annulus(out, center, inner, outer, full, none, RING_SEGMENTS * 2);
}

/// Thick line segment as a quad
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let v1a = a + perp;
    let v1b = a - perp;
    let v2a = b + perp;
    let v2b = b - perp;

    out.push(Vertex::new(v1a.x, v1a.y, color));
    out.push(Vertex::new(v1b.x, v1b.y, color));
    out.push(Vertex::new(v2a.x, v2a.y, color));

    out.push(Vertex::new(v2a.x, v2a.y, color));
    out.push(Vertex::new(v1b.x, v1b.y, color));
    out.push(Vertex::new(v2b.x, v2b.y, color));
}

/// Stroke a closed polygon outline at the given origin
pub fn polygon_outline(
    out: &mut Vec<Vertex>,
    spec: &PolygonSpec,
    origin: Vec2,
    stroke: f32,
    color: [f32; 4],
) {
    let n = spec.vertices.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        let a = spec.vertices[i];
        let b = spec.vertices[(i + 1) % n];
        line(
            out,
            origin + Vec2::new(a.x as f32, a.y as f32),
            origin + Vec2::new(b.x as f32, b.y as f32),
            stroke,
            color,
        );
    }
}

/// Stroke the star chords of a node shape at the given origin
pub fn chord_lines(
    out: &mut Vec<Vertex>,
    chords: &[Chord],
    origin: Vec2,
    stroke: f32,
    color: [f32; 4],
) {
    for chord in chords {
        line(
            out,
            origin + Vec2::new(chord.a.x as f32, chord.a.y as f32),
            origin + Vec2::new(chord.b.x as f32, chord.b.y as f32),
            stroke,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineState, FrameInput, advance_frame};
    use crate::geometry::{ShapeClass, SizeTier, generate};

    #[test]
    fn test_fade_rect_covers_the_canvas() {
        let cmds = vec![DrawCmd::FadeRect { alpha: 0.1 }];
        let fv = tessellate(&cmds, 640.0, 480.0);
        assert_eq!(fv.paint.len(), 6);
        assert!(fv.erase.is_empty());

        let xs: Vec<f32> = fv.paint.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = fv.paint.iter().map(|v| v.position[1]).collect();
        assert!(xs.contains(&0.0) && xs.contains(&640.0));
        assert!(ys.contains(&0.0) && ys.contains(&480.0));
        assert!(fv.paint.iter().all(|v| v.color == [0.0, 0.0, 0.0, 0.1]));
    }

    #[test]
    fn test_clear_zone_goes_to_erase_with_gradient() {
        let cmds = vec![DrawCmd::ClearZone {
            center: Vec2::new(320.0, 240.0),
            inner: 100.0,
            outer: 250.0,
        }];
        let fv = tessellate(&cmds, 640.0, 480.0);
        assert!(fv.paint.is_empty());
        assert!(!fv.erase.is_empty());

        // Inner disc erases at full strength, the outermost rim not at all
        let max_alpha = fv.erase.iter().map(|v| v.color[3]).fold(0.0, f32::max);
        let min_alpha = fv.erase.iter().map(|v| v.color[3]).fold(1.0, f32::min);
        assert_eq!(max_alpha, 1.0);
        assert_eq!(min_alpha, 0.0);
    }

    #[test]
    fn test_full_frame_tessellates_without_paint_erase_crosstalk() {
        let mut state = EngineState::new(9, 50);
        let cmds = advance_frame(
            &mut state,
            &FrameInput {
                width: 800.0,
                height: 600.0,
                completed: false,
            },
        );
        let fv = tessellate(&cmds, 800.0, 600.0);
        assert!(!fv.paint.is_empty());
        assert!(!fv.erase.is_empty());
        // Erase geometry is only ever the clear zone's alpha mask
        assert!(fv.erase.iter().all(|v| v.color[..3] == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_stopped_frame_tessellates_to_nothing() {
        let mut state = EngineState::new(9, 50);
        let cmds = advance_frame(
            &mut state,
            &FrameInput {
                width: 800.0,
                height: 600.0,
                completed: true,
            },
        );
        let fv = tessellate(&cmds, 800.0, 600.0);
        assert!(fv.paint.is_empty());
        assert!(fv.erase.is_empty());
    }

    #[test]
    fn test_polygon_outline_six_vertices_per_edge() {
        let spec = generate(ShapeClass::Node, SizeTier::Normal);
        let mut out = Vec::new();
        polygon_outline(&mut out, &spec, Vec2::new(100.0, 100.0), 2.0, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(out.len(), 7 * 6);

        let mut chords = Vec::new();
        chord_lines(&mut chords, &spec.chords, Vec2::new(100.0, 100.0), 0.5, [0.0, 1.0, 0.0, 0.8]);
        assert_eq!(chords.len(), 7 * 6);
    }
}
