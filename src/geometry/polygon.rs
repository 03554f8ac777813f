//! Hub hexagons and node heptagons with star chords
//!
//! All coordinates are f64 offsets from the node origin, rounded to 5
//! fractional digits so repeated generation diffs as bit-identical.

use std::collections::HashMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Shape class for a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeClass {
    /// Central hexagon
    Hub,
    /// Peripheral heptagon with star-forming chords
    Node,
}

/// Named size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SizeTier {
    Small,
    #[default]
    Normal,
    Large,
}

/// (outer radius, inner radius, label size) preset triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeSpec {
    pub outer: f64,
    pub inner: f64,
    pub label: f64,
}

impl SizeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Normal => "normal",
            SizeTier::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(SizeTier::Small),
            "normal" => Some(SizeTier::Normal),
            "large" => Some(SizeTier::Large),
            _ => None,
        }
    }

    /// Lenient parse for selectors coming from the embedding page: an
    /// unrecognized tier falls back to Normal so the diagram degrades
    /// visually instead of halting.
    pub fn parse_lossy(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("Unknown size tier {s:?}, using normal");
            SizeTier::Normal
        })
    }

    /// Static lookup, not computed
    pub fn spec(&self) -> SizeSpec {
        match self {
            SizeTier::Small => SizeSpec {
                outer: 30.0,
                inner: 25.0,
                label: 8.0,
            },
            SizeTier::Normal => SizeSpec {
                outer: 35.0,
                inner: 30.0,
                label: 10.0,
            },
            SizeTier::Large => SizeSpec {
                outer: 45.0,
                inner: 40.0,
                label: 12.0,
            },
        }
    }
}

/// A star-forming chord between two scaled vertex positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub a: DVec2,
    pub b: DVec2,
}

/// Generated outline and chords for one shape, as offsets from the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSpec {
    /// Closed outline, in draw order
    pub vertices: Vec<DVec2>,
    /// Empty for hub shapes, one per vertex for node shapes
    pub chords: Vec<Chord>,
}

const HUB_SIDES: usize = 6;
const NODE_SIDES: usize = 7;
/// Chord endpoints sit at this fraction of the inner radius
const CHORD_SCALE: f64 = 0.6;
/// Star chords connect the vertex at angle multiplier i to multiplier i + 3
const CHORD_SKIP: usize = 3;

/// Round to 5 fractional digits
fn round5(v: f64) -> f64 {
    (v * 1e5).round() / 1e5
}

fn vertex_at(radius: f64, deg: f64) -> DVec2 {
    let rad = deg.to_radians();
    DVec2::new(round5(radius * rad.cos()), round5(radius * rad.sin()))
}

/// Generate the outline (and, for node shapes, star chords) for a shape.
///
/// Pure function of its inputs: identical (shape, tier) pairs yield
/// bit-identical coordinate sequences.
pub fn generate(shape: ShapeClass, tier: SizeTier) -> PolygonSpec {
    let SizeSpec { outer, inner, .. } = tier.spec();

    match shape {
        ShapeClass::Hub => {
            // Flat-topped hexagon: vertices at i*60 - 30 degrees
            let vertices = (0..HUB_SIDES)
                .map(|i| vertex_at(outer, i as f64 * 60.0 - 30.0))
                .collect();
            PolygonSpec {
                vertices,
                chords: Vec::new(),
            }
        }
        ShapeClass::Node => {
            let step = 360.0 / NODE_SIDES as f64;
            let mut vertices = Vec::with_capacity(NODE_SIDES);
            let mut chords = Vec::with_capacity(NODE_SIDES);

            for i in 0..NODE_SIDES {
                vertices.push(vertex_at(outer, i as f64 * step));

                // The far endpoint's angle multiplier is deliberately not
                // wrapped mod 7; angles past 360 fold naturally under trig.
                chords.push(Chord {
                    a: vertex_at(inner * CHORD_SCALE, i as f64 * step),
                    b: vertex_at(inner * CHORD_SCALE, (i + CHORD_SKIP) as f64 * step),
                });
            }

            PolygonSpec { vertices, chords }
        }
    }
}

/// Serialize an outline as a closed path string: move to the first vertex,
/// line to each subsequent vertex in order, close. Ordering is load-bearing
/// for stroke and fill.
pub fn path_data(vertices: &[DVec2]) -> String {
    let parts: Vec<String> = vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let op = if i == 0 { "M" } else { "L" };
            format!("{op} {} {}", v.x, v.y)
        })
        .collect();
    parts.join(" ") + "Z"
}

/// Memoizes generated specs by (shape, tier). Generation is pure, so
/// entries never need invalidating.
#[derive(Debug, Default)]
pub struct PolygonCache {
    specs: HashMap<(ShapeClass, SizeTier), PolygonSpec>,
}

impl PolygonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, shape: ShapeClass, tier: SizeTier) -> &PolygonSpec {
        self.specs
            .entry((shape, tier))
            .or_insert_with(|| generate(shape, tier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_counts() {
        for tier in [SizeTier::Small, SizeTier::Normal, SizeTier::Large] {
            let spec = generate(ShapeClass::Hub, tier);
            assert_eq!(spec.vertices.len(), 6);
            assert!(spec.chords.is_empty());
        }
    }

    #[test]
    fn test_node_counts() {
        for tier in [SizeTier::Small, SizeTier::Normal, SizeTier::Large] {
            let spec = generate(ShapeClass::Node, tier);
            assert_eq!(spec.vertices.len(), 7);
            assert_eq!(spec.chords.len(), 7);
        }
    }

    #[test]
    fn test_hub_first_vertex_at_minus_thirty_degrees() {
        let spec = generate(ShapeClass::Hub, SizeTier::Normal);
        let expected = DVec2::new(
            (35.0 * (-30.0f64).to_radians().cos() * 1e5).round() / 1e5,
            (35.0 * (-30.0f64).to_radians().sin() * 1e5).round() / 1e5,
        );
        assert_eq!(spec.vertices[0], expected);
    }

    #[test]
    fn test_chord_angle_offset_is_three() {
        let spec = generate(ShapeClass::Node, SizeTier::Normal);
        let step = (360.0f64 / 7.0).to_radians();
        for (i, chord) in spec.chords.iter().enumerate() {
            // Endpoint angles (recovered through atan2) must differ by
            // exactly 3 steps, folded into one turn
            let a = chord.a.y.atan2(chord.a.x);
            let b = chord.b.y.atan2(chord.b.x);
            let mut diff = b - a;
            while diff < 0.0 {
                diff += std::f64::consts::TAU;
            }
            while diff >= std::f64::consts::TAU {
                diff -= std::f64::consts::TAU;
            }
            assert!(
                (diff - 3.0 * step).abs() < 1e-4,
                "chord {i}: offset {diff} != 3 steps"
            );
        }
    }

    #[test]
    fn test_chord_endpoints_scaled_to_inner_radius() {
        let spec = generate(ShapeClass::Node, SizeTier::Large);
        let expected = 40.0 * 0.6;
        for chord in &spec.chords {
            assert!((chord.a.length() - expected).abs() < 1e-4);
            assert!((chord.b.length() - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_generate_is_idempotent_bit_identical() {
        for shape in [ShapeClass::Hub, ShapeClass::Node] {
            for tier in [SizeTier::Small, SizeTier::Normal, SizeTier::Large] {
                let a = generate(shape, tier);
                let b = generate(shape, tier);
                assert_eq!(a, b);
                // Bit-level, not just approximate
                for (va, vb) in a.vertices.iter().zip(&b.vertices) {
                    assert_eq!(va.x.to_bits(), vb.x.to_bits());
                    assert_eq!(va.y.to_bits(), vb.y.to_bits());
                }
            }
        }
    }

    #[test]
    fn test_coordinates_carry_at_most_five_decimals() {
        let spec = generate(ShapeClass::Node, SizeTier::Small);
        for v in &spec.vertices {
            // Scaled back up, coordinates sit on integers (within one ulp
            // of the divide-by-1e5)
            assert!((v.x * 1e5 - (v.x * 1e5).round()).abs() < 1e-6);
            assert!((v.y * 1e5 - (v.y * 1e5).round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_path_data_closed_in_vertex_order() {
        let spec = generate(ShapeClass::Hub, SizeTier::Small);
        let d = path_data(&spec.vertices);
        assert!(d.starts_with("M "));
        assert!(d.ends_with('Z'));
        assert_eq!(d.matches('L').count(), 5);
        // First vertex appears before any line-to
        let first = format!("M {} {}", spec.vertices[0].x, spec.vertices[0].y);
        assert!(d.starts_with(&first));
    }

    #[test]
    fn test_cache_returns_same_spec() {
        let mut cache = PolygonCache::new();
        let a = cache.get(ShapeClass::Node, SizeTier::Normal).clone();
        let b = cache.get(ShapeClass::Node, SizeTier::Normal).clone();
        assert_eq!(a, b);
        assert_eq!(a, generate(ShapeClass::Node, SizeTier::Normal));
    }

    #[test]
    fn test_size_tier_parse_lossy_falls_back_to_normal() {
        assert_eq!(SizeTier::parse_lossy("large"), SizeTier::Large);
        assert_eq!(SizeTier::parse_lossy("LARGE"), SizeTier::Large);
        assert_eq!(SizeTier::parse_lossy("jumbo"), SizeTier::Normal);
        assert_eq!(SizeTier::parse_lossy(""), SizeTier::Normal);
    }
}
