//! Viewport classification and node transform parameters
//!
//! The viewport size is injected by the embedding layer (read at mount and
//! on every resize event); nothing in here touches ambient globals. Only
//! hub shapes respond to the viewport class.

use serde::{Deserialize, Serialize};

use crate::consts::COMPACT_BREAKPOINT;
use crate::geometry::{ShapeClass, SizeTier};

/// Compact/Regular split on viewport width.
///
/// No hysteresis: classification is a pure threshold re-evaluated on every
/// resize notification, which is fine because it is idempotent and cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportClass {
    Compact,
    Regular,
}

/// Classify a viewport width in px. The breakpoint itself is Compact.
pub fn classify(width_px: f32) -> ViewportClass {
    if width_px <= COMPACT_BREAKPOINT {
        ViewportClass::Compact
    } else {
        ViewportClass::Regular
    }
}

/// Viewport size as reported by the embedding layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn class(&self) -> ViewportClass {
        classify(self.width)
    }
}

/// Axis-aligned box for a node's embedded content, as offsets from the
/// node origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Bounding box for the hub's embedded content. Compact viewports get a
/// smaller, centered box.
pub fn hub_content_box(outer: f64, class: ViewportClass) -> ContentBox {
    match class {
        ViewportClass::Compact => ContentBox {
            x: -outer * 0.5,
            y: -outer * 0.5,
            width: outer * 1.5,
            height: outer * 1.5,
        },
        ViewportClass::Regular => ContentBox {
            x: -outer,
            y: -outer,
            width: outer * 2.0,
            height: outer * 2.0,
        },
    }
}

/// Per-node placement selectors supplied by the embedding page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeParams {
    pub label: String,
    /// Placement in diagram coordinates
    pub x: f64,
    pub y: f64,
    pub size: SizeTier,
    pub is_hub: bool,
    /// Animation stagger delay in seconds
    pub delay: f64,
}

impl NodeParams {
    pub fn shape_class(&self) -> ShapeClass {
        if self.is_hub {
            ShapeClass::Hub
        } else {
            ShapeClass::Node
        }
    }

    /// Label baseline offset below the node origin
    pub fn label_offset_y(&self) -> f64 {
        self.size.spec().outer * 1.6
    }

    /// Side length of the hub's embedded content square
    pub fn hub_content_scale(&self, class: ViewportClass) -> f64 {
        let outer = self.size.spec().outer;
        match class {
            ViewportClass::Compact => outer * 1.5,
            ViewportClass::Regular => outer * 2.0,
        }
    }

    /// Content box for this node; non-hub shapes always get the full box
    pub fn content_box(&self, class: ViewportClass) -> ContentBox {
        let outer = self.size.spec().outer;
        if self.is_hub {
            hub_content_box(outer, class)
        } else {
            hub_content_box(outer, ViewportClass::Regular)
        }
    }

    /// DOM-safe element id derived from the label (whitespace runs -> '-')
    pub fn element_id(&self) -> String {
        let slug: Vec<&str> = self.label.split_whitespace().collect();
        format!("node-{}", slug.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundary_inclusive_on_the_low_side() {
        assert_eq!(classify(768.0), ViewportClass::Compact);
        assert_eq!(classify(769.0), ViewportClass::Regular);
        assert_eq!(classify(320.0), ViewportClass::Compact);
        assert_eq!(classify(1920.0), ViewportClass::Regular);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for w in [0.0, 500.0, 768.0, 768.5, 1200.0] {
            assert_eq!(classify(w), classify(w));
        }
    }

    #[test]
    fn test_hub_content_box_compact_vs_regular() {
        let compact = hub_content_box(40.0, ViewportClass::Compact);
        assert_eq!(compact.x, -20.0);
        assert_eq!(compact.y, -20.0);
        assert_eq!(compact.width, 60.0);
        assert_eq!(compact.height, 60.0);

        let regular = hub_content_box(40.0, ViewportClass::Regular);
        assert_eq!(regular.x, -40.0);
        assert_eq!(regular.y, -40.0);
        assert_eq!(regular.width, 80.0);
        assert_eq!(regular.height, 80.0);
    }

    #[test]
    fn test_only_hub_nodes_shrink_on_compact() {
        let hub = NodeParams {
            label: "hub".into(),
            x: 0.0,
            y: 0.0,
            size: SizeTier::Large,
            is_hub: true,
            delay: 0.0,
        };
        let node = NodeParams {
            is_hub: false,
            ..hub.clone()
        };

        assert_ne!(
            hub.content_box(ViewportClass::Compact),
            hub.content_box(ViewportClass::Regular)
        );
        assert_eq!(
            node.content_box(ViewportClass::Compact),
            node.content_box(ViewportClass::Regular)
        );
    }

    #[test]
    fn test_label_offset_tracks_tier() {
        let node = NodeParams {
            label: "dex screener".into(),
            x: 10.0,
            y: -4.0,
            size: SizeTier::Normal,
            is_hub: false,
            delay: 0.3,
        };
        assert_eq!(node.label_offset_y(), 35.0 * 1.6);
        assert_eq!(node.element_id(), "node-dex-screener");
    }
}
