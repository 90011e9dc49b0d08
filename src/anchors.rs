//! Anchor box priors.

use crate::util::{YoloBoxError, YoloBoxResult};

/// Prior box size in grid-cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Width in grid cells.
    pub width: f32,
    /// Height in grid cells.
    pub height: f32,
}

impl Anchor {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

const YOLOV2_COCO_ANCHORS: [Anchor; 5] = [
    Anchor::new(0.57273, 0.677385),
    Anchor::new(1.87446, 2.06253),
    Anchor::new(3.33843, 5.47434),
    Anchor::new(7.88282, 3.52778),
    Anchor::new(9.77052, 9.16828),
];

/// Ordered anchor priors, one per anchor slot of a grid cell.
///
/// The table is validated once on construction and then shared read-only by
/// every decode call.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorTable {
    anchors: Vec<Anchor>,
}

impl AnchorTable {
    /// Builds a table, rejecting empty tables and non-finite or non-positive sizes.
    pub fn new(anchors: Vec<Anchor>) -> YoloBoxResult<Self> {
        if anchors.is_empty() {
            return Err(YoloBoxError::MalformedInput {
                context: "anchor table",
                expected: 1,
                got: 0,
            });
        }
        for (index, anchor) in anchors.iter().enumerate() {
            if !anchor.width.is_finite() || !anchor.height.is_finite() {
                return Err(YoloBoxError::InvalidAnchor {
                    index,
                    reason: "non-finite size",
                });
            }
            if anchor.width <= 0.0 || anchor.height <= 0.0 {
                return Err(YoloBoxError::InvalidAnchor {
                    index,
                    reason: "size must be > 0",
                });
            }
        }
        Ok(Self { anchors })
    }

    /// Builds a table from `(width, height)` pairs.
    pub fn from_pairs(pairs: &[(f32, f32)]) -> YoloBoxResult<Self> {
        Self::new(pairs.iter().map(|&(w, h)| Anchor::new(w, h)).collect())
    }

    /// The five COCO-trained YOLOv2 priors.
    pub fn yolov2_coco() -> Self {
        Self {
            anchors: YOLOV2_COCO_ANCHORS.to_vec(),
        }
    }

    /// Number of anchor slots.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Returns the anchor for slot `idx`.
    pub fn get(&self, idx: usize) -> Option<Anchor> {
        self.anchors.get(idx).copied()
    }

    /// Returns all anchors in slot order.
    pub fn as_slice(&self) -> &[Anchor] {
        &self.anchors
    }
}

impl Default for AnchorTable {
    fn default() -> Self {
        Self::yolov2_coco()
    }
}
