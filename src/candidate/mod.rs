//! Decoded detection candidates.
//!
//! A `Candidate` is one decoded anchor record: a box in image-fraction
//! coordinates plus objectness-scaled class probabilities. Candidates are
//! produced by `Decoder` and consumed by score filtering and suppression
//! through the `Scored` trait.

pub(crate) mod filter;

pub use filter::filter_by_score;

use crate::geometry::Corners;
use crate::tensor::GridCell;
use crate::util::math::argmax;
use crate::util::{YoloBoxError, YoloBoxResult};

/// Side length of the square input the reference detector was trained on.
pub const DEFAULT_REFERENCE_SIZE: f32 = 608.0;

/// Anything that can be ranked and compared geometrically during suppression.
pub trait Scored {
    /// Ranking score.
    fn score(&self) -> f32;
    /// Predicted class, used by per-class suppression.
    fn class_index(&self) -> usize;
    /// Corners in the canonical reference frame.
    fn corners(&self) -> Corners;
}

/// One decoded prediction, prior to any filtering.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    center_x: f32,
    center_y: f32,
    width: f32,
    height: f32,
    objectness: f32,
    class_probabilities: Vec<f32>,
    class_index: usize,
    class_score: f32,
    cell: GridCell,
    reference_size: f32,
}

impl Candidate {
    /// Creates a candidate from a box in image fractions and its objectness-scaled
    /// class probabilities.
    pub fn new(
        center_x: f32,
        center_y: f32,
        width: f32,
        height: f32,
        objectness: f32,
        class_probabilities: Vec<f32>,
    ) -> YoloBoxResult<Self> {
        let (class_index, class_score) =
            argmax(&class_probabilities).ok_or(YoloBoxError::MalformedInput {
                context: "class probabilities",
                expected: 1,
                got: 0,
            })?;
        Ok(Self {
            center_x,
            center_y,
            width,
            height,
            objectness,
            class_probabilities,
            class_index,
            class_score,
            cell: GridCell {
                row: 0,
                col: 0,
                anchor: 0,
            },
            reference_size: DEFAULT_REFERENCE_SIZE,
        })
    }

    pub(crate) fn from_decoded(
        [center_x, center_y, width, height]: [f32; 4],
        objectness: f32,
        class_probabilities: Vec<f32>,
        class_index: usize,
        class_score: f32,
        cell: GridCell,
        reference_size: f32,
    ) -> Self {
        Self {
            center_x,
            center_y,
            width,
            height,
            objectness,
            class_probabilities,
            class_index,
            class_score,
            cell,
            reference_size,
        }
    }

    /// Records the grid position the candidate was decoded from.
    pub fn with_cell(mut self, cell: GridCell) -> Self {
        self.cell = cell;
        self
    }

    /// Overrides the reference frame size used by `reference_corners`.
    pub fn with_reference_size(mut self, reference_size: f32) -> Self {
        self.reference_size = reference_size;
        self
    }

    /// Box center X as a fraction of image width.
    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    /// Box center Y as a fraction of image height.
    pub fn center_y(&self) -> f32 {
        self.center_y
    }

    /// Box width as a fraction of image width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Box height as a fraction of image height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Sigmoid objectness of the anchor slot.
    pub fn objectness(&self) -> f32 {
        self.objectness
    }

    /// Class probabilities scaled by objectness.
    pub fn class_probabilities(&self) -> &[f32] {
        &self.class_probabilities
    }

    /// Index of the highest class probability (lowest index on ties).
    pub fn predicted_class_index(&self) -> usize {
        self.class_index
    }

    /// Probability of the predicted class.
    pub fn predicted_class_score(&self) -> f32 {
        self.class_score
    }

    /// Grid cell and anchor slot this candidate came from.
    pub fn grid_cell(&self) -> GridCell {
        self.cell
    }

    /// Side of the square reference frame.
    pub fn reference_size(&self) -> f32 {
        self.reference_size
    }

    /// Corners as image fractions.
    pub fn fractional_corners(&self) -> Corners {
        Corners::from_center_size(self.center_x, self.center_y, self.width, self.height)
    }

    /// Corners in pixels of the square reference frame.
    pub fn reference_corners(&self) -> Corners {
        self.fractional_corners()
            .scale(self.reference_size, self.reference_size)
    }

    /// Corners rescaled to a `width` x `height` pixel image. Not clamped.
    pub fn pixel_corners(&self, width: u32, height: u32) -> Corners {
        rescale_reference(self.reference_corners(), self.reference_size, width, height)
    }
}

impl Scored for Candidate {
    fn score(&self) -> f32 {
        self.class_score
    }

    fn class_index(&self) -> usize {
        self.class_index
    }

    fn corners(&self) -> Corners {
        self.reference_corners()
    }
}

/// Maps reference-frame corners onto a `width` x `height` image.
pub(crate) fn rescale_reference(
    corners: Corners,
    reference_size: f32,
    width: u32,
    height: u32,
) -> Corners {
    corners.scale(
        height as f32 / reference_size,
        width as f32 / reference_size,
    )
}
