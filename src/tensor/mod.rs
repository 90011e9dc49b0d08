//! Raw prediction tensors and their grid shape.
//!
//! A prediction tensor is a flat `f32` buffer with logical shape
//! `[rows][cols][anchors][5 + classes]`. Each innermost record holds four box
//! offsets `(tx, ty, tw, th)`, one objectness logit and one logit per class.
//! `PredictionTensor` is a borrowed view that checks the buffer length once so
//! record access afterwards cannot go out of bounds.

use crate::util::{YoloBoxError, YoloBoxResult};

#[cfg(feature = "tensor-io")]
pub mod io;

/// Number of leading values in a record before the class logits.
pub const BOX_FIELDS: usize = 5;

/// Logical dimensions of a detector output grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridShape {
    /// Number of grid rows (Y axis).
    pub rows: usize,
    /// Number of grid columns (X axis).
    pub cols: usize,
    /// Anchor slots per grid cell.
    pub anchors: usize,
    /// Number of object classes.
    pub classes: usize,
}

impl GridShape {
    /// The 19x19 grid, 5 anchors and 80 classes of the 608x608 YOLOv2 detector.
    pub const YOLOV2_COCO: GridShape = GridShape {
        rows: 19,
        cols: 19,
        anchors: 5,
        classes: 80,
    };

    /// Creates a shape, rejecting zero-sized dimensions.
    pub fn new(rows: usize, cols: usize, anchors: usize, classes: usize) -> YoloBoxResult<Self> {
        let shape = Self {
            rows,
            cols,
            anchors,
            classes,
        };
        shape.validate()?;
        Ok(shape)
    }

    pub(crate) fn validate(&self) -> YoloBoxResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(YoloBoxError::InvalidShape {
                reason: "grid must have at least one row and column",
            });
        }
        if self.anchors == 0 {
            return Err(YoloBoxError::InvalidShape {
                reason: "grid must have at least one anchor per cell",
            });
        }
        if self.classes == 0 {
            return Err(YoloBoxError::InvalidShape {
                reason: "grid must predict at least one class",
            });
        }
        self.checked_len().ok_or(YoloBoxError::InvalidShape {
            reason: "tensor length overflows usize",
        })?;
        Ok(())
    }

    /// Values per anchor record (`5 + classes`).
    pub fn record_len(&self) -> usize {
        BOX_FIELDS + self.classes
    }

    /// Number of anchor records, which is also the number of decoded candidates.
    pub fn num_records(&self) -> usize {
        self.rows * self.cols * self.anchors
    }

    /// Total number of `f32` values a tensor of this shape holds.
    pub fn tensor_len(&self) -> usize {
        self.num_records() * self.record_len()
    }

    fn checked_len(&self) -> Option<usize> {
        self.rows
            .checked_mul(self.cols)?
            .checked_mul(self.anchors)?
            .checked_mul(self.classes.checked_add(BOX_FIELDS)?)
    }

    /// Flat offset of the record for `cell`.
    pub(crate) fn record_offset(&self, cell: GridCell) -> usize {
        ((cell.row * self.cols + cell.col) * self.anchors + cell.anchor) * self.record_len()
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::YOLOV2_COCO
    }
}

/// Position of one prediction in the output grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Grid row (Y).
    pub row: usize,
    /// Grid column (X).
    pub col: usize,
    /// Anchor slot within the cell.
    pub anchor: usize,
}

/// Borrowed, length-checked view of one image's prediction tensor.
#[derive(Clone, Copy, Debug)]
pub struct PredictionTensor<'a> {
    data: &'a [f32],
    shape: GridShape,
}

impl<'a> PredictionTensor<'a> {
    /// Wraps `data`, failing with `MalformedInput` unless its length matches `shape`.
    pub fn new(data: &'a [f32], shape: GridShape) -> YoloBoxResult<Self> {
        shape.validate()?;
        let expected = shape.tensor_len();
        if data.len() != expected {
            return Err(YoloBoxError::MalformedInput {
                context: "prediction tensor",
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Wraps `data` with the reference YOLOv2 shape.
    pub fn yolov2(data: &'a [f32]) -> YoloBoxResult<Self> {
        Self::new(data, GridShape::YOLOV2_COCO)
    }

    /// Returns the grid shape.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the record for `cell`, or `None` if the cell is outside the grid.
    pub fn record(&self, cell: GridCell) -> Option<&'a [f32]> {
        if cell.row >= self.shape.rows
            || cell.col >= self.shape.cols
            || cell.anchor >= self.shape.anchors
        {
            return None;
        }
        let start = self.shape.record_offset(cell);
        self.data.get(start..start + self.shape.record_len())
    }

    /// Returns all records of grid row `row`, anchors and columns interleaved.
    pub fn row(&self, row: usize) -> Option<&'a [f32]> {
        if row >= self.shape.rows {
            return None;
        }
        let len = self.shape.cols * self.shape.anchors * self.shape.record_len();
        let start = row * len;
        self.data.get(start..start + len)
    }
}

/// Owned prediction tensor, typically loaded from disk.
#[derive(Clone, Debug)]
pub struct OwnedTensor {
    data: Vec<f32>,
    shape: GridShape,
}

impl OwnedTensor {
    /// Takes ownership of `data` after checking it against `shape`.
    pub fn new(data: Vec<f32>, shape: GridShape) -> YoloBoxResult<Self> {
        PredictionTensor::new(&data, shape)?;
        Ok(Self { data, shape })
    }

    /// Returns a borrowed view.
    pub fn view(&self) -> PredictionTensor<'_> {
        PredictionTensor {
            data: &self.data,
            shape: self.shape,
        }
    }

    /// Returns the grid shape.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Returns the raw values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the tensor and returns the raw values.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}
