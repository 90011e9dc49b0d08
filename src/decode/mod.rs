//! Box decoding from raw detector output.
//!
//! `Decoder` turns a prediction tensor into one `Candidate` per anchor record,
//! in row-major grid order: row, then column, then anchor slot. The anchor
//! table is bound once at construction and reused for every call.

mod record;

#[cfg(feature = "rayon")]
mod rayon;

use crate::anchors::AnchorTable;
use crate::candidate::{filter_by_score, Candidate, DEFAULT_REFERENCE_SIZE};
use crate::tensor::{GridShape, PredictionTensor};
use crate::trace::{trace_event, trace_span};
use crate::util::{YoloBoxError, YoloBoxResult};

/// Configuration for decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeConfig {
    /// Output grid dimensions.
    pub shape: GridShape,
    /// Side length of the square training input, used for reference-frame corners.
    pub reference_size: f32,
    /// Decode grid rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            shape: GridShape::YOLOV2_COCO,
            reference_size: DEFAULT_REFERENCE_SIZE,
            parallel: false,
        }
    }
}

/// Decodes prediction tensors with a fixed grid shape and anchor table.
#[derive(Clone, Debug)]
pub struct Decoder {
    anchors: AnchorTable,
    cfg: DecodeConfig,
}

impl Decoder {
    /// Creates a decoder, checking the anchor table against the grid shape.
    pub fn new(anchors: AnchorTable, cfg: DecodeConfig) -> YoloBoxResult<Self> {
        cfg.shape.validate()?;
        if anchors.len() != cfg.shape.anchors {
            return Err(YoloBoxError::MalformedInput {
                context: "anchor table",
                expected: cfg.shape.anchors,
                got: anchors.len(),
            });
        }
        if !cfg.reference_size.is_finite() || cfg.reference_size <= 0.0 {
            return Err(YoloBoxError::InvalidShape {
                reason: "reference size must be finite and > 0",
            });
        }
        Ok(Self { anchors, cfg })
    }

    /// Decoder for the reference 608x608 YOLOv2 COCO detector.
    pub fn yolov2() -> Self {
        Self {
            anchors: AnchorTable::yolov2_coco(),
            cfg: DecodeConfig::default(),
        }
    }

    /// Returns the decode configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.cfg
    }

    /// Returns the grid shape.
    pub fn shape(&self) -> GridShape {
        self.cfg.shape
    }

    /// Returns the anchor table.
    pub fn anchors(&self) -> &AnchorTable {
        &self.anchors
    }

    /// Decodes a flat tensor laid out with this decoder's shape.
    pub fn decode(&self, data: &[f32]) -> YoloBoxResult<Vec<Candidate>> {
        let tensor = PredictionTensor::new(data, self.cfg.shape)?;
        Ok(self.decode_unchecked(tensor))
    }

    /// Decodes a tensor view, which must carry this decoder's shape.
    pub fn decode_tensor(&self, tensor: PredictionTensor<'_>) -> YoloBoxResult<Vec<Candidate>> {
        if tensor.shape() != self.cfg.shape {
            let expected = self.cfg.shape.tensor_len();
            let got = tensor.as_slice().len();
            if expected != got {
                return Err(YoloBoxError::MalformedInput {
                    context: "prediction tensor",
                    expected,
                    got,
                });
            }
            return Err(YoloBoxError::InvalidShape {
                reason: "tensor shape does not match decoder shape",
            });
        }
        Ok(self.decode_unchecked(tensor))
    }

    /// Decodes and keeps candidates scoring strictly above `score_threshold`.
    pub fn decode_filtered(
        &self,
        data: &[f32],
        score_threshold: f32,
    ) -> YoloBoxResult<Vec<Candidate>> {
        Ok(filter_by_score(self.decode(data)?, score_threshold))
    }

    fn decode_unchecked(&self, tensor: PredictionTensor<'_>) -> Vec<Candidate> {
        let shape = self.cfg.shape;
        let _span = trace_span!(
            "decode",
            rows = shape.rows,
            cols = shape.cols,
            anchors = shape.anchors,
            parallel = self.cfg.parallel
        )
        .entered();

        #[cfg(feature = "rayon")]
        let out = if self.cfg.parallel {
            rayon::decode_rows_par(tensor, self.anchors.as_slice(), self.cfg.reference_size)
        } else {
            self.decode_rows(tensor)
        };
        #[cfg(not(feature = "rayon"))]
        let out = self.decode_rows(tensor);

        trace_event!("decoded_candidates", count = out.len());
        out
    }

    fn decode_rows(&self, tensor: PredictionTensor<'_>) -> Vec<Candidate> {
        let shape = tensor.shape();
        let mut out = Vec::with_capacity(shape.num_records());
        for row in 0..shape.rows {
            if let Some(row_data) = tensor.row(row) {
                out.extend(record::decode_row(
                    row_data,
                    row,
                    self.anchors.as_slice(),
                    shape,
                    self.cfg.reference_size,
                ));
            }
        }
        out
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::yolov2()
    }
}
