//! Building blocks for custom post-processing pipelines.
//!
//! Most users only need `Detector` or the `detect` function. These items let a
//! caller run decoding, filtering and suppression as separate steps, for
//! example to inspect every candidate before thresholds are applied.

pub use crate::candidate::{filter_by_score, Candidate, Scored, DEFAULT_REFERENCE_SIZE};
pub use crate::decode::{DecodeConfig, Decoder};
pub use crate::geometry::{iou, Corners};
pub use crate::suppress::{suppress, suppress_with, NmsConfig, SuppressionMode};
pub use crate::tensor::{GridCell, GridShape, PredictionTensor, BOX_FIELDS};
