//! yolobox turns the raw output tensor of a grid-based YOLO detector into a
//! de-duplicated list of detections.
//!
//! The pipeline is decode, score filter, then greedy IoU suppression. Each
//! stage is a pure function of its inputs, so one `Detector` can be shared
//! across threads and called for many images. Row-parallel decoding is
//! available via the `rayon` feature.

pub mod anchors;
mod candidate;
pub mod decode;
pub mod detect;
pub mod geometry;
#[cfg(feature = "image-io")]
pub mod image_io;
pub mod labels;
pub mod lowlevel;
pub mod suppress;
pub mod tensor;
mod trace;
pub mod util;

pub use anchors::{Anchor, AnchorTable};
pub use candidate::{Candidate, Scored, DEFAULT_REFERENCE_SIZE};
pub use decode::{DecodeConfig, Decoder};
pub use detect::{detect, DetectConfig, Detection, Detector, LabeledDetection};
pub use geometry::{iou, Corners};
pub use labels::{coco_labels, LabelResolver, LabelTable, COCO_CLASSES};
pub use suppress::{suppress, suppress_with, NmsConfig, SuppressionMode};
pub use tensor::{GridCell, GridShape, OwnedTensor, PredictionTensor};
pub use util::{YoloBoxError, YoloBoxResult};

#[cfg(feature = "tensor-io")]
pub use tensor::io;
