//! End-to-end detection: decode, score filter, suppress.

use crate::anchors::AnchorTable;
use crate::candidate::{
    filter_by_score, rescale_reference, Candidate, Scored, DEFAULT_REFERENCE_SIZE,
};
use crate::decode::{DecodeConfig, Decoder};
use crate::geometry::Corners;
use crate::labels::LabelResolver;
use crate::suppress::{suppress_with, NmsConfig};
use crate::tensor::PredictionTensor;
use crate::trace::trace_span;
use crate::util::{YoloBoxError, YoloBoxResult};

/// A final, de-duplicated detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Predicted class index.
    pub class_index: usize,
    /// Objectness-scaled probability of the predicted class.
    pub class_score: f32,
    corners: Corners,
    reference_size: f32,
}

impl Detection {
    /// Creates a detection from reference-frame corners.
    pub fn new(class_index: usize, class_score: f32, corners: Corners) -> Self {
        Self {
            class_index,
            class_score,
            corners,
            reference_size: DEFAULT_REFERENCE_SIZE,
        }
    }

    /// Overrides the side of the square reference frame.
    pub fn with_reference_size(mut self, reference_size: f32) -> Self {
        self.reference_size = reference_size;
        self
    }

    /// Corners `(min_y, min_x, max_y, max_x)` in the reference frame.
    pub fn corners(&self) -> Corners {
        self.corners
    }

    /// Corners rescaled to a `width` x `height` image. Not clamped to the image.
    pub fn corners_for(&self, width: u32, height: u32) -> Corners {
        rescale_reference(self.corners, self.reference_size, width, height)
    }

    /// Side of the square reference frame.
    pub fn reference_size(&self) -> f32 {
        self.reference_size
    }

    /// Pairs the detection with its class name.
    pub fn with_label<R: LabelResolver + ?Sized>(
        self,
        resolver: &R,
    ) -> YoloBoxResult<LabeledDetection> {
        let label = resolver.label(self.class_index)?.to_owned();
        Ok(LabeledDetection {
            detection: self,
            label,
        })
    }
}

impl From<&Candidate> for Detection {
    fn from(value: &Candidate) -> Self {
        Self {
            class_index: value.predicted_class_index(),
            class_score: value.predicted_class_score(),
            corners: value.reference_corners(),
            reference_size: value.reference_size(),
        }
    }
}

impl Scored for Detection {
    fn score(&self) -> f32 {
        self.class_score
    }

    fn class_index(&self) -> usize {
        self.class_index
    }

    fn corners(&self) -> Corners {
        self.corners
    }
}

/// A detection with its resolved class name.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledDetection {
    pub detection: Detection,
    pub label: String,
}

/// Thresholds applied after decoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectConfig {
    /// Candidates must score strictly above this to survive filtering.
    pub score_threshold: f32,
    /// Suppression settings.
    pub nms: NmsConfig,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.6,
            nms: NmsConfig::default(),
        }
    }
}

impl DetectConfig {
    fn validate(&self) -> YoloBoxResult<()> {
        if self.score_threshold.is_nan() {
            return Err(YoloBoxError::InvalidThreshold {
                name: "score_threshold",
                value: self.score_threshold,
            });
        }
        self.nms.validate()
    }
}

/// Decoder plus thresholds: the single entry point for detection front ends.
#[derive(Clone, Debug, Default)]
pub struct Detector {
    decoder: Decoder,
    cfg: DetectConfig,
}

impl Detector {
    /// Creates a detector with default thresholds.
    pub fn new(decoder: Decoder) -> Self {
        Self {
            decoder,
            cfg: DetectConfig::default(),
        }
    }

    /// Replaces the thresholds.
    pub fn with_config(mut self, cfg: DetectConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the thresholds.
    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    /// Returns the decoder.
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Runs the full pipeline over one image's flat tensor.
    pub fn detect(&self, data: &[f32]) -> YoloBoxResult<Vec<Detection>> {
        self.cfg.validate()?;
        let candidates = self.decoder.decode(data)?;
        Ok(self.finish(candidates))
    }

    /// Runs the full pipeline over a tensor view.
    pub fn detect_tensor(&self, tensor: PredictionTensor<'_>) -> YoloBoxResult<Vec<Detection>> {
        self.cfg.validate()?;
        let candidates = self.decoder.decode_tensor(tensor)?;
        Ok(self.finish(candidates))
    }

    /// Runs the pipeline and resolves every class name.
    ///
    /// Fails with `UnknownClassIndex` if the resolver does not know a class;
    /// no partial result is returned.
    pub fn detect_labeled<R: LabelResolver + ?Sized>(
        &self,
        data: &[f32],
        resolver: &R,
    ) -> YoloBoxResult<Vec<LabeledDetection>> {
        self.detect(data)?
            .into_iter()
            .map(|det| det.with_label(resolver))
            .collect()
    }

    fn finish(&self, candidates: Vec<Candidate>) -> Vec<Detection> {
        let _span = trace_span!("detect", candidates = candidates.len()).entered();
        let filtered = filter_by_score(candidates, self.cfg.score_threshold);
        suppress_with(filtered, self.cfg.nms)
            .iter()
            .map(Detection::from)
            .collect()
    }
}

/// Detects objects in a reference-shaped tensor with class-agnostic suppression.
pub fn detect(
    tensor: &[f32],
    anchors: &AnchorTable,
    score_threshold: f32,
    iou_threshold: f32,
) -> YoloBoxResult<Vec<Detection>> {
    let decoder = Decoder::new(anchors.clone(), DecodeConfig::default())?;
    Detector::new(decoder)
        .with_config(DetectConfig {
            score_threshold,
            nms: NmsConfig {
                iou_threshold,
                ..NmsConfig::default()
            },
        })
        .detect(tensor)
}
