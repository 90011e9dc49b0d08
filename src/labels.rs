//! Class index to name resolution.

use crate::util::{YoloBoxError, YoloBoxResult};

/// Class names of the COCO-trained YOLOv2 detector, in output order.
pub const COCO_CLASSES: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorbike",
    "aeroplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "sofa",
    "pottedplant",
    "bed",
    "diningtable",
    "toilet",
    "tvmonitor",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// Maps predicted class indices to human-readable names.
pub trait LabelResolver {
    /// Returns the name for `index`, or `UnknownClassIndex` if there is none.
    fn label(&self, index: usize) -> YoloBoxResult<&str>;

    /// Number of known classes.
    fn num_classes(&self) -> usize;
}

/// Ordered list of class names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    /// Creates a table from names in class-index order.
    pub fn new(names: Vec<String>) -> YoloBoxResult<Self> {
        if names.is_empty() {
            return Err(YoloBoxError::InvalidLabels {
                reason: "label table is empty".to_owned(),
            });
        }
        Ok(Self { names })
    }

    /// Parses one name per line, ignoring a trailing newline and `\r`.
    ///
    /// With `expected` set, any other number of names is rejected.
    pub fn from_lines(text: &str, expected: Option<usize>) -> YoloBoxResult<Self> {
        let names: Vec<String> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').to_owned())
            .collect();
        if let Some(expected) = expected {
            if names.len() != expected {
                return Err(YoloBoxError::InvalidLabels {
                    reason: format!("expected {expected} class names, found {}", names.len()),
                });
            }
        }
        Self::new(names)
    }

    /// The 80 COCO class names.
    pub fn coco() -> Self {
        Self {
            names: COCO_CLASSES.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    /// Iterates over names in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

impl LabelResolver for LabelTable {
    fn label(&self, index: usize) -> YoloBoxResult<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(YoloBoxError::UnknownClassIndex {
                index,
                len: self.names.len(),
            })
    }

    fn num_classes(&self) -> usize {
        self.names.len()
    }
}

/// Label table for the reference COCO detector.
pub fn coco_labels() -> LabelTable {
    LabelTable::coco()
}
