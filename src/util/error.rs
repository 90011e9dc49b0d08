//! Error types for yolobox.

use thiserror::Error;

/// Result alias for yolobox operations.
pub type YoloBoxResult<T> = std::result::Result<T, YoloBoxError>;

/// Errors that can occur while decoding, suppressing or labelling detections.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum YoloBoxError {
    /// An input buffer or table does not have the length its shape requires.
    #[error("malformed {context}: expected {expected} values, got {got}")]
    MalformedInput {
        context: &'static str,
        expected: usize,
        got: usize,
    },
    /// A class index has no entry in the label resolver.
    #[error("unknown class index {index} (resolver knows {len} classes)")]
    UnknownClassIndex { index: usize, len: usize },
    /// The grid shape is unusable.
    #[error("invalid grid shape: {reason}")]
    InvalidShape { reason: &'static str },
    /// An anchor has a non-finite or non-positive dimension.
    #[error("invalid anchor {index}: {reason}")]
    InvalidAnchor { index: usize, reason: &'static str },
    /// A threshold is not a finite number.
    #[error("invalid {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// A label table could not be built.
    #[error("invalid labels: {reason}")]
    InvalidLabels { reason: String },
    /// Loading a tensor from disk failed.
    #[cfg(feature = "tensor-io")]
    #[error("tensor io: {reason}")]
    TensorIo { reason: String },
    /// Reading an image header failed.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
