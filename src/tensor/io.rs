//! Loading prediction tensors from disk.
//!
//! Available when the `tensor-io` feature is enabled. Two encodings are
//! understood: a packed little-endian `f32` dump, and a JSON array of numbers.

use crate::tensor::{GridShape, OwnedTensor};
use crate::util::{YoloBoxError, YoloBoxResult};
use std::path::Path;

/// On-disk encoding of a tensor file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorFormat {
    /// Packed little-endian `f32` values.
    F32Le,
    /// A flat JSON array of numbers.
    Json,
}

impl TensorFormat {
    /// Guesses the format from the file extension (`.json` is JSON, anything else raw).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TensorFormat::Json,
            _ => TensorFormat::F32Le,
        }
    }
}

/// Decodes packed little-endian `f32` bytes.
pub fn tensor_from_le_bytes(bytes: &[u8], shape: GridShape) -> YoloBoxResult<OwnedTensor> {
    if bytes.len() % 4 != 0 {
        return Err(YoloBoxError::TensorIo {
            reason: format!("byte length {} is not a multiple of 4", bytes.len()),
        });
    }
    let data = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    OwnedTensor::new(data, shape)
}

/// Parses a JSON array of numbers.
pub fn tensor_from_json(text: &str, shape: GridShape) -> YoloBoxResult<OwnedTensor> {
    let data: Vec<f32> = serde_json::from_str(text).map_err(|err| YoloBoxError::TensorIo {
        reason: err.to_string(),
    })?;
    OwnedTensor::new(data, shape)
}

/// Loads a tensor file in the given format.
pub fn load_tensor<P: AsRef<Path>>(
    path: P,
    format: TensorFormat,
    shape: GridShape,
) -> YoloBoxResult<OwnedTensor> {
    let path = path.as_ref();
    let io_err = |err: std::io::Error| YoloBoxError::TensorIo {
        reason: format!("{}: {err}", path.display()),
    };
    match format {
        TensorFormat::F32Le => {
            let bytes = std::fs::read(path).map_err(io_err)?;
            tensor_from_le_bytes(&bytes, shape)
        }
        TensorFormat::Json => {
            let text = std::fs::read_to_string(path).map_err(io_err)?;
            tensor_from_json(&text, shape)
        }
    }
}
