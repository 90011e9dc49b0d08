//! Row-parallel decoding (feature-gated).
//!
//! Each grid row is decoded on its own task; rows are concatenated in index
//! order so the result is identical to the sequential decoder.

use crate::anchors::Anchor;
use crate::candidate::Candidate;
use crate::decode::record::decode_row;
use crate::tensor::PredictionTensor;
use rayon::prelude::*;

pub(crate) fn decode_rows_par(
    tensor: PredictionTensor<'_>,
    anchors: &[Anchor],
    reference_size: f32,
) -> Vec<Candidate> {
    let shape = tensor.shape();
    let rows: Vec<Vec<Candidate>> = (0..shape.rows)
        .into_par_iter()
        .map(|row| match tensor.row(row) {
            Some(row_data) => decode_row(row_data, row, anchors, shape, reference_size),
            None => Vec::new(),
        })
        .collect();

    let mut out = Vec::with_capacity(shape.num_records());
    for row in rows {
        out.extend(row);
    }
    out
}
