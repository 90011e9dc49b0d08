//! Per-record decoding math.

use crate::anchors::Anchor;
use crate::candidate::Candidate;
use crate::tensor::{GridCell, GridShape, BOX_FIELDS};
use crate::util::math::{argmax, scaled_softmax, sigmoid};

/// Decodes one `5 + classes` record into a candidate.
///
/// X follows grid columns and Y follows grid rows; the anchor width is
/// divided by the column count and the anchor height by the row count.
fn decode_record(
    record: &[f32],
    cell: GridCell,
    anchor: Anchor,
    shape: GridShape,
    reference_size: f32,
) -> Candidate {
    debug_assert_eq!(record.len(), shape.record_len());
    let (tx, ty, tw, th, to) = (record[0], record[1], record[2], record[3], record[4]);
    let cols = shape.cols as f32;
    let rows = shape.rows as f32;

    let objectness = sigmoid(to);
    let center_x = (sigmoid(tx) + cell.col as f32) / cols;
    let center_y = (sigmoid(ty) + cell.row as f32) / rows;
    let width = tw.exp() * anchor.width / cols;
    let height = th.exp() * anchor.height / rows;

    let class_probabilities = scaled_softmax(&record[BOX_FIELDS..], objectness);
    let (class_index, class_score) = argmax(&class_probabilities).unwrap_or((0, 0.0));

    Candidate::from_decoded(
        [center_x, center_y, width, height],
        objectness,
        class_probabilities,
        class_index,
        class_score,
        cell,
        reference_size,
    )
}

/// Decodes every record of grid row `row` in column-major, anchor-minor order.
pub(crate) fn decode_row(
    row_data: &[f32],
    row: usize,
    anchors: &[Anchor],
    shape: GridShape,
    reference_size: f32,
) -> Vec<Candidate> {
    let record_len = shape.record_len();
    let mut out = Vec::with_capacity(shape.cols * shape.anchors);
    for (idx, record) in row_data.chunks_exact(record_len).enumerate() {
        let cell = GridCell {
            row,
            col: idx / shape.anchors,
            anchor: idx % shape.anchors,
        };
        out.push(decode_record(
            record,
            cell,
            anchors[cell.anchor],
            shape,
            reference_size,
        ));
    }
    out
}
