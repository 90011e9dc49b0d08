//! Score threshold filtering.

use crate::candidate::Scored;
use crate::trace::trace_event;

/// Keeps items whose score is strictly greater than `threshold`.
///
/// Input order is preserved. NaN scores never pass.
pub fn filter_by_score<T: Scored>(items: Vec<T>, threshold: f32) -> Vec<T> {
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|item| item.score() > threshold)
        .collect();
    trace_event!(
        "score_filtered",
        threshold = threshold,
        kept = kept.len(),
        dropped = total - kept.len()
    );
    kept
}
