//! Greedy IoU-based non-maximum suppression.
//!
//! Each round picks the highest-scoring remaining item (the first one in
//! input order on ties), keeps it, and rebuilds the remaining set from the
//! items whose IoU with it does not exceed the threshold. Corners are compared
//! in the reference frame reported by `Scored::corners`.

use crate::candidate::Scored;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{YoloBoxError, YoloBoxResult};

/// Which pairs of items may suppress each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuppressionMode {
    /// Any two items may suppress each other regardless of predicted class.
    #[default]
    ClassAgnostic,
    /// Only items with the same predicted class suppress each other.
    PerClass,
}

/// Configuration for suppression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NmsConfig {
    /// Items with IoU strictly above this value are suppressed.
    pub iou_threshold: f32,
    /// Class grouping behaviour.
    pub mode: SuppressionMode,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.5,
            mode: SuppressionMode::ClassAgnostic,
        }
    }
}

impl NmsConfig {
    pub(crate) fn validate(&self) -> YoloBoxResult<()> {
        if self.iou_threshold.is_nan() {
            return Err(YoloBoxError::InvalidThreshold {
                name: "iou_threshold",
                value: self.iou_threshold,
            });
        }
        Ok(())
    }
}

/// Class-agnostic suppression with the given IoU threshold.
pub fn suppress<T: Scored>(items: Vec<T>, iou_threshold: f32) -> Vec<T> {
    suppress_with(
        items,
        NmsConfig {
            iou_threshold,
            mode: SuppressionMode::ClassAgnostic,
        },
    )
}

/// Suppression with explicit configuration.
///
/// The output is in selection order, so scores are non-increasing.
pub fn suppress_with<T: Scored>(items: Vec<T>, cfg: NmsConfig) -> Vec<T> {
    let input_len = items.len();
    let _span = trace_span!("suppress", input = input_len, iou_threshold = cfg.iou_threshold)
        .entered();
    if items.is_empty() {
        return Vec::new();
    }

    let corners: Vec<_> = items.iter().map(Scored::corners).collect();
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut remaining: Vec<usize> = (0..slots.len()).collect();
    let mut kept = Vec::new();

    while let Some(best) = pick_best(&slots, &remaining) {
        let Some(selected) = slots[best].take() else {
            break;
        };
        let best_class = selected.class_index();
        kept.push(selected);

        let before = remaining.len();
        let mut survivors = Vec::with_capacity(before);
        for &idx in remaining.iter() {
            if idx == best {
                continue;
            }
            let Some(other) = slots[idx].as_ref() else {
                continue;
            };
            let comparable = match cfg.mode {
                SuppressionMode::ClassAgnostic => true,
                SuppressionMode::PerClass => other.class_index() == best_class,
            };
            if comparable && corners[best].iou(&corners[idx]) > cfg.iou_threshold {
                slots[idx] = None;
                continue;
            }
            survivors.push(idx);
        }
        trace_debug!(
            "suppression_round",
            selected = best,
            removed = before - 1 - survivors.len(),
            remaining = survivors.len()
        );
        remaining = survivors;
    }

    trace_event!("suppressed", input = input_len, kept = kept.len());
    kept
}

/// Highest-scoring index in `remaining`; the earliest index wins ties.
fn pick_best<T: Scored>(slots: &[Option<T>], remaining: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for &idx in remaining {
        let Some(item) = slots[idx].as_ref() else {
            continue;
        };
        let score = item.score();
        match best {
            Some((_, best_score)) if score <= best_score || score.is_nan() => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}
