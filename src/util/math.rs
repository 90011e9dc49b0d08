//! Numeric helpers for decoding network outputs.

/// Logistic sigmoid.
#[inline]
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Softmax of `logits`, scaled by `scale`.
///
/// The maximum logit is subtracted before exponentiation so large logits do
/// not overflow.
pub(crate) fn scaled_softmax(logits: &[f32], scale: f32) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut out: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = out.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        let k = scale / sum;
        for value in out.iter_mut() {
            *value *= k;
        }
    }
    out
}

/// Index and value of the largest element; ties keep the lowest index.
pub(crate) fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut iter = values.iter().copied().enumerate();
    let first = iter.next()?;
    Some(iter.fold(first, |best, (idx, value)| {
        if value > best.1 {
            (idx, value)
        } else {
            best
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::{argmax, scaled_softmax, sigmoid};

    #[test]
    fn sigmoid_is_centered_and_bounded() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-7);
        assert!(sigmoid(40.0) <= 1.0);
        assert!(sigmoid(-40.0) >= 0.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn softmax_sums_to_scale() {
        let probs = scaled_softmax(&[1.0, 2.0, 3.0, -4.0], 0.25);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 0.25).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn softmax_survives_large_logits() {
        let probs = scaled_softmax(&[1000.0, 1000.0], 1.0);
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), Some((1, 0.7)));
        assert_eq!(argmax(&[]), None);
    }
}
