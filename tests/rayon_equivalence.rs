#![cfg(feature = "rayon")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use yolobox::{AnchorTable, DecodeConfig, Decoder, DetectConfig, Detector, GridShape};

fn random_tensor(shape: GridShape, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..shape.tensor_len())
        .map(|_| rng.random_range(-5.0f32..5.0))
        .collect()
}

fn decoder(parallel: bool) -> Decoder {
    Decoder::new(
        AnchorTable::yolov2_coco(),
        DecodeConfig {
            parallel,
            ..DecodeConfig::default()
        },
    )
    .unwrap()
}

#[test]
fn parallel_decode_matches_sequential() {
    let data = random_tensor(GridShape::YOLOV2_COCO, 99);
    let seq = decoder(false).decode(&data).unwrap();
    let par = decoder(true).decode(&data).unwrap();
    assert_eq!(seq.len(), par.len());
    assert_eq!(seq, par);
}

#[test]
fn parallel_detect_matches_sequential() {
    let data = random_tensor(GridShape::YOLOV2_COCO, 5);
    let cfg = DetectConfig {
        score_threshold: 0.05,
        ..DetectConfig::default()
    };
    let seq = Detector::new(decoder(false)).with_config(cfg).detect(&data).unwrap();
    let par = Detector::new(decoder(true)).with_config(cfg).detect(&data).unwrap();
    assert!(!seq.is_empty());
    assert_eq!(seq, par);
}
