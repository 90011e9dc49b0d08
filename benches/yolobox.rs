use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use yolobox::lowlevel::{filter_by_score, suppress};
use yolobox::{AnchorTable, DecodeConfig, Decoder, DetectConfig, Detector, GridShape};

fn make_tensor(shape: GridShape) -> Vec<f32> {
    let mut data = Vec::with_capacity(shape.tensor_len());
    for idx in 0..shape.tensor_len() {
        let value = ((idx * 13) ^ (idx * 7 >> 3)) % 97;
        data.push(value as f32 / 12.0 - 4.0);
    }
    data
}

fn bench_pipeline(c: &mut Criterion) {
    let shape = GridShape::YOLOV2_COCO;
    let data = make_tensor(shape);
    let decoder = Decoder::yolov2();

    c.bench_function("decode_yolov2", |b| {
        b.iter(|| black_box(decoder.decode(black_box(&data)).unwrap()));
    });

    let candidates = decoder.decode(&data).unwrap();
    let filtered = filter_by_score(candidates, 0.05);
    c.bench_function("suppress_filtered", |b| {
        b.iter(|| black_box(suppress(filtered.clone(), 0.5)));
    });

    let detector = Detector::new(Decoder::yolov2()).with_config(DetectConfig {
        score_threshold: 0.05,
        ..DetectConfig::default()
    });
    c.bench_function("detect_yolov2", |b| {
        b.iter(|| black_box(detector.detect(black_box(&data)).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let decoder_par = Decoder::new(
            AnchorTable::yolov2_coco(),
            DecodeConfig {
                parallel: true,
                ..DecodeConfig::default()
            },
        )
        .unwrap();
        c.bench_function("decode_yolov2_parallel", |b| {
            b.iter(|| black_box(decoder_par.decode(black_box(&data)).unwrap()));
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
