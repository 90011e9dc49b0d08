use yolobox::{
    coco_labels, detect, AnchorTable, DetectConfig, Detection, Detector, GridCell, GridShape,
    LabelTable, NmsConfig, PredictionTensor, SuppressionMode, YoloBoxError,
};

const BACKGROUND_OBJECTNESS: f32 = -20.0;

fn background_tensor() -> Vec<f32> {
    let shape = GridShape::YOLOV2_COCO;
    let mut data = vec![0.0f32; shape.tensor_len()];
    for record in data.chunks_exact_mut(shape.record_len()) {
        record[4] = BACKGROUND_OBJECTNESS;
    }
    data
}

fn plant(data: &mut [f32], cell: GridCell, objectness: f32, class: usize, logit: f32) {
    let shape = GridShape::YOLOV2_COCO;
    let start =
        ((cell.row * shape.cols + cell.col) * shape.anchors + cell.anchor) * shape.record_len();
    data[start + 4] = objectness;
    data[start + 5 + class] = logit;
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Two overlapping predictions of one large object plus one small, distant object.
fn scene() -> Vec<f32> {
    let mut data = background_tensor();
    plant(
        &mut data,
        GridCell {
            row: 9,
            col: 9,
            anchor: 4,
        },
        4.0,
        0,
        8.0,
    );
    plant(
        &mut data,
        GridCell {
            row: 9,
            col: 10,
            anchor: 4,
        },
        2.0,
        0,
        8.0,
    );
    plant(
        &mut data,
        GridCell {
            row: 2,
            col: 2,
            anchor: 0,
        },
        3.0,
        5,
        8.0,
    );
    data
}

#[test]
fn pipeline_collapses_duplicates_and_keeps_distinct_objects() {
    let detector = Detector::default();
    let detections = detector.detect(&scene()).unwrap();
    assert_eq!(detections.len(), 2);

    let class_p = 8.0f32.exp() / (8.0f32.exp() + 79.0);
    let first = detections[0];
    assert_eq!(first.class_index, 0);
    assert!((first.class_score - sigmoid(4.0) * class_p).abs() < 1e-5);

    let second = detections[1];
    assert_eq!(second.class_index, 5);
    assert!((second.class_score - sigmoid(3.0) * class_p).abs() < 1e-5);
}

#[test]
fn reference_corners_are_in_608_frame() {
    let detections = Detector::default().detect(&scene()).unwrap();
    let corners = detections[0].corners();
    // Center of cell (9, 9) is the image center; the anchor is 9.77 x 9.17 cells of 32 px.
    let half_w = 9.77052 * 16.0;
    let half_h = 9.16828 * 16.0;
    assert!((corners.min_x - (304.0 - half_w)).abs() < 1e-2);
    assert!((corners.max_x - (304.0 + half_w)).abs() < 1e-2);
    assert!((corners.min_y - (304.0 - half_h)).abs() < 1e-2);
    assert!((corners.max_y - (304.0 + half_h)).abs() < 1e-2);

    let pixels = detections[0].corners_for(1216, 304);
    assert!((pixels.min_x - 2.0 * (304.0 - half_w)).abs() < 1e-2);
    assert!((pixels.min_y - 0.5 * (304.0 - half_h)).abs() < 1e-2);
    assert_eq!(
        pixels.to_array(),
        [pixels.min_y, pixels.min_x, pixels.max_y, pixels.max_x]
    );
}

#[test]
fn free_function_matches_detector() {
    let data = scene();
    let via_fn = detect(&data, &AnchorTable::yolov2_coco(), 0.6, 0.5).unwrap();
    let via_detector = Detector::default()
        .with_config(DetectConfig {
            score_threshold: 0.6,
            nms: NmsConfig::default(),
        })
        .detect(&data)
        .unwrap();
    assert_eq!(via_fn, via_detector);
}

#[test]
fn loose_iou_threshold_keeps_the_duplicate() {
    let detector = Detector::default().with_config(DetectConfig {
        score_threshold: 0.6,
        nms: NmsConfig {
            iou_threshold: 0.9,
            mode: SuppressionMode::ClassAgnostic,
        },
    });
    let detections = detector.detect(&scene()).unwrap();
    assert_eq!(detections.len(), 3);
    assert!(detections
        .windows(2)
        .all(|w| w[0].class_score >= w[1].class_score));
}

#[test]
fn high_score_threshold_filters_everything() {
    let detector = Detector::default().with_config(DetectConfig {
        score_threshold: 0.99,
        ..DetectConfig::default()
    });
    assert!(detector.detect(&scene()).unwrap().is_empty());
}

#[test]
fn detect_tensor_accepts_views() {
    let data = scene();
    let tensor = PredictionTensor::yolov2(&data).unwrap();
    let detections = Detector::default().detect_tensor(tensor).unwrap();
    assert_eq!(detections.len(), 2);
}

#[test]
fn malformed_tensor_fails_before_any_detection() {
    let mut data = scene();
    data.pop();
    let err = Detector::default().detect(&data).err().unwrap();
    assert!(matches!(err, YoloBoxError::MalformedInput { .. }));

    let err = detect(&data, &AnchorTable::yolov2_coco(), 0.6, 0.5)
        .err()
        .unwrap();
    assert!(matches!(err, YoloBoxError::MalformedInput { .. }));
}

#[test]
fn free_function_rejects_wrong_anchor_count() {
    let anchors = AnchorTable::from_pairs(&[(1.0, 1.0)]).unwrap();
    let err = detect(&scene(), &anchors, 0.6, 0.5).err().unwrap();
    assert_eq!(
        err,
        YoloBoxError::MalformedInput {
            context: "anchor table",
            expected: 5,
            got: 1,
        }
    );
}

#[test]
fn nan_thresholds_are_rejected() {
    let detector = Detector::default().with_config(DetectConfig {
        score_threshold: f32::NAN,
        ..DetectConfig::default()
    });
    let err = detector.detect(&scene()).err().unwrap();
    assert!(matches!(
        err,
        YoloBoxError::InvalidThreshold {
            name: "score_threshold",
            ..
        }
    ));

    let err = detect(&scene(), &AnchorTable::yolov2_coco(), 0.6, f32::NAN)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        YoloBoxError::InvalidThreshold {
            name: "iou_threshold",
            ..
        }
    ));
}

#[test]
fn labeled_detection_uses_resolver() {
    let labeled = Detector::default()
        .detect_labeled(&scene(), &coco_labels())
        .unwrap();
    let names: Vec<&str> = labeled.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(names, vec!["person", "bus"]);
}

#[test]
fn unknown_class_index_is_distinct_from_malformed_input() {
    let labels = LabelTable::from_lines("person\nbicycle\ncar\n", None).unwrap();
    let err = Detector::default()
        .detect_labeled(&scene(), &labels)
        .err()
        .unwrap();
    assert_eq!(err, YoloBoxError::UnknownClassIndex { index: 5, len: 3 });
}

#[test]
fn detector_is_shareable_across_threads() {
    let detector = Detector::default();
    let data = scene();
    let expected = detector.detect(&data).unwrap();

    let results: Vec<Vec<Detection>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| detector.detect(&data).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for result in results {
        assert_eq!(result, expected);
    }
}
