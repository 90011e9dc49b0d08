use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yolobox::image_io::image_dimensions;
use yolobox::io::{load_tensor, TensorFormat};
use yolobox::{
    coco_labels, AnchorTable, DecodeConfig, Decoder, DetectConfig, Detector, GridShape,
    LabelTable, LabeledDetection, NmsConfig, SuppressionMode, DEFAULT_REFERENCE_SIZE,
};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "YOLO output decoder (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TensorFormatConfig {
    F32le,
    Json,
}

impl From<TensorFormatConfig> for TensorFormat {
    fn from(value: TensorFormatConfig) -> Self {
        match value {
            TensorFormatConfig::F32le => TensorFormat::F32Le,
            TensorFormatConfig::Json => TensorFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SuppressionConfig {
    ClassAgnostic,
    PerClass,
}

impl From<SuppressionConfig> for SuppressionMode {
    fn from(value: SuppressionConfig) -> Self {
        match value {
            SuppressionConfig::ClassAgnostic => SuppressionMode::ClassAgnostic,
            SuppressionConfig::PerClass => SuppressionMode::PerClass,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    rows: usize,
    cols: usize,
    classes: usize,
    reference_size: f32,
    parallel: bool,
    anchors: Vec<[f32; 2]>,
}

impl Default for DecodeConfigJson {
    fn default() -> Self {
        let shape = GridShape::YOLOV2_COCO;
        let anchors = AnchorTable::yolov2_coco()
            .as_slice()
            .iter()
            .map(|a| [a.width, a.height])
            .collect();
        Self {
            rows: shape.rows,
            cols: shape.cols,
            classes: shape.classes,
            reference_size: DEFAULT_REFERENCE_SIZE,
            parallel: false,
            anchors,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    score_threshold: f32,
    iou_threshold: f32,
    suppression: SuppressionConfig,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            score_threshold: cfg.score_threshold,
            iou_threshold: cfg.nms.iou_threshold,
            suppression: SuppressionConfig::ClassAgnostic,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Config {
    tensor_path: String,
    tensor_format: Option<TensorFormatConfig>,
    labels_path: Option<String>,
    image_path: Option<String>,
    image_size: Option<[u32; 2]>,
    output_path: Option<String>,
    decode: DecodeConfigJson,
    detect: DetectConfigJson,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_index: usize,
    label: String,
    score: f32,
    /// `[min_y, min_x, max_y, max_x]` in the reference frame.
    corners: [f32; 4],
    /// `[min_y, min_x, max_y, max_x]` in target image pixels, if a size is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pixel_corners: Option<[f32; 4]>,
}

impl DetectionRecord {
    fn new(value: LabeledDetection, image_size: Option<(u32, u32)>) -> Self {
        let det = value.detection;
        Self {
            class_index: det.class_index,
            label: value.label,
            score: det.class_score,
            corners: det.corners().to_array(),
            pixel_corners: image_size.map(|(w, h)| det.corners_for(w, h).to_array()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    image_size: Option<[u32; 2]>,
    detections: Vec<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("yolobox=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }

    let anchors = AnchorTable::from_pairs(
        &config
            .decode
            .anchors
            .iter()
            .map(|&[w, h]| (w, h))
            .collect::<Vec<_>>(),
    )?;
    let shape = GridShape::new(
        config.decode.rows,
        config.decode.cols,
        anchors.len(),
        config.decode.classes,
    )?;
    let decoder = Decoder::new(
        anchors,
        DecodeConfig {
            shape,
            reference_size: config.decode.reference_size,
            parallel: config.decode.parallel,
        },
    )?;
    let detector = Detector::new(decoder).with_config(DetectConfig {
        score_threshold: config.detect.score_threshold,
        nms: NmsConfig {
            iou_threshold: config.detect.iou_threshold,
            mode: config.detect.suppression.into(),
        },
    });

    let labels = match &config.labels_path {
        Some(path) => LabelTable::from_lines(&fs::read_to_string(path)?, Some(shape.classes))?,
        None => coco_labels(),
    };

    let image_size = match (config.image_size, &config.image_path) {
        (Some([w, h]), _) => Some((w, h)),
        (None, Some(path)) => Some(image_dimensions(path)?),
        (None, None) => None,
    };

    let format = config
        .tensor_format
        .map(TensorFormat::from)
        .unwrap_or_else(|| TensorFormat::from_path(&config.tensor_path));
    let tensor = load_tensor(&config.tensor_path, format, shape)?;

    let labeled = detector.detect_labeled(tensor.data(), &labels)?;
    tracing::info!(
        detections = labeled.len(),
        tensor = %config.tensor_path,
        "detection finished"
    );

    let output = Output {
        image_size: image_size.map(|(w, h)| [w, h]),
        detections: labeled
            .into_iter()
            .map(|det| DetectionRecord::new(det, image_size))
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
