//! postura CLI — command-line interface for single-photo posture analysis.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use postura::{
    classify_orientation, AnalysisConfig, AnalysisError, AnalysisMode, Analyzer, Keypoint,
    LandmarkRole, OrientationConfig, OverrideStore, Point2D, PoseKeypoints,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "postura")]
#[command(about = "Posture landmarks and alignment angle from a photo and body keypoints")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one image with precomputed keypoints.
    Analyze(CliAnalyzeArgs),

    /// Print the facing direction derived from a keypoint file.
    Orientation {
        /// Path to the keypoint JSON.
        #[arg(long)]
        keypoints: PathBuf,

        /// Keypoint layout in the JSON file.
        #[arg(long, value_enum, default_value_t = KeypointLayoutArg::Indexed)]
        layout: KeypointLayoutArg,

        /// Nose-to-shoulder offset (px) beyond which the body counts as turned.
        #[arg(long, default_value = "30.0")]
        threshold_px: f64,
    },

    /// Print the default analysis configuration as JSON.
    DefaultConfig {
        /// Analysis mode written into the printed config.
        #[arg(long, value_enum, default_value_t = ModeArg::Side)]
        mode: ModeArg,
    },
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to the keypoint JSON produced by the pose estimator.
    #[arg(long)]
    keypoints: PathBuf,

    /// Keypoint layout in the JSON file.
    #[arg(long, value_enum, default_value_t = KeypointLayoutArg::Indexed)]
    layout: KeypointLayoutArg,

    /// Analysis mode. Overrides the mode from --config.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Path to write the analysis result (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to an analysis config (JSON). Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Manually placed landmark, `role=x,y` (roles: shoulders, hips, feet, fc).
    #[arg(long = "override", value_parser = parse_override)]
    overrides: Vec<(LandmarkRole, Point2D)>,

    /// FC scan subdivisions of the search radius.
    #[arg(long)]
    scan_steps: Option<usize>,

    /// Brightness jump that ends a silhouette edge walk (0-255).
    #[arg(long)]
    edge_threshold: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Front,
    Side,
    SideFc,
}

impl ModeArg {
    fn to_core(self) -> AnalysisMode {
        match self {
            Self::Front => AnalysisMode::Front,
            Self::Side => AnalysisMode::Side,
            Self::SideFc => AnalysisMode::SideFc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KeypointLayoutArg {
    /// Array position is the keypoint index; `null` marks a missing point.
    Indexed,
    /// Keypoints carry MoveNet names; order does not matter.
    Named,
}

/// Accepted keypoint files: a bare array or a pose object with a
/// `keypoints` array.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum KeypointsFile {
    Bare(Vec<Option<Keypoint>>),
    Pose { keypoints: Vec<Option<Keypoint>> },
}

impl KeypointsFile {
    fn into_keypoints(self, layout: KeypointLayoutArg) -> PoseKeypoints {
        let slots = match self {
            Self::Bare(slots) | Self::Pose { keypoints: slots } => slots,
        };
        match layout {
            KeypointLayoutArg::Indexed => PoseKeypoints::from_indexed(slots),
            KeypointLayoutArg::Named => PoseKeypoints::from_named(slots.into_iter().flatten()),
        }
    }
}

fn parse_override(s: &str) -> Result<(LandmarkRole, Point2D), String> {
    let (role, coords) = s
        .split_once('=')
        .ok_or_else(|| format!("expected role=x,y, got '{}'", s))?;
    let role: LandmarkRole = role.trim().parse()?;
    let (x, y) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected x,y coordinates, got '{}'", coords))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", v, e))
    };
    let point = Point2D::from([parse(x)?, parse(y)?]);
    if !point.is_finite() {
        return Err(format!("override for {} must have finite coordinates", role));
    }
    Ok((role, point))
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Orientation {
            keypoints,
            layout,
            threshold_px,
        } => run_orientation(&keypoints, layout, threshold_px),
        Commands::DefaultConfig { mode } => run_default_config(mode),
    }
}

fn load_keypoints(path: &Path, layout: KeypointLayoutArg) -> CliResult<PoseKeypoints> {
    let data = std::fs::read_to_string(path).map_err(|e| -> CliError {
        format!("Failed to read keypoints {}: {}", path.display(), e).into()
    })?;
    let file: KeypointsFile = serde_json::from_str(&data).map_err(|e| -> CliError {
        format!("Failed to parse keypoints {}: {}", path.display(), e).into()
    })?;
    Ok(file.into_keypoints(layout))
}

// ── default-config ────────────────────────────────────────────────────

fn run_default_config(mode: ModeArg) -> CliResult<()> {
    let config = AnalysisConfig::for_mode(mode.to_core());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

// ── orientation ───────────────────────────────────────────────────────

fn run_orientation(path: &Path, layout: KeypointLayoutArg, threshold_px: f64) -> CliResult<()> {
    let keypoints = load_keypoints(path, layout)?;
    let orientation = classify_orientation(&keypoints, &OrientationConfig { threshold_px });
    println!("{}", orientation);
    Ok(())
}

// ── analyze ───────────────────────────────────────────────────────────

fn build_config(args: &CliAnalyzeArgs) -> CliResult<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode.to_core();
    }
    if let Some(steps) = args.scan_steps {
        config.fc_locator.scan_steps = steps;
    }
    if let Some(threshold) = args.edge_threshold {
        config.edge_align.brightness_threshold = threshold;
    }
    Ok(config)
}

fn build_overrides(args: &CliAnalyzeArgs) -> CliResult<OverrideStore> {
    let mut store = OverrideStore::new();
    for &(role, point) in &args.overrides {
        store.set(role, point)?;
    }
    Ok(store)
}

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());

    let img = image::open(&args.image).map_err(|e| AnalysisError::InvalidImage {
        reason: format!("{}: {}", args.image.display(), e),
    })?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let keypoints = load_keypoints(&args.keypoints, args.layout)?;
    tracing::info!("Loaded {} keypoints", keypoints.n_present());

    let analyzer = Analyzer::new(build_config(args)?)?;
    tracing::info!(
        "Mode: {} (FC scan steps {}, edge threshold {})",
        analyzer.mode(),
        analyzer.config().fc_locator.scan_steps,
        analyzer.config().edge_align.brightness_threshold
    );
    let overrides = build_overrides(args)?;
    let result = analyzer.analyze(&rgba, &keypoints, &overrides)?;

    for (role, landmark) in result.landmarks.iter() {
        tracing::info!(
            "  {:<16} ({:.1}, {:.1}) [{:?}]",
            role.as_str(),
            landmark.point.x,
            landmark.point.y,
            landmark.source
        );
    }
    if let Some(fc) = &result.fc_point {
        if !fc.found_edge {
            tracing::warn!("FC point fell back to the hip center");
        }
    }

    let json = serde_json::to_string_pretty(&result)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, &json)?;
            tracing::info!("Results written to {}", out.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
