//! qrpath: encode payloads as QR codes and write rounded SVG outlines.
//!
//! Three subcommands share the same renderer:
//!
//! - `batch` reads `role;payload` rows from a CSV file and writes one SVG
//!   per row under `<output-dir>/<role>/`
//! - `encode` renders a single payload
//! - `grid` renders a text picture of modules, skipping QR encoding
//!
//! # Usage
//!
//! ```text
//! qrpath batch [OPTIONS] [CSV]
//! qrpath encode [OPTIONS] <PAYLOAD>
//! qrpath grid [OPTIONS] <FILE>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod batch;
mod encode;
mod error;
mod naming;
mod palette;
mod records;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand, ValueEnum};
use qrpath_export::SvgMetadata;
use qrpath_outline::diagnostics::{Clock, RenderDiagnostics};
use qrpath_outline::{Grid, RenderConfig};

use crate::batch::BatchConfig;
use crate::encode::EncodeOptions;
use crate::error::CliError;
use crate::palette::Palette;

/// Render QR codes and module grids as smoothly rounded SVG outlines.
#[derive(Parser)]
#[command(name = "qrpath", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one SVG per row of a `role;payload` CSV file.
    Batch(BatchArgs),
    /// Render a single payload.
    Encode(EncodeArgs),
    /// Render a text grid file (`#`/`1` dark, `.`/`0`/space light).
    Grid(GridArgs),
}

#[derive(Args)]
struct BatchArgs {
    /// `;`-delimited CSV with a header row.
    #[arg(default_value = batch::DEFAULT_INPUT)]
    csv: PathBuf,

    /// Root directory for the generated files.
    #[arg(long, default_value = batch::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Fill colour for a role (repeatable), e.g. `--color jurado=#FF0000`.
    #[arg(long = "color", value_name = "ROLE=COLOR", value_parser = palette::parse_assignment)]
    colors: Vec<(String, String)>,

    /// Start from an empty role table instead of the built-in one.
    #[arg(long)]
    no_default_colors: bool,

    #[command(flatten)]
    qr: QrArgs,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args)]
struct EncodeArgs {
    /// Text to encode.
    payload: String,

    /// Write the SVG here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Embed a `<title>` element.
    #[arg(long)]
    title: Option<String>,

    #[command(flatten)]
    qr: QrArgs,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args)]
struct GridArgs {
    /// Text grid file.
    file: PathBuf,

    /// Write the SVG here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Embed a `<title>` element.
    #[arg(long)]
    title: Option<String>,

    #[command(flatten)]
    render: RenderArgs,
}

/// QR encoding options.
#[derive(Args)]
struct QrArgs {
    /// Error correction level.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_EC_LEVEL)]
    ec_level: EcLevel,

    /// Light modules around the code.
    #[arg(long, default_value_t = EncodeOptions::DEFAULT_QUIET_ZONE)]
    quiet_zone: usize,
}

/// Rendering and reporting options.
#[derive(Args)]
struct RenderArgs {
    /// Corner rounding, 0 (square) to 1 (fully round).
    #[arg(long, default_value_t = RenderConfig::DEFAULT_ROUNDING)]
    rounding: f64,

    /// Fill colour (in batch mode: for roles without their own colour).
    #[arg(long, visible_alias = "default-color", default_value = RenderConfig::DEFAULT_FILL_COLOR)]
    fill_color: String,

    /// Full render config as a JSON string.
    ///
    /// When provided, `--rounding` and `--fill-color` are ignored. The
    /// JSON must be a valid `RenderConfig` serialization; missing fields
    /// take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Print per-stage diagnostics to stderr.
    #[arg(long)]
    diagnostics: bool,

    /// Print diagnostics as JSON instead of a human-readable report.
    #[arg(long, requires = "diagnostics")]
    json: bool,
}

/// Error correction level selection.
#[derive(Clone, Copy, ValueEnum)]
enum EcLevel {
    /// Recovers about 7% damage.
    L,
    /// Recovers about 15% damage.
    M,
    /// Recovers about 25% damage.
    Q,
    /// Recovers about 30% damage.
    H,
}

/// Maps a [`qrcode::EcLevel`] to the local CLI [`EcLevel`] enum.
const fn ec_level_from_qrcode(level: qrcode::EcLevel) -> EcLevel {
    match level {
        qrcode::EcLevel::L => EcLevel::L,
        qrcode::EcLevel::M => EcLevel::M,
        qrcode::EcLevel::Q => EcLevel::Q,
        qrcode::EcLevel::H => EcLevel::H,
    }
}

/// The CLI default level, derived from [`EncodeOptions::DEFAULT_EC_LEVEL`]
/// so the two cannot silently diverge.
const CLI_DEFAULT_EC_LEVEL: EcLevel = ec_level_from_qrcode(EncodeOptions::DEFAULT_EC_LEVEL);

impl QrArgs {
    const fn options(&self) -> EncodeOptions {
        EncodeOptions {
            ec_level: match self.ec_level {
                EcLevel::L => qrcode::EcLevel::L,
                EcLevel::M => qrcode::EcLevel::M,
                EcLevel::Q => qrcode::EcLevel::Q,
                EcLevel::H => qrcode::EcLevel::H,
            },
            quiet_zone: self.quiet_zone,
        }
    }
}

/// Build a [`RenderConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored. Otherwise, a config is assembled from
/// the individual flags. Either way the result is validated.
fn config_from_cli(args: &RenderArgs) -> Result<RenderConfig, CliError> {
    let config = if let Some(ref json) = args.config_json {
        serde_json::from_str(json).map_err(CliError::Config)?
    } else {
        RenderConfig {
            rounding: args.rounding,
            fill_color: args.fill_color.clone(),
        }
    };
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Batch(args) => run_batch(&args),
        Command::Encode(args) => run_encode(&args),
        Command::Grid(args) => run_grid(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_batch(args: &BatchArgs) -> Result<(), CliError> {
    let mut palette = if args.no_default_colors {
        Palette::empty()
    } else {
        Palette::default()
    };
    palette.extend(args.colors.iter().map(|(role, color)| (role, color.as_str())));

    let config = BatchConfig {
        render: config_from_cli(&args.render)?,
        encode: args.qr.options(),
        palette,
        output_dir: args.output_dir.clone(),
    };

    eprintln!("Input: {}", args.csv.display());
    eprintln!("Config: {:?}", config.render);
    eprintln!("Role colours: {}", config.palette.len());

    let written = batch::run(&args.csv, &config, &StdClock)?;
    for file in &written {
        eprintln!(
            "row {}: {} ({} bytes)",
            file.row,
            file.path.display(),
            file.bytes,
        );
    }
    eprintln!(
        "Wrote {} SVG files to {}",
        written.len(),
        config.output_dir.display(),
    );

    if args.render.diagnostics {
        let diagnostics: Vec<RenderDiagnostics> =
            written.into_iter().map(|w| w.diagnostics).collect();
        if args.render.json {
            eprintln!("{}", serde_json::to_string_pretty(&diagnostics)?);
        } else {
            print_batch_summary(&diagnostics);
        }
    }

    Ok(())
}

fn run_encode(args: &EncodeArgs) -> Result<(), CliError> {
    let config = config_from_cli(&args.render)?;
    let grid = encode::encode(&args.payload, &args.qr.options())?;
    render_and_write(&grid, &config, args.title.as_deref(), args.output.as_deref(), &args.render)
}

fn run_grid(args: &GridArgs) -> Result<(), CliError> {
    let config = config_from_cli(&args.render)?;
    let text = std::fs::read_to_string(&args.file).map_err(CliError::io(&args.file))?;
    let grid: Grid = text.parse()?;
    let title = args
        .title
        .as_deref()
        .or_else(|| args.file.file_stem().and_then(|s| s.to_str()));
    render_and_write(&grid, &config, title, args.output.as_deref(), &args.render)
}

/// Render `grid`, write the SVG to `output` (or stdout), and report
/// diagnostics if requested.
fn render_and_write(
    grid: &Grid,
    config: &RenderConfig,
    title: Option<&str>,
    output: Option<&Path>,
    args: &RenderArgs,
) -> Result<(), CliError> {
    let metadata = SvgMetadata {
        title,
        description: None,
    };
    let (svg, diagnostics) = batch::render_document(grid, config, &metadata, &StdClock)?;

    if let Some(path) = output {
        std::fs::write(path, &svg).map_err(CliError::io(path))?;
        eprintln!("SVG written to {} ({} bytes)", path.display(), svg.len());
    } else {
        println!("{svg}");
    }

    if args.diagnostics {
        if args.json {
            eprintln!("{}", serde_json::to_string_pretty(&diagnostics)?);
        } else {
            eprintln!("{}", diagnostics.report());
        }
    }

    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&RenderDiagnostics) -> Duration;

/// Print aggregated statistics across all rows of a batch.
#[allow(clippy::cast_precision_loss)]
fn print_batch_summary(all_diagnostics: &[RenderDiagnostics]) {
    eprintln!();
    eprintln!(
        "Summary ({} files)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        eprintln!("No rows rendered");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    eprintln!("Render duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    let contours: usize = all_diagnostics.iter().map(|d| d.summary.contour_count).sum();
    let commands: usize = all_diagnostics.iter().map(|d| d.summary.command_count).sum();
    eprintln!("Contours: {contours}  |  Path commands: {commands}");

    // Per-stage means.
    eprintln!();
    eprintln!("{:<24} {:>12}", "Stage", "Mean (ms)");
    eprintln!("{}", "-".repeat(40));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Vertex Extraction", |d| d.extraction.duration),
        ("Contour Tracing", |d| d.tracing.duration),
        ("Corner Smoothing", |d| d.smoothing.duration),
    ];

    for (name, extractor) in stage_extractors {
        let total: f64 = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum();
        let stage_mean = total / all_diagnostics.len() as f64;
        eprintln!("{name:<24} {stage_mean:>10.3}ms");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::ffi::OsStr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn batch_defaults() {
        let cli = Cli::try_parse_from(["qrpath", "batch"]).unwrap();
        let Command::Batch(args) = cli.command else {
            unreachable!("expected batch");
        };
        assert_eq!(args.csv, PathBuf::from("salida.csv"));
        assert_eq!(args.output_dir, PathBuf::from("QR"));
        assert_eq!(args.qr.options(), EncodeOptions::default());
        let config = config_from_cli(&args.render).unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn batch_color_overrides() {
        let cli = Cli::try_parse_from([
            "qrpath",
            "batch",
            "in.csv",
            "--color",
            "jurado=#FF0000",
            "--color",
            "hacker=#00FF00",
            "--default-color",
            "#333333",
        ])
        .unwrap();
        let Command::Batch(args) = cli.command else {
            unreachable!("expected batch");
        };
        assert_eq!(args.colors.len(), 2);
        assert_eq!(args.render.fill_color, "#333333");
    }

    #[test]
    fn malformed_color_rejected() {
        assert!(Cli::try_parse_from(["qrpath", "batch", "--color", "jurado"]).is_err());
    }

    #[test]
    fn ec_level_values() {
        let cli = Cli::try_parse_from(["qrpath", "encode", "hi", "--ec-level", "l"]).unwrap();
        let Command::Encode(args) = cli.command else {
            unreachable!("expected encode");
        };
        assert_eq!(args.qr.options().ec_level, qrcode::EcLevel::L);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::try_parse_from([
            "qrpath",
            "grid",
            "g.txt",
            "--rounding",
            "0.1",
            "--config-json",
            r#"{"rounding": 1.0}"#,
        ])
        .unwrap();
        let Command::Grid(args) = cli.command else {
            unreachable!("expected grid");
        };
        let config = config_from_cli(&args.render).unwrap();
        assert!((config.rounding - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.fill_color, RenderConfig::DEFAULT_FILL_COLOR);
    }

    #[test]
    fn bad_config_rejected() {
        let cli = Cli::try_parse_from(["qrpath", "grid", "g.txt", "--config-json", "{"]).unwrap();
        let Command::Grid(args) = cli.command else {
            unreachable!("expected grid");
        };
        assert!(matches!(config_from_cli(&args.render), Err(CliError::Config(_))));

        let cli = Cli::try_parse_from(["qrpath", "grid", "g.txt", "--rounding", "1.5"]).unwrap();
        let Command::Grid(args) = cli.command else {
            unreachable!("expected grid");
        };
        assert!(matches!(config_from_cli(&args.render), Err(CliError::Outline(_))));
    }

    #[test]
    fn json_requires_diagnostics() {
        assert!(Cli::try_parse_from(["qrpath", "encode", "hi", "--json"]).is_err());
    }

    #[test]
    fn grid_command_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pinch.txt");
        let output = dir.path().join("pinch.svg");
        std::fs::write(&input, "#.\n.#\n").unwrap();

        let cli = Cli::try_parse_from([
            OsStr::new("qrpath"),
            OsStr::new("grid"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
        ])
        .unwrap();
        let Command::Grid(args) = cli.command else {
            unreachable!("expected grid");
        };
        run_grid(&args).unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 2 2""#));
        assert!(svg.contains("<title>pinch</title>"));
    }

    #[test]
    fn grid_command_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            OsStr::new("qrpath"),
            OsStr::new("grid"),
            dir.path().join("missing.txt").as_os_str(),
        ])
        .unwrap();
        let Command::Grid(args) = cli.command else {
            unreachable!("expected grid");
        };
        assert!(matches!(run_grid(&args), Err(CliError::Io { .. })));
    }
}
