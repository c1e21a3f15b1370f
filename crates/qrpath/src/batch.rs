//! Batch mode: one SVG per CSV row.
//!
//! Each row's payload is QR-encoded, outlined, filled with the colour of
//! its role and written to `<output_dir>/<role>/<payload>.svg`, with
//! both components passed through [`safe_filename`]. Rows are processed
//! in order; the first failing row stops the batch.

use std::fs;
use std::path::{Path, PathBuf};

use qrpath_export::{SvgMetadata, to_svg};
use qrpath_outline::diagnostics::{Clock, RenderDiagnostics, render_with_diagnostics};
use qrpath_outline::{Grid, RenderConfig};

use crate::encode::{EncodeOptions, encode};
use crate::error::CliError;
use crate::naming::safe_filename;
use crate::palette::Palette;
use crate::records::{Record, records};

/// Default batch input file.
pub const DEFAULT_INPUT: &str = "salida.csv";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "QR";

/// Everything a batch run needs besides the input path.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Rounding, plus the fill for roles missing from `palette`.
    pub render: RenderConfig,
    /// QR encoding settings.
    pub encode: EncodeOptions,
    /// Per-role fill colours.
    pub palette: Palette,
    /// Root of the output tree.
    pub output_dir: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            encode: EncodeOptions::default(),
            palette: Palette::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// One SVG file written by a batch run.
#[derive(Debug, Clone)]
pub struct Written {
    /// CSV line the file came from.
    pub row: u64,
    /// Where the file was written.
    pub path: PathBuf,
    /// Size of the SVG document in bytes.
    pub bytes: usize,
    /// Render diagnostics for this row.
    pub diagnostics: RenderDiagnostics,
}

/// Render `grid` to an SVG document, collecting diagnostics.
///
/// # Errors
///
/// Returns [`CliError::Outline`] if the configuration is invalid or
/// rendering fails.
pub fn render_document<C: Clock>(
    grid: &Grid,
    config: &RenderConfig,
    metadata: &SvgMetadata<'_>,
    clock: &C,
) -> Result<(String, RenderDiagnostics), CliError> {
    let (outline, diagnostics) = render_with_diagnostics(grid, config, clock)?;
    Ok((to_svg(&outline, &config.fill_color, metadata), diagnostics))
}

/// Run a batch over the CSV at `input`.
///
/// Output files that already exist are overwritten. Returns the written
/// files in row order.
///
/// # Errors
///
/// Returns [`CliError::MissingInput`] if `input` does not exist,
/// [`CliError::Outline`] if the render configuration is invalid, and
/// [`CliError::Row`] wrapping the cause when a row fails.
pub fn run<C: Clock>(
    input: &Path,
    config: &BatchConfig,
    clock: &C,
) -> Result<Vec<Written>, CliError> {
    if !input.exists() {
        return Err(CliError::MissingInput {
            path: input.to_path_buf(),
        });
    }
    config.render.validate()?;

    let contents = fs::read(input).map_err(CliError::io(input))?;
    let mut written = Vec::new();
    for record in records(&contents) {
        let record = record?;
        let row = record.line;
        let file = process_record(&record, config, clock).map_err(|e| CliError::Row {
            row,
            source: Box::new(e),
        })?;
        written.push(file);
    }
    Ok(written)
}

fn process_record<C: Clock>(
    record: &Record,
    config: &BatchConfig,
    clock: &C,
) -> Result<Written, CliError> {
    let fill_color = config
        .palette
        .get(&record.role)
        .unwrap_or(config.render.fill_color.as_str());
    let render = RenderConfig {
        fill_color: fill_color.to_owned(),
        ..config.render.clone()
    };

    let grid = encode(&record.payload, &config.encode)?;
    let (svg, diagnostics) = render_document(&grid, &render, &SvgMetadata::default(), clock)?;

    let dir = config.output_dir.join(safe_filename(&record.role));
    fs::create_dir_all(&dir).map_err(CliError::io(&dir))?;
    let path = dir.join(format!("{}.svg", safe_filename(&record.payload)));
    fs::write(&path, &svg).map_err(CliError::io(&path))?;

    Ok(Written {
        row: record.line,
        path,
        bytes: svg.len(),
        diagnostics,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// Clock that never advances.
    struct FrozenClock;

    impl Clock for FrozenClock {
        type Instant = ();

        fn now(&self) -> Self::Instant {}

        fn elapsed(&self, _since: &()) -> Duration {
            Duration::ZERO
        }
    }

    fn setup(csv: &str) -> (tempfile::TempDir, PathBuf, BatchConfig) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("salida.csv");
        fs::write(&input, csv).unwrap();
        let config = BatchConfig {
            output_dir: dir.path().join("QR"),
            ..BatchConfig::default()
        };
        (dir, input, config)
    }

    #[test]
    fn writes_one_svg_per_row() {
        let (_dir, input, config) = setup(
            "tipo;valor\nhacker;https://example.com/a\nvisitante;hola mundo\n",
        );
        let written = run(&input, &config, &FrozenClock).unwrap();
        assert_eq!(written.len(), 2);

        let first = config.output_dir.join("hacker/https_example_com_a.svg");
        let second = config.output_dir.join("visitante/hola_mundo.svg");
        assert_eq!(written[0].path, first);
        assert_eq!(written[1].path, second);
        assert_eq!(written[0].row, 2);

        let svg = fs::read_to_string(&first).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.len(), written[0].bytes);
    }

    #[test]
    fn role_selects_fill_color() {
        let (_dir, input, config) = setup("tipo;valor\nMENTOR;x\nvisitante;y\n");
        run(&input, &config, &FrozenClock).unwrap();

        let mentor = fs::read_to_string(config.output_dir.join("MENTOR/x.svg")).unwrap();
        assert!(mentor.contains(r##"fill="#F2F1F2""##));
        let other = fs::read_to_string(config.output_dir.join("visitante/y.svg")).unwrap();
        assert!(other.contains(r##"fill="#000000""##));
    }

    #[test]
    fn default_fill_comes_from_render_config() {
        let (_dir, input, mut config) = setup("tipo;valor\nvisitante;y\n");
        config.render.fill_color = "navy".to_owned();
        run(&input, &config, &FrozenClock).unwrap();
        let svg = fs::read_to_string(config.output_dir.join("visitante/y.svg")).unwrap();
        assert!(svg.contains(r#"fill="navy""#));
    }

    #[test]
    fn output_uses_quiet_zone_in_view_box() {
        let (_dir, input, config) = setup("tipo;valor\nhacker;hi\n");
        let written = run(&input, &config, &FrozenClock).unwrap();
        let svg = fs::read_to_string(&written[0].path).unwrap();
        // Version 1 (21 modules) plus one quiet module on each side.
        assert!(svg.contains(r#"viewBox="0 0 23 23""#));
    }

    #[test]
    fn short_rows_are_skipped() {
        let (_dir, input, config) = setup("tipo;valor\nsolo\nhacker;a\n");
        let written = run(&input, &config, &FrozenClock).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].row, 3);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&dir.path().join("nope.csv"), &BatchConfig::default(), &FrozenClock);
        assert!(matches!(result, Err(CliError::MissingInput { .. })));
    }

    #[test]
    fn invalid_rounding_fails_before_writing() {
        let (_dir, input, mut config) = setup("tipo;valor\nhacker;a\n");
        config.render.rounding = 3.0;
        let result = run(&input, &config, &FrozenClock);
        assert!(matches!(result, Err(CliError::Outline(_))));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn failing_row_stops_batch_with_row_number() {
        let long = "x".repeat(5000);
        let (_dir, input, config) = setup(&format!("tipo;valor\nhacker;a\nhacker;{long}\nhacker;b\n"));
        let err = run(&input, &config, &FrozenClock).unwrap_err();
        assert!(matches!(err, CliError::Row { row: 3, .. }), "got {err:?}");
        assert!(err.to_string().starts_with("row 3: "));
        assert!(config.output_dir.join("hacker/a.svg").exists());
        assert!(!config.output_dir.join("hacker/b.svg").exists());
    }

    #[test]
    fn failing_row_after_blank_lines_reports_physical_line() {
        let long = "x".repeat(5000);
        let (_dir, input, config) =
            setup(&format!("tipo;valor\n\nhacker;a\n\n\nhacker;{long}\n"));
        let err = run(&input, &config, &FrozenClock).unwrap_err();
        assert!(matches!(err, CliError::Row { row: 6, .. }), "got {err:?}");
        assert!(err.to_string().starts_with("row 6: "));
    }

    #[test]
    fn render_document_matches_export() {
        let grid: Grid = "#.\n.#".parse().unwrap();
        let config = RenderConfig::default();
        let (svg, diagnostics) =
            render_document(&grid, &config, &SvgMetadata::default(), &FrozenClock).unwrap();
        let expected =
            qrpath_export::render_svg(&grid, &config, &SvgMetadata::default()).unwrap();
        assert_eq!(svg, expected);
        assert_eq!(diagnostics.summary.contour_count, 2);
    }
}
