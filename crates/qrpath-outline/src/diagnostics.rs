//! Render diagnostics: timing, counts, and other metrics for each stage.
//!
//! [`render_with_diagnostics`] runs the same stages as
//! [`render`](crate::render) and records how long each took and what it
//! produced. Useful for checking how grid size and rounding affect the
//! output.
//!
//! This crate does no I/O and does not read the system clock itself;
//! callers supply a [`Clock`]. Durations are serialized as fractional
//! seconds (`f64`) for JSON compatibility, since `std::time::Duration`
//! does not implement serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::{Contour, ContourPath, Outline, OutlineError, RenderConfig};
use crate::{smooth, trace, vertex};

/// Source of timestamps for stage timing.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time passed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDiagnostics {
    /// Stage 1: classification and vertex extraction.
    pub extraction: StageDiagnostics,
    /// Stage 2: contour tracing.
    pub tracing: StageDiagnostics,
    /// Stage 3: corner smoothing and path emission.
    pub smoothing: StageDiagnostics,
    /// Total wall-clock duration of the render (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: RenderSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Vertex extraction metrics.
    Extraction {
        /// Number of lattice points visited.
        lattice_points: u64,
        /// Number of boundary vertices emitted.
        vertex_count: usize,
        /// Vertices at diagonal pinch points.
        corner_count: usize,
    },
    /// Contour tracing metrics.
    Tracing {
        /// Number of contours found.
        contour_count: usize,
        /// Contours running clockwise on the canvas (holes).
        hole_count: usize,
        /// Minimum vertices in any single contour.
        min_contour_len: usize,
        /// Maximum vertices in any single contour.
        max_contour_len: usize,
        /// Mean vertices per contour.
        mean_contour_len: f64,
    },
    /// Corner smoothing metrics.
    Smoothing {
        /// Rounding factor used.
        rounding: f64,
        /// Number of paths emitted.
        path_count: usize,
        /// Straight segments across all paths.
        line_count: usize,
        /// Bezier segments across all paths.
        curve_count: usize,
    },
}

/// High-level summary counts for the whole render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSummary {
    /// Grid width in modules.
    pub grid_width: u32,
    /// Grid height in modules.
    pub grid_height: u32,
    /// Number of dark modules.
    pub dark_modules: usize,
    /// Number of contours traced.
    pub contour_count: usize,
    /// Total drawing commands emitted.
    pub command_count: usize,
}

impl RenderDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Render Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Grid: {}x{} ({} dark modules)",
            self.summary.grid_width, self.summary.grid_height, self.summary.dark_modules,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Vertex Extraction", &self.extraction),
            ("Contour Tracing", &self.tracing),
            ("Corner Smoothing", &self.smoothing),
        ];

        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Contours: {}  |  Path commands: {}",
            self.summary.contour_count, self.summary.command_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Extraction {
            lattice_points,
            vertex_count,
            corner_count,
        } => {
            format!("{lattice_points} lattice pts -> {vertex_count} vertices ({corner_count} corners)")
        }
        StageMetrics::Tracing {
            contour_count,
            hole_count,
            min_contour_len,
            max_contour_len,
            mean_contour_len,
        } => {
            format!(
                "{contour_count} contours, {hole_count} holes (min={min_contour_len} max={max_contour_len} mean={mean_contour_len:.1})",
            )
        }
        StageMetrics::Smoothing {
            rounding,
            path_count,
            line_count,
            curve_count,
        } => {
            format!("r={rounding:.2} {path_count} paths, {line_count} lines, {curve_count} curves")
        }
    }
}

/// Statistics for a set of contours.
struct ContourStats {
    holes: usize,
    min: usize,
    max: usize,
    mean: f64,
}

fn contour_stats(contours: &[Contour]) -> ContourStats {
    let total: usize = contours.iter().map(Contour::len).sum();
    let min = contours.iter().map(Contour::len).min().unwrap_or(0);
    let max = contours.iter().map(Contour::len).max().unwrap_or(0);
    let holes = contours
        .iter()
        .filter(|c| c.signed_area_doubled() > 0)
        .count();
    #[allow(clippy::cast_precision_loss)]
    let mean = if contours.is_empty() {
        0.0
    } else {
        total as f64 / contours.len() as f64
    };
    ContourStats {
        holes,
        min,
        max,
        mean,
    }
}

/// Run the render and collect per-stage diagnostics.
///
/// Produces the same [`Outline`] as [`render`](crate::render).
///
/// # Errors
///
/// Same as [`render`](crate::render).
pub fn render_with_diagnostics<C: Clock>(
    grid: &Grid,
    config: &RenderConfig,
    clock: &C,
) -> Result<(Outline, RenderDiagnostics), OutlineError> {
    config.validate()?;
    let total_start = clock.now();

    let start = clock.now();
    let vertices = vertex::extract_vertices(grid);
    let extraction = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Extraction {
            lattice_points: lattice_point_count(grid),
            vertex_count: vertices.len(),
            corner_count: vertices.iter().filter(|v| v.is_corner).count(),
        },
    };

    let start = clock.now();
    let contours = trace::trace_contours(&vertices)?;
    let stats = contour_stats(&contours);
    let tracing = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Tracing {
            contour_count: contours.len(),
            hole_count: stats.holes,
            min_contour_len: stats.min,
            max_contour_len: stats.max,
            mean_contour_len: stats.mean,
        },
    };

    let start = clock.now();
    let paths = smooth::smooth_contours(&contours, config.rounding);
    let smoothing = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Smoothing {
            rounding: config.rounding,
            path_count: paths.len(),
            line_count: paths.iter().map(ContourPath::line_count).sum(),
            curve_count: paths.iter().map(ContourPath::curve_count).sum(),
        },
    };

    let dimensions = grid.dimensions();
    let summary = RenderSummary {
        grid_width: dimensions.width,
        grid_height: dimensions.height,
        dark_modules: grid.dark_count(),
        contour_count: contours.len(),
        command_count: paths.iter().map(|p| p.commands().len()).sum(),
    };

    let diagnostics = RenderDiagnostics {
        extraction,
        tracing,
        smoothing,
        total_duration: clock.elapsed(&total_start),
        summary,
    };

    Ok((Outline { dimensions, paths }, diagnostics))
}

/// Lattice points visited by extraction (none for a blank grid).
fn lattice_point_count(grid: &Grid) -> u64 {
    if grid.is_blank() {
        return 0;
    }
    let side = |n: usize| u64::try_from(n).unwrap_or(u64::MAX).saturating_add(1);
    side(grid.width()).saturating_mul(side(grid.height()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Deterministic clock: every reading advances by one millisecond.
    struct TickClock {
        ticks: Cell<u64>,
    }

    impl TickClock {
        const fn new() -> Self {
            Self {
                ticks: Cell::new(0),
            }
        }
    }

    impl Clock for TickClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.ticks.get();
            self.ticks.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.now() - since)
        }
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        let ms = duration_ms(d);
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn contour_stats_empty() {
        let stats = contour_stats(&[]);
        assert_eq!(stats.holes, 0);
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 0);
        assert!((stats.mean - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn diagnostics_match_plain_render() {
        let grid: Grid = "###\n#.#\n###".parse().unwrap();
        let config = RenderConfig::default();
        let (outline, diag) = render_with_diagnostics(&grid, &config, &TickClock::new()).unwrap();
        assert_eq!(outline, crate::render(&grid, &config).unwrap());

        assert!(matches!(
            diag.extraction.metrics,
            StageMetrics::Extraction {
                lattice_points: 16,
                vertex_count: 16,
                corner_count: 0,
            }
        ));
        let StageMetrics::Tracing {
            contour_count,
            hole_count,
            min_contour_len,
            max_contour_len,
            ..
        } = diag.tracing.metrics
        else {
            unreachable!("expected tracing metrics");
        };
        assert_eq!(contour_count, 2);
        assert_eq!(hole_count, 1);
        assert_eq!(min_contour_len, 4);
        assert_eq!(max_contour_len, 12);
        assert_eq!(diag.summary.dark_modules, 8);
        assert_eq!(diag.summary.contour_count, 2);
    }

    #[test]
    fn stage_durations_come_from_clock() {
        let grid: Grid = "#".parse().unwrap();
        let (_, diag) =
            render_with_diagnostics(&grid, &RenderConfig::default(), &TickClock::new()).unwrap();
        // Each stage reads the clock twice, one tick apart.
        assert_eq!(diag.extraction.duration, Duration::from_millis(1));
        assert_eq!(diag.tracing.duration, Duration::from_millis(1));
        assert_eq!(diag.smoothing.duration, Duration::from_millis(1));
        assert!(diag.total_duration >= Duration::from_millis(6));
    }

    #[test]
    fn invalid_rounding_rejected_before_timing() {
        let grid: Grid = "#".parse().unwrap();
        let config = RenderConfig {
            rounding: 2.0,
            ..RenderConfig::default()
        };
        let result = render_with_diagnostics(&grid, &config, &TickClock::new());
        assert!(matches!(result, Err(OutlineError::InvalidConfig(_))));
    }

    #[test]
    fn report_produces_nonempty_string() {
        let grid: Grid = "#.\n.#".parse().unwrap();
        let (_, diag) =
            render_with_diagnostics(&grid, &RenderConfig::default(), &TickClock::new()).unwrap();
        let report = diag.report();
        assert!(report.contains("Render Diagnostics Report"));
        assert!(report.contains("Contour Tracing"));
        assert!(report.contains("2 corners"));
    }

    #[test]
    fn diagnostics_serialize_durations_as_seconds() {
        let grid: Grid = "#".parse().unwrap();
        let (_, diag) =
            render_with_diagnostics(&grid, &RenderConfig::default(), &TickClock::new()).unwrap();
        let json = serde_json::to_value(&diag).unwrap();
        assert!((json["extraction"]["duration"].as_f64().unwrap() - 0.001).abs() < 1e-12);
        let back: RenderDiagnostics = serde_json::from_value(json).unwrap();
        assert_eq!(back.summary.contour_count, 1);
    }
}
