//! SVG export serializer.
//!
//! Converts a rendered [`Outline`] into an SVG string using the [`svg`]
//! crate for document construction, XML escaping, and path data
//! formatting.
//!
//! All contours are concatenated into a single `<path>` element. Outer
//! boundaries and holes wind in opposite directions, so the default
//! `nonzero` fill rule leaves holes empty.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements for
//! accessibility and to help file managers identify exported files.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::Text;
use svg::node::Value;
use svg::node::element::path::Data;
use svg::node::element::{Description, Path, Title};

use qrpath_outline::{ContourPath, Grid, Outline, OutlineError, PathCommand, RenderConfig};

/// Metadata to embed in the SVG document.
///
/// Both fields are optional.  When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the encoded payload.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the render parameters.
    pub description: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from contour paths.
///
/// Contours are emitted in order, each starting with `M` and ending
/// with `z`. Returns an empty string when there is nothing to draw.
///
/// Coordinates are rounded to `f32` precision by the [`svg`] crate, so
/// fillet control points lose digits beyond roughly the seventh
/// significant one (about 1e-5 module on a 177-module code).
///
/// # Examples
///
/// ```
/// use qrpath_outline::{ContourPath, PathCommand, Point};
/// use qrpath_export::build_path_data;
///
/// let square = ContourPath::new(vec![
///     PathCommand::MoveTo(Point::new(1.0, 1.0)),
///     PathCommand::LineTo(Point::new(1.0, 0.0)),
///     PathCommand::LineTo(Point::new(0.0, 0.0)),
///     PathCommand::LineTo(Point::new(0.0, 1.0)),
///     PathCommand::Close,
/// ]);
/// let d = build_path_data(&[square]);
/// assert!(d.starts_with("M1,1 L1,0 L0,0 L0,1"));
/// ```
#[must_use]
pub fn build_path_data(paths: &[ContourPath]) -> String {
    let mut data = Data::new();
    for command in paths.iter().flat_map(ContourPath::commands) {
        data = match *command {
            PathCommand::MoveTo(p) => data.move_to((p.x, p.y)),
            PathCommand::LineTo(p) => data.line_to((p.x, p.y)),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                data.cubic_curve_to((ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y))
            }
            PathCommand::Close => data.close(),
        };
    }
    String::from(Value::from(data))
}

/// Serialize an outline into an SVG document string.
///
/// The `viewBox` is `0 0 W H` from [`Outline::dimensions`], one unit per
/// module, with no explicit `width`/`height` so the drawing scales to
/// its container. Every contour goes into a single `<path>` filled with
/// `fill_color`, which is embedded as given and never interpreted. An
/// empty outline gives an `<svg>` with no `<path>`.
///
/// No XML declaration is emitted.
///
/// # Examples
///
/// ```
/// use qrpath_outline::{Grid, RenderConfig, render};
/// use qrpath_export::{SvgMetadata, to_svg};
///
/// let grid: Grid = "#".parse().unwrap();
/// let outline = render(&grid, &RenderConfig::default()).unwrap();
/// let metadata = SvgMetadata {
///     title: Some("one module"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&outline, "#112233", &metadata);
/// assert!(svg.contains(r#"viewBox="0 0 1 1""#));
/// assert!(svg.contains(r##"fill="#112233""##));
/// assert!(svg.contains("<title>one module</title>"));
/// ```
#[must_use]
pub fn to_svg(outline: &Outline, fill_color: &str, metadata: &SvgMetadata<'_>) -> String {
    let w = outline.dimensions.width;
    let h = outline.dimensions.height;
    let mut doc = Document::new().set("viewBox", (0, 0, w, h));

    // Optional <title> element
    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    // Optional <desc> element
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    let d = build_path_data(&outline.paths);
    if !d.is_empty() {
        doc = doc.add(Path::new().set("d", d).set("fill", fill_color));
    }

    doc.to_string()
}

/// Render `grid` and serialize the result in one step.
///
/// Uses [`RenderConfig::fill_color`] for the fill.
///
/// # Errors
///
/// Returns whatever [`qrpath_outline::render`] returns.
pub fn render_svg(
    grid: &Grid,
    config: &RenderConfig,
    metadata: &SvgMetadata<'_>,
) -> Result<String, OutlineError> {
    let outline = qrpath_outline::render(grid, config)?;
    Ok(to_svg(&outline, &config.fill_color, metadata))
}
