//! qrpath-export: Pure format serializers (sans-IO)
//!
//! Converts rendered outlines into output formats. Currently supports
//! SVG.

pub mod svg;

pub use svg::{SvgMetadata, build_path_data, render_svg, to_svg};
