//! Payload to module grid, via the `qrcode` crate.

use qrcode::types::{Color, QrError};
use qrcode::{EcLevel, QrCode};
use qrpath_outline::{Grid, GridError};

/// How payloads are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Error correction level.
    pub ec_level: EcLevel,
    /// Light modules added on every side.
    pub quiet_zone: usize,
}

impl EncodeOptions {
    /// Default error correction: highest, so the code survives damage.
    pub const DEFAULT_EC_LEVEL: EcLevel = EcLevel::H;

    /// Default quiet zone, in modules.
    pub const DEFAULT_QUIET_ZONE: usize = 1;
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ec_level: Self::DEFAULT_EC_LEVEL,
            quiet_zone: Self::DEFAULT_QUIET_ZONE,
        }
    }
}

/// Errors that can occur while encoding a payload.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The QR encoder rejected the payload (typically too long).
    #[error("QR encoding failed: {0}")]
    Qr(#[from] QrError),

    /// The padded grid could not be built.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Encode `payload` as a QR code and return its module grid, quiet zone
/// included.
///
/// Uses the smallest QR version that fits the payload at the requested
/// error correction level.
///
/// # Errors
///
/// Returns [`EncodeError::Qr`] if the payload does not fit any version.
pub fn encode(payload: &str, options: &EncodeOptions) -> Result<Grid, EncodeError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), options.ec_level)?;
    let width = code.width();
    let colors = code.to_colors();
    let grid = Grid::from_fn(width, width, |col, row| {
        matches!(colors[row * width + col], Color::Dark)
    })?;
    Ok(grid.with_margin(options.quiet_zone)?)
}
