use thiserror::Error;

/// Conditions that abort a mosaic run before any tile is requested.
///
/// These travel inside [`anyhow::Error`]; use `err.downcast_ref::<MosaicError>()` to
/// tell them apart from other failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MosaicError {
	#[error("invalid parameters: {0}")]
	InvalidParameters(String),

	#[error(
		"mosaic of {width}x{height} px ({:.1} MP) exceeds the budget of {:.1} MP, reduce the extent or the zoom level",
		*pixels as f64 / 1e6,
		*budget as f64 / 1e6
	)]
	CapacityExceeded {
		width: u64,
		height: u64,
		pixels: u64,
		budget: u64,
	},
}

impl MosaicError {
	pub fn invalid(msg: impl Into<String>) -> Self {
		MosaicError::InvalidParameters(msg.into())
	}
}

/// Per-cell failures. They leave a blank region on the canvas but never abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellFailureKind {
	/// The fetcher gave up on the cell (network error, HTTP status, retries exhausted).
	TileUnavailable,
	/// Bytes arrived but could not be decoded as an image.
	DecodeFailure,
}

impl CellFailureKind {
	pub fn as_str(&self) -> &str {
		match self {
			CellFailureKind::TileUnavailable => "tile unavailable",
			CellFailureKind::DecodeFailure => "decode failure",
		}
	}
}

impl std::fmt::Display for CellFailureKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
