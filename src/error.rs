//! Error types for the camera filters.

use thiserror::Error;

/// Errors raised by the filter entry points.
///
/// The per-pixel math itself is total; every variant here is a contract
/// violation caught before any pixel is touched.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Expected an RGBA buffer of shape (height, width, 4), got {shape:?}")]
    InvalidShape { shape: Vec<usize> },

    #[error("Raster size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid raster dimensions: {width}x{height} RGBA does not fit {len} bytes")]
    InvalidDimensions {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Unknown filter index: {0}")]
    UnknownFilter(usize),
}

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_message() {
        let err = FilterError::SizeMismatch {
            expected: (20, 20),
            actual: (20, 19),
        };
        assert_eq!(
            err.to_string(),
            "Raster size mismatch: expected (20, 20), got (20, 19)"
        );
    }

    #[test]
    fn test_unknown_filter_message() {
        assert_eq!(FilterError::UnknownFilter(7).to_string(), "Unknown filter index: 7");
    }
}
