//! WebAssembly exports for the camera filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen and take
//! frames as flat RGBA byte arrays (length = width * height * 4), the
//! layout of canvas `ImageData`.

use ndarray::{Array3, ArrayView3, ArrayViewMut3};
use wasm_bindgen::prelude::*;

use crate::error::{FilterError, Result};
use crate::filters::cartoon::cartoon_rgba_inplace;
use crate::filters::core::{ensure_flat_len, ProcessingMode};
use crate::filters::edge::edges_rgba;
use crate::filters::select::{apply_filter, FrameFilter};

// Browsers run a single thread unless a rayon pool is explicitly set up.
const MODE: ProcessingMode = ProcessingMode::Sequential;

impl From<FilterError> for JsValue {
    fn from(err: FilterError) -> JsValue {
        JsError::new(&err.to_string()).into()
    }
}

fn invalid_dimensions(len: usize, width: usize, height: usize) -> FilterError {
    FilterError::InvalidDimensions { width, height, len }
}

fn frame_view(data: &[u8], width: usize, height: usize) -> Result<ArrayView3<'_, u8>> {
    let len = data.len();
    ensure_flat_len(len, width, height)?;
    ArrayView3::from_shape((height, width, 4), data)
        .map_err(|_| invalid_dimensions(len, width, height))
}

fn frame_view_mut(data: &mut [u8], width: usize, height: usize) -> Result<ArrayViewMut3<'_, u8>> {
    let len = data.len();
    ensure_flat_len(len, width, height)?;
    ArrayViewMut3::from_shape((height, width, 4), data)
        .map_err(|_| invalid_dimensions(len, width, height))
}

fn into_flat(frame: Array3<u8>) -> Vec<u8> {
    frame.into_raw_vec_and_offset().0
}

// ============================================================================
// Edge Filter
// ============================================================================

/// Colorized edge visualization.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes
/// * `width` - Frame width in pixels
/// * `height` - Frame height in pixels
///
/// # Returns
/// Flat array of RGBA bytes; the border keeps the input pixels
#[wasm_bindgen]
pub fn edges_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
) -> std::result::Result<Vec<u8>, JsValue> {
    let frame = frame_view(data, width, height)?;
    Ok(into_flat(edges_rgba(frame, MODE)?))
}

// ============================================================================
// Cartoon Filter
// ============================================================================

/// Cartoon filter, applied in place on the given bytes.
#[wasm_bindgen]
pub fn cartoon_rgba_wasm(
    data: &mut [u8],
    width: usize,
    height: usize,
) -> std::result::Result<(), JsValue> {
    let frame = frame_view_mut(data, width, height)?;
    cartoon_rgba_inplace(frame, MODE)?;
    Ok(())
}

// ============================================================================
// Filter Selection
// ============================================================================

/// Apply the filter at list position `index` (0 = none, 1 = edges, 2 = cartoon).
#[wasm_bindgen]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    index: usize,
) -> std::result::Result<Vec<u8>, JsValue> {
    let filter = FrameFilter::from_index(index)?;
    let frame = frame_view(data, width, height)?;
    Ok(into_flat(apply_filter(frame, filter, MODE)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_view_rejects_overflowing_dimensions() {
        let data = [0u8; 16];
        let err = frame_view(&data, usize::MAX / 2, 3).unwrap_err();
        assert!(matches!(err, FilterError::InvalidDimensions { len: 16, height: 3, .. }));

        let mut data = [0u8; 16];
        assert!(frame_view_mut(&mut data, 3, usize::MAX / 2).is_err());
    }

    #[test]
    fn test_frame_view_shape() {
        let data = [7u8; 2 * 3 * 4];
        let view = frame_view(&data, 2, 3).unwrap();
        assert_eq!(view.dim(), (3, 2, 4));
    }
}
