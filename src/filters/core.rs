//! Core utilities shared by the camera filters.
//!
//! This module provides:
//! - 8888 pixel unpacking/packing (u8 <-> normalized f32)
//! - Small RGB vector helpers (length, dot)
//! - 3x3 neighborhood tap sampling
//! - Interior range and buffer shape checks
//! - Row and pixel parallel execution via rayon

use std::ops::Range;

use ndarray::{ArrayView3, ArrayViewMut1, ArrayViewMut3, Axis, Zip};
use rayon::prelude::*;

use crate::error::{FilterError, Result};

/// Number of channels in every buffer these filters accept (R, G, B, A).
pub const RGBA_CHANNELS: usize = 4;

// ============================================================================
// Pixel Codec
// ============================================================================

/// Unpack a u8 channel to 0.0-1.0.
#[inline]
pub fn unpack_channel(v: u8) -> f32 {
    v as f32 / 255.0
}

/// Pack a float channel to u8.
///
/// Clamps to 0.0-1.0 first, then rounds half up.
#[inline]
pub fn pack_channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Unpack the color channels of a pixel.
#[inline]
pub fn unpack_rgb(px: [u8; 4]) -> [f32; 3] {
    [unpack_channel(px[0]), unpack_channel(px[1]), unpack_channel(px[2])]
}

/// Unpack all four channels of a pixel.
#[inline]
pub fn unpack_rgba(px: [u8; 4]) -> [f32; 4] {
    [
        unpack_channel(px[0]),
        unpack_channel(px[1]),
        unpack_channel(px[2]),
        unpack_channel(px[3]),
    ]
}

/// Pack a float color (clamped per channel) into a pixel.
#[inline]
pub fn pack_rgba(color: [f32; 4]) -> [u8; 4] {
    [
        pack_channel(color[0]),
        pack_channel(color[1]),
        pack_channel(color[2]),
        pack_channel(color[3]),
    ]
}

/// Read the pixel at `(x, y)`.
#[inline]
pub fn read_pixel(buffer: &ArrayView3<u8>, x: usize, y: usize) -> [u8; 4] {
    [
        buffer[[y, x, 0]],
        buffer[[y, x, 1]],
        buffer[[y, x, 2]],
        buffer[[y, x, 3]],
    ]
}

/// Write the pixel at `(x, y)`.
#[inline]
pub fn write_pixel(buffer: &mut ArrayViewMut3<u8>, x: usize, y: usize, px: [u8; 4]) {
    for (c, v) in px.into_iter().enumerate() {
        buffer[[y, x, c]] = v;
    }
}

// ============================================================================
// Vector Helpers
// ============================================================================

#[inline]
pub fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean length of an RGB triple.
#[inline]
pub fn length(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

// ============================================================================
// Neighborhood Sampling
// ============================================================================

/// Sample a 3x3 grid of taps spaced `offset` pixels apart around `(x, y)`.
///
/// Taps are flattened x-major: index `xx * 3 + yy` holds the pixel at
/// `(x + (xx - 1) * offset, y + (yy - 1) * offset)`. The caller keeps
/// `(x, y)` inside [`interior`] so every tap is in bounds.
#[inline]
pub fn sample_taps(src: &ArrayView3<u8>, x: usize, y: usize, offset: usize) -> [[f32; 3]; 9] {
    let mut taps = [[0.0f32; 3]; 9];
    for xx in 0..3 {
        for yy in 0..3 {
            let sx = x + xx * offset - offset;
            let sy = y + yy * offset - offset;
            taps[xx * 3 + yy] = unpack_rgb(read_pixel(src, sx, sy));
        }
    }
    taps
}

/// Coordinates along one axis that are at least `border` pixels from both ends.
///
/// Empty when `extent <= 2 * border`.
#[inline]
pub fn interior(extent: usize, border: usize) -> Range<usize> {
    border..extent.saturating_sub(border).max(border)
}

// ============================================================================
// Shape Checks
// ============================================================================

/// Ensure a buffer shape is (height, width, 4).
pub fn ensure_rgba(shape: &[usize]) -> Result<()> {
    if shape.len() != 3 || shape[2] != RGBA_CHANNELS {
        return Err(FilterError::InvalidShape {
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

/// Ensure two RGBA buffers have identical dimensions.
pub fn ensure_same_size(expected: &[usize], actual: &[usize]) -> Result<()> {
    ensure_rgba(expected)?;
    ensure_rgba(actual)?;
    if expected[..2] != actual[..2] {
        return Err(FilterError::SizeMismatch {
            expected: (expected[1], expected[0]),
            actual: (actual[1], actual[0]),
        });
    }
    Ok(())
}

/// Byte length of a flat RGBA buffer, `None` if it overflows `usize`.
#[inline]
pub fn flat_len(width: usize, height: usize) -> Option<usize> {
    width.checked_mul(height)?.checked_mul(RGBA_CHANNELS)
}

/// Ensure a flat RGBA byte buffer holds exactly `width * height * 4` bytes.
pub fn ensure_flat_len(len: usize, width: usize, height: usize) -> Result<()> {
    match flat_len(width, height) {
        Some(expected) if expected == len => Ok(()),
        _ => Err(FilterError::InvalidDimensions { width, height, len }),
    }
}

// ============================================================================
// Processing Mode
// ============================================================================

/// How a filter schedules its per-row work.
///
/// All modes produce bit-identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel processing on the global rayon pool
    #[default]
    Parallel,
    /// Parallel with a dedicated pool of the given size.
    ///
    /// The pool is built per call; wrap multi-stage work in [`install`]
    /// so the stages share one pool.
    ///
    /// [`install`]: ProcessingMode::install
    ParallelWith(usize),
}

impl ProcessingMode {
    fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
        Ok(rayon::ThreadPoolBuilder::new().num_threads(threads).build()?)
    }

    /// Run `op` with the pool this mode calls for.
    ///
    /// `ParallelWith` builds its pool once and hands `op` the `Parallel`
    /// mode, which runs on the installed pool. Other modes pass through.
    pub fn install<R, F>(self, op: F) -> Result<R>
    where
        R: Send,
        F: FnOnce(ProcessingMode) -> R + Send,
    {
        match self {
            ProcessingMode::ParallelWith(threads) => {
                let pool = Self::build_pool(threads)?;
                Ok(pool.install(|| op(ProcessingMode::Parallel)))
            }
            mode => Ok(op(mode)),
        }
    }

    /// Evaluate `f` for every row index and collect the results in order.
    ///
    /// Rows only read shared input; results are returned for the caller to
    /// write back once every row has finished.
    pub fn map_rows<T, F>(self, rows: Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => Ok(rows.map(f).collect()),
            ProcessingMode::Parallel => Ok(rows.into_par_iter().map(f).collect()),
            ProcessingMode::ParallelWith(threads) => {
                let pool = Self::build_pool(threads)?;
                Ok(pool.install(|| rows.into_par_iter().map(f).collect()))
            }
        }
    }

    /// Apply `f` to every pixel of an RGBA buffer independently.
    pub fn for_each_pixel<F>(self, mut buffer: ArrayViewMut3<u8>, f: F) -> Result<()>
    where
        F: Fn(ArrayViewMut1<u8>) + Sync + Send,
    {
        let pixels = Zip::from(buffer.lanes_mut(Axis(2)));
        match self {
            ProcessingMode::Sequential => pixels.for_each(f),
            ProcessingMode::Parallel => pixels.par_for_each(f),
            ProcessingMode::ParallelWith(threads) => {
                let pool = Self::build_pool(threads)?;
                pool.install(|| pixels.par_for_each(f));
            }
        }
        Ok(())
    }
}
