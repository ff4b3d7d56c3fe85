//! CamFX Rust Extensions
//!
//! Real-time camera frame filters implemented in Rust
//! with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Frames are RGBA with 8 bits per channel, shape (height, width, 4).
//! Channels are handled as 0.0-1.0 floats internally and packed back
//! with clamping.
//!
//! ## Filters
//! - **Edges**: reads a source frame, writes a colorized edge image into a
//!   separate destination of the same size
//! - **Cartoon**: two in-place stages, an edge mask written to alpha and
//!   a premultiply that burns the mask into the colors
//!
//! Frame capture, display, and filter selection UI belong to the host.

pub mod error;
pub mod filters;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, Result};
pub use filters::core::ProcessingMode;
pub use filters::select::{apply_filter, FrameFilter};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use ndarray::Array3;
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::cartoon;
    use crate::filters::core::ProcessingMode;
    use crate::filters::edge;
    use crate::filters::select::{self, FrameFilter};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    /// Run `op` on an owned copy of the frame with the GIL released.
    fn run_detached<'py, F>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        op: F,
    ) -> PyResult<Bound<'py, PyArray3<u8>>>
    where
        F: FnOnce(Array3<u8>) -> crate::Result<Array3<u8>> + Send,
    {
        let frame = image.as_array().to_owned();
        let result = py.allow_threads(move || op(frame))?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Edge Filter
    // ========================================================================

    /// Colorized edge visualization of an RGBA u8 frame.
    ///
    /// Pixels within the tap spacing of the frame edge keep the input.
    #[pyfunction]
    pub fn edges_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_detached(py, image, |frame| {
            edge::edges_rgba(frame.view(), ProcessingMode::Parallel)
        })
    }

    // ========================================================================
    // Cartoon Filter
    // ========================================================================

    /// Cartoon filter of an RGBA u8 frame. Output is fully opaque.
    #[pyfunction]
    pub fn cartoon_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run_detached(py, image, |mut frame| {
            cartoon::cartoon_rgba_inplace(frame.view_mut(), ProcessingMode::Parallel)?;
            Ok(frame)
        })
    }

    // ========================================================================
    // Filter Selection
    // ========================================================================

    /// Apply the filter at list position `index` (0 = none, 1 = edges, 2 = cartoon).
    #[pyfunction]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        index: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = FrameFilter::from_index(index)?;
        run_detached(py, image, move |frame| {
            select::apply_filter(frame.view(), filter, ProcessingMode::Parallel)
        })
    }

    /// Names of the selectable filters in list order.
    #[pyfunction]
    pub fn filter_names() -> Vec<&'static str> {
        FrameFilter::ALL.iter().map(|f| f.name()).collect()
    }

    /// CamFX Rust extension module
    #[pymodule]
    pub fn camfx_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(edges_rgba, m)?)?;
        m.add_function(wrap_pyfunction!(cartoon_rgba, m)?)?;
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;
        m.add_function(wrap_pyfunction!(filter_names, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::camfx_rust;
