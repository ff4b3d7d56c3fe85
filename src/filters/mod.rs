//! Filter modules for live camera frames.
//!
//! ## Supported Format
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! Channels are unpacked to 0.0-1.0 floats for the math and packed back with
//! clamping, so no stored channel ever leaves 0-255.
//!
//! ## Architecture
//!
//! - **Stateless** - Every filter is a function over borrowed buffers plus
//!   named constants (tap spacing, threshold, gains)
//! - **Sparse 3x3 taps** - Neighborhoods are 3x3 grids spaced several pixels
//!   apart; only the interior where every tap is in bounds is processed
//! - **Row-parallel** - Rows run on rayon and write back after the whole
//!   stage has been computed
//!
//! ## Filters
//!
//! - **Edges**: colorized edge magnitude into a separate destination
//! - **Cartoon**: edge mask into alpha, then premultiply in place

pub mod core;
pub mod edge;
pub mod cartoon;
pub mod select;
