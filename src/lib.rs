//! HDR radiance reconstruction from bracketed exposure stacks.
//!
//! Given several differently-exposed photographs of the same scene and their
//! exposure times, this crate recovers the camera's log-response curve
//! (Debevec-Malik radiometric calibration), rebuilds a per-pixel
//! log-irradiance map at full resolution, and renders the result back to a
//! displayable image with global and local tone-mapping operators.
//!
//! The pipeline:
//! - [`solve_response`] fits the response curve `g` from a (possibly
//!   subsampled) exposure stack by solving one weighted, regularized
//!   least-squares system.
//! - [`reconstruct_radiance`] combines every exposure of the full-resolution
//!   stack into a log-irradiance map using the fitted curve.
//! - [`render`] turns the exponentiated map into a displayable image.
//!
//! # Example
//!
//! ```ignore
//! use hdri::{solve_response, reconstruct_radiance, ExposureStack, WeightTable};
//!
//! let stack = ExposureStack::from_grid(width, height, samples)?;
//! let times = [1.0 / 60.0, 1.0 / 15.0, 1.0 / 4.0, 1.0];
//! let weights = WeightTable::tent(256)?;
//!
//! let (curve, _coarse) = solve_response(&stack, &times, 100.0, 256, &weights)?;
//! let radiance = reconstruct_radiance(&stack, &times, &curve, &weights)?;
//!
//! let image = hdri::HdrImage::from_data(width, height, 1, radiance.to_linear())?;
//! let ldr = hdri::render::gamma(&image, 0.5)?;
//! ```
//!
//! Multi-channel (RGB) input is handled by running the solver once per
//! channel; each channel's solve is fully independent.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calibrate;
pub mod render;
mod types;

// Re-export core types
pub use types::{Error, ExposureStack, HdrImage, RadianceMap, Result, SampleShape};

// Re-export the calibration entry points
pub use calibrate::reconstruct::reconstruct_radiance;
pub use calibrate::solve::{solve_response, ResponseCurve};
pub use calibrate::weights::WeightTable;

/// Safety limits for validation and allocation.
pub mod limits {
    /// Maximum total pixels per exposure (width * height).
    pub const MAX_TOTAL_PIXELS: u64 = 500_000_000; // 500 megapixels

    /// Maximum intensity domain size (16-bit samples).
    pub const MAX_DOMAIN_SIZE: usize = 1 << 16;

    /// Maximum number of f64 entries in the dense least-squares matrix.
    ///
    /// The solver allocates `rows * cols` doubles up front; stacks meant for
    /// curve fitting should be subsampled well below this.
    pub const MAX_SYSTEM_ENTRIES: u64 = 1 << 28; // 2 GiB of f64
}
