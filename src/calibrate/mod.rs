//! Radiometric calibration: response-curve fitting and irradiance
//! reconstruction.
//!
//! [`solve::solve_response`] recovers the camera's log-response curve from a
//! stack of differently-exposed samples by solving one weighted, regularized
//! least-squares system. [`reconstruct::reconstruct_radiance`] then combines
//! all exposures into a full-resolution log-irradiance map using the fitted
//! curve. Both share the confidence weighting defined in [`weights`]; using
//! different weight tables for fitting and reconstruction silently degrades
//! accuracy, so callers should build one [`weights::WeightTable`] and pass it
//! to both.

pub mod reconstruct;
pub mod solve;
pub mod weights;

use crate::types::{Error, ExposureStack, Result};

/// Validate the exposure-time slice against the stack before any numeric
/// work: one positive finite duration per exposure, associated by index.
pub(crate) fn validate_times(stack: &ExposureStack, times: &[f64]) -> Result<()> {
    if times.len() != stack.exposure_count() {
        return Err(Error::ExposureCountMismatch {
            times: times.len(),
            exposures: stack.exposure_count(),
        });
    }
    for (index, &value) in times.iter().enumerate() {
        if !(value.is_finite() && value > 0.0) {
            return Err(Error::InvalidExposureTime { index, value });
        }
    }
    Ok(())
}
