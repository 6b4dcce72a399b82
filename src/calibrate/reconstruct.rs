//! Full-resolution irradiance reconstruction from a known response curve.

use log::debug;

use crate::calibrate::validate_times;
use crate::calibrate::weights::WeightTable;
use crate::calibrate::solve::ResponseCurve;
use crate::types::{Error, ExposureStack, RadianceMap, Result};

/// Recombine all exposures into a per-pixel log-irradiance map.
///
/// Unlike the solver's coarse byproduct this is a direct closed-form
/// weighted average, independent of which pixels were used to fit the
/// curve, so it runs at full image resolution: for each pixel position,
/// `lE = sum_j w(z_j) * (g(z_j) - ln(dt_j)) / sum_j w(z_j)` over the
/// exposures `j`.
///
/// `weights` must be the same table the curve was fitted with; a different
/// table silently degrades accuracy rather than failing.
pub fn reconstruct_radiance(
    stack: &ExposureStack,
    times: &[f64],
    curve: &ResponseCurve,
    weights: &WeightTable,
) -> Result<RadianceMap> {
    validate_times(stack, times)?;
    if weights.len() != curve.domain_size() {
        return Err(Error::WeightLengthMismatch {
            expected: curve.domain_size(),
            got: weights.len(),
        });
    }
    stack.check_domain(curve.domain_size())?;

    let pixels = stack.pixel_count();
    debug!(
        "reconstructing radiance: {} pixels over {} exposures",
        pixels,
        stack.exposure_count()
    );

    let log_times: Vec<f64> = times.iter().map(|t| t.ln()).collect();

    let mut values = vec![0.0; pixels];
    for (i, out) in values.iter_mut().enumerate() {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (samples, &log_time) in stack.exposures().iter().zip(&log_times) {
            let z = samples[i];
            let w = weights.get(z);
            numerator += w * (curve.log_response(z) - log_time);
            denominator += w;
        }
        // A pixel clipped identically in every exposure carries no usable
        // signal; substitute 1 for the denominator instead of dividing by
        // zero, leaving the (zero) numerator as the estimate.
        if denominator == 0.0 {
            denominator = 1.0;
        }
        *out = numerator / denominator;
    }

    Ok(RadianceMap::new(stack.shape(), values))
}
