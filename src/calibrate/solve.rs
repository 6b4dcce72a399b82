//! Response-curve recovery via weighted, regularized least squares.
//!
//! Implements the Debevec-Malik calibration: pixel value `z` observed at
//! exposure time `dt` satisfies `g(z) = ln(E) + ln(dt)` for scene irradiance
//! `E`. Stacking that equation for every (exposure, pixel) observation,
//! pinning the curve's midpoint against its additive ambiguity, and
//! penalizing the curve's second derivative yields one over-determined
//! linear system in the unknowns `[g_0..g_{N-1}, lE_0..lE_{P-1}]`, solved in
//! a single least-squares pass.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::calibrate::validate_times;
use crate::calibrate::weights::WeightTable;
use crate::limits;
use crate::types::{Error, ExposureStack, RadianceMap, Result};

/// A fitted log-response curve, one value per possible intensity sample.
///
/// Defined only up to an additive constant; the solve resolves the
/// ambiguity by pinning the midpoint value to 0. Immutable once produced.
#[derive(Debug, Clone)]
pub struct ResponseCurve {
    values: Vec<f64>,
}

impl ResponseCurve {
    /// Wrap an externally stored curve (e.g. one fitted earlier).
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.len() < 3 {
            return Err(Error::InvalidDomainSize(values.len()));
        }
        Ok(Self { values })
    }

    /// The intensity domain size the curve was fitted for.
    pub fn domain_size(&self) -> usize {
        self.values.len()
    }

    /// The log-response values, indexed by intensity sample.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Log-response for one sample value.
    #[inline]
    pub fn log_response(&self, value: u16) -> f64 {
        self.values[value as usize]
    }
}

/// Fit the camera's log-response curve from an exposure stack.
///
/// `stack` holds one sample list per exposure (typically a subsample of the
/// full image; the system has one unknown per pixel position). `times` are
/// the exposure durations, parallel by index. `smoothness` scales the
/// second-derivative penalty on the curve; larger values force a smoother,
/// closer-to-linear curve. `domain_size` is the number of distinguishable
/// sample values (256 for 8-bit input) and must match `weights`.
///
/// Returns the fitted curve together with a coarse log-irradiance estimate
/// for the sampled pixels, a byproduct of the same solve. The coarse map
/// carries the stack's spatial shape; for the full-resolution image use
/// [`crate::reconstruct_radiance`] with the fitted curve.
pub fn solve_response(
    stack: &ExposureStack,
    times: &[f64],
    smoothness: f64,
    domain_size: usize,
    weights: &WeightTable,
) -> Result<(ResponseCurve, RadianceMap)> {
    validate_times(stack, times)?;
    if !(smoothness.is_finite() && smoothness > 0.0) {
        return Err(Error::InvalidSmoothness(smoothness));
    }
    if domain_size < 3 {
        return Err(Error::InvalidDomainSize(domain_size));
    }
    if weights.len() != domain_size {
        return Err(Error::WeightLengthMismatch {
            expected: domain_size,
            got: weights.len(),
        });
    }
    stack.check_domain(domain_size)?;

    let n = domain_size;
    let pixels = stack.pixel_count();
    let exposures = stack.exposure_count();

    // Data rows, one gauge row, one smoothness row per interior value.
    let rows = exposures * pixels + 1 + (n - 2);
    let cols = n + pixels;

    let entries = rows as u64 * cols as u64;
    if entries > limits::MAX_SYSTEM_ENTRIES {
        return Err(Error::LimitExceeded(format!(
            "least-squares system of {}x{} entries exceeds maximum {}; subsample the stack",
            rows,
            cols,
            limits::MAX_SYSTEM_ENTRIES
        )));
    }

    debug!(
        "solving response curve: {} rows x {} unknowns ({} exposures x {} pixels, domain {})",
        rows, cols, exposures, pixels, n
    );

    let mut a = DMatrix::<f64>::zeros(rows, cols);
    let mut b = DVector::<f64>::zeros(rows);

    // Data-fitting block: w(z) * (g[z] - lE[i]) = w(z) * ln(dt).
    let mut row = 0;
    for (j, samples) in stack.exposures().iter().enumerate() {
        let log_time = times[j].ln();
        for (i, &z) in samples.iter().enumerate() {
            let w = weights.get(z);
            a[(row, z as usize)] = w;
            a[(row, n + i)] = -w;
            b[row] = w * log_time;
            row += 1;
        }
    }

    // Gauge row: pin g at the midpoint to remove the additive ambiguity.
    a[(row, n / 2)] = 1.0;
    row += 1;

    // Smoothness block: lambda * w(z) * (g[z-1] - 2 g[z] + g[z+1]) = 0.
    for z in 1..n - 1 {
        let s = smoothness * weights.get(z as u16);
        a[(row, z - 1)] = s;
        a[(row, z)] = -2.0 * s;
        a[(row, z + 1)] = s;
        row += 1;
    }
    debug_assert_eq!(row, rows);

    // Plain SVD least squares; tolerant of rank-deficient or noisy systems.
    // No iterative refinement or outlier rejection, outliers are handled
    // only through the weighting.
    let svd = a.svd(true, true);
    let x = svd
        .solve(&b, 1.0e-12)
        .map_err(|msg| Error::SolveFailed(msg.into()))?;

    let curve = ResponseCurve {
        values: x.as_slice()[..n].to_vec(),
    };
    let coarse = RadianceMap::new(stack.shape(), x.as_slice()[n..].to_vec());

    Ok((curve, coarse))
}
