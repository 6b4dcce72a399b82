//! Confidence weighting over the intensity domain.

use crate::limits;
use crate::types::{Error, Result};

/// A per-intensity confidence table, length equal to the intensity domain.
///
/// Samples near the sensor's clipping extremes carry little information
/// about the response, so they get low weight; mid-range samples get high
/// weight. The same table must be used for curve fitting and for
/// reconstruction.
#[derive(Debug, Clone)]
pub struct WeightTable {
    values: Vec<f64>,
}

impl WeightTable {
    /// The default symmetric tent: `w(z) = min(z, N-1-z) + 1`.
    ///
    /// Rises linearly from 1 at the extremes to a peak at the midpoint. The
    /// `+1` floor keeps every weight strictly positive, so no data row
    /// degenerates to zero against the smoothness regularizer.
    pub fn tent(domain_size: usize) -> Result<Self> {
        check_domain_size(domain_size)?;
        let top = domain_size - 1;
        let values = (0..domain_size)
            .map(|z| z.min(top - z) as f64 + 1.0)
            .collect();
        Ok(Self { values })
    }

    /// A caller-supplied table, one non-negative finite weight per intensity
    /// value.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        check_domain_size(values.len())?;
        for (index, &value) in values.iter().enumerate() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidWeight { index, value });
            }
        }
        Ok(Self { values })
    }

    /// Number of entries, i.e. the intensity domain size.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Weight for one sample value.
    ///
    /// The sample must lie inside the domain; both calibration entry points
    /// verify this up front via `ExposureStack::check_domain`.
    #[inline]
    pub fn get(&self, value: u16) -> f64 {
        self.values[value as usize]
    }
}

fn check_domain_size(domain_size: usize) -> Result<()> {
    // A midpoint and at least one interior value must exist.
    if domain_size < 3 {
        return Err(Error::InvalidDomainSize(domain_size));
    }
    if domain_size > limits::MAX_DOMAIN_SIZE {
        return Err(Error::LimitExceeded(format!(
            "domain size {} exceeds maximum {}",
            domain_size,
            limits::MAX_DOMAIN_SIZE
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tent_shape() {
        let w = WeightTable::tent(256).unwrap();
        assert_eq!(w.len(), 256);
        // Floor of 1 at both extremes.
        assert_eq!(w.get(0), 1.0);
        assert_eq!(w.get(255), 1.0);
        // Peak around the midpoint, symmetric.
        assert_eq!(w.get(127), 128.0);
        assert_eq!(w.get(128), 128.0);
        assert_eq!(w.get(10), w.get(245));
    }

    #[test]
    fn test_tent_odd_domain() {
        let w = WeightTable::tent(5).unwrap();
        assert_eq!(w.get(0), 1.0);
        assert_eq!(w.get(2), 3.0);
        assert_eq!(w.get(4), 1.0);
    }

    #[test]
    fn test_rejects_tiny_domain() {
        assert!(WeightTable::tent(2).is_err());
        assert!(WeightTable::from_values(vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = WeightTable::from_values(vec![1.0, -0.5, 1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidWeight { index: 1, .. }));
        assert!(WeightTable::from_values(vec![1.0, f64::NAN, 1.0]).is_err());
        // Zero weights are allowed; only the default tent guarantees a floor.
        assert!(WeightTable::from_values(vec![0.0, 1.0, 0.0]).is_ok());
    }
}
