//! Core types for calibration and reconstruction.

use thiserror::Error;

use crate::limits;

/// Errors that can occur during calibration, reconstruction or rendering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Exposure time count does not match the number of exposures.
    #[error("exposure time count mismatch: {times} times for {exposures} exposures")]
    ExposureCountMismatch {
        /// Number of exposure times supplied.
        times: usize,
        /// Number of exposures in the stack.
        exposures: usize,
    },

    /// An exposure's sample count differs from the stack's spatial shape.
    #[error("exposure {exposure} has {got} samples, expected {expected}")]
    SampleCountMismatch {
        /// Index of the offending exposure.
        exposure: usize,
        /// Samples implied by the stack's shape.
        expected: usize,
        /// Samples actually present.
        got: usize,
    },

    /// A stack needs at least two exposures to constrain the solve.
    #[error("need at least 2 exposures, got {0}")]
    TooFewExposures(usize),

    /// An exposure time must be positive and finite (its log is taken).
    #[error("exposure time at index {index} must be positive finite, got {value}")]
    InvalidExposureTime {
        /// Index into the exposure-time slice.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// The smoothness constant must be positive and finite.
    #[error("smoothness must be positive finite, got {0}")]
    InvalidSmoothness(f64),

    /// The intensity domain needs a midpoint and interior values.
    #[error("intensity domain size must be at least 3, got {0}")]
    InvalidDomainSize(usize),

    /// A weight table's length does not match the intensity domain.
    #[error("weight table has {got} entries, expected {expected}")]
    WeightLengthMismatch {
        /// Entries required by the intensity domain.
        expected: usize,
        /// Entries actually present.
        got: usize,
    },

    /// A weight value is negative or non-finite.
    #[error("weight at index {index} must be non-negative finite, got {value}")]
    InvalidWeight {
        /// Index into the weight table.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// An observed sample lies outside the configured intensity domain.
    #[error("sample value {value} outside intensity domain of size {domain_size}")]
    SampleOutOfRange {
        /// The offending sample.
        value: u16,
        /// The configured domain size.
        domain_size: usize,
    },

    /// Gamma for rendering must lie in the open interval (0, 1).
    #[error("gamma must be in the open interval (0, 1), got {0}")]
    InvalidGamma(f64),

    /// Blend weight for rendering must lie in the closed interval [0, 1].
    #[error("blend weight must be in the closed interval [0, 1], got {0}")]
    InvalidBlend(f64),

    /// A filter sigma must be positive and finite.
    #[error("sigma must be positive finite, got {0}")]
    InvalidSigma(f64),

    /// A bilateral kernel must be odd and at least 3 pixels wide.
    #[error("kernel size must be odd and at least 3, got {0}")]
    InvalidKernelSize(usize),

    /// An operation requires a specific channel count.
    #[error("expected a {expected}-channel image, got {got} channels")]
    ChannelMismatch {
        /// Channels required by the operation.
        expected: usize,
        /// Channels actually present.
        got: usize,
    },

    /// Image dimensions are invalid (zero pixels or channels).
    #[error("invalid image dimensions: {width}x{height}x{channels}")]
    InvalidDimensions {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
        /// Samples per pixel.
        channels: usize,
    },

    /// Pixel data is the wrong size for the declared shape.
    #[error("invalid pixel data: {0}")]
    InvalidPixelData(String),

    /// Input exceeds safety limits.
    #[error("input exceeds safety limit: {0}")]
    LimitExceeded(String),

    /// The least-squares solve failed (e.g. SVD non-convergence).
    #[error("least-squares solve failed: {0}")]
    SolveFailed(String),
}

/// Result type for calibration and rendering operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Spatial shape of one exposure's pixel-indexed sample collection.
///
/// A stack is either a flat list of pixel positions or a 2-D grid; output
/// maps carry the same shape. The solver and reconstructor never branch on
/// this internally, it only governs reshaping at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleShape {
    /// A flat list of pixel positions.
    Flat(usize),
    /// A 2-D spatial grid.
    Grid {
        /// Grid width in pixels.
        width: usize,
        /// Grid height in pixels.
        height: usize,
    },
}

impl SampleShape {
    /// Number of distinct pixel positions in the shape.
    pub fn pixel_count(&self) -> usize {
        match *self {
            Self::Flat(len) => len,
            Self::Grid { width, height } => width * height,
        }
    }
}

/// An ordered stack of differently-exposed samples of one scene.
///
/// Every exposure shares the same spatial shape; the stack only stores the
/// samples, exposure times stay with the caller and are passed by index
/// alongside the stack.
#[derive(Debug, Clone)]
pub struct ExposureStack {
    shape: SampleShape,
    exposures: Vec<Vec<u16>>,
}

impl ExposureStack {
    /// Create a stack from already-flattened per-exposure sample lists.
    ///
    /// Every exposure must have the same number of samples and there must be
    /// at least two exposures.
    pub fn from_flat(exposures: Vec<Vec<u16>>) -> Result<Self> {
        let pixels = exposures.first().map(Vec::len).unwrap_or(0);
        let shape = SampleShape::Flat(pixels);
        Self::validate(shape, &exposures)?;
        Ok(Self { shape, exposures })
    }

    /// Create a stack of `width * height` grids, one sample list per
    /// exposure in row-major order.
    pub fn from_grid(width: usize, height: usize, exposures: Vec<Vec<u16>>) -> Result<Self> {
        let shape = SampleShape::Grid { width, height };
        Self::validate(shape, &exposures)?;
        Ok(Self { shape, exposures })
    }

    fn validate(shape: SampleShape, exposures: &[Vec<u16>]) -> Result<()> {
        if exposures.len() < 2 {
            return Err(Error::TooFewExposures(exposures.len()));
        }

        let pixels = shape.pixel_count();
        if pixels == 0 {
            return Err(Error::InvalidPixelData("empty exposure".into()));
        }
        if pixels as u64 > limits::MAX_TOTAL_PIXELS {
            return Err(Error::LimitExceeded(format!(
                "total pixels {} exceeds maximum {}",
                pixels,
                limits::MAX_TOTAL_PIXELS
            )));
        }

        for (index, samples) in exposures.iter().enumerate() {
            if samples.len() != pixels {
                return Err(Error::SampleCountMismatch {
                    exposure: index,
                    expected: pixels,
                    got: samples.len(),
                });
            }
        }

        Ok(())
    }

    /// Spatial shape shared by every exposure.
    pub fn shape(&self) -> SampleShape {
        self.shape
    }

    /// Number of exposures in the stack.
    pub fn exposure_count(&self) -> usize {
        self.exposures.len()
    }

    /// Number of distinct pixel positions per exposure.
    pub fn pixel_count(&self) -> usize {
        self.shape.pixel_count()
    }

    /// The per-exposure sample lists, in stack order.
    pub fn exposures(&self) -> &[Vec<u16>] {
        &self.exposures
    }

    /// Verify every sample lies inside the intensity domain.
    ///
    /// Sample values index into the response curve and weight table, so an
    /// out-of-domain value is surfaced here rather than clamped.
    pub fn check_domain(&self, domain_size: usize) -> Result<()> {
        for samples in &self.exposures {
            for &value in samples {
                if value as usize >= domain_size {
                    return Err(Error::SampleOutOfRange { value, domain_size });
                }
            }
        }
        Ok(())
    }
}

/// A per-pixel log-irradiance map.
///
/// Produced coarsely by the solver for the sampled pixels and at full
/// resolution by the reconstructor; carries the spatial shape of the stack
/// it came from.
#[derive(Debug, Clone)]
pub struct RadianceMap {
    shape: SampleShape,
    values: Vec<f64>,
}

impl RadianceMap {
    pub(crate) fn new(shape: SampleShape, values: Vec<f64>) -> Self {
        debug_assert_eq!(shape.pixel_count(), values.len());
        Self { shape, values }
    }

    /// Spatial shape of the map.
    pub fn shape(&self) -> SampleShape {
        self.shape
    }

    /// Log-irradiance values in pixel order (row-major for grids).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Exponentiate into linear radiance, for handoff to the render
    /// operators.
    pub fn to_linear(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.exp()).collect()
    }
}

/// A floating-point image with interleaved channels, row-major.
///
/// This is the shape the tone-mapping operators consume and produce; the
/// reconstructed radiance map converts into it via [`RadianceMap::to_linear`].
#[derive(Debug, Clone)]
pub struct HdrImage {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Samples per pixel.
    pub channels: usize,
    /// Pixel data, `height * width * channels` values.
    pub data: Vec<f64>,
}

impl HdrImage {
    /// Create a zero-filled image with the given dimensions.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self> {
        Self::validate_dimensions(width, height, channels)?;
        let len = width * height * channels;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0.0; len],
        })
    }

    /// Create an image from existing interleaved data.
    pub fn from_data(width: usize, height: usize, channels: usize, data: Vec<f64>) -> Result<Self> {
        Self::validate_dimensions(width, height, channels)?;
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(Error::InvalidPixelData(format!(
                "expected {} values for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    fn validate_dimensions(width: usize, height: usize, channels: usize) -> Result<()> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(Error::InvalidDimensions {
                width,
                height,
                channels,
            });
        }
        let total = width as u64 * height as u64;
        if total > limits::MAX_TOTAL_PIXELS {
            return Err(Error::LimitExceeded(format!(
                "total pixels {} exceeds maximum {}",
                total,
                limits::MAX_TOTAL_PIXELS
            )));
        }
        Ok(())
    }

    /// Flat index of the first channel of pixel `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }
}
