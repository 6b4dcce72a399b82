//! Global (elementwise) tone-mapping operators.

use crate::types::{Error, HdrImage, Result};

/// Validate a gamma value, which must lie in the open interval (0, 1).
fn check_gamma(g: f64) -> Result<()> {
    if g.is_finite() && 0.0 < g && g < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidGamma(g))
    }
}

/// Render by raising every sample to the power `g`.
///
/// Works for any channel count. `g` must lie in (0, 1); values toward 0
/// compress the dynamic range harder.
pub fn gamma(image: &HdrImage, g: f64) -> Result<HdrImage> {
    check_gamma(g)?;
    let data = image.data.iter().map(|v| v.powf(g)).collect();
    HdrImage::from_data(image.width, image.height, image.channels, data)
}

/// Render by applying the gamma function to the luminance only.
///
/// Luminance is taken as `R + G + B`; each channel is scaled by the
/// compressed luminance over the original, preserving chroma ratios.
/// Requires a 3-channel image.
pub fn gamma_luminance(image: &HdrImage, g: f64) -> Result<HdrImage> {
    check_gamma(g)?;
    if image.channels != 3 {
        return Err(Error::ChannelMismatch {
            expected: 3,
            got: image.channels,
        });
    }

    let mut data = vec![0.0; image.data.len()];
    for (pixel, out) in image.data.chunks_exact(3).zip(data.chunks_exact_mut(3)) {
        let luminance = pixel[0] + pixel[1] + pixel[2];
        if luminance > 0.0 {
            let scale = luminance.powf(g) / luminance;
            out[0] = pixel[0] * scale;
            out[1] = pixel[1] * scale;
            out[2] = pixel[2] * scale;
        }
        // A black pixel carries no chroma; leave it black.
    }
    HdrImage::from_data(image.width, image.height, image.channels, data)
}

/// Render with a weighted sum of [`gamma_luminance`] and [`gamma`].
///
/// `blend` in [0, 1] sets the luminance share: 1 is pure luminance
/// rendering, 0 is pure per-channel gamma. Requires a 3-channel image.
pub fn gamma_blend(image: &HdrImage, blend: f64, g: f64) -> Result<HdrImage> {
    if !(blend.is_finite() && (0.0..=1.0).contains(&blend)) {
        return Err(Error::InvalidBlend(blend));
    }
    let luminance = gamma_luminance(image, g)?;
    let global = gamma(image, g)?;

    let data = luminance
        .data
        .iter()
        .zip(&global.data)
        .map(|(l, p)| blend * l + (1.0 - blend) * p)
        .collect();
    HdrImage::from_data(image.width, image.height, image.channels, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(width: usize, height: usize) -> HdrImage {
        HdrImage::from_data(width, height, 3, vec![1.0; width * height * 3]).unwrap()
    }

    #[test]
    fn test_gamma_matches_powf() {
        let image = HdrImage::from_data(2, 1, 1, vec![0.25, 0.81]).unwrap();
        let rendered = gamma(&image, 0.5).unwrap();
        assert!((rendered.data[0] - 0.5).abs() < 1.0e-12);
        assert!((rendered.data[1] - 0.9).abs() < 1.0e-12);
    }

    #[test]
    fn test_gamma_range_fault_names_interval() {
        let image = ones(2, 2);
        let err = gamma(&image, 2.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(0, 1)"), "message was: {}", msg);
        assert!(gamma(&image, 0.0).is_err());
        assert!(gamma(&image, 1.0).is_err());
        assert!(gamma(&image, f64::NAN).is_err());
    }

    #[test]
    fn test_gamma_luminance_on_white() {
        // All-ones image: luminance 3, so each channel becomes
        // sqrt(3) * (1/3) under g = 0.5.
        let rendered = gamma_luminance(&ones(4, 4), 0.5).unwrap();
        let expected = 3.0_f64.sqrt() / 3.0;
        for v in &rendered.data {
            assert!((v - expected).abs() < 1.0e-12, "got {}", v);
        }
    }

    #[test]
    fn test_gamma_luminance_needs_three_channels() {
        let image = HdrImage::from_data(2, 2, 1, vec![1.0; 4]).unwrap();
        let err = gamma_luminance(&image, 0.5).unwrap_err();
        assert!(matches!(err, Error::ChannelMismatch { expected: 3, got: 1 }));
    }

    #[test]
    fn test_gamma_luminance_black_pixel() {
        let image = HdrImage::from_data(1, 1, 3, vec![0.0, 0.0, 0.0]).unwrap();
        let rendered = gamma_luminance(&image, 0.5).unwrap();
        assert!(rendered.data.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_blend_endpoints() {
        let image = ones(3, 3);
        let lum = gamma_luminance(&image, 0.5).unwrap();
        let glob = gamma(&image, 0.5).unwrap();

        let at_one = gamma_blend(&image, 1.0, 0.5).unwrap();
        let at_zero = gamma_blend(&image, 0.0, 0.5).unwrap();
        for i in 0..image.data.len() {
            assert!((at_one.data[i] - lum.data[i]).abs() < 1.0e-12);
            assert!((at_zero.data[i] - glob.data[i]).abs() < 1.0e-12);
        }
    }

    #[test]
    fn test_blend_range_fault() {
        let err = gamma_blend(&ones(2, 2), 2.0, 0.5).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("[0, 1]"), "message was: {}", msg);
    }
}
