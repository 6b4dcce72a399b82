//! Local (spatially filtered) tone-mapping operators.
//!
//! Both operators split the image into a low-pass base layer and a detail
//! layer, compress only the base with [`gamma`], and re-add the detail:
//! `out = image - base + gamma(base)`. The Gaussian variant uses a linear
//! low-pass; the bilateral variant preserves edges in the base layer and so
//! avoids halos around strong gradients.

use crate::render::global::gamma;
use crate::types::{Error, HdrImage, Result};

fn check_sigma(sigma: f64) -> Result<()> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSigma(sigma))
    }
}

/// Render the low frequencies of a Gaussian-filtered image, keeping detail.
///
/// `sigma` is the standard deviation of the separable Gaussian low-pass in
/// pixels; `g` is the gamma applied to the base layer.
pub fn gaussian_detail(image: &HdrImage, sigma: f64, g: f64) -> Result<HdrImage> {
    check_sigma(sigma)?;
    let base = gaussian_blur(image, sigma)?;
    compose_detail(image, &base, g)
}

/// Render the low frequencies of a bilateral-filtered image, keeping detail.
///
/// `sigma_space` controls the spatial falloff of the kernel, `sigma_range`
/// the intensity falloff; `kernel` is the window width in pixels (odd, at
/// least 3). Borders are clamped.
pub fn bilateral_detail(
    image: &HdrImage,
    sigma_space: f64,
    sigma_range: f64,
    kernel: usize,
    g: f64,
) -> Result<HdrImage> {
    check_sigma(sigma_space)?;
    check_sigma(sigma_range)?;
    if kernel < 3 || kernel % 2 == 0 {
        return Err(Error::InvalidKernelSize(kernel));
    }
    let base = bilateral_filter(image, sigma_space, sigma_range, kernel);
    compose_detail(image, &base, g)
}

/// `image - base + gamma(base)` elementwise.
fn compose_detail(image: &HdrImage, base: &HdrImage, g: f64) -> Result<HdrImage> {
    let rendered_base = gamma(base, g)?;
    let data = image
        .data
        .iter()
        .zip(&base.data)
        .zip(&rendered_base.data)
        .map(|((v, b), rb)| v - b + rb)
        .collect();
    HdrImage::from_data(image.width, image.height, image.channels, data)
}

/// Separable Gaussian blur with clamped borders, per channel.
fn gaussian_blur(image: &HdrImage, sigma: f64) -> Result<HdrImage> {
    let kernel = gaussian_kernel(sigma);
    let horizontal = blur_axis(image, &kernel, true);
    Ok(blur_axis(&horizontal, &kernel, false))
}

/// Normalized 1-D Gaussian kernel truncated at three sigmas.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (3.0 * sigma).ceil().max(1.0) as usize;
    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let d = i as f64 - radius as f64;
            (-0.5 * (d / sigma) * (d / sigma)).exp()
        })
        .collect();
    let total: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= total;
    }
    kernel
}

fn blur_axis(image: &HdrImage, kernel: &[f64], horizontal: bool) -> HdrImage {
    let radius = kernel.len() / 2;
    let mut out = image.clone();
    for y in 0..image.height {
        for x in 0..image.width {
            let base = image.index(x, y);
            for c in 0..image.channels {
                let mut acc = 0.0;
                for (k, &weight) in kernel.iter().enumerate() {
                    let offset = k as isize - radius as isize;
                    let (sx, sy) = if horizontal {
                        (clamp_coord(x, offset, image.width), y)
                    } else {
                        (x, clamp_coord(y, offset, image.height))
                    };
                    acc += weight * image.data[image.index(sx, sy) + c];
                }
                out.data[base + c] = acc;
            }
        }
    }
    out
}

#[inline]
fn clamp_coord(position: usize, offset: isize, len: usize) -> usize {
    (position as isize + offset).clamp(0, len as isize - 1) as usize
}

/// Brute-force bilateral filter with clamped borders, per channel.
fn bilateral_filter(
    image: &HdrImage,
    sigma_space: f64,
    sigma_range: f64,
    kernel: usize,
) -> HdrImage {
    let half = (kernel / 2) as isize;

    // Spatial weights depend only on the window offset.
    let mut spatial = vec![0.0; kernel * kernel];
    for dy in -half..=half {
        for dx in -half..=half {
            let d2 = (dx * dx + dy * dy) as f64;
            let idx = ((dy + half) * kernel as isize + (dx + half)) as usize;
            spatial[idx] = (-0.5 * d2 / (sigma_space * sigma_space)).exp();
        }
    }

    let mut out = image.clone();
    for y in 0..image.height {
        for x in 0..image.width {
            let center = image.index(x, y);
            for c in 0..image.channels {
                let center_value = image.data[center + c];
                let mut acc = 0.0;
                let mut total = 0.0;
                for dy in -half..=half {
                    for dx in -half..=half {
                        let sx = clamp_coord(x, dx, image.width);
                        let sy = clamp_coord(y, dy, image.height);
                        let value = image.data[image.index(sx, sy) + c];

                        let diff = (value - center_value) / sigma_range;
                        let range = (-0.5 * diff * diff).exp();
                        let idx = ((dy + half) * kernel as isize + (dx + half)) as usize;
                        let weight = spatial[idx] * range;

                        acc += weight * value;
                        total += weight;
                    }
                }
                // The center weight is always 1, so total never vanishes.
                out.data[center + c] = acc / total;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(width: usize, height: usize, value: f64) -> HdrImage {
        HdrImage::from_data(width, height, 3, vec![value; width * height * 3]).unwrap()
    }

    #[test]
    fn test_gaussian_kernel_normalized() {
        let kernel = gaussian_kernel(2.0);
        let total: f64 = kernel.iter().sum();
        assert!((total - 1.0).abs() < 1.0e-12);
        assert_eq!(kernel.len(), 13); // radius 6
    }

    #[test]
    fn test_gaussian_detail_constant_image() {
        // Blurring a constant image is the identity, so the operator
        // reduces to plain gamma.
        let image = constant(6, 6, 0.25);
        let rendered = gaussian_detail(&image, 2.0, 0.5).unwrap();
        for v in &rendered.data {
            assert!((v - 0.5).abs() < 1.0e-9, "got {}", v);
        }
    }

    #[test]
    fn test_bilateral_detail_constant_image() {
        let image = constant(6, 6, 0.25);
        let rendered = bilateral_detail(&image, 0.1, 0.1, 5, 0.5).unwrap();
        for v in &rendered.data {
            assert!((v - 0.5).abs() < 1.0e-9, "got {}", v);
        }
    }

    #[test]
    fn test_gaussian_detail_tracks_gamma_on_smooth_images() {
        // Low-frequency content: the operator should land close to plain
        // gamma, the detail residual is small.
        let mut image = HdrImage::new(10, 10, 3).unwrap();
        for y in 0..10 {
            for x in 0..10 {
                let v = 0.1 + 0.08 * (x + y) as f64 / 2.0;
                let idx = image.index(x, y);
                for c in 0..3 {
                    image.data[idx + c] = v;
                }
            }
        }
        let rendered = gaussian_detail(&image, 2.0, 0.5).unwrap();
        let direct = gamma(&image, 0.5).unwrap();
        for (a, b) in rendered.data.iter().zip(&direct.data) {
            assert!((a - b).abs() < 0.4, "diff {}", (a - b).abs());
        }
    }

    #[test]
    fn test_parameter_faults() {
        let image = constant(4, 4, 0.5);
        assert!(matches!(
            gaussian_detail(&image, 0.0, 0.5).unwrap_err(),
            Error::InvalidSigma(_)
        ));
        assert!(matches!(
            bilateral_detail(&image, 1.0, -1.0, 5, 0.5).unwrap_err(),
            Error::InvalidSigma(_)
        ));
        assert!(matches!(
            bilateral_detail(&image, 1.0, 1.0, 4, 0.5).unwrap_err(),
            Error::InvalidKernelSize(4)
        ));
        assert!(matches!(
            bilateral_detail(&image, 1.0, 1.0, 1, 0.5).unwrap_err(),
            Error::InvalidKernelSize(1)
        ));
        // Gamma faults propagate from the base render.
        assert!(gaussian_detail(&image, 1.0, 1.5).is_err());
    }
}
