//! Tone-mapping operators: render an HDR radiance image to displayable
//! range.
//!
//! These consume the exponentiated radiance map (see
//! [`crate::RadianceMap::to_linear`]) wrapped in an [`crate::HdrImage`].
//! Global operators apply one elementwise transform everywhere; local
//! operators first split the image into low and high spatial frequencies
//! and compress only the low frequencies, preserving detail.

mod global;
mod local;

pub use global::{gamma, gamma_blend, gamma_luminance};
pub use local::{bilateral_detail, gaussian_detail};
