//! Common test utilities for synthetic exposure-stack generation.
//!
//! These helpers build bracketed stacks programmatically from known scene
//! radiances, so every test has a ground truth to compare against.

#![allow(dead_code)]

use hdri::ExposureStack;

/// Expose a flat list of scene radiances at the given times with an ideal
/// linear sensor: `z = round(E * t)`, clamped to the intensity domain.
pub fn proportional_stack(
    radiances: &[f64],
    times: &[f64],
    domain_size: usize,
) -> ExposureStack {
    let top = (domain_size - 1) as f64;
    let exposures = times
        .iter()
        .map(|t| {
            radiances
                .iter()
                .map(|e| (e * t).round().clamp(0.0, top) as u16)
                .collect()
        })
        .collect();
    ExposureStack::from_flat(exposures).unwrap()
}

/// Same sensor model, but laid out on a `width x height` grid.
pub fn proportional_grid(
    width: usize,
    height: usize,
    radiances: &[f64],
    times: &[f64],
    domain_size: usize,
) -> ExposureStack {
    assert_eq!(radiances.len(), width * height);
    let top = (domain_size - 1) as f64;
    let exposures = times
        .iter()
        .map(|t| {
            radiances
                .iter()
                .map(|e| (e * t).round().clamp(0.0, top) as u16)
                .collect()
        })
        .collect();
    ExposureStack::from_grid(width, height, exposures).unwrap()
}

/// Expose base values by adding a per-exposure offset (no scaling), clamped
/// to the domain. Paired with times `t_j = exp(slope * offset_j)` this
/// admits an exactly linear log-response.
pub fn offset_stack(values: &[u16], offsets: &[i32], domain_size: usize) -> ExposureStack {
    let top = (domain_size - 1) as i32;
    let exposures = offsets
        .iter()
        .map(|o| {
            values
                .iter()
                .map(|&v| (v as i32 + o).clamp(0, top) as u16)
                .collect()
        })
        .collect();
    ExposureStack::from_flat(exposures).unwrap()
}

/// A deterministic ground-truth radiance field in `[low, high]`.
///
/// Uses a small LCG so tests stay reproducible without a rand dependency.
pub fn synthetic_radiances(count: usize, low: f64, high: f64) -> Vec<f64> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let unit = ((state >> 33) as f64) / ((1u64 << 31) as f64);
            low + unit * (high - low)
        })
        .collect()
}
