pub mod ecg;
pub mod resp;

use std::f64::consts::PI;

/// First-order RC high-pass.
pub(crate) fn single_pole_highpass(data: &[f64], fs: f64, cutoff: f64) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let dt = 1.0 / fs;
    let rc = 1.0 / (2.0 * PI * cutoff.max(0.01));
    let alpha = rc / (rc + dt);
    let mut out = Vec::with_capacity(data.len());
    let (mut prev_x, mut prev_y) = (data[0], 0.0);
    for &x in data {
        let y = alpha * (prev_y + x - prev_x);
        out.push(y);
        prev_x = x;
        prev_y = y;
    }
    out
}

/// First-order RC low-pass.
pub(crate) fn single_pole_lowpass(data: &[f64], fs: f64, cutoff: f64) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let dt = 1.0 / fs;
    let rc = 1.0 / (2.0 * PI * cutoff.max(0.01));
    let alpha = dt / (rc + dt);
    let mut out = Vec::with_capacity(data.len());
    let mut state = data[0];
    for &x in data {
        state += alpha * (x - state);
        out.push(state);
    }
    out
}

/// Centered moving mean; edge windows shrink to the available samples.
pub(crate) fn centered_mean(data: &[f64], win: usize) -> Vec<f64> {
    if data.is_empty() || win <= 1 {
        return data.to_vec();
    }
    let mut prefix = Vec::with_capacity(data.len() + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &x in data {
        acc += x;
        prefix.push(acc);
    }
    let half = win / 2;
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(data.len());
        out.push((prefix[end] - prefix[start]) / (end - start) as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowpass_settles_on_constant_input() {
        let data = vec![5.0; 64];
        let filtered = single_pole_lowpass(&data, 32.0, 1.0);
        assert_eq!(filtered.len(), 64);
        assert!((filtered[63] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn highpass_removes_constant_offset() {
        let data = vec![5.0; 256];
        let filtered = single_pole_highpass(&data, 32.0, 1.0);
        assert!(filtered[255].abs() < 1e-6);
    }

    #[test]
    fn centered_mean_preserves_length_and_smooths() {
        let data = [0.0, 0.0, 6.0, 0.0, 0.0];
        let smoothed = centered_mean(&data, 3);
        assert_eq!(smoothed.len(), 5);
        assert_eq!(smoothed[2], 2.0);
        assert_eq!(smoothed[0], 0.0);
    }
}
