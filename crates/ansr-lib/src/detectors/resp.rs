use log::debug;

use crate::detectors::{centered_mean, single_pole_lowpass};
use crate::error::DetectionError;

/// Breathing-rate capability, split into the two calls the feature layer
/// makes: clean the raw trace, then derive a per-sample rate series
/// (breaths per minute, one value per input sample).
///
/// Unlike beat detection, a rate failure here is terminal for the run.
pub trait RespirationEstimator {
    fn clean(&self, data: &[f64], fs: f64) -> Vec<f64>;
    fn instantaneous_rate(
        &self,
        cleaned: &[f64],
        fs: f64,
        time_window_s: u32,
    ) -> Result<Vec<f64>, DetectionError>;
}

/// Tuning for [`BreathCycleEstimator`].
#[derive(Debug, Clone, Copy)]
pub struct RespEstimatorConfig {
    /// Baseline drift below this frequency is removed (Hz).
    pub drift_cutoff_hz: f64,
    /// Smoothing cutoff above the respiration band (Hz).
    pub band_high_hz: f64,
    /// Minimum spacing between breath peaks (seconds).
    pub min_breath_gap_s: f64,
    /// Peaks below this fraction of the tallest peak are ignored.
    pub peak_floor: f64,
}

impl Default for RespEstimatorConfig {
    fn default() -> Self {
        Self {
            drift_cutoff_hz: 0.05,
            band_high_hz: 0.6,
            min_breath_gap_s: 2.0,
            peak_floor: 0.2,
        }
    }
}

/// Default estimator: detrend and band-limit the trace, find inhalation
/// peaks, then spread each breath-to-breath rate over the samples of its
/// cycle and smooth with a centered window.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreathCycleEstimator {
    pub config: RespEstimatorConfig,
}

impl BreathCycleEstimator {
    pub fn new(config: RespEstimatorConfig) -> Self {
        Self { config }
    }

    fn breath_peaks(&self, cleaned: &[f64], fs: f64) -> Vec<usize> {
        let gap = ((self.config.min_breath_gap_s * fs).round() as usize).max(1);
        let tallest = cleaned.iter().copied().fold(0.0_f64, f64::max);
        if tallest <= 0.0 {
            return Vec::new();
        }
        let floor = self.config.peak_floor * tallest;
        let mut peaks: Vec<usize> = Vec::new();
        for i in 1..cleaned.len().saturating_sub(1) {
            if cleaned[i] <= floor || cleaned[i] < cleaned[i - 1] || cleaned[i] < cleaned[i + 1] {
                continue;
            }
            if let Some(last) = peaks.last_mut() {
                if i - *last < gap {
                    // Two candidates inside one cycle: keep the taller.
                    if cleaned[i] > cleaned[*last] {
                        *last = i;
                    }
                    continue;
                }
            }
            peaks.push(i);
        }
        peaks
    }
}

impl RespirationEstimator for BreathCycleEstimator {
    fn clean(&self, data: &[f64], fs: f64) -> Vec<f64> {
        if data.is_empty() {
            return Vec::new();
        }
        let baseline = single_pole_lowpass(data, fs, self.config.drift_cutoff_hz);
        let detrended: Vec<f64> = data.iter().zip(&baseline).map(|(x, b)| x - b).collect();
        single_pole_lowpass(&detrended, fs, self.config.band_high_hz)
    }

    fn instantaneous_rate(
        &self,
        cleaned: &[f64],
        fs: f64,
        time_window_s: u32,
    ) -> Result<Vec<f64>, DetectionError> {
        if cleaned.is_empty() {
            return Ok(Vec::new());
        }
        let peaks = self.breath_peaks(cleaned, fs);
        if peaks.len() < 2 {
            return Err(DetectionError::TooFewBreaths { found: peaks.len() });
        }
        debug!("{} breath peaks over {} samples", peaks.len(), cleaned.len());

        let mut rate = vec![0.0; cleaned.len()];
        for pair in peaks.windows(2) {
            let brpm = 60.0 * fs / (pair[1] - pair[0]) as f64;
            for slot in &mut rate[pair[0]..pair[1]] {
                *slot = brpm;
            }
        }
        let first = 60.0 * fs / (peaks[1] - peaks[0]) as f64;
        for slot in &mut rate[..peaks[0]] {
            *slot = first;
        }
        let last = 60.0 * fs / (peaks[peaks.len() - 1] - peaks[peaks.len() - 2]) as f64;
        for slot in &mut rate[peaks[peaks.len() - 1]..] {
            *slot = last;
        }

        let win = ((time_window_s as f64) * fs) as usize;
        Ok(centered_mean(&rate, win))
    }
}
