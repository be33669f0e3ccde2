use crate::detectors::resp::RespirationEstimator;
use crate::error::DetectionError;
use crate::window::mean_per_window;

/// One breathing-rate value per window: clean the whole trace, derive the
/// per-sample rate, then average each window. Estimator failure is returned
/// to the caller, not patched over.
pub fn breathing_rate_per_window(
    resp: &[f64],
    fs: f64,
    time_window_s: u32,
    n_samples: usize,
    estimator: &dyn RespirationEstimator,
) -> Result<Vec<f64>, DetectionError> {
    let cleaned = estimator.clean(resp, fs);
    let rate = estimator.instantaneous_rate(&cleaned, fs, time_window_s)?;
    if rate.len() != resp.len() {
        return Err(DetectionError::RateLengthMismatch {
            expected: resp.len(),
            got: rate.len(),
        });
    }
    Ok(mean_per_window(&rate, n_samples))
}
