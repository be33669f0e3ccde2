use log::debug;

use crate::detectors::ecg::BeatDetector;
use crate::window::{chunk_ranges, window_count};

/// Candidates at or above this rate are discarded as implausible.
pub const MAX_PLAUSIBLE_BPM: f64 = 220.0;

/// One heart-rate value per window. A window whose detector call fails, or
/// whose candidate is implausible, repeats the previous window's value;
/// when the first window fails there is nothing to repeat and it gets NaN.
pub fn heart_rate_per_window(
    ecg: &[f64],
    fs: f64,
    n_samples: usize,
    detector: &dyn BeatDetector,
) -> Vec<f64> {
    let mut rates = Vec::with_capacity(window_count(ecg.len(), n_samples));
    for range in chunk_ranges(ecg.len(), n_samples) {
        let candidate = match detector.bpm(&ecg[range.clone()], fs) {
            Ok(bpm) if bpm < MAX_PLAUSIBLE_BPM => Some(bpm),
            Ok(bpm) => {
                debug!(
                    "window {}..{}: implausible rate {:.1} bpm discarded",
                    range.start, range.end, bpm
                );
                None
            }
            Err(err) => {
                debug!("window {}..{}: beat detection failed: {}", range.start, range.end, err);
                None
            }
        };
        let value = candidate.unwrap_or_else(|| rates.last().copied().unwrap_or(f64::NAN));
        rates.push(value);
    }
    rates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectionError;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedDetector {
        script: RefCell<VecDeque<Result<f64, DetectionError>>>,
    }

    impl ScriptedDetector {
        fn new(script: Vec<Result<f64, DetectionError>>) -> Self {
            Self {
                script: RefCell::new(script.into()),
            }
        }
    }

    impl BeatDetector for ScriptedDetector {
        fn bpm(&self, _chunk: &[f64], _fs: f64) -> Result<f64, DetectionError> {
            self.script
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(DetectionError::TooFewBeats { found: 0 }))
        }
    }

    fn run(script: Vec<Result<f64, DetectionError>>) -> Vec<f64> {
        let windows = script.len();
        let detector = ScriptedDetector::new(script);
        let ecg = vec![0.0; windows * 4];
        heart_rate_per_window(&ecg, 4.0, 4, &detector)
    }

    #[test]
    fn failed_first_window_is_nan() {
        let rates = run(vec![
            Err(DetectionError::TooFewBeats { found: 1 }),
            Ok(80.0),
        ]);
        assert!(rates[0].is_nan());
        assert_eq!(rates[1], 80.0);
    }

    #[test]
    fn failures_repeat_the_previous_value() {
        let rates = run(vec![
            Ok(72.0),
            Err(DetectionError::TooFewBeats { found: 0 }),
            Err(DetectionError::ChunkTooShort { samples: 3 }),
            Ok(68.0),
        ]);
        assert_eq!(rates, vec![72.0, 72.0, 72.0, 68.0]);
    }

    #[test]
    fn implausible_candidates_are_discarded() {
        let rates = run(vec![Ok(100.0), Ok(250.0), Ok(70.0)]);
        assert_eq!(rates, vec![100.0, 100.0, 70.0]);
    }

    #[test]
    fn plausibility_cut_is_exclusive_at_the_bound() {
        let rates = run(vec![Ok(60.0), Ok(MAX_PLAUSIBLE_BPM), Ok(219.9)]);
        assert_eq!(rates, vec![60.0, 60.0, 219.9]);
    }

    #[test]
    fn every_window_gets_a_value() {
        let rates = run(vec![
            Err(DetectionError::TooFewBeats { found: 0 }),
            Err(DetectionError::TooFewBeats { found: 0 }),
            Err(DetectionError::TooFewBeats { found: 0 }),
        ]);
        assert_eq!(rates.len(), 3);
        assert!(rates.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn short_final_window_is_still_scored() {
        let detector = ScriptedDetector::new(vec![Ok(60.0), Ok(66.0)]);
        let ecg = vec![0.0; 6];
        let rates = heart_rate_per_window(&ecg, 4.0, 4, &detector);
        assert_eq!(rates, vec![60.0, 66.0]);
    }
}
