use log::debug;

use crate::detectors::{single_pole_highpass, single_pole_lowpass};
use crate::error::DetectionError;

/// Beat-rate capability: one average bpm estimate per ECG chunk.
///
/// The feature layer treats implementations as black boxes. An error marks
/// the chunk as failed; it never aborts the run.
pub trait BeatDetector {
    fn bpm(&self, chunk: &[f64], fs: f64) -> Result<f64, DetectionError>;
}

/// Tuning for [`EnvelopeBeatDetector`].
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeDetectorConfig {
    /// High-pass cutoff below the QRS band (Hz).
    pub lowcut_hz: f64,
    /// Low-pass cutoff above the QRS band (Hz).
    pub highcut_hz: f64,
    /// Moving integration window (seconds).
    pub integration_window_s: f64,
    /// Refractory period between candidate beats (seconds).
    pub min_rr_s: f64,
    /// Position of the adaptive threshold between the noise and signal levels.
    pub threshold_scale: f64,
    /// Shortest chunk the detector accepts (seconds).
    pub min_chunk_s: f64,
}

impl Default for EnvelopeDetectorConfig {
    fn default() -> Self {
        Self {
            lowcut_hz: 5.0,
            highcut_hz: 15.0,
            integration_window_s: 0.150,
            min_rr_s: 0.250,
            threshold_scale: 0.5,
            min_chunk_s: 2.0,
        }
    }
}

/// Envelope-threshold beat detector in the Pan-Tompkins family: bandpass,
/// differentiate, square, integrate, then walk an adaptive threshold with a
/// refractory period. Reports the mean beat rate of the chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeBeatDetector {
    pub config: EnvelopeDetectorConfig,
}

impl EnvelopeBeatDetector {
    pub fn new(config: EnvelopeDetectorConfig) -> Self {
        Self { config }
    }

    fn beat_indices(&self, chunk: &[f64], fs: f64) -> Vec<usize> {
        let cfg = &self.config;
        let band = {
            let hp = single_pole_highpass(chunk, fs, cfg.lowcut_hz);
            single_pole_lowpass(&hp, fs, cfg.highcut_hz)
        };

        // Slope energy: squared first difference, then integrated.
        let mut envelope = vec![0.0; band.len()];
        for i in 1..band.len() {
            let d = band[i] - band[i - 1];
            envelope[i] = d * d;
        }
        let win = ((cfg.integration_window_s * fs).round() as usize).max(1);
        let envelope = trailing_mean(&envelope, win);

        if envelope.iter().copied().fold(0.0_f64, f64::max) <= 0.0 {
            return Vec::new();
        }

        let refractory = ((cfg.min_rr_s * fs).round() as usize).max(1);
        let warmup = envelope.len().min((fs as usize).max(1));
        let seed = envelope[..warmup].iter().sum::<f64>() / warmup as f64;
        let mut signal_level = seed;
        let mut noise_level = 0.5 * seed;
        let mut beats: Vec<usize> = Vec::new();
        for (i, &sample) in envelope.iter().enumerate() {
            let threshold =
                noise_level + cfg.threshold_scale * (signal_level - noise_level).max(0.0);
            let clear_of_last = beats.last().map_or(true, |&last| i - last >= refractory);
            if sample > threshold && sample > 0.0 && clear_of_last {
                beats.push(i);
                signal_level = 0.125 * sample + 0.875 * signal_level;
            } else {
                noise_level = 0.125 * sample + 0.875 * noise_level;
            }
        }
        beats
    }
}

impl BeatDetector for EnvelopeBeatDetector {
    fn bpm(&self, chunk: &[f64], fs: f64) -> Result<f64, DetectionError> {
        let min_len = ((self.config.min_chunk_s * fs) as usize).max(2);
        if chunk.len() < min_len {
            return Err(DetectionError::ChunkTooShort {
                samples: chunk.len(),
            });
        }
        let beats = self.beat_indices(chunk, fs);
        if beats.len() < 2 {
            return Err(DetectionError::TooFewBeats {
                found: beats.len(),
            });
        }
        let spans = beats.len() - 1;
        let mean_rr = (beats[spans] - beats[0]) as f64 / spans as f64 / fs;
        debug!(
            "{} beats over {} samples, mean RR {:.3}s",
            beats.len(),
            chunk.len(),
            mean_rr
        );
        Ok(60.0 / mean_rr)
    }
}

fn trailing_mean(data: &[f64], win: usize) -> Vec<f64> {
    if data.is_empty() || win <= 1 {
        return data.to_vec();
    }
    let mut out = Vec::with_capacity(data.len());
    let mut acc = 0.0;
    for (i, &sample) in data.iter().enumerate() {
        acc += sample;
        if i >= win {
            acc -= data[i - win];
        }
        out.push(acc / win.min(i + 1) as f64);
    }
    out
}
