use log::{debug, info};
use std::path::PathBuf;

use crate::detectors::ecg::{BeatDetector, EnvelopeBeatDetector};
use crate::detectors::resp::{BreathCycleEstimator, RespirationEstimator};
use crate::error::{ConfigError, PipelineError, WeightsError};
use crate::features::heart::heart_rate_per_window;
use crate::features::resp::breathing_rate_per_window;
use crate::io::csv::read_recording;
use crate::normalize::normalize_column;
use crate::score::{combine, Weights};
use crate::signal::{FeatureTable, Recording, ScoredTable};
use crate::window::{mean_per_window, start_times, window_count};

/// Where the recording lives and how to segment it.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    /// Samples per second of every channel (Hz).
    pub sample_rate: u32,
    /// Window length in seconds.
    pub time_window: u32,
}

impl PipelineConfig {
    /// Samples per window.
    pub fn n_samples(&self) -> usize {
        self.sample_rate as usize * self.time_window as usize
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::BadSampleRate(self.sample_rate));
        }
        if self.time_window == 0 {
            return Err(ConfigError::BadTimeWindow(self.time_window));
        }
        if !self.data_path.exists() {
            return Err(ConfigError::MissingDataPath(self.data_path.clone()));
        }
        Ok(())
    }
}

/// Entry stage. Each transition consumes the stage and returns the next, so
/// the load → extract → normalize → score order is fixed at compile time and
/// a finished run cannot be driven again.
pub struct Pipeline {
    config: PipelineConfig,
    weights: Weights,
    beat: Box<dyn BeatDetector>,
    resp: Box<dyn RespirationEstimator>,
}

impl Pipeline {
    /// Validate the configuration and set up default detectors and weights.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            weights: Weights::default(),
            beat: Box::new(EnvelopeBeatDetector::default()),
            resp: Box::new(BreathCycleEstimator::default()),
        })
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_beat_detector(mut self, detector: Box<dyn BeatDetector>) -> Self {
        self.beat = detector;
        self
    }

    pub fn with_respiration_estimator(mut self, estimator: Box<dyn RespirationEstimator>) -> Self {
        self.resp = estimator;
        self
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Swap in a new weight set; a rejected candidate leaves the current
    /// set in place.
    pub fn change_weights(&mut self, entries: &[(String, f64)]) -> Result<(), WeightsError> {
        self.weights = Weights::from_entries(entries)?;
        debug!(
            "weights set to ECG={} GSR={} RESP={}",
            self.weights.ecg(),
            self.weights.gsr(),
            self.weights.resp()
        );
        Ok(())
    }

    /// Read the recording from disk.
    pub fn load(self) -> Result<LoadedPipeline, PipelineError> {
        let recording = read_recording(&self.config.data_path)?;
        info!(
            "loaded {} samples from {}",
            recording.len(),
            self.config.data_path.display()
        );
        Ok(LoadedPipeline {
            config: self.config,
            weights: self.weights,
            beat: self.beat,
            resp: self.resp,
            recording,
        })
    }

    /// Drive all stages to the scored table.
    pub fn run(self) -> Result<ScoredTable, PipelineError> {
        Ok(self.load()?.extract()?.normalize().score())
    }
}

/// Recording in memory, measures not yet derived.
pub struct LoadedPipeline {
    config: PipelineConfig,
    weights: Weights,
    beat: Box<dyn BeatDetector>,
    resp: Box<dyn RespirationEstimator>,
    recording: Recording,
}

impl LoadedPipeline {
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Derive the per-window measures: heart rate from ECG, breathing rate
    /// from RESP, mean level from GSR, window-start timestamps from TIME.
    pub fn extract(self) -> Result<ExtractedPipeline, PipelineError> {
        let n_samples = self.config.n_samples();
        let fs = self.config.sample_rate as f64;
        debug!(
            "extracting {} windows of {} samples",
            window_count(self.recording.len(), n_samples),
            n_samples
        );
        let ecg = heart_rate_per_window(&self.recording.ecg, fs, n_samples, self.beat.as_ref());
        let resp = breathing_rate_per_window(
            &self.recording.resp,
            fs,
            self.config.time_window,
            n_samples,
            self.resp.as_ref(),
        )?;
        let gsr = mean_per_window(&self.recording.gsr, n_samples);
        let time = start_times(&self.recording.time, n_samples);
        debug_assert!(
            time.len() == ecg.len() && ecg.len() == resp.len() && resp.len() == gsr.len()
        );
        Ok(ExtractedPipeline {
            weights: self.weights,
            features: FeatureTable {
                time,
                ecg,
                resp,
                gsr,
            },
        })
    }
}

/// Raw per-window measures, not yet rescaled.
pub struct ExtractedPipeline {
    weights: Weights,
    features: FeatureTable,
}

impl ExtractedPipeline {
    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    /// Rescale each measure column in place; TIME is left alone.
    pub fn normalize(mut self) -> NormalizedPipeline {
        normalize_column(&mut self.features.ecg);
        normalize_column(&mut self.features.resp);
        normalize_column(&mut self.features.gsr);
        NormalizedPipeline {
            weights: self.weights,
            features: self.features,
        }
    }
}

/// Normalized measures, ready to combine.
pub struct NormalizedPipeline {
    weights: Weights,
    features: FeatureTable,
}

impl NormalizedPipeline {
    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Swap in a new weight set before scoring; a rejected candidate leaves
    /// the current set in place.
    pub fn change_weights(&mut self, entries: &[(String, f64)]) -> Result<(), WeightsError> {
        self.weights = Weights::from_entries(entries)?;
        debug!(
            "weights set to ECG={} GSR={} RESP={}",
            self.weights.ecg(),
            self.weights.gsr(),
            self.weights.resp()
        );
        Ok(())
    }

    /// Combine the normalized measures into the stress score.
    pub fn score(self) -> ScoredTable {
        let FeatureTable {
            time,
            ecg,
            resp,
            gsr,
        } = self.features;
        let stress_score = combine(&ecg, &gsr, &resp, &self.weights);
        ScoredTable {
            time,
            ecg,
            resp,
            gsr,
            stress_score,
        }
    }
}
