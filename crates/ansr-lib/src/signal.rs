use serde::{Deserialize, Serialize};

/// Raw four-channel recording: timestamps plus ECG, GSR and RESP samples,
/// index-aligned (sample i of every channel was taken at time[i]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub time: Vec<f64>,
    pub ecg: Vec<f64>,
    pub gsr: Vec<f64>,
    pub resp: Vec<f64>,
}

impl Recording {
    pub fn new(time: Vec<f64>, ecg: Vec<f64>, gsr: Vec<f64>, resp: Vec<f64>) -> Self {
        assert!(
            time.len() == ecg.len() && ecg.len() == gsr.len() && gsr.len() == resp.len(),
            "channel lengths must match"
        );
        Self {
            time,
            ecg,
            gsr,
            resp,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Per-window measures before normalization: one row per window, columns
/// TIME (window start), ECG (bpm), RESP (breaths/min), GSR (mean level).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureTable {
    pub time: Vec<f64>,
    pub ecg: Vec<f64>,
    pub resp: Vec<f64>,
    pub gsr: Vec<f64>,
}

impl FeatureTable {
    pub fn window_count(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Final output table: normalized measures plus the combined stress score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoredTable {
    pub time: Vec<f64>,
    pub ecg: Vec<f64>,
    pub resp: Vec<f64>,
    pub gsr: Vec<f64>,
    pub stress_score: Vec<f64>,
}

/// One window of the scored table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoredRow {
    pub time: f64,
    pub ecg: f64,
    pub resp: f64,
    pub gsr: f64,
    pub stress_score: f64,
}

impl ScoredTable {
    pub fn window_count(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<ScoredRow> {
        if index >= self.window_count() {
            return None;
        }
        Some(ScoredRow {
            time: self.time[index],
            ecg: self.ecg[index],
            resp: self.resp[index],
            gsr: self.gsr[index],
            stress_score: self.stress_score[index],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = ScoredRow> + '_ {
        (0..self.window_count()).filter_map(|i| self.row(i))
    }
}
