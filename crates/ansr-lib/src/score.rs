use serde::Serialize;

use crate::error::WeightsError;

/// Canonical measure order; weight lists must use exactly these names.
pub const WEIGHT_KEYS: [&str; 3] = ["ECG", "GSR", "RESP"];

/// Slack allowed on the unit-sum check, to absorb decimal rounding.
const SUM_TOLERANCE: f64 = 1e-9;

/// Validated weight set for combining the three normalized measures.
/// Construction is the only gate: an existing value is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    ecg: f64,
    gsr: f64,
    resp: f64,
}

impl Weights {
    pub fn new(ecg: f64, gsr: f64, resp: f64) -> Result<Self, WeightsError> {
        for (name, value) in WEIGHT_KEYS.into_iter().zip([ecg, gsr, resp]) {
            if !value.is_finite() {
                return Err(WeightsError::NotFinite { name, value });
            }
            if value < 0.0 {
                return Err(WeightsError::Negative { name, value });
            }
        }
        let sum = ecg + gsr + resp;
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(WeightsError::BadSum(sum));
        }
        Ok(Self { ecg, gsr, resp })
    }

    /// Validate named entries: exactly three, named ECG, GSR, RESP in that
    /// order, then the same value checks as [`Weights::new`].
    pub fn from_entries(entries: &[(String, f64)]) -> Result<Self, WeightsError> {
        if entries.len() != WEIGHT_KEYS.len() {
            return Err(WeightsError::WrongCount(entries.len()));
        }
        let names_match = entries
            .iter()
            .zip(WEIGHT_KEYS)
            .all(|((name, _), key)| name == key);
        if !names_match {
            return Err(WeightsError::BadNames(
                entries.iter().map(|(name, _)| name.clone()).collect(),
            ));
        }
        Self::new(entries[0].1, entries[1].1, entries[2].1)
    }

    pub fn equal_thirds() -> Self {
        let third = 1.0 / 3.0;
        Self {
            ecg: third,
            gsr: third,
            resp: third,
        }
    }

    pub fn ecg(&self) -> f64 {
        self.ecg
    }

    pub fn gsr(&self) -> f64 {
        self.gsr
    }

    pub fn resp(&self) -> f64 {
        self.resp
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::equal_thirds()
    }
}

/// Elementwise weighted combination of the three normalized columns.
pub fn combine(ecg: &[f64], gsr: &[f64], resp: &[f64], weights: &Weights) -> Vec<f64> {
    debug_assert!(ecg.len() == gsr.len() && gsr.len() == resp.len());
    ecg.iter()
        .zip(gsr)
        .zip(resp)
        .map(|((e, g), r)| e * weights.ecg + g * weights.gsr + r * weights.resp)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(list: &[(&str, f64)]) -> Vec<(String, f64)> {
        list.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn equal_thirds_is_valid() {
        let third = 1.0 / 3.0;
        let weights = Weights::new(third, third, third).expect("thirds");
        assert_eq!(weights.ecg(), third);
    }

    #[test]
    fn accepts_sums_within_rounding_slack() {
        // 0.1 + 0.2 + 0.7 is not bit-exactly 1.0.
        Weights::new(0.1, 0.2, 0.7).expect("rounding slack");
    }

    #[test]
    fn rejects_sum_away_from_one() {
        let err = Weights::new(0.5, 0.6, 0.1).unwrap_err();
        assert!(matches!(err, WeightsError::BadSum(_)));
    }

    #[test]
    fn rejects_negative_weights() {
        let err = Weights::new(-0.2, 0.6, 0.6).unwrap_err();
        assert_eq!(
            err,
            WeightsError::Negative {
                name: "ECG",
                value: -0.2
            }
        );
    }

    #[test]
    fn rejects_non_finite_weights() {
        let err = Weights::new(f64::NAN, 0.5, 0.5).unwrap_err();
        assert!(matches!(err, WeightsError::NotFinite { name: "ECG", .. }));
    }

    #[test]
    fn entries_must_have_exactly_three_items() {
        let err = Weights::from_entries(&entries(&[("ECG", 0.5), ("GSR", 0.5)])).unwrap_err();
        assert_eq!(err, WeightsError::WrongCount(2));
    }

    #[test]
    fn entries_must_use_canonical_names_in_order() {
        let err =
            Weights::from_entries(&entries(&[("GSR", 0.3), ("ECG", 0.3), ("RESP", 0.4)]))
                .unwrap_err();
        assert!(matches!(err, WeightsError::BadNames(_)));

        let err =
            Weights::from_entries(&entries(&[("ECG", 0.3), ("GSR", 0.3), ("EDA", 0.4)]))
                .unwrap_err();
        assert!(matches!(err, WeightsError::BadNames(_)));
    }

    #[test]
    fn valid_entries_build_the_weight_set() {
        let weights =
            Weights::from_entries(&entries(&[("ECG", 0.5), ("GSR", 0.25), ("RESP", 0.25)]))
                .expect("valid entries");
        assert_eq!(weights.gsr(), 0.25);
    }

    #[test]
    fn combine_applies_the_weights_elementwise() {
        let weights = Weights::new(0.5, 0.5, 0.0).expect("weights");
        let scores = combine(&[0.2], &[0.8], &[0.4], &weights);
        assert_eq!(scores, vec![0.5]);
    }

    #[test]
    fn combine_with_thirds_averages() {
        let weights = Weights::default();
        let scores = combine(&[0.3, 0.6], &[0.3, 0.6], &[0.3, 0.6], &weights);
        assert!((scores[0] - 0.3).abs() < 1e-12);
        assert!((scores[1] - 0.6).abs() < 1e-12);
    }
}
