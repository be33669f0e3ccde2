use std::ops::Range;

/// Number of fixed-size windows covering `len` samples. The final window may
/// be shorter than `n_samples`; zero samples means zero windows.
pub fn window_count(len: usize, n_samples: usize) -> usize {
    assert!(n_samples > 0, "window size must be positive");
    len.div_ceil(n_samples)
}

/// Sample ranges of consecutive windows, in order. Window k covers
/// `k * n_samples .. min((k + 1) * n_samples, len)`.
pub fn chunk_ranges(len: usize, n_samples: usize) -> impl Iterator<Item = Range<usize>> {
    (0..window_count(len, n_samples)).map(move |k| k * n_samples..((k + 1) * n_samples).min(len))
}

/// Arithmetic mean of each window.
pub fn mean_per_window(values: &[f64], n_samples: usize) -> Vec<f64> {
    chunk_ranges(values.len(), n_samples)
        .map(|range| {
            let chunk = &values[range];
            chunk.iter().sum::<f64>() / chunk.len() as f64
        })
        .collect()
}

/// Timestamp of each window's first sample.
pub fn start_times(time: &[f64], n_samples: usize) -> Vec<f64> {
    chunk_ranges(time.len(), n_samples)
        .map(|range| time[range.start])
        .collect()
}
