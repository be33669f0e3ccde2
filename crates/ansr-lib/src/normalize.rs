/// Rescale a column in place as `(value - min) / max`. The divisor is the
/// column maximum, not the range, so the result is only guaranteed to land
/// in [0, 1] for non-negative columns; treat it as a heuristic rescale.
///
/// A column whose maximum is exactly zero would be wiped out by the
/// division, so it is first shifted up by one and rescaled against the
/// shifted min and max. NaN entries are carried through untouched and
/// ignored when scanning for min and max. Empty columns are left alone.
pub fn normalize_column(values: &mut [f64]) {
    if values.is_empty() {
        return;
    }
    if column_max(values) == 0.0 {
        for v in values.iter_mut() {
            *v += 1.0;
        }
    }
    let min = column_min(values);
    let max = column_max(values);
    for v in values.iter_mut() {
        *v = (*v - min) / max;
    }
}

fn column_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn column_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
