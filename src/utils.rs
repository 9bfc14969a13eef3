//! Numeric helper functions over `f64` sequences.
//!
//! These are standalone collaborators for spectrum processing code:
//! robust location/spread estimates, an RMSD, and three one-dimensional
//! outlier detectors. Degenerate inputs (empty, mismatched lengths) yield
//! `None` rather than panicking.

/// Generate the values `start, start + step, ...` while they stay below
/// `stop`.
pub fn vector_by_step(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    let mut position = start;
    while position < stop {
        values.push(position);
        position += step;
    }
    values
}

/// The median of `values`, or `None` if empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Median absolute deviation of `values`, scaled by the 0.6745 normal
/// consistency constant.
pub fn mad(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|x| (x - center).abs()).collect();
    median(&deviations).map(|d| d / 0.6745)
}

/// Root-mean-square deviation between two equal-length sequences.
pub fn rmsd(left: &[f64], right: &[f64]) -> Option<f64> {
    if left.is_empty() || left.len() != right.len() {
        return None;
    }
    let total: f64 = left
        .iter()
        .zip(right)
        .map(|(a, b)| (a - b) * (a - b))
        .sum();
    Some((total / left.len() as f64).sqrt())
}

/// The `p`-th percentile (0-100) of the non-NaN entries of `values`,
/// linearly interpolated between order statistics.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if !(0.0..=100.0).contains(&p) {
        return None;
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let position = p / 100.0 * (sorted.len() as f64 - 1.0);
    let index = position.floor() as usize;
    let fraction = position - index as f64;
    let upper = (index + 1).min(sorted.len() - 1);
    Some(sorted[index] + (sorted[upper] - sorted[index]) * fraction)
}

/// Flag entries whose modified z-score `0.6745 * |x - median| / MAD`
/// exceeds `thresh` (3.5 is the customary cutoff).
///
/// The median and MAD ignore NaN entries; NaN entries are never flagged.
pub fn mad_based_outlier(data: &[f64], thresh: f64) -> Vec<bool> {
    let Some(center) = nan_filtered_median(data) else {
        return vec![false; data.len()];
    };
    let deviations: Vec<f64> = data.iter().map(|x| (x - center).abs()).collect();
    let Some(scale) = nan_filtered_median(&deviations) else {
        return vec![false; data.len()];
    };
    deviations
        .iter()
        .map(|d| 0.6745 * d / scale > thresh)
        .collect()
}

/// Flag entries outside the central `threshold`% band of the data.
pub fn percentile_based_outlier(data: &[f64], threshold: f64) -> Vec<bool> {
    let margin = (100.0 - threshold) / 2.0;
    let (Some(minval), Some(maxval)) = (
        percentile(data, margin),
        percentile(data, 100.0 - margin),
    ) else {
        return vec![false; data.len()];
    };
    data.iter().map(|&x| x < minval || x > maxval).collect()
}

/// Flag entries whose absolute deviation from the median exceeds `m`
/// times the median deviation.
///
/// A zero median deviation flags nothing.
pub fn median_outliers(data: &[f64], m: f64) -> Vec<bool> {
    let Some(center) = nan_filtered_median(data) else {
        return vec![false; data.len()];
    };
    let deviations: Vec<f64> = data.iter().map(|x| (x - center).abs()).collect();
    let Some(median_deviation) = nan_filtered_median(&deviations) else {
        return vec![false; data.len()];
    };
    if median_deviation == 0.0 {
        return vec![false; data.len()];
    }
    deviations
        .iter()
        .map(|d| d / median_deviation > m)
        .collect()
}

/// Test whether a string parses as a floating-point number.
pub fn is_float(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok()
}

fn nan_filtered_median(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    median(&finite)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vector_by_step_walks_the_range() {
        assert_eq!(vector_by_step(1.0, 4.0, 1.0), vec![1.0, 2.0, 3.0]);
        assert!(vector_by_step(4.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn median_of_odd_and_even_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn mad_of_a_known_vector() {
        // deviations from median 3 are [2, 1, 0, 1, 2], median 1
        let value = mad(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((value - 1.0 / 0.6745).abs() < 1e-12);
    }

    #[test]
    fn rmsd_of_known_vectors() {
        assert_eq!(rmsd(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), Some(0.0));
        let value = rmsd(&[1.0, 2.0], &[2.0, 4.0]).unwrap();
        assert!((value - (5.0_f64 / 2.0).sqrt()).abs() < 1e-12);
        assert_eq!(rmsd(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(rmsd(&[], &[]), None);
    }

    #[test]
    fn percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&data, 0.0), Some(1.0));
        assert_eq!(percentile(&data, 100.0), Some(4.0));
        assert_eq!(percentile(&data, 50.0), Some(2.5));
        assert_eq!(percentile(&data, 101.0), None);
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn mad_based_outlier_flags_the_spike() {
        let data = [1.0, 1.1, 0.9, 1.0, 50.0];
        let flags = mad_based_outlier(&data, 3.5);
        assert_eq!(flags, vec![false, false, false, false, true]);
    }

    #[test]
    fn percentile_based_outlier_flags_the_tails() {
        let mut data: Vec<f64> = (1..=20).map(f64::from).collect();
        data.push(1000.0);
        let flags = percentile_based_outlier(&data, 90.0);
        assert!(flags[20]);
        assert!(!flags[10]);
    }

    #[test]
    fn median_outliers_flags_large_deviations() {
        let data = [1.0, 1.2, 0.9, 1.1, 25.0];
        let flags = median_outliers(&data, 2.5);
        assert_eq!(flags, vec![false, false, false, false, true]);
    }

    #[test]
    fn median_outliers_with_constant_data_flags_nothing() {
        let flags = median_outliers(&[2.0, 2.0, 2.0], 2.5);
        assert_eq!(flags, vec![false, false, false]);
    }

    #[test]
    fn nan_entries_are_never_flagged() {
        let data = [1.0, f64::NAN, 1.1, 0.9, 50.0];
        let flags = mad_based_outlier(&data, 3.5);
        assert!(!flags[1]);
        assert!(flags[4]);
    }

    #[test]
    fn is_float_accepts_numeric_strings() {
        assert!(is_float("1.5"));
        assert!(is_float("-2e3"));
        assert!(is_float("  7 "));
        assert!(!is_float("banana"));
        assert!(!is_float(""));
    }
}
