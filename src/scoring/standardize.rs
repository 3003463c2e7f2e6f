//! Per-criterion standardization of raw marks across evaluators.

/// Offset added to every standardized mark so results stay positive.
pub const DEFAULT_OFFSET: f64 = 2.5;

/// Arithmetic mean, 0 for an empty slice.
///
/// Accumulates deviations from the first value so a run of identical marks
/// averages to exactly that mark.
pub fn mean(values: &[f64]) -> f64 {
    let Some(&pivot) = values.first() else {
        return 0.0;
    };
    let shift: f64 = values.iter().map(|v| v - pivot).sum();
    pivot + shift / values.len() as f64
}

/// Population standard deviation around `mean`, 0 for an empty slice.
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance: f64 =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Convert one criterion's marks into `(v - mean) / sd + offset`.
///
/// A zero spread (every evaluator agreeing, or a single evaluator) divides by
/// 1 instead, so every value maps to exactly `offset`.
pub fn standardize(values: &[f64], offset: f64) -> Vec<f64> {
    let mean = mean(values);
    let sd = population_std_dev(values, mean);
    let sd = if sd > 0.0 { sd } else { 1.0 };

    values.iter().map(|v| (v - mean) / sd + offset).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert!((m - 5.0).abs() < 1e-12);
        assert!((population_std_dev(&values, m) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std_dev(&[], 0.0), 0.0);
        assert!(standardize(&[], DEFAULT_OFFSET).is_empty());
    }

    #[test]
    fn test_single_value_collapses_to_offset() {
        for raw in [0.0, 0.4, 1.8, 42.0] {
            assert_eq!(standardize(&[raw], DEFAULT_OFFSET), vec![DEFAULT_OFFSET]);
        }
    }

    #[test]
    fn test_identical_values_collapse_to_offset() {
        let out = standardize(&[1.8, 1.8, 1.8], DEFAULT_OFFSET);
        assert_eq!(out, vec![DEFAULT_OFFSET; 3]);

        let out = standardize(&[0.3; 7], DEFAULT_OFFSET);
        assert!(out.iter().all(|v| *v == DEFAULT_OFFSET));
    }

    #[test]
    fn test_two_values_are_one_sd_either_side() {
        // mean 1.0, sd 1.0
        let out = standardize(&[0.0, 2.0], DEFAULT_OFFSET);
        assert!((out[0] - 1.5).abs() < 1e-12);
        assert!((out[1] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_standardized_values_average_to_offset() {
        let out = standardize(&[0.0, 0.4, 0.9, 1.4, 1.8], DEFAULT_OFFSET);
        let avg = out.iter().sum::<f64>() / out.len() as f64;
        assert!((avg - DEFAULT_OFFSET).abs() < 1e-12);
    }

    #[test]
    fn test_custom_offset() {
        assert_eq!(standardize(&[3.0], 10.0), vec![10.0]);
    }
}
