use super::types::{CharCounts, Timestamp};
use crate::consts::MIN_ELAPSED_MS;

/// Whole submitted words per minute, capped.
pub fn wpm(words: usize, elapsed_ms: Timestamp, cap: f64) -> f64 {
    let minutes = elapsed_ms.max(MIN_ELAPSED_MS) as f64 / 60_000.0;
    (words as f64 / minutes).min(cap)
}

/// `(correct + spaces) / (correct + incorrect + extra + spaces)` as a
/// percentage. Nothing typed counts as 100.
pub fn accuracy(c: &CharCounts) -> f64 {
    let good = c.correct + c.spaces;
    let total = c.correct + c.incorrect + c.extra + c.spaces;
    if total == 0 {
        return 100.0;
    }
    good as f64 / total as f64 * 100.0
}

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation.
pub fn stdev(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = mean(samples);
    let var = samples.iter().map(|s| (s - m).powi(2)).sum::<f64>() / samples.len() as f64;
    var.sqrt()
}

/// `100 - cv%`, clamped to [0, 100]. No samples or a zero mean gives 0.
pub fn consistency(samples: &[f64]) -> f64 {
    let m = mean(samples);
    if samples.is_empty() || m <= 0.0 {
        return 0.0;
    }
    (100.0 - stdev(samples) / m * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_one_minute() {
        assert_eq!(wpm(30, 60_000, 350.0), 30.0);
        assert_eq!(wpm(0, 60_000, 350.0), 0.0);
    }

    #[test]
    fn test_wpm_floor_and_cap() {
        // 1 word in 0 ms uses the 100 ms floor: 600 wpm, capped.
        assert_eq!(wpm(1, 0, 350.0), 350.0);
        assert!((wpm(1, 0, 1000.0) - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_empty_is_100() {
        let acc = accuracy(&CharCounts::default());
        assert_eq!(acc, 100.0);
        assert!(!acc.is_nan());
    }

    #[test]
    fn test_accuracy_counts_spaces() {
        let c = CharCounts {
            correct: 7,
            incorrect: 1,
            extra: 1,
            spaces: 1,
            ..Default::default()
        };
        assert!((accuracy(&c) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_consistency() {
        assert_eq!(consistency(&[]), 0.0);
        assert_eq!(consistency(&[0.0, 0.0]), 0.0);
        assert_eq!(consistency(&[60.0, 60.0, 60.0]), 100.0);
        // mean 50, stdev 10 => 80
        assert!((consistency(&[40.0, 60.0]) - 80.0).abs() < 1e-9);
        // Wild swings clamp at 0.
        assert_eq!(consistency(&[1.0, 1000.0, 0.0, 0.0]), 0.0);
    }
}
