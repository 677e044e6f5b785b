//! Utilities for working with samples of floating-point observations.

pub trait SliceExt {
    fn sum(&self) -> f64;

    /// Arithmetic mean; [None] for an empty sample.
    fn mean(&self) -> Option<f64>;

    /// Median, averaging the middle two for even-length samples; [None] for an empty sample.
    fn median(&self) -> Option<f64>;

    /// Sample (ddof = 1) standard deviation; [None] for samples of fewer than two observations.
    fn sample_std(&self) -> Option<f64>;
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    fn mean(&self) -> Option<f64> {
        match self.len() {
            0 => None,
            len => Some(self.sum() / len as f64),
        }
    }

    fn median(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let mut sorted = self.to_vec();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            Some(sorted[mid])
        } else {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        }
    }

    fn sample_std(&self) -> Option<f64> {
        if self.len() < 2 {
            return None;
        }
        let mean = self.sum() / self.len() as f64;
        let sum_sq: f64 = self.iter().map(|value| (value - mean).powi(2)).sum();
        Some((sum_sq / (self.len() - 1) as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    #[test]
    fn sum() {
        let data = [0.0, 0.1, 0.2];
        assert_f64_near!(0.3, data.sum(), 1);
    }

    #[test]
    fn mean() {
        assert_eq!(None, [0.0; 0].mean());
        assert_eq!(Some(5.0), [5.0].mean());
        assert_float_absolute_eq!(166.666_666_7, [100.0, 100.0, 300.0].mean().unwrap(), 1e-6);
    }

    #[test]
    fn median_odd() {
        assert_eq!(Some(70.0), [90.0, 10.0, 70.0].median());
    }

    #[test]
    fn median_even() {
        assert_eq!(Some(80.0), [90.0, 70.0].median());
        assert_eq!(None, [0.0; 0].median());
    }

    #[test]
    fn median_single() {
        assert_eq!(Some(42.0), [42.0].median());
    }

    #[test]
    fn sample_std() {
        assert_eq!(None, [0.0; 0].sample_std());
        assert_eq!(None, [5.0].sample_std());
        assert_float_absolute_eq!(
            115.470_053_8,
            [100.0, 100.0, 300.0].sample_std().unwrap(),
            1e-6
        );
    }

    #[test]
    fn sample_std_of_identical_observations_is_zero() {
        assert_eq!(Some(0.0), [7.0, 7.0, 7.0].sample_std());
    }
}
