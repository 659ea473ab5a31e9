//! Error statistics over sample triples
//!
//! Profiles are compared component-wise: the largest absolute difference of
//! any channel is the per-sample error.

/// Statistics from a triple comparison
#[derive(Debug, Clone)]
pub struct ErrorStats {
    /// Mean error across all samples
    pub mean: f64,
    /// Maximum error
    pub max: f64,
    /// 95th percentile error
    pub p95: f64,
    /// Index of the sample with the maximum error
    pub worst: usize,
    /// Number of samples
    pub count: usize,
}

impl ErrorStats {
    pub fn within(&self, bound: f64) -> bool {
        self.max <= bound
    }
}

/// Largest per-channel absolute difference
pub fn max_abs_diff(a: [f64; 3], b: [f64; 3]) -> f64 {
    (0..3).map(|i| (a[i] - b[i]).abs()).fold(0.0, f64::max)
}

/// Compare two buffers of triples
pub fn compare_triples(reference: &[[f64; 3]], result: &[[f64; 3]]) -> ErrorStats {
    assert_eq!(reference.len(), result.len());

    let errors: Vec<f64> = reference
        .iter()
        .zip(result)
        .map(|(a, b)| max_abs_diff(*a, *b))
        .collect();

    let worst = errors
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut sorted = errors.clone();
    sorted.sort_by(f64::total_cmp);

    let mean = if sorted.is_empty() {
        0.0
    } else {
        sorted.iter().sum::<f64>() / sorted.len() as f64
    };
    let max = sorted.last().copied().unwrap_or(0.0);
    let p95_idx = (sorted.len() as f64 * 0.95) as usize;
    let p95 = sorted.get(p95_idx).copied().unwrap_or(max);

    ErrorStats {
        mean,
        max,
        p95,
        worst,
        count: errors.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_buffers() {
        let buf = [[0.1, 0.2, 0.3], [1.0, 0.5, 0.5]];
        let stats = compare_triples(&buf, &buf);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.count, 2);
        assert!(stats.within(0.0));
    }

    #[test]
    fn test_worst_sample() {
        let a = [[0.0; 3], [0.0; 3], [0.0; 3]];
        let b = [[0.01, 0.0, 0.0], [0.0, -0.2, 0.0], [0.0, 0.0, 0.05]];
        let stats = compare_triples(&a, &b);
        assert_eq!(stats.worst, 1);
        assert!((stats.max - 0.2).abs() < 1e-12);
        assert!((stats.mean - 0.26 / 3.0).abs() < 1e-12);
    }
}
