//! Thresholded Pearson correlation between paired rank sequences.
//!
//! Pairs are offered one at a time and kept only when both ranks exceed the
//! threshold, so the scorer never needs the full sequences in memory.
//!
//! # Examples
//!
//! ```
//! use genre_rank::correlation::PairedSamples;
//!
//! let mut samples = PairedSamples::new(0.0);
//! for (a, b) in [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (0.0, 9.0)] {
//!     samples.offer(a, b);
//! }
//!
//! assert_eq!(samples.len(), 3);
//! assert!((samples.pearson() - 1.0).abs() < 1e-12);
//! ```

/// Running sums for Pearson's r over retained pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PairedSamples {
    threshold: f64,
    n: usize,
    sum_a: f64,
    sum_b: f64,
    sum_a2: f64,
    sum_b2: f64,
    sum_ab: f64,
}

impl PairedSamples {
    /// Create an empty accumulator. Pairs whose ranks are not both strictly
    /// greater than `threshold` are ignored.
    pub fn new(threshold: f64) -> Self {
        PairedSamples {
            threshold,
            ..Default::default()
        }
    }

    /// Offer a pair; returns whether it was retained.
    pub fn offer(&mut self, a: f64, b: f64) -> bool {
        if !(a > self.threshold && b > self.threshold) {
            return false;
        }
        self.n += 1;
        self.sum_a += a;
        self.sum_b += b;
        self.sum_a2 += a * a;
        self.sum_b2 += b * b;
        self.sum_ab += a * b;
        true
    }

    /// Number of retained pairs.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether no pair was retained.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Pearson correlation of the retained pairs.
    ///
    /// Returns exactly `0.0` when nothing was retained or either side has no
    /// variance.
    pub fn pearson(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let n = self.n as f64;
        let num = self.sum_ab - self.sum_a * self.sum_b / n;
        let var_a = self.sum_a2 - self.sum_a * self.sum_a / n;
        let var_b = self.sum_b2 - self.sum_b * self.sum_b / n;
        let den = (var_a * var_b).sqrt();

        // rounding can leave a tiny negative variance
        if !den.is_finite() || den <= 0.0 {
            return 0.0;
        }
        num / den
    }
}

/// Pearson correlation of two equal-length slices, `0.0` when degenerate.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let mut samples = PairedSamples::new(f64::NEG_INFINITY);
    for (&x, &y) in a.iter().zip(b) {
        samples.offer(x, y);
    }
    samples.pearson()
}
