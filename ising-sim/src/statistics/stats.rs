/// Running accumulator for one scalar observable.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub count: usize,
    sum: f64,
    sum_sq: f64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    /// Variance with `ddof` degrees of freedom removed from the denominator.
    pub fn variance(&self, ddof: usize) -> Option<f64> {
        if self.count <= ddof {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        let ss = (self.sum_sq - n * mean * mean).max(0.0);
        Some(ss / (n - ddof as f64))
    }

    pub fn std(&self, ddof: usize) -> Option<f64> {
        self.variance(ddof).map(f64::sqrt)
    }

    /// Standard error of the mean, from the sample (`ddof = 1`) deviation.
    pub fn stderr(&self) -> Option<f64> {
        self.std(1).map(|s| s / (self.count as f64).sqrt())
    }
}

impl FromIterator<f64> for Statistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for v in iter {
            stats.update(v);
        }
        stats
    }
}
