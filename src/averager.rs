/// Running mean
#[derive(Debug, Clone, Default)]
pub struct Averager {
    pub mean: f64,
    pub count: u64,
}

impl Averager {
    /// Builds new Averager
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
        }
    }

    /// Push new value into [Averager]
    pub fn add(&mut self, x: f64) {
        self.count += 1;
        let k = self.count as f64;
        self.mean = x / k + self.mean * (k - 1.0) / k;
    }

    /// Mean value, if at least one value was pushed
    pub fn value(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.mean)
        } else {
            None
        }
    }
}

impl FromIterator<f64> for Averager {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut avg = Self::new();
        for x in iter {
            avg.add(x);
        }
        avg
    }
}
