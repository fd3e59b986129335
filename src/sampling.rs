// SamplingStrategy collaborator: produces row-IDs for the estimator in
// §4.C. Default is uniform sampling without replacement from a PRNG seeded
// once at construction — the search drives it sequentially within one
// SearchSpace, so a fixed seed yields a fixed sequence of draws and hence a
// reproducible estimate for a given (dataset, sequence-of-calls).

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub trait SamplingStrategy: Send + Sync {
    /// Draws `k` distinct row-IDs from `[0, n)`. If `k >= n`, returns all of
    /// `0..n`.
    fn sample(&self, n: usize, k: usize) -> Vec<usize>;
}

pub struct UniformSampler {
    rng: Mutex<StdRng>,
}

impl UniformSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl SamplingStrategy for UniformSampler {
    fn sample(&self, n: usize, k: usize) -> Vec<usize> {
        if n == 0 {
            return Vec::new();
        }
        let k = k.min(n);
        let mut rng = self.rng.lock();
        rand::seq::index::sample(&mut *rng, n, k).into_vec()
    }
}
