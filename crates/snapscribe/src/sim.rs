//! Randomness and artificial latency shared by the mock services.

use std::sync::{Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::schema::DelayRange;

/// Thread-safe random source. Seeded sources replay the same draws.
pub struct SimRng {
    inner: Mutex<StdRng>,
}

impl SimRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            inner: Mutex::new(rng),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StdRng> {
        match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Simulation RNG lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Runs `f` with exclusive access to the generator.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.lock();
        f(&mut rng)
    }

    /// Samples `range` and sleeps for it. The generator is not held across
    /// the sleep.
    pub async fn simulate_latency(&self, range: &DelayRange) {
        if range.is_zero() {
            return;
        }
        let delay = self.with(|rng| range.sample(rng));
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::time::Duration;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = SimRng::new(Some(99));
        let b = SimRng::new(Some(99));
        let xs: Vec<u32> = (0..5).map(|_| a.with(|r| r.gen())).collect();
        let ys: Vec<u32> = (0..5).map(|_| b.with(|r| r.gen())).collect();
        assert_eq!(xs, ys);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_latency_sleeps() {
        let rng = SimRng::new(Some(1));
        let start = tokio::time::Instant::now();
        rng.simulate_latency(&DelayRange::fixed(1500)).await;
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_zero_latency_returns_immediately() {
        let rng = SimRng::new(None);
        rng.simulate_latency(&DelayRange::none()).await;
    }
}
