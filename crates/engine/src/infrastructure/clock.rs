//! Clock and random implementations.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - thread-local entropy, or a seeded generator for replays.
pub struct SystemRandom {
    seeded: Option<Mutex<StdRng>>,
}

impl SystemRandom {
    pub fn new() -> Self {
        Self { seeded: None }
    }

    /// Deterministic source: the same seed replays the same rolls.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut dyn rand::RngCore) -> T) -> T {
        match &self.seeded {
            Some(rng) => {
                // A poisoned lock still holds a usable generator.
                let mut guard = rng.lock().unwrap_or_else(|e| e.into_inner());
                f(&mut *guard)
            }
            None => f(&mut rand::thread_rng()),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.with_rng(|rng| rng.gen_range(min..=max))
    }

    fn gen_uuid(&self) -> Uuid {
        let bytes: [u8; 16] = self.with_rng(|rng| rng.gen());
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_stay_in_inclusive_range() {
        let random = SystemRandom::new();
        for _ in 0..500 {
            let roll = random.gen_range(1, 20);
            assert!((1..=20).contains(&roll));
        }
    }

    #[test]
    fn same_seed_replays_same_rolls() {
        let a = SystemRandom::seeded(7);
        let b = SystemRandom::seeded(7);
        let rolls_a: Vec<_> = (0..10).map(|_| a.gen_range(1, 20)).collect();
        let rolls_b: Vec<_> = (0..10).map(|_| b.gen_range(1, 20)).collect();
        assert_eq!(rolls_a, rolls_b);
        assert_eq!(a.gen_uuid(), b.gen_uuid());
    }

    #[test]
    fn degenerate_range_returns_min() {
        assert_eq!(SystemRandom::new().gen_range(4, 4), 4);
    }
}
