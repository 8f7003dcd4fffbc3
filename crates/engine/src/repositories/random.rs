//! Dice rolls over the injected random source.

use std::sync::Arc;

use crate::infrastructure::ports::RandomPort;

pub struct Dice {
    random: Arc<dyn RandomPort>,
}

impl Dice {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    pub fn d20(&self) -> i32 {
        self.random.gen_range(1, 20)
    }

    pub fn d6(&self) -> i32 {
        self.random.gen_range(1, 6)
    }

    /// Uniform integer in `min..=max`.
    pub fn range(&self, min: i32, max: i32) -> i32 {
        self.random.gen_range(min, max)
    }

    pub fn uuid(&self) -> uuid::Uuid {
        self.random.gen_uuid()
    }
}
