use crate::domain::ports::ColorSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 不固定種子的亂數顏色，每次執行結果不同
pub struct RandomColors {
    rng: StdRng,
}

impl RandomColors {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColors {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSource for RandomColors {
    fn next_channel(&mut self) -> u8 {
        self.rng.gen_range(0..=255)
    }
}

/// 依序循環給定的數值
#[derive(Debug, Clone)]
pub struct SequenceColors {
    values: Vec<u8>,
    next: usize,
}

impl SequenceColors {
    pub fn new(values: Vec<u8>) -> Self {
        Self { values, next: 0 }
    }
}

impl ColorSource for SequenceColors {
    fn next_channel(&mut self) -> u8 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
