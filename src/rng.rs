//! Random draws for battles.
//!
//! Every probabilistic step goes through [`BattleRng`], so tests can script
//! exact outcomes and production can use thread entropy. Each draw carries a
//! reason string that shows up in debug logs and in the panic message when a
//! scripted sequence runs dry.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait BattleRng {
    /// Uniform draw in `0..bound`. A `bound` of 0 is treated as 1.
    fn draw(&mut self, bound: u32, reason: &str) -> u32;

    /// Bernoulli gate against a percentage. 0 and 100+ resolve without a draw.
    fn chance(&mut self, percent: u8, reason: &str) -> bool {
        match percent {
            0 => false,
            p if p >= 100 => true,
            p => self.draw(100, reason) < p as u32,
        }
    }

    /// Uniform draw in `low..=high`. A single-value range makes no draw.
    fn draw_inclusive(&mut self, low: u32, high: u32, reason: &str) -> u32 {
        if high <= low {
            return low;
        }
        low + self.draw(high - low + 1, reason)
    }

    /// Uniform index into a collection of `len` items. One item makes no draw.
    fn pick_index(&mut self, len: usize, reason: &str) -> usize {
        if len <= 1 {
            return 0;
        }
        self.draw(len as u32, reason) as usize
    }
}

/// Thread-local entropy; the production source.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadBattleRng;

impl BattleRng for ThreadBattleRng {
    fn draw(&mut self, bound: u32, reason: &str) -> u32 {
        let value = rand::rng().random_range(0..bound.max(1));
        log::debug!("rng: {} for {}", value, reason);
        value
    }
}

/// Reproducible source for replays and simulations.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl BattleRng for SeededRng {
    fn draw(&mut self, bound: u32, reason: &str) -> u32 {
        let value = self.inner.random_range(0..bound.max(1));
        log::debug!("rng: {} for {}", value, reason);
        value
    }
}

/// Replays a fixed list of values, saturating each at `bound - 1`.
///
/// Scripting 0 makes a gate succeed; scripting 99 makes it fail. Running out
/// of values is a test bug and panics with the reason of the failed draw.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<u32>,
    index: usize,
}

impl ScriptedRng {
    pub fn new_for_test(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.values.len() - self.index
    }
}

impl BattleRng for ScriptedRng {
    fn draw(&mut self, bound: u32, reason: &str) -> u32 {
        let Some(&value) = self.values.get(self.index) else {
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        };
        self.index += 1;
        let value = value.min(bound.max(1) - 1);

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", value, reason);

        value
    }
}
