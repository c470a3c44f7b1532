//! 随机源
//!
//! 每个“用途标签”（如 "Spell Crit"、"Damage Roll"）一条独立的 ChaCha8 流，
//! 流种子由迭代种子与标签哈希混合得到：同一标签的抽样序列只取决于
//! 种子和该标签被抽取的次数，不受其它标签影响。

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// 抽取 `[0, 1)` 的随机数；`label` 说明用途并选择随机流。
pub trait RandomDraw: Send {
    fn draw(&mut self, label: &str) -> f64;

    /// 以新种子重置所有流。
    fn reseed(&mut self, _seed: u64) {}
}

/// 按标签分流的确定性随机源。
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            streams: HashMap::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn stream_seed(&self, label: &str) -> u64 {
        // FNV-1a
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in label.as_bytes() {
            h ^= u64::from(*b);
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        h ^ self.seed.rotate_left(32)
    }
}

impl RandomDraw for RandomSource {
    fn draw(&mut self, label: &str) -> f64 {
        if let Some(rng) = self.streams.get_mut(label) {
            return rng.gen_range(0.0..1.0);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.stream_seed(label));
        let v = rng.gen_range(0.0..1.0);
        self.streams.insert(label.to_owned(), rng);
        v
    }

    fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.streams.clear();
    }
}

/// 固定返回同一个值的随机源，用于测试和“必然命中/必然暴击”的场景。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDraw(pub f64);

impl RandomDraw for ConstantDraw {
    fn draw(&mut self, _label: &str) -> f64 {
        self.0
    }
}

/// 依次返回预设序列（循环），测试多次掷骰的路径时使用。
#[derive(Debug, Clone, Default)]
pub struct SequenceDraw {
    values: Vec<f64>,
    next: usize,
}

impl SequenceDraw {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl RandomDraw for SequenceDraw {
    fn draw(&mut self, _label: &str) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}
