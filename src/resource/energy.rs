//! 能量条
//!
//! 每 2 秒回复一次，每次 `ENERGY_PER_TICK × tick_multiplier + next_tick_adjustment`；
//! 一次性调整量在下一次回复后清零。

use super::ResourceKind;
use super::pool::ResourcePool;
use crate::sim::SimTime;

pub const ENERGY_TICK_INTERVAL: SimTime = SimTime::from_secs(2);
pub const ENERGY_PER_TICK: f64 = 20.2;
pub const DEFAULT_MAX_ENERGY: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyBar {
    pool: ResourcePool,
    pub tick_multiplier: f64,
    pub next_tick_adjustment: f64,
}

impl EnergyBar {
    pub fn new(max: f64, initial: f64) -> Self {
        Self {
            pool: ResourcePool::new(ResourceKind::Energy, max, initial),
            tick_multiplier: 1.0,
            next_tick_adjustment: 0.0,
        }
    }

    pub fn current(&self) -> f64 {
        self.pool.current()
    }

    pub fn max(&self) -> f64 {
        self.pool.max()
    }

    /// 增加能量（截断到上限），返回实际增加量。
    pub fn add(&mut self, amount: f64) -> f64 {
        self.pool.add(amount)
    }

    pub fn spend(&mut self, amount: f64) {
        self.pool.spend(amount);
    }

    /// 本次回复量，并清掉一次性调整。
    pub(crate) fn take_tick_amount(&mut self) -> f64 {
        let amount = (ENERGY_PER_TICK * self.tick_multiplier + self.next_tick_adjustment).max(0.0);
        self.next_tick_adjustment = 0.0;
        amount
    }

    pub fn reset(&mut self) {
        self.pool.reset();
        self.tick_multiplier = 1.0;
        self.next_tick_adjustment = 0.0;
    }
}

impl Default for EnergyBar {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENERGY, DEFAULT_MAX_ENERGY)
    }
}
