//! 法力条：上限来自定版后的法力属性，按 MP5 每 2 秒回复。

use super::ResourceKind;
use super::pool::ResourcePool;
use crate::sim::SimTime;

pub const MANA_TICK_INTERVAL: SimTime = SimTime::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct ManaBar {
    pool: ResourcePool,
    /// 关闭时不调度回复事件。
    pub regen_enabled: bool,
}

impl ManaBar {
    pub fn new(regen_enabled: bool) -> Self {
        Self {
            pool: ResourcePool::new(ResourceKind::Mana, 0.0, 0.0),
            regen_enabled,
        }
    }

    pub(crate) fn set_max(&mut self, max: f64) {
        self.pool.refill_to(max);
    }

    pub fn current(&self) -> f64 {
        self.pool.current()
    }

    pub fn max(&self) -> f64 {
        self.pool.max()
    }

    pub fn add(&mut self, amount: f64) -> f64 {
        self.pool.add(amount)
    }

    pub fn spend(&mut self, amount: f64) {
        self.pool.spend(amount);
    }

    pub fn reset(&mut self) {
        self.pool.reset();
    }
}

impl Default for ManaBar {
    fn default() -> Self {
        Self::new(false)
    }
}

/// 一次回复跳动的法力：MP5 × 2 / 5。
pub fn mana_per_tick(mp5: f64) -> f64 {
    (mp5 * MANA_TICK_INTERVAL.as_secs_f64() / 5.0).max(0.0)
}
