//! 怒气条
//!
//! 怒气由事件产生（白字攻击命中），不随时间回复。

use super::ResourceKind;
use super::pool::ResourcePool;

pub const DEFAULT_MAX_RAGE: f64 = 100.0;

/// 等级 70 的怒气换算常数。
pub const RAGE_CONVERSION_70: f64 = 274.7;

#[derive(Debug, Clone, PartialEq)]
pub struct RageBar(ResourcePool);

impl RageBar {
    pub fn new(initial: f64) -> Self {
        Self(ResourcePool::new(ResourceKind::Rage, DEFAULT_MAX_RAGE, initial))
    }

    pub fn current(&self) -> f64 {
        self.0.current()
    }

    pub fn max(&self) -> f64 {
        self.0.max()
    }

    pub fn add(&mut self, amount: f64) -> f64 {
        self.0.add(amount)
    }

    pub fn spend(&mut self, amount: f64) {
        self.0.spend(amount);
    }

    pub fn reset(&mut self) {
        self.0.reset();
    }
}

impl Default for RageBar {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// 白字攻击造成伤害后获得的怒气。
///
/// `15 × 伤害 / (4 × c) + f × 武器速度 / 2`，上限 `15 × 伤害 / c`；
/// f：主手命中 3.5、主手暴击 7.0，副手减半。
pub fn rage_from_white_hit(damage: f64, crit: bool, offhand: bool, weapon_speed: f64, level: u32) -> f64 {
    if damage <= 0.0 {
        return 0.0;
    }
    let c = rage_conversion(level);
    let mut hit_factor = if crit { 7.0 } else { 3.5 };
    if offhand {
        hit_factor /= 2.0;
    }
    let rage = 15.0 * damage / (4.0 * c) + hit_factor * weapon_speed / 2.0;
    rage.min(15.0 * damage / c)
}

fn rage_conversion(level: u32) -> f64 {
    if level >= 70 {
        RAGE_CONVERSION_70
    } else {
        let l = level as f64;
        0.0091107836 * l * l + 3.225598133 * l + 4.2652911
    }
}
