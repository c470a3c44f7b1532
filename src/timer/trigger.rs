//! 触发类计时：内置冷却（ICD）与每分钟触发次数（PPM）。

use crate::random::RandomDraw;
use crate::sim::SimTime;

/// 内置冷却：触发后 `duration` 内不能再次触发。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalCooldown {
    pub duration: SimTime,
    ready_at: SimTime,
}

impl InternalCooldown {
    pub fn new(duration: SimTime) -> Self {
        Self {
            duration,
            ready_at: SimTime::ZERO,
        }
    }

    pub fn is_on_cd(&self, now: SimTime) -> bool {
        now < self.ready_at
    }

    /// 不在冷却中则进入冷却并返回 true。
    pub fn try_trigger(&mut self, now: SimTime) -> bool {
        if self.is_on_cd(now) {
            return false;
        }
        self.ready_at = now.saturating_add(self.duration);
        true
    }

    pub fn reset(&mut self) {
        self.ready_at = SimTime::ZERO;
    }
}

/// PPM 触发：几率 = ppm × 武器速度 / 60。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PpmManager {
    ppm: f64,
    chance: f64,
}

impl PpmManager {
    pub fn new(ppm: f64, weapon_speed_secs: f64) -> Self {
        Self {
            ppm,
            chance: ppm * weapon_speed_secs / 60.0,
        }
    }

    pub fn ppm(&self) -> f64 {
        self.ppm
    }

    pub fn chance(&self) -> f64 {
        self.chance
    }

    /// 武器速度变化（如换武器、攻速光环）后重算。
    pub fn set_weapon_speed(&mut self, weapon_speed_secs: f64) {
        self.chance = self.ppm * weapon_speed_secs / 60.0;
    }

    pub fn proc(&self, rng: &mut dyn RandomDraw, label: &str) -> bool {
        rng.draw(label) < self.chance
    }
}
