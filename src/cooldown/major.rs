//! 大招冷却（饰品、药水、嗜血等会被自动使用的主动效果）

use crate::encounter::CombatWorld;
use crate::sim::{SimTime, Simulator};
use crate::spell::{ActionId, SpellId};
use crate::timer::{Cooldown, TimerBank, ready_at_both};
use crate::unit::UnitId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const COOLDOWN_PRIORITY_LOW: f64 = -1.0;
pub const COOLDOWN_PRIORITY_DEFAULT: f64 = 0.0;
pub const COOLDOWN_PRIORITY_BLOODLUST: f64 = 1.0;
pub const COOLDOWN_PRIORITY_DRUMS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownType {
    #[default]
    Unknown,
    Mana,
    Dps,
}

pub type CooldownCondition = Arc<dyn Fn(&Simulator, &CombatWorld, UnitId) -> bool + Send + Sync>;
pub type CooldownActivation = Box<dyn FnMut(&mut Simulator, &mut CombatWorld, UnitId) + Send>;
/// 每次迭代重置时调用，生成该次迭代使用的激活函数。
pub type ActivationFactory = Arc<dyn Fn(&CombatWorld, UnitId) -> CooldownActivation + Send + Sync>;

#[derive(Clone, Default)]
pub struct MajorCooldownConfig {
    pub action_id: Option<ActionId>,
    /// 技能驱动的大招：动作标识、冷却、GCD、读条时间都取自技能。
    pub spell: Option<SpellId>,
    pub cooldown: Option<Cooldown>,
    pub shared_cooldown: Option<Cooldown>,
    pub uses_gcd: bool,
    pub cast_time: SimTime,
    pub priority: f64,
    pub kind: CooldownType,
    pub can_activate: Option<CooldownCondition>,
    pub should_activate: Option<CooldownCondition>,
    pub activation_factory: Option<ActivationFactory>,
    /// 固定使用时刻；前 N 次使用按这里的时刻，之后回到 `should_activate`。
    pub timings: Vec<SimTime>,
}

impl fmt::Debug for MajorCooldownConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MajorCooldownConfig")
            .field("action_id", &self.action_id)
            .field("spell", &self.spell)
            .field("uses_gcd", &self.uses_gcd)
            .field("priority", &self.priority)
            .field("kind", &self.kind)
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

/// 定版后的模板（每次迭代由它重建 `MajorCooldown`）。
#[derive(Clone)]
pub(crate) struct MajorCooldownTemplate {
    pub action_id: ActionId,
    pub spell: Option<SpellId>,
    pub cooldown: Option<Cooldown>,
    pub shared_cooldown: Option<Cooldown>,
    pub uses_gcd: bool,
    pub cast_time: SimTime,
    pub priority: f64,
    pub kind: CooldownType,
    pub can_activate: Option<CooldownCondition>,
    pub should_activate: Option<CooldownCondition>,
    pub activation_factory: ActivationFactory,
    pub timings: Vec<SimTime>,
}

pub struct MajorCooldown {
    pub action_id: ActionId,
    pub spell: Option<SpellId>,
    pub cooldown: Option<Cooldown>,
    pub shared_cooldown: Option<Cooldown>,
    pub uses_gcd: bool,
    pub cast_time: SimTime,
    pub priority: f64,
    pub kind: CooldownType,
    can_activate: Option<CooldownCondition>,
    should_activate: Option<CooldownCondition>,
    activate: CooldownActivation,
    timings: Vec<SimTime>,
    usages: usize,
    disabled: bool,
}

impl MajorCooldown {
    pub(crate) fn from_template(t: &MajorCooldownTemplate, world: &CombatWorld, unit: UnitId) -> Self {
        Self {
            action_id: t.action_id,
            spell: t.spell,
            cooldown: t.cooldown,
            shared_cooldown: t.shared_cooldown,
            uses_gcd: t.uses_gcd,
            cast_time: t.cast_time,
            priority: t.priority,
            kind: t.kind,
            can_activate: t.can_activate.clone(),
            should_activate: t.should_activate.clone(),
            activate: (t.activation_factory)(world, unit),
            timings: t.timings.clone(),
            usages: 0,
            disabled: false,
        }
    }

    pub fn ready_at(&self, timers: &TimerBank) -> SimTime {
        ready_at_both(timers, self.cooldown, self.shared_cooldown)
    }

    pub fn is_ready(&self, timers: &TimerBank, now: SimTime) -> bool {
        self.ready_at(timers) <= now
    }

    pub fn time_to_ready(&self, timers: &TimerBank, now: SimTime) -> SimTime {
        self.ready_at(timers).saturating_sub(now)
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn usages(&self) -> usize {
        self.usages
    }

    pub fn timings(&self) -> &[SimTime] {
        &self.timings
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// 条件全部满足时激活。`ignore_disabled` 用于手动触发。
    pub(crate) fn try_activate(
        &mut self,
        sim: &mut Simulator,
        world: &mut CombatWorld,
        unit: UnitId,
        ignore_disabled: bool,
    ) -> bool {
        if self.disabled && !ignore_disabled {
            return false;
        }
        let now = sim.now();
        if self.uses_gcd && !world.unit(unit).gcd.is_ready(now) {
            return false;
        }
        if let Some(can) = &self.can_activate {
            if !can(&*sim, &*world, unit) {
                return false;
            }
        }
        let should = match self.timings.get(self.usages) {
            Some(at) => now >= *at,
            None => self
                .should_activate
                .as_ref()
                .is_none_or(|should| should(&*sim, &*world, unit)),
        };
        if should {
            (self.activate)(sim, world, unit);
            self.usages += 1;
        }
        should
    }
}

impl fmt::Debug for MajorCooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MajorCooldown")
            .field("action_id", &self.action_id)
            .field("priority", &self.priority)
            .field("kind", &self.kind)
            .field("usages", &self.usages)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}
