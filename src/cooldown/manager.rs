//! 大招冷却管理器
//!
//! 配置阶段收集模板；每次迭代由模板重建冷却列表并调用激活工厂。
//! 列表始终按（就绪时间升序，优先级降序）排列，自动使用时从头扫描到
//! 第一个未就绪的为止。

use super::major::{
    CooldownType, MajorCooldown, MajorCooldownConfig, MajorCooldownTemplate,
};
use crate::encounter::CombatWorld;
use crate::error::ConfigError;
use crate::log::CombatEventKind;
use crate::sim::{SimTime, Simulator};
use crate::spell::ActionId;
use crate::timer::TimerBank;
use crate::unit::UnitId;
use std::cmp::Ordering;
use tracing::{debug, info};

/// 护甲减益延迟：主目标有破甲类减益时，未指定时刻的输出型大招首次使用推迟这么久。
pub const ARMOR_DEBUFF_DELAY: SimTime = SimTime::from_secs(10);

#[derive(Default)]
pub struct MajorCooldownManager {
    initial: Vec<MajorCooldownTemplate>,
    cooldowns: Vec<MajorCooldown>,
    finalized: bool,
}

impl MajorCooldownManager {
    /// 注册大招。技能驱动的字段应已由调用方从技能解析好。
    pub(crate) fn add(&mut self, config: MajorCooldownConfig) -> Result<(), ConfigError> {
        if self.finalized {
            return Err(ConfigError::Finalized {
                what: "major cooldown",
            });
        }
        let Some(action_id) = config.action_id.filter(|a| !a.is_none()) else {
            return Err(ConfigError::MissingActionId);
        };
        let Some(activation_factory) = config.activation_factory else {
            return Err(ConfigError::MissingActivation(action_id));
        };
        self.initial.push(MajorCooldownTemplate {
            action_id,
            spell: config.spell,
            cooldown: config.cooldown,
            shared_cooldown: config.shared_cooldown,
            uses_gcd: config.uses_gcd,
            cast_time: config.cast_time,
            priority: config.priority,
            kind: config.kind,
            can_activate: config.can_activate,
            should_activate: config.should_activate,
            activation_factory,
            timings: config.timings,
        });
        Ok(())
    }

    /// 为已注册的大招设置固定使用时刻。
    pub fn set_timings(&mut self, action_id: ActionId, timings: Vec<SimTime>) -> Result<(), ConfigError> {
        if self.finalized {
            return Err(ConfigError::Finalized {
                what: "cooldown timings",
            });
        }
        match self.initial.iter_mut().find(|t| t.action_id == action_id) {
            Some(t) => {
                t.timings = timings;
                Ok(())
            }
            None => Err(ConfigError::Invalid(format!(
                "no major cooldown registered for {action_id}"
            ))),
        }
    }

    /// 没有固定时刻的输出型大招，首次使用推迟到 `delay`。
    pub fn delay_dps_cooldowns(&mut self, delay: SimTime) {
        for t in &mut self.initial {
            if t.timings.is_empty() && t.kind == CooldownType::Dps {
                t.timings.push(delay);
            }
        }
    }

    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// 由模板重建冷却列表（此时管理器已从单位上取出）。
    pub(crate) fn reset(&mut self, world: &CombatWorld, unit: UnitId) {
        self.cooldowns = self
            .initial
            .iter()
            .map(|t| MajorCooldown::from_template(t, world, unit))
            .collect();
        self.update(&world.unit(unit).timers);
    }

    /// 按（就绪时间升序，优先级降序）重新排序。
    pub fn update(&mut self, timers: &TimerBank) {
        self.cooldowns.sort_by(|a, b| compare(a, b, timers));
    }

    pub fn is_sorted(&self, timers: &TimerBank) -> bool {
        self.cooldowns
            .windows(2)
            .all(|w| compare(&w[0], &w[1], timers) != Ordering::Greater)
    }

    pub fn len(&self) -> usize {
        self.cooldowns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cooldowns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MajorCooldown> {
        self.cooldowns.iter()
    }

    pub fn get(&self, action_id: ActionId) -> Option<&MajorCooldown> {
        self.cooldowns.iter().find(|m| m.action_id == action_id)
    }

    pub fn has(&self, action_id: ActionId) -> bool {
        self.initial.iter().any(|t| t.action_id == action_id)
    }

    pub fn ids(&self) -> Vec<ActionId> {
        self.initial.iter().map(|t| t.action_id).collect()
    }

    pub fn disable(&mut self, action_id: ActionId) {
        if let Some(m) = self.cooldowns.iter_mut().find(|m| m.action_id == action_id) {
            m.set_disabled(true);
        }
    }

    pub fn enable(&mut self, action_id: ActionId) {
        if let Some(m) = self.cooldowns.iter_mut().find(|m| m.action_id == action_id) {
            m.set_disabled(false);
        }
    }

    /// 禁用所有当前启用的大招（`Unknown` 表示不限类型），返回被本次禁用的列表。
    pub fn disable_all_enabled(&mut self, kind: CooldownType) -> Vec<ActionId> {
        let mut disabled = Vec::new();
        for m in &mut self.cooldowns {
            if m.is_enabled() && (kind == CooldownType::Unknown || m.kind == kind) {
                m.set_disabled(true);
                disabled.push(m.action_id);
            }
        }
        disabled
    }

    pub fn enable_all(&mut self, ids: &[ActionId]) {
        for id in ids {
            self.enable(*id);
        }
    }
}

fn compare(a: &MajorCooldown, b: &MajorCooldown, timers: &TimerBank) -> Ordering {
    a.ready_at(timers)
        .cmp(&b.ready_at(timers))
        .then_with(|| b.priority.total_cmp(&a.priority))
}

/// 在单位身上借出管理器执行 `f`（规避同时借用单位与世界）。
fn with_manager<R>(
    world: &mut CombatWorld,
    unit: UnitId,
    f: impl FnOnce(&mut MajorCooldownManager, &mut CombatWorld) -> R,
) -> R {
    let mut mgr = std::mem::take(&mut world.unit_mut(unit).cooldowns);
    let r = f(&mut mgr, world);
    world.unit_mut(unit).cooldowns = mgr;
    r
}

/// 迭代重置：重建单位的大招列表。
pub(crate) fn reset_major_cooldowns(world: &mut CombatWorld, unit: UnitId) {
    with_manager(world, unit, |mgr, world| mgr.reset(world, unit));
}

/// 自动使用已就绪的大招。用掉一个占 GCD 的大招后停止，避免浪费后面的。
#[tracing::instrument(skip(sim, world), fields(now = ?sim.now()))]
pub fn try_use_major_cooldowns(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId) {
    with_manager(world, unit, |mgr, world| {
        let mut any_used = false;
        let mut idx = 0;
        while idx < mgr.cooldowns.len()
            && mgr.cooldowns[idx].is_ready(&world.unit(unit).timers, sim.now())
        {
            let mcd = &mut mgr.cooldowns[idx];
            if mcd.try_activate(sim, world, unit, false) {
                any_used = true;
                log_usage(sim, world, unit, mcd);
                if mcd.uses_gcd {
                    break;
                }
            }
            idx += 1;
        }
        if any_used {
            mgr.update(&world.unit(unit).timers);
        }
    });
}

/// 手动使用指定大招（无视禁用标记），返回是否激活。
pub fn activate_major_cooldown(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit: UnitId,
    action_id: ActionId,
) -> bool {
    with_manager(world, unit, |mgr, world| {
        let now = sim.now();
        let Some(idx) = mgr.cooldowns.iter().position(|m| m.action_id == action_id) else {
            return false;
        };
        if !mgr.cooldowns[idx].is_ready(&world.unit(unit).timers, now) {
            return false;
        }
        let mcd = &mut mgr.cooldowns[idx];
        let used = mcd.try_activate(sim, world, unit, true);
        if used {
            log_usage(sim, world, unit, mcd);
            mgr.update(&world.unit(unit).timers);
        }
        used
    })
}

fn log_usage(sim: &Simulator, world: &mut CombatWorld, unit: UnitId, mcd: &MajorCooldown) {
    info!(unit = unit.0, action = %mcd.action_id, usage = mcd.usages(), now = ?sim.now(), "使用大招");
    if world.logging() {
        world.log_event(
            sim.now(),
            unit,
            CombatEventKind::MajorCooldownUsed {
                action: mcd.action_id,
                usage: mcd.usages() as u32,
            },
        );
    }
    debug!(remaining = ?mcd.time_to_ready(&world.unit(unit).timers, sim.now()), "大招进入冷却");
}
