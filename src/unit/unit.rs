//! 战斗单位
//!
//! 玩家与目标是同一个结构，靠 `UnitKind` 区分。单位持有自己的属性、
//! 光环、计时器、资源条和大招冷却管理器；代理（若有）也挂在这里。

use super::agent::UnitBehavior;
use super::metrics::UnitMetrics;
use super::pseudo_stats::PseudoStats;
use crate::aura::AuraTracker;
use crate::cooldown::MajorCooldownManager;
use crate::error::ConfigError;
use crate::resource::{EnergyBar, ManaBar, RageBar, ResourceKind};
use crate::sim::SimTime;
use crate::spell::constants::HASTE_RATING_PER_HASTE_PERCENT;
use crate::spell::{AttackTable, SpellId, SpellSchool};
use crate::stats::{Stat, StatDependencyManager, Stats};
use crate::timer::{Timer, TimerBank};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 单位标识（`CombatWorld::units` 下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct UnitId(pub usize);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Player,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobType {
    #[default]
    Unknown,
    Beast,
    Demon,
    Dragonkin,
    Elemental,
    Giant,
    Humanoid,
    Mechanical,
    Undead,
}

impl MobType {
    /// 对恶魔与亡灵生效的额外强度。
    pub fn is_demon_or_undead(self) -> bool {
        matches!(self, MobType::Demon | MobType::Undead)
    }
}

/// 正在进行的读条。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastInProgress {
    pub seq: u64,
    pub spell: SpellId,
    pub target: UnitId,
    pub started_at: SimTime,
    pub completes_at: SimTime,
}

pub struct Unit {
    pub id: UnitId,
    pub label: String,
    pub kind: UnitKind,
    pub level: u32,
    pub mob_type: MobType,
    /// 目标在遭遇中的序号（玩家为 None）。
    pub target_index: Option<usize>,

    pub base_stats: Stats,
    pub stat_dependencies: StatDependencyManager,
    initial_stats: Stats,
    pub stats: Stats,
    initial_pseudo: PseudoStats,
    pub pseudo: PseudoStats,
    pub table: AttackTable,

    pub auras: AuraTracker,
    pub timers: TimerBank,
    pub gcd: Timer,
    pub energy: Option<EnergyBar>,
    pub rage: Option<RageBar>,
    pub mana: Option<ManaBar>,
    pub cooldowns: MajorCooldownManager,
    pub agent: Option<Box<dyn UnitBehavior>>,
    pub spells: Vec<SpellId>,

    pub casting: Option<CastInProgress>,
    pub(crate) cast_seq: u64,
    pub(crate) turn_seq: u64,
    pub(crate) turn_pending: Option<SimTime>,

    pub metrics: UnitMetrics,
    finalized: bool,
}

impl Unit {
    pub fn new(id: UnitId, label: impl Into<String>, kind: UnitKind, level: u32) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            level,
            mob_type: MobType::Unknown,
            target_index: None,
            base_stats: Stats::default(),
            stat_dependencies: StatDependencyManager::default(),
            initial_stats: Stats::default(),
            stats: Stats::default(),
            initial_pseudo: PseudoStats::default(),
            pseudo: PseudoStats::default(),
            table: AttackTable::default(),
            auras: AuraTracker::default(),
            timers: TimerBank::default(),
            gcd: Timer::default(),
            energy: None,
            rage: None,
            mana: None,
            cooldowns: MajorCooldownManager::default(),
            agent: None,
            spells: Vec::new(),
            casting: None,
            cast_seq: 0,
            turn_seq: 0,
            turn_pending: None,
            metrics: UnitMetrics::default(),
            finalized: false,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == UnitKind::Player
    }

    pub fn is_target(&self) -> bool {
        self.kind == UnitKind::Target
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn add_base_stats(&mut self, stats: &Stats) -> Result<(), ConfigError> {
        if self.finalized {
            return Err(ConfigError::Finalized { what: "base stats" });
        }
        self.base_stats += *stats;
        Ok(())
    }

    /// 定版：应用属性依赖，快照初始属性/伪属性，按法力属性设置法力上限。
    pub(crate) fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.stat_dependencies.finalize();
        self.initial_stats = self.stat_dependencies.apply(&self.base_stats);
        self.stats = self.initial_stats;
        self.initial_pseudo = self.pseudo.clone();
        if let Some(mana) = &mut self.mana {
            mana.set_max(self.initial_stats[Stat::Mana]);
        }
        self.cooldowns.finalize();
        self.finalized = true;
    }

    pub fn initial_stats(&self) -> &Stats {
        &self.initial_stats
    }

    /// 迭代间重置（不含大招冷却管理器与代理，它们需要访问整个世界）。
    pub(crate) fn reset(&mut self) {
        self.stats = self.initial_stats;
        self.pseudo = self.initial_pseudo.clone();
        self.auras.reset();
        self.timers.reset();
        self.gcd.reset();
        if let Some(bar) = &mut self.energy {
            bar.reset();
        }
        if let Some(bar) = &mut self.rage {
            bar.reset();
        }
        if let Some(bar) = &mut self.mana {
            bar.reset();
        }
        self.casting = None;
        self.turn_pending = None;
        self.metrics = UnitMetrics::default();
    }

    /// 临时属性变化（光环等）。派生依赖不会重新计算。
    pub fn add_stats(&mut self, stats: &Stats) {
        self.stats += *stats;
    }

    pub fn remove_stats(&mut self, stats: &Stats) {
        self.stats -= *stats;
    }

    /// 当前可用资源；没有对应资源条返回 None。
    pub fn resource_available(&self, kind: ResourceKind) -> Option<f64> {
        match kind {
            ResourceKind::Energy => self.energy.as_ref().map(|b| b.current()),
            ResourceKind::Rage => self.rage.as_ref().map(|b| b.current()),
            ResourceKind::Mana => self.mana.as_ref().map(|b| b.current()),
        }
    }

    pub fn spell_power(&self, school: SpellSchool) -> f64 {
        let mut sp = self.stats[Stat::SpellPower];
        if let Some(stat) = school.power_stat() {
            sp += self.stats[stat];
        }
        sp
    }

    /// 综合施法速度（急速等级 × 伪属性倍率）。
    pub fn cast_speed(&self) -> f64 {
        let haste = self.stats[Stat::SpellHaste] / (HASTE_RATING_PER_HASTE_PERCENT * 100.0);
        self.pseudo.cast_speed_multiplier * (1.0 + haste)
    }

    pub fn is_casting(&self) -> bool {
        self.casting.is_some()
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
