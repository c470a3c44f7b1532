//! 迭代报告与汇总统计
//!
//! 全部用 Vec / BTreeMap，序列化结果与哈希顺序无关，同一种子输出逐字节一致。

use super::world::CombatWorld;
use crate::resource::ResourceKind;
use crate::sim::SimTime;
use crate::spell::ActionId;
use crate::unit::{UnitId, UnitKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellTargetReport {
    pub target: usize,
    pub hits: u32,
    pub crits: u32,
    pub misses: u32,
    pub dodges: u32,
    pub parries: u32,
    pub blocks: u32,
    pub glances: u32,
    pub ticks: u32,
    pub damage: f64,
    pub threat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellReport {
    pub action: ActionId,
    pub label: String,
    pub casts: u32,
    pub damage: f64,
    pub threat: f64,
    pub targets: Vec<SpellTargetReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceReport {
    pub action: ActionId,
    pub resource: ResourceKind,
    pub gain_events: u32,
    pub requested: f64,
    pub gained: f64,
    pub spend_events: u32,
    pub spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuraReport {
    pub aura: u32,
    pub label: String,
    pub activations: u32,
    pub refreshes: u32,
    pub uptime_secs: f64,
    /// 占战斗时长的比例
    pub uptime_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooldownUsageReport {
    pub action: ActionId,
    pub usages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitReport {
    pub unit: usize,
    pub label: String,
    pub kind: UnitKind,
    pub damage: f64,
    pub dps: f64,
    pub threat: f64,
    pub spells: Vec<SpellReport>,
    pub resources: Vec<ResourceReport>,
    pub auras: Vec<AuraReport>,
    pub cooldowns: Vec<CooldownUsageReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationReport {
    pub iteration: u64,
    pub seed: u64,
    pub duration_secs: f64,
    pub units: Vec<UnitReport>,
}

impl IterationReport {
    /// 从迭代结束时的世界状态生成报告。
    pub fn collect(world: &CombatWorld, iteration: u64, seed: u64) -> Self {
        let duration = world.duration;
        let units = world
            .units
            .iter()
            .map(|u| unit_report(world, u.id, duration))
            .collect();
        Self {
            iteration,
            seed,
            duration_secs: duration.as_secs_f64(),
            units,
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitReport> {
        self.units.iter().find(|u| u.unit == id.0)
    }
}

fn unit_report(world: &CombatWorld, id: UnitId, duration: SimTime) -> UnitReport {
    let unit = world.unit(id);
    let secs = duration.as_secs_f64();

    let spells: Vec<SpellReport> = unit
        .spells
        .iter()
        .map(|sid| {
            let spell = world.spell(*sid);
            SpellReport {
                action: spell.action_id,
                label: spell.label.clone(),
                casts: spell.casts,
                damage: spell.total_damage(),
                threat: spell.total_threat(),
                targets: spell
                    .metrics
                    .iter()
                    .enumerate()
                    .map(|(target, m)| SpellTargetReport {
                        target,
                        hits: m.hits,
                        crits: m.crits,
                        misses: m.misses,
                        dodges: m.dodges,
                        parries: m.parries,
                        blocks: m.blocks,
                        glances: m.glances,
                        ticks: m.ticks,
                        damage: m.damage,
                        threat: m.threat,
                    })
                    .collect(),
            }
        })
        .collect();
    let damage: f64 = spells.iter().map(|s| s.damage).sum();
    let threat: f64 = spells.iter().map(|s| s.threat).sum();

    let resources = unit
        .metrics
        .resources
        .iter()
        .map(|((action, resource), m)| ResourceReport {
            action: *action,
            resource: *resource,
            gain_events: m.gain_events,
            requested: m.requested,
            gained: m.gained,
            spend_events: m.spend_events,
            spent: m.spent,
        })
        .collect();

    let auras = unit
        .auras
        .metrics()
        .iter()
        .map(|(id, m)| {
            let uptime_secs = m.uptime.as_secs_f64();
            AuraReport {
                aura: id.0,
                label: m.label.clone(),
                activations: m.activations,
                refreshes: m.refreshes,
                uptime_secs,
                uptime_pct: if secs > 0.0 { uptime_secs / secs } else { 0.0 },
            }
        })
        .collect();

    let cooldowns = unit
        .cooldowns
        .iter()
        .map(|m| CooldownUsageReport {
            action: m.action_id,
            usages: m.usages() as u32,
        })
        .collect();

    UnitReport {
        unit: id.0,
        label: unit.label.clone(),
        kind: unit.kind,
        damage,
        dps: if secs > 0.0 { damage / secs } else { 0.0 },
        threat,
        spells,
        resources,
        auras,
        cooldowns,
    }
}

/// 单个单位跨迭代的 DPS 统计。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpsSummary {
    pub unit: usize,
    pub label: String,
    pub mean: f64,
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSummary {
    pub iterations: u64,
    pub base_seed: u64,
    pub units: Vec<DpsSummary>,
}

impl SimSummary {
    /// 对每个玩家单位做均值、（总体）标准差、最小、最大。
    pub fn from_reports(reports: &[IterationReport], base_seed: u64) -> Self {
        let mut units = Vec::new();
        if let Some(first) = reports.first() {
            for u in first.units.iter().filter(|u| u.kind == UnitKind::Player) {
                let samples: Vec<f64> = reports
                    .iter()
                    .filter_map(|r| r.units.get(u.unit).map(|x| x.dps))
                    .collect();
                let n = samples.len() as f64;
                let mean = samples.iter().sum::<f64>() / n;
                let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
                units.push(DpsSummary {
                    unit: u.unit,
                    label: u.label.clone(),
                    mean,
                    stdev: var.sqrt(),
                    min: samples.iter().copied().fold(f64::INFINITY, f64::min),
                    max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                });
            }
        }
        Self {
            iterations: reports.len() as u64,
            base_seed,
            units,
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&DpsSummary> {
        self.units.iter().find(|u| u.unit == id.0)
    }
}

/// 一次完整运行的结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimResult {
    pub summary: SimSummary,
    pub iterations: Vec<IterationReport>,
}
