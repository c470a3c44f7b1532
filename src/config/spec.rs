//! 仿真配置文件（JSON）
//!
//! 可选字段一律 `#[serde(default)]`；带数据的枚举按 `kind` 打标签。

use crate::cooldown::CooldownType;
use crate::error::SimError;
use crate::resource::ResourceKind;
use crate::spell::SpellSchool;
use crate::stats::Stats;
use crate::unit::MobType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub iterations: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    pub encounter: EncounterSpec,
    pub player: PlayerSpec,
}

impl SimSpec {
    pub fn from_json(raw: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, SimError> {
        let raw = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSpec {
    pub duration_secs: f64,
    pub targets: Vec<TargetSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub mob_type: MobType,
    #[serde(default)]
    pub armor: Option<f64>,
    /// 其它属性（主要是各系抗性）。
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub debuffs: Vec<EffectSpec>,
}

/// 按名字引用注册表中的增益/减益，`value` 是可选参数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSpec {
    pub name: String,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub buffs: Vec<EffectSpec>,
    #[serde(default)]
    pub resources: ResourcesSpec,
    #[serde(default)]
    pub spells: Vec<SpellSpec>,
    /// 按优先级排列的技能名。
    #[serde(default)]
    pub rotation: Vec<String>,
    #[serde(default)]
    pub cooldowns: Vec<CooldownSpec>,
    #[serde(default)]
    pub in_front_of_target: bool,
    /// 主目标带护甲减益时，未指定时刻的输出型大招推迟首次使用。
    #[serde(default)]
    pub delay_dps_cooldowns_for_armor_debuffs: bool,
    #[serde(default)]
    pub weapon_speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesSpec {
    #[serde(default)]
    pub energy: Option<EnergySpec>,
    #[serde(default)]
    pub rage: Option<RageSpec>,
    #[serde(default)]
    pub mana: Option<ManaSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergySpec {
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub initial: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RageSpec {
    #[serde(default)]
    pub initial: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManaSpec {
    /// 是否有 MP5 回复跳动
    #[serde(default = "default_true")]
    pub regen: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellSpec {
    pub name: String,
    pub id: u32,
    #[serde(default)]
    pub school: SpellSchool,
    #[serde(default)]
    pub resource: Option<ResourceKind>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub cast_time_secs: f64,
    /// 缺省为 1.5 秒
    #[serde(default)]
    pub gcd_secs: Option<f64>,
    #[serde(default)]
    pub cooldown_secs: Option<f64>,
    #[serde(default)]
    pub ignore_haste: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub refund_on_miss: f64,
    #[serde(default)]
    pub damage: DamageSpec,
    #[serde(default)]
    pub outcome: OutcomeSpec,
    #[serde(default)]
    pub crit_multiplier: Option<f64>,
    #[serde(default = "default_one")]
    pub threat_multiplier: f64,
    #[serde(default)]
    pub flat_threat: f64,
    /// 命中全部目标（可限制个数）
    #[serde(default)]
    pub aoe: Option<AoeSpec>,
    #[serde(default)]
    pub dot: Option<DotSpec>,
}

fn default_one() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AoeSpec {
    #[serde(default)]
    pub max_targets: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DotSpec {
    pub num_ticks: u32,
    pub tick_secs: f64,
    pub damage: DamageSpec,
    /// 施放时是否先结算一次直接效果（`damage`/`outcome`）。
    #[serde(default)]
    pub with_initial_hit: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DamageSpec {
    #[default]
    None,
    Flat {
        amount: f64,
    },
    Roll {
        min: f64,
        max: f64,
    },
    SpellPower {
        min: f64,
        max: f64,
        coefficient: f64,
    },
    AttackPower {
        #[serde(default)]
        flat: f64,
        coefficient: f64,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSpec {
    #[default]
    AlwaysHit,
    MagicHit,
    MagicHitAndCrit,
    MagicCrit,
    MeleeSpecial,
    MeleeWhite,
    Ranged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CooldownSpec {
    /// 施放玩家的某个技能。
    Spell {
        spell: String,
        #[serde(default)]
        priority: f64,
        #[serde(default)]
        cooldown_type: CooldownType,
        #[serde(default)]
        timings_secs: Vec<f64>,
    },
    /// 不占 GCD 的自身增益（饰品、药水、嗜血之类）。
    Buff {
        id: u32,
        name: String,
        duration_secs: f64,
        cooldown_secs: f64,
        #[serde(default)]
        stats: Stats,
        #[serde(default)]
        cast_speed_multiplier: Option<f64>,
        #[serde(default)]
        damage_multiplier: Option<f64>,
        #[serde(default)]
        priority: f64,
        #[serde(default)]
        cooldown_type: CooldownType,
        #[serde(default)]
        timings_secs: Vec<f64>,
    },
}
