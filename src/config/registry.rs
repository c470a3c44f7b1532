//! 增益/减益注册表
//!
//! 名字 -> 安装函数。没有全局初始化副作用：调用方构造一个注册表，
//! 按引用交给构建函数。安装函数在定版前调用，向单位写入永久光环或
//! 属性依赖。

use crate::aura::{
    Aura, AuraBehavior, AuraFactory, AuraId, SchoolDamageTaken, SpellCritTaken, StatBuff,
};
use crate::encounter::CombatWorld;
use crate::error::ConfigError;
use crate::resource::{self, ResourceKind};
use crate::sim::Simulator;
use crate::spell::constants::SPELL_CRIT_RATING_PER_CRIT_CHANCE;
use crate::spell::{ActionId, SpellEffect, SpellId, SpellSchool};
use crate::stats::{Stat, Stats};
use crate::unit::UnitId;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const MISERY_AURA: AuraId = AuraId(1);
pub const CURSE_OF_ELEMENTS_AURA: AuraId = AuraId(2);
pub const IMPROVED_SEAL_OF_THE_CRUSADER_AURA: AuraId = AuraId(3);
pub const JUDGEMENT_OF_WISDOM_AURA: AuraId = AuraId(4);
pub const IMPROVED_SHADOW_BOLT_AURA: AuraId = AuraId(5);
pub const SUNDER_ARMOR_AURA: AuraId = AuraId(6);
pub const EXPOSE_ARMOR_AURA: AuraId = AuraId(7);
pub const FAERIE_FIRE_AURA: AuraId = AuraId(8);
pub const BATTLE_SHOUT_AURA: AuraId = AuraId(20);

/// 破甲与破甲攻击互斥
pub const SUNDER_EXPOSE_TAG: &str = "sunder_expose";

pub const SUNDER_ARMOR_REDUCTION: f64 = 2600.0;
pub const EXPOSE_ARMOR_REDUCTION: f64 = 2050.0;
pub const FAERIE_FIRE_REDUCTION: f64 = 610.0;
pub const BATTLE_SHOUT_ATTACK_POWER: f64 = 305.0;
/// 智慧审判每次命中期望回复（74 点，50% 触发）
pub const JUDGEMENT_OF_WISDOM_MANA: f64 = 37.0;

/// 安装函数：(世界, 宿主单位, 可选参数)。
pub type EffectInstaller =
    Arc<dyn Fn(&mut CombatWorld, UnitId, Option<f64>) -> Result<(), ConfigError> + Send + Sync>;

#[derive(Clone)]
struct Entry {
    install: EffectInstaller,
    reduces_armor: bool,
}

#[derive(Clone, Default)]
pub struct EffectRegistry {
    debuffs: BTreeMap<String, Entry>,
    buffs: BTreeMap<String, Entry>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_debuff(&mut self, name: impl Into<String>, install: EffectInstaller) {
        self.debuffs.insert(
            name.into(),
            Entry {
                install,
                reduces_armor: false,
            },
        );
    }

    /// 会降低护甲的减益（影响输出型大招的推迟规则）。
    pub fn register_armor_debuff(&mut self, name: impl Into<String>, install: EffectInstaller) {
        self.debuffs.insert(
            name.into(),
            Entry {
                install,
                reduces_armor: true,
            },
        );
    }

    pub fn register_buff(&mut self, name: impl Into<String>, install: EffectInstaller) {
        self.buffs.insert(
            name.into(),
            Entry {
                install,
                reduces_armor: false,
            },
        );
    }

    pub fn has_debuff(&self, name: &str) -> bool {
        self.debuffs.contains_key(name)
    }

    pub fn has_buff(&self, name: &str) -> bool {
        self.buffs.contains_key(name)
    }

    pub fn is_armor_debuff(&self, name: &str) -> bool {
        self.debuffs.get(name).is_some_and(|e| e.reduces_armor)
    }

    pub fn debuff_names(&self) -> impl Iterator<Item = &str> {
        self.debuffs.keys().map(String::as_str)
    }

    pub fn buff_names(&self) -> impl Iterator<Item = &str> {
        self.buffs.keys().map(String::as_str)
    }

    pub fn apply_debuff(
        &self,
        world: &mut CombatWorld,
        target: UnitId,
        name: &str,
        value: Option<f64>,
    ) -> Result<(), ConfigError> {
        let entry = self
            .debuffs
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEffect(name.to_string()))?;
        (entry.install)(world, target, value)
    }

    pub fn apply_buff(
        &self,
        world: &mut CombatWorld,
        unit: UnitId,
        name: &str,
        value: Option<f64>,
    ) -> Result<(), ConfigError> {
        let entry = self
            .buffs
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEffect(name.to_string()))?;
        (entry.install)(world, unit, value)
    }

    pub fn with_defaults() -> Self {
        let mut r = Self::new();

        r.register_debuff(
            "misery",
            permanent(MISERY_AURA, "Misery", |_| {
                Box::new(SchoolDamageTaken {
                    schools: magic_schools(),
                    multiplier: 1.05,
                })
            }),
        );
        r.register_debuff(
            "curse_of_elements",
            permanent(CURSE_OF_ELEMENTS_AURA, "Curse of the Elements", |value| {
                Box::new(SchoolDamageTaken {
                    schools: vec![
                        SpellSchool::Arcane,
                        SpellSchool::Fire,
                        SpellSchool::Frost,
                        SpellSchool::Shadow,
                    ],
                    multiplier: value.unwrap_or(1.10),
                })
            }),
        );
        r.register_debuff(
            "improved_seal_of_the_crusader",
            permanent(
                IMPROVED_SEAL_OF_THE_CRUSADER_AURA,
                "Improved Seal of the Crusader",
                |_| {
                    Box::new(SpellCritTaken {
                        rating: 3.0 * SPELL_CRIT_RATING_PER_CRIT_CHANCE,
                    })
                },
            ),
        );
        r.register_debuff(
            "judgement_of_wisdom",
            permanent(JUDGEMENT_OF_WISDOM_AURA, "Judgement of Wisdom", |value| {
                Box::new(JudgementOfWisdom {
                    mana: value.unwrap_or(JUDGEMENT_OF_WISDOM_MANA),
                })
            }),
        );
        r.register_debuff(
            "improved_shadow_bolt",
            permanent(IMPROVED_SHADOW_BOLT_AURA, "Improved Shadow Bolt", |value| {
                let uptime = value.unwrap_or(1.0).clamp(0.0, 1.0);
                Box::new(SchoolDamageTaken {
                    schools: vec![SpellSchool::Shadow],
                    multiplier: 1.0 + 0.2 * uptime,
                })
            }),
        );
        r.register_armor_debuff(
            "sunder_armor",
            armor_debuff(SUNDER_ARMOR_AURA, "Sunder Armor", SUNDER_ARMOR_REDUCTION, true),
        );
        r.register_armor_debuff(
            "expose_armor",
            armor_debuff(EXPOSE_ARMOR_AURA, "Expose Armor", EXPOSE_ARMOR_REDUCTION, true),
        );
        r.register_armor_debuff(
            "faerie_fire",
            armor_debuff(FAERIE_FIRE_AURA, "Faerie Fire", FAERIE_FIRE_REDUCTION, false),
        );

        r.register_buff(
            "blessing_of_kings",
            Arc::new(|world: &mut CombatWorld, unit: UnitId, value: Option<f64>| {
                let multiplier = value.unwrap_or(1.10);
                let deps = &mut world.unit_mut(unit).stat_dependencies;
                for stat in [
                    Stat::Strength,
                    Stat::Agility,
                    Stat::Stamina,
                    Stat::Intellect,
                    Stat::Spirit,
                ] {
                    deps.add_multiplier(stat, multiplier)?;
                }
                Ok(())
            }),
        );
        r.register_buff(
            "battle_shout",
            permanent(BATTLE_SHOUT_AURA, "Battle Shout", |value| {
                let ap = value.unwrap_or(BATTLE_SHOUT_ATTACK_POWER);
                Box::new(StatBuff::new(Stats::from_pairs(&[(Stat::AttackPower, ap)])))
            }),
        );
        r
    }
}

fn magic_schools() -> Vec<SpellSchool> {
    vec![
        SpellSchool::Arcane,
        SpellSchool::Fire,
        SpellSchool::Frost,
        SpellSchool::Holy,
        SpellSchool::Nature,
        SpellSchool::Shadow,
    ]
}

/// 安装一个每次迭代开始时激活的永久光环。
fn permanent(
    id: AuraId,
    label: &'static str,
    behavior: fn(Option<f64>) -> Box<dyn AuraBehavior>,
) -> EffectInstaller {
    Arc::new(move |world: &mut CombatWorld, unit: UnitId, value: Option<f64>| {
        let factory: AuraFactory = Arc::new(move |_unit: UnitId| {
            let mut aura = Aura::new(id, label);
            aura.behavior = behavior(value);
            aura
        });
        world.unit_mut(unit).auras.add_permanent(factory)
    })
}

fn armor_debuff(id: AuraId, label: &'static str, default_reduction: f64, sunder_expose: bool) -> EffectInstaller {
    Arc::new(move |world: &mut CombatWorld, unit: UnitId, value: Option<f64>| {
        let reduction = value.unwrap_or(default_reduction);
        let factory: AuraFactory = Arc::new(move |_unit: UnitId| {
            let aura = Aura::new(id, label)
                .with_behavior(StatBuff::new(Stats::from_pairs(&[(Stat::Armor, -reduction)])));
            if sunder_expose {
                aura.with_tag(SUNDER_EXPOSE_TAG, true)
            } else {
                aura
            }
        });
        world.unit_mut(unit).auras.add_permanent(factory)
    })
}

/// 目标被法术命中时，攻击者（有法力条的）回复法力。
#[derive(Debug, Clone, Copy)]
struct JudgementOfWisdom {
    mana: f64,
}

impl AuraBehavior for JudgementOfWisdom {
    fn on_spell_hit(
        &mut self,
        sim: &mut Simulator,
        world: &mut CombatWorld,
        host: UnitId,
        spell: SpellId,
        effect: &mut SpellEffect,
    ) {
        if effect.target != host || !effect.landed() {
            return;
        }
        let caster = world.spell(spell).unit;
        if world.unit(caster).mana.as_ref().is_some_and(|m| m.max() > 0.0) {
            resource::add_resource(
                sim,
                world,
                caster,
                ResourceKind::Mana,
                self.mana,
                ActionId::Spell(27164),
            );
        }
    }
}
