//! 常用的光环行为
//!
//! 属性增益、按系别的承伤倍率、被暴击加成。注册表里的增益/减益与
//! 配置文件中的大招都由它们组合而成。

use super::aura::AuraBehavior;
use crate::encounter::CombatWorld;
use crate::sim::Simulator;
use crate::spell::{SpellEffect, SpellId, SpellSchool};
use crate::stats::Stats;
use crate::unit::UnitId;

/// 持续期间加属性和倍率，到期时原样扣回。
#[derive(Debug, Clone, PartialEq)]
pub struct StatBuff {
    pub stats: Stats,
    pub cast_speed_multiplier: f64,
    pub damage_multiplier: f64,
}

impl StatBuff {
    pub fn new(stats: Stats) -> Self {
        Self {
            stats,
            cast_speed_multiplier: 1.0,
            damage_multiplier: 1.0,
        }
    }

    pub fn with_cast_speed(mut self, multiplier: f64) -> Self {
        self.cast_speed_multiplier = multiplier;
        self
    }

    pub fn with_damage(mut self, multiplier: f64) -> Self {
        self.damage_multiplier = multiplier;
        self
    }
}

impl AuraBehavior for StatBuff {
    fn on_gain(&mut self, _sim: &mut Simulator, world: &mut CombatWorld, host: UnitId) {
        let unit = world.unit_mut(host);
        unit.add_stats(&self.stats);
        unit.pseudo.cast_speed_multiplier *= self.cast_speed_multiplier;
        unit.pseudo.damage_dealt_multiplier *= self.damage_multiplier;
    }

    fn on_expire(&mut self, _sim: &mut Simulator, world: &mut CombatWorld, host: UnitId) {
        let unit = world.unit_mut(host);
        unit.remove_stats(&self.stats);
        unit.pseudo.cast_speed_multiplier /= self.cast_speed_multiplier;
        unit.pseudo.damage_dealt_multiplier /= self.damage_multiplier;
    }
}

/// 挂在目标上：指定系别的伤害（含周期跳伤）乘以倍率。
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolDamageTaken {
    pub schools: Vec<SpellSchool>,
    pub multiplier: f64,
}

impl AuraBehavior for SchoolDamageTaken {
    fn on_before_spell_hit(
        &mut self,
        _sim: &mut Simulator,
        world: &mut CombatWorld,
        host: UnitId,
        spell: SpellId,
        effect: &mut SpellEffect,
    ) {
        if effect.target != host {
            return;
        }
        if self.schools.contains(&world.spell(spell).school) {
            effect.damage_multiplier *= self.multiplier;
        }
    }
}

/// 挂在目标上：攻击者对它的暴击等级加成（非物理）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpellCritTaken {
    pub rating: f64,
}

impl AuraBehavior for SpellCritTaken {
    fn on_before_spell_hit(
        &mut self,
        _sim: &mut Simulator,
        world: &mut CombatWorld,
        host: UnitId,
        spell: SpellId,
        effect: &mut SpellEffect,
    ) {
        if effect.target == host && !world.spell(spell).school.is_physical() {
            effect.bonus_crit_rating += self.rating;
        }
    }
}
