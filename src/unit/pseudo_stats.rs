//! 伪属性：不进属性向量、但会被结算流程读取的倍率与加成。

use crate::spell::SpellSchool;

#[derive(Debug, Clone, PartialEq)]
pub struct PseudoStats {
    pub damage_dealt_multiplier: f64,
    pub school_damage_dealt_multiplier: [f64; SpellSchool::COUNT],
    pub ranged_damage_dealt_multiplier: f64,

    pub damage_taken_multiplier: f64,
    pub school_damage_taken_multiplier: [f64; SpellSchool::COUNT],
    pub periodic_physical_damage_taken_multiplier: f64,
    pub bonus_physical_damage_taken: f64,
    pub bonus_holy_damage_taken: f64,

    pub threat_multiplier: f64,
    /// 施法速度倍率（>1 更快）。
    pub cast_speed_multiplier: f64,

    // 作为目标时提供给攻击者的等级加成（如十字军审判、冬之寒冰）
    pub bonus_melee_hit_rating_taken: f64,
    pub bonus_spell_hit_rating_taken: f64,
    pub bonus_crit_rating_taken: f64,
    pub bonus_spell_crit_rating_taken: f64,
    pub bonus_frost_crit_rating_taken: f64,

    // 作为攻击者
    pub bonus_melee_crit_rating: f64,
    pub bonus_ranged_crit_rating: f64,
    pub bonus_fire_crit_rating: f64,
    /// 对恶魔/亡灵目标额外的攻击强度与法术强度。
    pub mob_type_attack_power: f64,
    pub mob_type_spell_power: f64,

    /// 主手武器速度（秒），用于 PPM 和怒气换算。
    pub weapon_speed: f64,
    pub in_front_of_target: bool,
}

impl Default for PseudoStats {
    fn default() -> Self {
        Self {
            damage_dealt_multiplier: 1.0,
            school_damage_dealt_multiplier: [1.0; SpellSchool::COUNT],
            ranged_damage_dealt_multiplier: 1.0,
            damage_taken_multiplier: 1.0,
            school_damage_taken_multiplier: [1.0; SpellSchool::COUNT],
            periodic_physical_damage_taken_multiplier: 1.0,
            bonus_physical_damage_taken: 0.0,
            bonus_holy_damage_taken: 0.0,
            threat_multiplier: 1.0,
            cast_speed_multiplier: 1.0,
            bonus_melee_hit_rating_taken: 0.0,
            bonus_spell_hit_rating_taken: 0.0,
            bonus_crit_rating_taken: 0.0,
            bonus_spell_crit_rating_taken: 0.0,
            bonus_frost_crit_rating_taken: 0.0,
            bonus_melee_crit_rating: 0.0,
            bonus_ranged_crit_rating: 0.0,
            bonus_fire_crit_rating: 0.0,
            mob_type_attack_power: 0.0,
            mob_type_spell_power: 0.0,
            weapon_speed: 2.0,
            in_front_of_target: false,
        }
    }
}

impl PseudoStats {
    pub fn damage_dealt(&self, school: SpellSchool) -> f64 {
        self.damage_dealt_multiplier * self.school_damage_dealt_multiplier[school.index()]
    }
}
