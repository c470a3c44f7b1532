//! 属性种类
//!
//! 固定、封闭的属性枚举；`Stats` 向量按这里的顺序存储。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 属性种类（主属性、法术强度、等级点数、抗性、资源上限）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Strength,
    Agility,
    Stamina,
    Intellect,
    Spirit,
    SpellPower,
    HealingPower,
    ArcaneSpellPower,
    FireSpellPower,
    FrostSpellPower,
    HolySpellPower,
    NatureSpellPower,
    ShadowSpellPower,
    Mp5,
    SpellHit,
    SpellCrit,
    SpellHaste,
    SpellPenetration,
    AttackPower,
    RangedAttackPower,
    MeleeHit,
    MeleeCrit,
    MeleeHaste,
    ArmorPenetration,
    Expertise,
    Mana,
    Energy,
    Rage,
    Armor,
    ArcaneResistance,
    FireResistance,
    FrostResistance,
    NatureResistance,
    ShadowResistance,
}

impl Stat {
    pub const LEN: usize = 34;

    pub const ALL: [Stat; Stat::LEN] = [
        Stat::Strength,
        Stat::Agility,
        Stat::Stamina,
        Stat::Intellect,
        Stat::Spirit,
        Stat::SpellPower,
        Stat::HealingPower,
        Stat::ArcaneSpellPower,
        Stat::FireSpellPower,
        Stat::FrostSpellPower,
        Stat::HolySpellPower,
        Stat::NatureSpellPower,
        Stat::ShadowSpellPower,
        Stat::Mp5,
        Stat::SpellHit,
        Stat::SpellCrit,
        Stat::SpellHaste,
        Stat::SpellPenetration,
        Stat::AttackPower,
        Stat::RangedAttackPower,
        Stat::MeleeHit,
        Stat::MeleeCrit,
        Stat::MeleeHaste,
        Stat::ArmorPenetration,
        Stat::Expertise,
        Stat::Mana,
        Stat::Energy,
        Stat::Rage,
        Stat::Armor,
        Stat::ArcaneResistance,
        Stat::FireResistance,
        Stat::FrostResistance,
        Stat::NatureResistance,
        Stat::ShadowResistance,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Stat::Strength => "Strength",
            Stat::Agility => "Agility",
            Stat::Stamina => "Stamina",
            Stat::Intellect => "Intellect",
            Stat::Spirit => "Spirit",
            Stat::SpellPower => "Spell Power",
            Stat::HealingPower => "Healing Power",
            Stat::ArcaneSpellPower => "Arcane Spell Power",
            Stat::FireSpellPower => "Fire Spell Power",
            Stat::FrostSpellPower => "Frost Spell Power",
            Stat::HolySpellPower => "Holy Spell Power",
            Stat::NatureSpellPower => "Nature Spell Power",
            Stat::ShadowSpellPower => "Shadow Spell Power",
            Stat::Mp5 => "MP5",
            Stat::SpellHit => "Spell Hit",
            Stat::SpellCrit => "Spell Crit",
            Stat::SpellHaste => "Spell Haste",
            Stat::SpellPenetration => "Spell Penetration",
            Stat::AttackPower => "Attack Power",
            Stat::RangedAttackPower => "Ranged Attack Power",
            Stat::MeleeHit => "Melee Hit",
            Stat::MeleeCrit => "Melee Crit",
            Stat::MeleeHaste => "Melee Haste",
            Stat::ArmorPenetration => "Armor Penetration",
            Stat::Expertise => "Expertise",
            Stat::Mana => "Mana",
            Stat::Energy => "Energy",
            Stat::Rage => "Rage",
            Stat::Armor => "Armor",
            Stat::ArcaneResistance => "Arcane Resistance",
            Stat::FireResistance => "Fire Resistance",
            Stat::FrostResistance => "Frost Resistance",
            Stat::NatureResistance => "Nature Resistance",
            Stat::ShadowResistance => "Shadow Resistance",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
