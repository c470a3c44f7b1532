//! 法术系别

use crate::stats::Stat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellSchool {
    #[default]
    Physical,
    Arcane,
    Fire,
    Frost,
    Holy,
    Nature,
    Shadow,
}

impl SpellSchool {
    pub const COUNT: usize = 7;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn is_physical(self) -> bool {
        self == SpellSchool::Physical
    }

    /// 该系别专属的法术强度属性。
    pub fn power_stat(self) -> Option<Stat> {
        match self {
            SpellSchool::Physical => None,
            SpellSchool::Arcane => Some(Stat::ArcaneSpellPower),
            SpellSchool::Fire => Some(Stat::FireSpellPower),
            SpellSchool::Frost => Some(Stat::FrostSpellPower),
            SpellSchool::Holy => Some(Stat::HolySpellPower),
            SpellSchool::Nature => Some(Stat::NatureSpellPower),
            SpellSchool::Shadow => Some(Stat::ShadowSpellPower),
        }
    }

    /// 目标用于部分抵抗的抗性属性；物理与神圣没有。
    pub fn resistance_stat(self) -> Option<Stat> {
        match self {
            SpellSchool::Arcane => Some(Stat::ArcaneResistance),
            SpellSchool::Fire => Some(Stat::FireResistance),
            SpellSchool::Frost => Some(Stat::FrostResistance),
            SpellSchool::Nature => Some(Stat::NatureResistance),
            SpellSchool::Shadow => Some(Stat::ShadowResistance),
            SpellSchool::Physical | SpellSchool::Holy => None,
        }
    }
}
