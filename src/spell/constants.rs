//! 等级 70 的换算常数。

use crate::sim::SimTime;

pub const MELEE_HIT_RATING_PER_HIT_CHANCE: f64 = 15.77;
pub const MELEE_CRIT_RATING_PER_CRIT_CHANCE: f64 = 22.08;
pub const SPELL_HIT_RATING_PER_HIT_CHANCE: f64 = 12.62;
pub const SPELL_CRIT_RATING_PER_CRIT_CHANCE: f64 = 22.08;
/// 每 0.25% 躲闪/招架削减所需的精准等级。
pub const EXPERTISE_PER_QUARTER_PERCENT_REDUCTION: f64 = 3.9425;
pub const HASTE_RATING_PER_HASTE_PERCENT: f64 = 15.77;

pub const GCD_DEFAULT: SimTime = SimTime::from_millis(1500);
pub const GCD_MIN: SimTime = SimTime::from_millis(1000);

pub const SPELL_MAX_HIT_CHANCE: f64 = 0.99;
pub const GLANCE_MULTIPLIER: f64 = 0.75;
pub const DEFAULT_CRIT_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_SPELL_CRIT_MULTIPLIER: f64 = 1.5;

/// 护甲减伤上限。
pub const ARMOR_MITIGATION_CAP: f64 = 0.75;

pub const DEFAULT_ATTACKER_LEVEL: u32 = 70;

/// 攻击者等级决定的护甲常数：`400 + 85 × (L + 4.5 × (L − 59))`。
pub fn armor_constant(attacker_level: u32) -> f64 {
    let l = attacker_level as f64;
    400.0 + 85.0 * (l + 4.5 * (l - 59.0))
}

/// 护甲减伤比例。
pub fn armor_mitigation(armor: f64, attacker_level: u32) -> f64 {
    let armor = armor.max(0.0);
    (armor / (armor + armor_constant(attacker_level))).min(ARMOR_MITIGATION_CAP)
}

/// 平均部分抵抗比例（非二元法术）。
pub fn average_resistance(resistance: f64, attacker_level: u32) -> f64 {
    let r = resistance.max(0.0);
    (r / (attacker_level as f64 * 5.0) * 0.75).min(0.75)
}
