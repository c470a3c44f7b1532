//! 大招冷却管理

mod major;
mod manager;

pub use major::{
    ActivationFactory, COOLDOWN_PRIORITY_BLOODLUST, COOLDOWN_PRIORITY_DEFAULT,
    COOLDOWN_PRIORITY_DRUMS, COOLDOWN_PRIORITY_LOW, CooldownActivation, CooldownCondition,
    CooldownType, MajorCooldown, MajorCooldownConfig,
};
pub use manager::{
    ARMOR_DEBUFF_DELAY, MajorCooldownManager, activate_major_cooldown, try_use_major_cooldowns,
};
pub(crate) use manager::reset_major_cooldowns;
