//! 配置：JSON 仿真描述、增益/减益注册表、构建函数与默认轮转

mod build;
mod registry;
mod rotation;
mod spec;

pub use build::{DEFAULT_PLAYER_LEVEL, DEFAULT_TARGET_ARMOR, DEFAULT_TARGET_LEVEL, build_simulation};
pub use registry::{
    BATTLE_SHOUT_AURA, CURSE_OF_ELEMENTS_AURA, EXPOSE_ARMOR_AURA, EffectInstaller, EffectRegistry,
    FAERIE_FIRE_AURA, IMPROVED_SEAL_OF_THE_CRUSADER_AURA, IMPROVED_SHADOW_BOLT_AURA,
    JUDGEMENT_OF_WISDOM_AURA, MISERY_AURA, SUNDER_ARMOR_AURA, SUNDER_EXPOSE_TAG,
};
pub use rotation::PriorityRotation;
pub use spec::{
    AoeSpec, CooldownSpec, DamageSpec, DotSpec, EffectSpec, EncounterSpec, EnergySpec, ManaSpec,
    OutcomeSpec, PlayerSpec, RageSpec, ResourcesSpec, SCHEMA_VERSION, SimSpec, SpellSpec,
    TargetSpec,
};
