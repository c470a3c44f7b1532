//! 光环：定义、追踪器与分发

mod aura;
mod behaviors;
mod engine;
mod tracker;

pub use aura::{
    Aura, AuraBehavior, AuraFactory, AuraId, NoBehavior, ReplaceContext, ReplaceDecision,
    ReplacePolicy,
};
pub use behaviors::{SchoolDamageTaken, SpellCritTaken, StatBuff};
pub use engine::{
    AuraAddOutcome, AuraExpire, activate_permanent_auras, add_aura, dispatch_before_spell_hit,
    dispatch_cast, dispatch_cast_complete, dispatch_periodic_damage, dispatch_resource_tick,
    dispatch_spell_hit, remove_aura, remove_auras_with_tag,
};
pub use tracker::{AuraMetrics, AuraTracker};
