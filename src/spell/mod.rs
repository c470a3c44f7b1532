//! 技能、效果与施法流程

mod action_id;
mod cast;
pub mod constants;
mod dot;
mod effect;
mod outcome;
mod pipeline;
mod proc_mask;
mod school;
mod spell;

pub use action_id::{ActionId, OtherAction};
pub use cast::{
    CastComplete, CastFailure, CastStart, apply_spell_effects, can_cast, cast, gcd_length,
    interrupt_cast, trigger_spell,
};
pub use dot::{DotConfig, DotTick};
pub use effect::{BaseDamage, CustomDamage, DamageContext, EffectHook, SpellEffect};
pub use outcome::{AttackTable, HitOutcome, OutcomeApplier};
pub use pipeline::apply_effect;
pub use proc_mask::ProcMask;
pub use school::SpellSchool;
pub use spell::{
    ApplyEffects, CustomApply, Spell, SpellConfig, SpellFlags, SpellId, TargetedSpellMetrics,
};
