//! 遭遇编排
//!
//! 战斗世界、代理决策循环、迭代驱动与报告。

mod agent_turn;
mod report;
mod simulation;
mod world;

pub use agent_turn::{AgentTurn, request_agent_turn, wake_agent};
pub use report::{
    AuraReport, CooldownUsageReport, DpsSummary, IterationReport, ResourceReport, SimResult,
    SimSummary, SpellReport, SpellTargetReport, UnitReport,
};
pub use simulation::Simulation;
pub use world::{CombatWorld, combat_world};
