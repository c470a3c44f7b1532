//! 战斗单位与代理接口

mod agent;
mod metrics;
mod pseudo_stats;
mod unit;

pub use agent::{AgentAction, UnitBehavior};
pub use metrics::{ResourceMetrics, UnitMetrics};
pub use pseudo_stats::PseudoStats;
pub use unit::{CastInProgress, MobType, Unit, UnitId, UnitKind};
