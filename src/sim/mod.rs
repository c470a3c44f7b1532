//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件，如仿真时间、事件、世界和仿真器。
//! 战斗中的一切延时动作（光环过期、读条完成、能量回复、DoT 跳动、
//! 代理下一次决策）都是这里的事件。

// 子模块声明
mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use event::{Event, PendingAction};
pub use scheduled_event::ScheduledEvent;
pub use simulator::{
    PRIORITY_AURA_EXPIRE, PRIORITY_AUTO, PRIORITY_DEFAULT, PRIORITY_DOT, PRIORITY_LOW,
    PRIORITY_REGEN, Simulator,
};
pub use time::SimTime;
pub use world::World;
