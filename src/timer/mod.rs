//! 计时器、冷却与触发计时

mod timer;
mod trigger;

pub use timer::{Cooldown, Timer, TimerBank, TimerId, ready_at_both};
pub use trigger::{InternalCooldown, PpmManager};
