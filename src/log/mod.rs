//! 战斗日志
//!
//! 结构化 JSON 事件，而不是解析文本日志。默认关闭；
//! `CombatWorld::log` 为 Some 时由各引擎写入。

mod types;

pub use types::{CombatEvent, CombatEventKind, CombatLogger};
