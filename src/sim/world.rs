//! 世界 trait
//!
//! 定义仿真世界接口。

use std::any::Any;

/// 仿真世界：由业务层实现（例如战斗中的单位、技能、随机源）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
