//! 事件 trait
//!
//! 定义仿真事件接口，以及把一次性闭包包装成事件的 `PendingAction`。

use super::simulator::Simulator;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}

type ActionFn = Box<dyn FnOnce(&mut Simulator, &mut dyn World) + Send>;

/// 带名字的一次性待执行动作。
///
/// 名字只用于日志；需要“撤销”的动作请在闭包里自行检查守卫状态
/// （例如世代号），调度器本身不提供删除。
pub struct PendingAction {
    name: &'static str,
    action: ActionFn,
}

impl PendingAction {
    pub fn new(
        name: &'static str,
        action: impl FnOnce(&mut Simulator, &mut dyn World) + Send + 'static,
    ) -> Self {
        Self {
            name,
            action: Box::new(action),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Event for PendingAction {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        tracing::trace!(name = self.name, now = ?sim.now(), "执行待定动作");
        (self.action)(sim, world);
    }
}
