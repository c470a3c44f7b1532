//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列。

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 同一时刻的执行优先级：数值越小越先执行。
pub const PRIORITY_AURA_EXPIRE: i32 = -4;
pub const PRIORITY_DOT: i32 = -3;
pub const PRIORITY_AUTO: i32 = -2;
pub const PRIORITY_REGEN: i32 = -1;
pub const PRIORITY_DEFAULT: i32 = 0;
pub const PRIORITY_LOW: i32 = 1;

/// 事件驱动仿真器：维护当前时间与事件队列。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    executed: u64,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 已执行的事件数
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// 以默认优先级调度事件在指定时间执行
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        self.schedule_with_priority(at, PRIORITY_DEFAULT, ev);
    }

    /// 在当前时间之后 `delay` 处调度事件
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, priority: i32, ev: E) {
        let at = self.now.saturating_add(delay);
        self.schedule_with_priority(at, priority, ev);
    }

    /// 调度事件在指定时间、指定优先级执行。
    ///
    /// 调度到过去是逻辑错误，直接 panic。
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule_with_priority<E: Event>(&mut self, at: SimTime, priority: i32, ev: E) {
        if at < self.now {
            panic!(
                "cannot schedule {} at {:?}: current time is {:?}",
                std::any::type_name::<E>(),
                at,
                self.now
            );
        }
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, priority, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            priority,
            seq,
            ev: Box::new(ev),
        });

        debug!(queue_size = self.q.len(), "事件已加入队列");
    }

    /// 运行直到事件队列为空或到达 `until`（含 `until` 时刻的事件）。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while let Some(top) = self.q.peek() {
            if top.at > until {
                break;
            }
            let item = self.q.pop().expect("peek then pop");
            self.now = item.at;
            self.executed += 1;
            item.ev.execute(self, world);
        }
        self.now = self.now.max(until);
    }

    /// 运行所有事件直到队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count = 0;
        while let Some(item) = self.q.pop() {
            event_count += 1;
            self.now = item.at;
            self.executed += 1;

            debug!(
                event_num = event_count,
                now = ?self.now,
                priority = item.priority,
                seq = item.seq,
                remaining_queue = self.q.len(),
                "执行事件"
            );

            item.ev.execute(self, world);
        }

        info!(
            total_events = event_count,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
    }
}
