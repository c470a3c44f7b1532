//! 计时器与冷却
//!
//! `Timer` 只是一个“就绪时间点”。同一单位的多个技能可以共享一个计时器
//! （共享冷却），所以计时器集中存放在单位的 `TimerBank` 里，技能只持有
//! `TimerId`。

use crate::sim::SimTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timer {
    ready_at: SimTime,
}

impl Timer {
    pub fn is_ready(&self, now: SimTime) -> bool {
        self.ready_at <= now
    }

    pub fn ready_at(&self) -> SimTime {
        self.ready_at
    }

    pub fn time_to_ready(&self, now: SimTime) -> SimTime {
        self.ready_at.saturating_sub(now)
    }

    pub fn set(&mut self, ready_at: SimTime) {
        self.ready_at = ready_at;
    }

    pub fn start(&mut self, now: SimTime, duration: SimTime) {
        self.ready_at = now.saturating_add(duration);
    }

    pub fn reset(&mut self) {
        self.ready_at = SimTime::ZERO;
    }
}

/// `TimerBank` 中的计时器下标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub usize);

/// 单位持有的计时器集合。
#[derive(Debug, Clone, Default)]
pub struct TimerBank {
    timers: Vec<Timer>,
}

impl TimerBank {
    pub fn new_timer(&mut self) -> TimerId {
        self.timers.push(Timer::default());
        TimerId(self.timers.len() - 1)
    }

    pub fn get(&self, id: TimerId) -> &Timer {
        &self.timers[id.0]
    }

    pub fn get_mut(&mut self, id: TimerId) -> &mut Timer {
        &mut self.timers[id.0]
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// 每次迭代开始时全部归零。
    pub fn reset(&mut self) {
        for t in &mut self.timers {
            t.reset();
        }
    }
}

/// 冷却：计时器 + 时长。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub timer: TimerId,
    pub duration: SimTime,
}

impl Cooldown {
    pub fn is_ready(&self, bank: &TimerBank, now: SimTime) -> bool {
        bank.get(self.timer).is_ready(now)
    }

    pub fn ready_at(&self, bank: &TimerBank) -> SimTime {
        bank.get(self.timer).ready_at()
    }

    pub fn start(&self, bank: &mut TimerBank, now: SimTime) {
        bank.get_mut(self.timer).start(now, self.duration);
    }
}

/// 两个可选冷却中较晚的就绪时间。
pub fn ready_at_both(bank: &TimerBank, a: Option<Cooldown>, b: Option<Cooldown>) -> SimTime {
    let ra = a.map_or(SimTime::ZERO, |c| c.ready_at(bank));
    let rb = b.map_or(SimTime::ZERO, |c| c.ready_at(bank));
    ra.max(rb)
}
