//! 三种资源条共用的数值池：截断到 `[0, max]`，负数增减与透支直接 panic。

use super::ResourceKind;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResourcePool {
    kind: ResourceKind,
    max: f64,
    initial: f64,
    current: f64,
}

impl ResourcePool {
    pub(crate) fn new(kind: ResourceKind, max: f64, initial: f64) -> Self {
        let max = max.max(0.0);
        let initial = initial.clamp(0.0, max);
        Self {
            kind,
            max,
            initial,
            current: initial,
        }
    }

    pub(crate) fn current(&self) -> f64 {
        self.current
    }

    pub(crate) fn max(&self) -> f64 {
        self.max
    }

    /// 改上限并以满值作为新的初始值。
    pub(crate) fn refill_to(&mut self, max: f64) {
        self.max = max.max(0.0);
        self.initial = self.max;
        self.current = self.max;
    }

    /// 返回实际增加量。
    pub(crate) fn add(&mut self, amount: f64) -> f64 {
        if amount < 0.0 {
            panic!("cannot gain negative {:?}: {amount}", self.kind);
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    pub(crate) fn spend(&mut self, amount: f64) {
        if amount < 0.0 {
            panic!("cannot spend negative {:?}: {amount}", self.kind);
        }
        if amount > self.current {
            panic!(
                "trying to spend {amount} {:?} with only {} available",
                self.kind, self.current
            );
        }
        self.current = (self.current - amount).max(0.0);
    }

    pub(crate) fn reset(&mut self) {
        self.current = self.initial;
    }
}
