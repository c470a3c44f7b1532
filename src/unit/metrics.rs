//! 单位级统计（资源收支）。

use crate::resource::ResourceKind;
use crate::spell::ActionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetrics {
    pub gain_events: u32,
    /// 请求获得的量（溢出前）。
    pub requested: f64,
    /// 实际获得的量（截断到上限后）。
    pub gained: f64,
    pub spend_events: u32,
    pub spent: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UnitMetrics {
    pub resources: BTreeMap<(ActionId, ResourceKind), ResourceMetrics>,
}

impl UnitMetrics {
    pub fn record_gain(&mut self, action: ActionId, kind: ResourceKind, requested: f64, gained: f64) {
        let m = self.resources.entry((action, kind)).or_default();
        m.gain_events += 1;
        m.requested += requested;
        m.gained += gained;
    }

    pub fn record_spend(&mut self, action: ActionId, kind: ResourceKind, amount: f64) {
        let m = self.resources.entry((action, kind)).or_default();
        m.spend_events += 1;
        m.spent += amount;
    }

    pub fn resource(&self, action: ActionId, kind: ResourceKind) -> ResourceMetrics {
        self.resources.get(&(action, kind)).copied().unwrap_or_default()
    }
}
