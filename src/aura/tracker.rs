//! 光环追踪器
//!
//! 每个单位一个。`active` 按激活顺序保存光环记录，钩子分发也按这个顺序。
//! 行为对象在钩子执行期间被“借出”（记录里的 `behavior` 为 None），
//! 这样钩子可以拿到整个世界的可变引用。

use super::aura::{AuraBehavior, AuraFactory, AuraId, ReplacePolicy};
use crate::error::ConfigError;
use crate::sim::SimTime;
use crate::spell::ActionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub(crate) struct AuraRecord {
    pub id: AuraId,
    pub label: String,
    pub action_id: ActionId,
    pub tag: Option<&'static str>,
    pub exclusive: bool,
    pub policy: ReplacePolicy,
    pub gained_at: SimTime,
    pub expires: SimTime,
    pub generation: u64,
    pub behavior: Option<Box<dyn AuraBehavior>>,
}

/// 单个光环在一次迭代中的统计。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuraMetrics {
    pub label: String,
    pub activations: u32,
    pub refreshes: u32,
    pub uptime: SimTime,
}

#[derive(Default)]
pub struct AuraTracker {
    active: Vec<AuraRecord>,
    permanent: Vec<AuraFactory>,
    metrics: BTreeMap<AuraId, AuraMetrics>,
    next_generation: u64,
    finalized: bool,
}

impl AuraTracker {
    /// 注册永久光环（每次迭代开始时由工厂重新构造并激活）。
    pub fn add_permanent(&mut self, factory: AuraFactory) -> Result<(), ConfigError> {
        if self.finalized {
            return Err(ConfigError::Finalized {
                what: "permanent aura",
            });
        }
        self.permanent.push(factory);
        Ok(())
    }

    pub(crate) fn permanent_factories(&self) -> Vec<AuraFactory> {
        self.permanent.clone()
    }

    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }

    pub(crate) fn reset(&mut self) {
        self.active.clear();
        self.metrics.clear();
    }

    pub fn is_active(&self, id: AuraId, now: SimTime) -> bool {
        self.find(id).is_some_and(|r| now < r.expires)
    }

    pub fn has_tag(&self, tag: &str, now: SimTime) -> bool {
        self.active
            .iter()
            .any(|r| r.tag == Some(tag) && now < r.expires)
    }

    pub fn expires_at(&self, id: AuraId) -> Option<SimTime> {
        self.find(id).map(|r| r.expires)
    }

    pub fn remaining(&self, id: AuraId, now: SimTime) -> SimTime {
        self.find(id)
            .map_or(SimTime::ZERO, |r| r.expires.saturating_sub(now))
    }

    /// 当前生效的光环（激活顺序）。
    pub fn active_ids(&self, now: SimTime) -> Vec<AuraId> {
        self.active
            .iter()
            .filter(|r| now < r.expires)
            .map(|r| r.id)
            .collect()
    }

    pub fn active_labels(&self, now: SimTime) -> Vec<&str> {
        self.active
            .iter()
            .filter(|r| now < r.expires)
            .map(|r| r.label.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn label(&self, id: AuraId) -> Option<&str> {
        self.find(id).map(|r| r.label.as_str())
    }

    pub fn action_id(&self, id: AuraId) -> Option<ActionId> {
        self.find(id).map(|r| r.action_id)
    }

    pub fn metrics(&self) -> &BTreeMap<AuraId, AuraMetrics> {
        &self.metrics
    }

    pub(crate) fn find(&self, id: AuraId) -> Option<&AuraRecord> {
        self.active.iter().find(|r| r.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: AuraId) -> Option<&mut AuraRecord> {
        self.active.iter_mut().find(|r| r.id == id)
    }

    /// 同标签、且与新光环互斥的其它光环。
    pub(crate) fn conflicts(
        &self,
        tag: &str,
        incoming: AuraId,
        incoming_exclusive: bool,
        now: SimTime,
    ) -> Vec<(AuraId, SimTime, ReplacePolicy)> {
        self.active
            .iter()
            .filter(|r| {
                r.id != incoming
                    && r.tag == Some(tag)
                    && (incoming_exclusive || r.exclusive)
                    && now < r.expires
            })
            .map(|r| (r.id, r.expires, r.policy))
            .collect()
    }

    pub(crate) fn alloc_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    pub(crate) fn push(&mut self, record: AuraRecord) {
        let m = self.metrics.entry(record.id).or_default();
        if m.label.is_empty() {
            m.label = record.label.clone();
        }
        m.activations += 1;
        self.active.push(record);
    }

    pub(crate) fn record_refresh(&mut self, id: AuraId) {
        self.metrics.entry(id).or_default().refreshes += 1;
    }

    /// 移除记录并累计在线时长。
    pub(crate) fn take_record(&mut self, id: AuraId, now: SimTime) -> Option<AuraRecord> {
        let idx = self.active.iter().position(|r| r.id == id)?;
        let record = self.active.remove(idx);
        let end = now.min(record.expires);
        let m = self.metrics.entry(id).or_default();
        m.uptime = m.uptime.saturating_add(end.saturating_sub(record.gained_at));
        Some(record)
    }

    /// 当前生效光环的 (标识, 世代) 快照。
    pub(crate) fn active_handles(&self, now: SimTime) -> Vec<(AuraId, u64)> {
        self.active
            .iter()
            .filter(|r| now < r.expires)
            .map(|r| (r.id, r.generation))
            .collect()
    }

    /// 借出行为对象；已借出、已失效或已被替换时返回 None。
    pub(crate) fn checkout(
        &mut self,
        id: AuraId,
        generation: u64,
        now: SimTime,
    ) -> Option<Box<dyn AuraBehavior>> {
        let r = self.find_mut(id)?;
        if r.generation != generation || now >= r.expires {
            return None;
        }
        r.behavior.take()
    }

    /// 归还行为对象；记录已不存在时原样退回，由调用方补上 on_expire。
    pub(crate) fn checkin(
        &mut self,
        id: AuraId,
        generation: u64,
        behavior: Box<dyn AuraBehavior>,
    ) -> Result<(), Box<dyn AuraBehavior>> {
        match self.find_mut(id) {
            Some(r) if r.generation == generation && r.behavior.is_none() => {
                r.behavior = Some(behavior);
                Ok(())
            }
            _ => Err(behavior),
        }
    }

    /// 迭代结束：把仍在生效的光环计入在线时长。
    pub(crate) fn finish(&mut self, now: SimTime) {
        for r in &self.active {
            let end = now.min(r.expires);
            let m = self.metrics.entry(r.id).or_default();
            m.uptime = m.uptime.saturating_add(end.saturating_sub(r.gained_at));
        }
    }
}

impl fmt::Debug for AuraTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuraTracker")
            .field(
                "active",
                &self.active.iter().map(|r| (r.id, r.expires)).collect::<Vec<_>>(),
            )
            .field("permanent", &self.permanent.len())
            .finish()
    }
}
