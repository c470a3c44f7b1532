use crate::resource::ResourceKind;
use crate::spell::ActionId;
use serde::{Deserialize, Serialize};

/// 战斗事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatEventKind {
    /// 开始施法（瞬发时 `completes_ns` 等于当前时刻）
    CastStart {
        action: ActionId,
        target: usize,
        completes_ns: u64,
    },
    CastComplete { action: ActionId, target: usize },
    /// 读条被打断
    CastInterrupted { action: ActionId },
    /// 一次效果结算（直接伤害或周期跳伤）
    Damage {
        action: ActionId,
        target: usize,
        outcome: String,
        damage: f64,
        threat: f64,
        periodic: bool,
    },
    AuraGained {
        aura: u32,
        label: String,
        /// 永久光环为 None
        expires_ns: Option<u64>,
    },
    AuraRefreshed {
        aura: u32,
        label: String,
        expires_ns: Option<u64>,
    },
    /// 被替换策略缩短到期时间（如封印扭转）
    AuraShortened {
        aura: u32,
        label: String,
        expires_ns: u64,
    },
    AuraExpired { aura: u32, label: String },
    ResourceGain {
        resource: ResourceKind,
        action: ActionId,
        requested: f64,
        gained: f64,
        current: f64,
    },
    ResourceSpend {
        resource: ResourceKind,
        action: ActionId,
        amount: f64,
        current: f64,
    },
    MajorCooldownUsed { action: ActionId, usage: u32 },
}

/// 一条战斗日志（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    /// 仿真时间（纳秒，和 `SimTime.0` 同口径）
    pub t_ns: u64,
    /// 事件发起单位
    pub unit: usize,
    #[serde(flatten)]
    pub kind: CombatEventKind,
}

/// 事件收集器（存内存，迭代结束后可写 JSON 文件）
#[derive(Debug, Default)]
pub struct CombatLogger {
    pub events: Vec<CombatEvent>,
}

impl CombatLogger {
    pub fn push(&mut self, ev: CombatEvent) {
        self.events.push(ev);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 某个单位的全部事件（按发生顺序）。
    pub fn for_unit(&self, unit: usize) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter().filter(move |e| e.unit == unit)
    }
}
