//! 光环定义
//!
//! 光环 = 标识 + 持续时间 + 冲突策略 + 行为对象。行为对象实现
//! `AuraBehavior` 的若干钩子；未实现的钩子是空操作。

use crate::encounter::CombatWorld;
use crate::resource::ResourceKind;
use crate::sim::{SimTime, Simulator};
use crate::spell::{ActionId, SpellEffect, SpellId};
use crate::unit::UnitId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 光环标识（同一单位上唯一）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuraId(pub u32);

impl AuraId {
    /// 运行期分配的光环从这里开始编号，更小的编号留给注册表中的固定光环。
    pub const FIRST_DYNAMIC: u32 = 1000;
}

impl fmt::Display for AuraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aura#{}", self.0)
    }
}

/// 光环的行为钩子。
pub trait AuraBehavior: Send {
    fn on_gain(&mut self, _sim: &mut Simulator, _world: &mut CombatWorld, _host: UnitId) {}

    fn on_expire(&mut self, _sim: &mut Simulator, _world: &mut CombatWorld, _host: UnitId) {}

    /// 结算前（初始化阶段）修改效果。
    fn on_before_spell_hit(
        &mut self,
        _sim: &mut Simulator,
        _world: &mut CombatWorld,
        _host: UnitId,
        _spell: SpellId,
        _effect: &mut SpellEffect,
    ) {
    }

    fn on_spell_hit(
        &mut self,
        _sim: &mut Simulator,
        _world: &mut CombatWorld,
        _host: UnitId,
        _spell: SpellId,
        _effect: &mut SpellEffect,
    ) {
    }

    fn on_periodic_damage(
        &mut self,
        _sim: &mut Simulator,
        _world: &mut CombatWorld,
        _host: UnitId,
        _spell: SpellId,
        _effect: &mut SpellEffect,
    ) {
    }

    fn on_cast(&mut self, _sim: &mut Simulator, _world: &mut CombatWorld, _host: UnitId, _spell: SpellId) {}

    fn on_cast_complete(
        &mut self,
        _sim: &mut Simulator,
        _world: &mut CombatWorld,
        _host: UnitId,
        _spell: SpellId,
    ) {
    }

    /// 资源回复跳动（能量/法力）或获得怒气。
    fn on_resource_tick(
        &mut self,
        _sim: &mut Simulator,
        _world: &mut CombatWorld,
        _host: UnitId,
        _kind: ResourceKind,
    ) {
    }
}

/// 没有任何钩子的光环（纯标记，如减益存在与否）。
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBehavior;

impl AuraBehavior for NoBehavior {}

/// 冲突裁决的输入。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceContext {
    pub now: SimTime,
    pub existing: AuraId,
    pub incoming: AuraId,
    pub existing_expires: SimTime,
    pub incoming_duration: Option<SimTime>,
}

impl ReplaceContext {
    pub fn same_id(&self) -> bool {
        self.existing == self.incoming
    }
}

/// 冲突裁决结果（针对已存在的光环）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceDecision {
    /// 移除已存在的，加入新的。
    Replace,
    /// 同标识：延长已存在的并丢弃新的；不同标识：两者共存。
    Refresh,
    /// 已存在的缩短到 `expires`（不会延长）。同标识时丢弃新的。
    Shorten { expires: SimTime },
}

/// 已存在光环面对冲突时的策略。
#[derive(Clone, Copy, Default)]
pub enum ReplacePolicy {
    #[default]
    Replace,
    Refresh,
    /// 任何冲突都把已存在的缩短到剩余 `window`。
    Truncate { window: SimTime },
    /// 同标识替换；同标签的不同光环让已存在的只再保留 `window`（圣印扭转）。
    Twist { window: SimTime },
    Custom(fn(&ReplaceContext) -> ReplaceDecision),
}

impl ReplacePolicy {
    pub fn decide(&self, ctx: &ReplaceContext) -> ReplaceDecision {
        let shorten = |window: SimTime| ReplaceDecision::Shorten {
            expires: ctx.existing_expires.min(ctx.now.saturating_add(window)),
        };
        match self {
            ReplacePolicy::Replace => ReplaceDecision::Replace,
            ReplacePolicy::Refresh if ctx.same_id() => ReplaceDecision::Refresh,
            ReplacePolicy::Refresh => ReplaceDecision::Replace,
            ReplacePolicy::Truncate { window } => shorten(*window),
            ReplacePolicy::Twist { .. } if ctx.same_id() => ReplaceDecision::Replace,
            ReplacePolicy::Twist { window } => shorten(*window),
            ReplacePolicy::Custom(f) => f(ctx),
        }
    }
}

impl fmt::Debug for ReplacePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacePolicy::Replace => write!(f, "Replace"),
            ReplacePolicy::Refresh => write!(f, "Refresh"),
            ReplacePolicy::Truncate { window } => write!(f, "Truncate({window:?})"),
            ReplacePolicy::Twist { window } => write!(f, "Twist({window:?})"),
            ReplacePolicy::Custom(_) => write!(f, "Custom"),
        }
    }
}

pub struct Aura {
    pub id: AuraId,
    pub label: String,
    pub action_id: ActionId,
    /// 互斥组标签（如 "sunder_expose"、"seal"）。
    pub tag: Option<&'static str>,
    /// 同标签的光环最多存在一个。
    pub exclusive: bool,
    /// None 表示永久。
    pub duration: Option<SimTime>,
    pub policy: ReplacePolicy,
    pub behavior: Box<dyn AuraBehavior>,
}

impl Aura {
    pub fn new(id: AuraId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            action_id: ActionId::NONE,
            tag: None,
            exclusive: false,
            duration: None,
            policy: ReplacePolicy::Replace,
            behavior: Box::new(NoBehavior),
        }
    }

    pub fn with_duration(mut self, duration: SimTime) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_action(mut self, action_id: ActionId) -> Self {
        self.action_id = action_id;
        self
    }

    pub fn with_tag(mut self, tag: &'static str, exclusive: bool) -> Self {
        self.tag = Some(tag);
        self.exclusive = exclusive;
        self
    }

    pub fn with_policy(mut self, policy: ReplacePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_behavior(mut self, behavior: impl AuraBehavior + 'static) -> Self {
        self.behavior = Box::new(behavior);
        self
    }
}

impl fmt::Debug for Aura {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aura")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("tag", &self.tag)
            .field("exclusive", &self.exclusive)
            .field("duration", &self.duration)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// 永久光环工厂：每次迭代重置后为宿主重新构造光环。
pub type AuraFactory = Arc<dyn Fn(UnitId) -> Aura + Send + Sync>;
