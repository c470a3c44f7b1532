//! 动作标识
//!
//! 技能、物品与其它来源（自动攻击、回复、返还）的统一标识，
//! 作为冷却、资源统计和日志的键。

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherAction {
    None,
    Wait,
    Manual,
    Attack,
    Shoot,
    EnergyRegen,
    ManaRegen,
    RageGain,
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ActionId {
    Spell(u32),
    Item(u32),
    Other(OtherAction),
}

impl ActionId {
    pub const NONE: ActionId = ActionId::Other(OtherAction::None);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::Spell(id) => write!(f, "spell:{id}"),
            ActionId::Item(id) => write!(f, "item:{id}"),
            ActionId::Other(other) => write!(f, "other:{other:?}"),
        }
    }
}
