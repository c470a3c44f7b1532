//! 属性容器
//!
//! 属性种类、属性向量以及属性间的派生依赖。

mod dependency;
mod stat;
mod stats;

pub use dependency::{StatDependency, StatDependencyManager, StatModifier};
pub use stat::Stat;
pub use stats::Stats;
