//! 属性依赖
//!
//! 形如“每点力量提供 2 点攻击强度”“王者祝福使主属性 ×1.1”的派生规则。
//! 规则按注册顺序在定版（finalize）时应用一次；之后源属性再变化，
//! 派生值不会重新计算。

use super::stat::Stat;
use super::stats::Stats;
use crate::error::ConfigError;
use std::sync::Arc;

/// `f(source_value, modified_value) -> new_modified_value`
pub type StatModifier = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

#[derive(Clone)]
pub struct StatDependency {
    pub source: Stat,
    pub modified: Stat,
    pub modifier: StatModifier,
}

#[derive(Clone, Default)]
pub struct StatDependencyManager {
    deps: Vec<StatDependency>,
    finalized: bool,
}

impl StatDependencyManager {
    pub fn add(
        &mut self,
        source: Stat,
        modified: Stat,
        modifier: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Result<(), ConfigError> {
        if self.finalized {
            return Err(ConfigError::Finalized {
                what: "stat dependency",
            });
        }
        self.deps.push(StatDependency {
            source,
            modified,
            modifier: Arc::new(modifier),
        });
        Ok(())
    }

    /// `modified += source * ratio`
    pub fn add_ratio(&mut self, source: Stat, modified: Stat, ratio: f64) -> Result<(), ConfigError> {
        self.add(source, modified, move |src, cur| cur + src * ratio)
    }

    /// `stat *= multiplier`（源与目标是同一属性）
    pub fn add_multiplier(&mut self, stat: Stat, multiplier: f64) -> Result<(), ConfigError> {
        self.add(stat, stat, move |_, cur| cur * multiplier)
    }

    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// 按注册顺序应用全部依赖。
    pub fn apply(&self, base: &Stats) -> Stats {
        let mut out = *base;
        for dep in &self.deps {
            let src = out[dep.source];
            let cur = out[dep.modified];
            out[dep.modified] = (dep.modifier)(src, cur);
        }
        out
    }
}

impl std::fmt::Debug for StatDependencyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatDependencyManager")
            .field("deps", &self.deps.len())
            .field("finalized", &self.finalized)
            .finish()
    }
}
