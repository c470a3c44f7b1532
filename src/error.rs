//! 错误类型
//!
//! 配置/注册阶段的错误以 `Result` 返回；运行期的逻辑错误（调度到过去、
//! 资源超额消耗）直接 panic，见各模块说明。

use crate::spell::ActionId;
use std::path::PathBuf;

/// 配置阶段错误：在第一次迭代开始前暴露。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("major cooldown must have an action id")]
    MissingActionId,
    #[error("major cooldown {0} has neither a spell nor an activation factory")]
    MissingActivation(ActionId),
    #[error("{what} cannot be registered after finalization")]
    Finalized { what: &'static str },
    #[error("unknown spell '{0}'")]
    UnknownSpell(String),
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),
    #[error("encounter must have at least one target")]
    NoTargets,
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// 二进制/配置文件边界上的错误。
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse sim spec: {0}")]
    Parse(#[from] serde_json::Error),
}
