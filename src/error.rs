//! 加载错误
//!
//! 硬件配置与工作负载加载器的错误类型。仿真核心本身不产生可恢复错误。

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("读取 {} 失败: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: 没有任何有效行", path.display())]
    Empty { path: PathBuf },

    #[error("{}:{line_no}: {reason}: `{line}`", path.display())]
    InvalidLine {
        path: PathBuf,
        line_no: usize,
        line: String,
        reason: String,
    },

    #[error("解析 JSON {} 失败: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("非法输入: {what}")]
    Invalid { what: String },
}

impl LoadError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        LoadError::Invalid { what: what.into() }
    }
}
