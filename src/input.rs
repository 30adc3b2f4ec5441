//! 文本输入的公共工具
//!
//! 硬件配置和工作负载都是“每行一条记录、空白分隔、`#` 开头为注释”的格式。

use crate::error::LoadError;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub(crate) fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// 有效数据行：跳过空行和注释行，行号从 1 开始。
pub(crate) fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

/// 一行里的若干字段，解析失败时带上行号和原文。
pub(crate) struct Fields<'a> {
    path: &'a Path,
    line_no: usize,
    line: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(path: &'a Path, line_no: usize, line: &'a str) -> Self {
        Self {
            path,
            line_no,
            line,
            tokens: line.split_whitespace().collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn get<T: FromStr>(&self, idx: usize, name: &str) -> Result<T, LoadError> {
        let raw = self
            .tokens
            .get(idx)
            .ok_or_else(|| self.error(format!("缺少字段 {name}")))?;
        raw.parse::<T>()
            .map_err(|_| self.error(format!("字段 {name} 无法解析: {raw}")))
    }

    pub(crate) fn get_opt<T: FromStr>(&self, idx: usize, name: &str) -> Result<Option<T>, LoadError> {
        if idx < self.tokens.len() {
            self.get(idx, name).map(Some)
        } else {
            Ok(None)
        }
    }

    pub(crate) fn error(&self, reason: impl Into<String>) -> LoadError {
        LoadError::InvalidLine {
            path: self.path.to_path_buf(),
            line_no: self.line_no,
            line: self.line.to_string(),
            reason: reason.into(),
        }
    }
}
