//! 硬件配置加载
//!
//! 文本格式：第一条有效行
//! `num_engines hbm_gbps key_mem_mb pcie_gbps freq_ghz ctx_overhead_us [batch_size]`。
//! 扩展名为 `.json` 时按 `HwConfig` 的 JSON 表示解析。

use super::config::HwConfig;
use crate::error::LoadError;
use crate::input::{Fields, data_lines, is_json, read_source};
use std::path::Path;
use tracing::debug;

pub fn load_hw_config(path: &Path) -> Result<HwConfig, LoadError> {
    let text = read_source(path)?;
    let cfg = if is_json(path) {
        serde_json::from_str::<HwConfig>(&text)
            .map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?
            .validated()?
    } else {
        parse_hw_config(&text, path)?
    };
    debug!(?cfg, path = %path.display(), "硬件配置已加载");
    Ok(cfg)
}

/// 解析文本格式；`path` 只用于错误信息。
pub fn parse_hw_config(text: &str, path: &Path) -> Result<HwConfig, LoadError> {
    let (line_no, line) = data_lines(text).next().ok_or_else(|| LoadError::Empty {
        path: path.to_path_buf(),
    })?;
    let f = Fields::new(path, line_no, line);
    if f.len() < 6 {
        return Err(f.error(format!("至少需要 6 个字段，实际 {}", f.len())));
    }

    let engines: i64 = f.get(0, "num_engines")?;
    if engines < 1 {
        return Err(f.error("num_engines 必须 ≥ 1"));
    }
    // 缺省或 < 1 的批大小都按 1 处理
    let batch: i64 = f.get_opt(6, "batch_size")?.unwrap_or(1);

    HwConfig {
        engine_count: engines as usize,
        hbm_bandwidth_gbps: f.get(1, "hbm_bandwidth_gbps")?,
        key_mem_mb: f.get(2, "key_mem_mb")?,
        pcie_bandwidth_gbps: f.get(3, "pcie_bandwidth_gbps")?,
        freq_ghz: f.get(4, "freq_ghz")?,
        ctx_switch_overhead_us: f.get(5, "ctx_switch_overhead_us")?,
        batch_size: batch.clamp(1, u32::MAX as i64) as u32,
    }
    .validated()
}
