//! 工作负载加载
//!
//! 文本格式每行一个作业：
//! `id tenant arrival_us num_bootstraps key_size_mb noise_budget priority [deadline_us]`。
//! 扩展名为 `.json` 时解析为 `JobSpec` 数组。

use super::job::{JobSpec, Workload};
use crate::error::LoadError;
use crate::input::{Fields, data_lines, is_json, read_source};
use std::path::Path;
use tracing::debug;

pub fn load_workload(path: &Path) -> Result<Workload, LoadError> {
    let text = read_source(path)?;
    let wl = if is_json(path) {
        let jobs: Vec<JobSpec> = serde_json::from_str(&text).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Workload::new(jobs)?
    } else {
        parse_workload(&text, path)?
    };
    debug!(jobs = wl.len(), path = %path.display(), "工作负载已加载");
    Ok(wl)
}

pub fn parse_workload(text: &str, path: &Path) -> Result<Workload, LoadError> {
    let mut jobs = Vec::new();
    for (line_no, line) in data_lines(text) {
        let f = Fields::new(path, line_no, line);
        if f.len() < 7 {
            return Err(f.error(format!("至少需要 7 个字段，实际 {}", f.len())));
        }
        jobs.push(JobSpec {
            id: f.get(0, "id")?,
            tenant_id: f.get(1, "tenant_id")?,
            arrival_time_us: f.get(2, "arrival_us")?,
            num_bootstraps: f.get(3, "num_bootstraps")?,
            key_size_mb: f.get(4, "key_size_mb")?,
            noise_budget: f.get(5, "noise_budget")?,
            priority: f.get(6, "priority")?,
            deadline_us: f.get_opt(7, "deadline_us")?.unwrap_or(0.0),
        });
    }
    if jobs.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Workload::new(jobs)
}
