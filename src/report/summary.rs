use crate::hw::HwConfig;
use crate::pool::SimRun;
use crate::sched::{Policy, SchedulerPolicy};
use crate::stats::SimStats;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub label: &'static str,
    pub policy: Policy,
    pub jobs: usize,
    pub finished: usize,
    pub stats: SimStats,
}

impl From<&SimRun> for RunSummary {
    fn from(run: &SimRun) -> Self {
        Self {
            label: run.policy.name(),
            policy: run.policy,
            jobs: run.jobs.len(),
            finished: run.finished,
            stats: run.stats,
        }
    }
}

/// `--json-out` 写出的整体汇总。
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub hw: HwConfig,
    pub runs: Vec<RunSummary>,
}

/// 人读的统计块。
pub fn format_stats(title: &str, cfg: &HwConfig, stats: &SimStats, n_jobs: usize) -> String {
    format!(
        "=== {title} ===\n\
         Engines: {} | HBM: {:.1} Gbps | Key Mem: {:.1} MB\n\
         Jobs: {n_jobs}\n\
         Makespan: {:.2} us\n\
         Avg Completion: {:.2} us\n\
         Avg Slowdown: {:.3}\n\
         Utilization: {:.3}\n\
         Fairness (Jain over tenant avg slowdown): {:.4}\n",
        cfg.engine_count,
        cfg.hbm_bandwidth_gbps,
        cfg.key_mem_mb,
        stats.makespan_us,
        stats.avg_completion_time_us,
        stats.avg_slowdown,
        stats.engine_utilization,
        stats.fairness,
    )
}
