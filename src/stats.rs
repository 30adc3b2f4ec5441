//! 运行统计
//!
//! 从运行结束时的作业状态推导 makespan、平均完成时间、平均 slowdown、引擎利用率，
//! 以及按租户平均 slowdown 计算的 Jain 公平性指数。

use crate::hw::HwConfig;
use crate::sched::bootstrap_time_us;
use crate::workload::Job;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub makespan_us: f64,
    pub avg_completion_time_us: f64,
    pub avg_slowdown: f64,
    pub engine_utilization: f64,
    pub fairness: f64,
}

/// 完成时刻；未完成的作业按 `final_now_us` 计。
fn effective_completion(job: &Job, final_now_us: f64) -> f64 {
    job.completion_time_us.unwrap_or(final_now_us)
}

/// 单个作业的 slowdown：响应时间 / 理想服务时间（下限 1µs）。
pub fn job_slowdown(cfg: &HwConfig, job: &Job, final_now_us: f64) -> f64 {
    let response = effective_completion(job, final_now_us) - job.spec.arrival_time_us;
    let service = (job.spec.num_bootstraps as f64 * bootstrap_time_us(cfg, &job.spec)).max(1.0);
    response / service
}

/// Jain 公平性指数 `(Σx)² / (n·Σx²)`。少于两个值或分母为 0 时为 1。
pub fn jain_index(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 1.0;
    }
    let sum: f64 = values.iter().sum();
    let sum_sq: f64 = values.iter().map(|x| x * x).sum();
    let denom = values.len() as f64 * sum_sq;
    if denom > 0.0 { sum * sum / denom } else { 1.0 }
}

/// 各租户的平均 slowdown，按 tenant_id 升序。
pub fn tenant_avg_slowdown(cfg: &HwConfig, jobs: &[Job], final_now_us: f64) -> Vec<(u32, f64)> {
    let mut acc: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for job in jobs {
        let e = acc.entry(job.spec.tenant_id).or_insert((0.0, 0));
        e.0 += job_slowdown(cfg, job, final_now_us);
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(t, (sum, n))| (t, sum / n as f64))
        .collect()
}

/// 汇总一次运行。`busy_engine_us` 为引擎忙碌时间积分，`final_now_us` 为运行结束时刻。
pub fn compute_stats(
    cfg: &HwConfig,
    jobs: &[Job],
    busy_engine_us: f64,
    final_now_us: f64,
) -> SimStats {
    if jobs.is_empty() {
        return SimStats {
            makespan_us: 0.0,
            avg_completion_time_us: 0.0,
            avg_slowdown: 0.0,
            engine_utilization: 0.0,
            fairness: 1.0,
        };
    }

    let first_arrival = jobs
        .iter()
        .map(|j| j.spec.arrival_time_us)
        .fold(f64::INFINITY, f64::min);
    let last_finish = jobs
        .iter()
        .map(|j| effective_completion(j, final_now_us))
        .fold(f64::NEG_INFINITY, f64::max);
    let makespan_us = (last_finish - first_arrival).max(0.0);

    let n = jobs.len() as f64;
    let avg_completion_time_us = jobs
        .iter()
        .map(|j| effective_completion(j, final_now_us) - j.spec.arrival_time_us)
        .sum::<f64>()
        / n;
    let avg_slowdown = jobs
        .iter()
        .map(|j| job_slowdown(cfg, j, final_now_us))
        .sum::<f64>()
        / n;

    let engine_utilization = if makespan_us > 0.0 {
        busy_engine_us / (makespan_us * cfg.engine_count as f64)
    } else {
        0.0
    };

    let per_tenant: Vec<f64> = tenant_avg_slowdown(cfg, jobs, final_now_us)
        .into_iter()
        .map(|(_, s)| s)
        .collect();

    SimStats {
        makespan_us,
        avg_completion_time_us,
        avg_slowdown,
        engine_utilization,
        fairness: jain_index(&per_tenant),
    }
}
