//! 单次运行入口

use super::engine::EngineSlice;
use super::step::PoolStep;
use super::world::PoolWorld;
use crate::hw::HwConfig;
use crate::sched::{Policy, SchedulerPolicy};
use crate::sim::{SimTime, Simulator};
use crate::stats::{SimStats, compute_stats};
use crate::workload::{Job, Workload};
use tracing::info;

/// 运行前确定、运行中只读的调节项。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// PCIe 带宽缩放系数（> 0）
    pub pcie_scale: f64,
    /// 单次密钥传输的大小上限（MB），0 表示不限
    pub pcie_cap_mb: f64,
    /// 记录每个引擎的执行片段
    pub record_engine_log: bool,
    /// 按约 10% 的粒度输出进度
    pub show_progress: bool,
    /// 以 info 级别输出每次挑选
    pub trace_picks: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            pcie_scale: 1.0,
            pcie_cap_mb: 0.0,
            record_engine_log: false,
            show_progress: false,
            trace_picks: false,
        }
    }
}

/// 一次运行的完整结果。
#[derive(Debug, Clone)]
pub struct SimRun {
    pub policy: Policy,
    pub stats: SimStats,
    /// 运行结束时的作业状态，顺序与工作负载相同
    pub jobs: Vec<Job>,
    /// 每个引擎的执行片段（仅在 `record_engine_log` 时存在）
    pub engine_logs: Option<Vec<Vec<EngineSlice>>>,
    pub finished: usize,
    pub final_time_us: f64,
    pub events: u64,
}

impl SimRun {
    /// 所有作业都正常完成。
    pub fn completed(&self) -> bool {
        self.finished == self.jobs.len()
    }
}

/// 用 `policy` 在 `cfg` 上跑一遍 `workload`。
///
/// 作业状态、引擎池、传输池都在本次调用内新建，不会影响其他运行。
pub fn simulate(cfg: &HwConfig, workload: &Workload, policy: Policy, opts: RunOptions) -> SimRun {
    let mut sim = Simulator::default();
    let mut world = PoolWorld::new(cfg, workload, policy, opts);

    sim.schedule(SimTime::ZERO, PoolStep);
    sim.run(&mut world);

    let final_time_us = world.now_us();
    let finished = world.finished();
    let busy = world.busy_engine_us();
    let engine_logs = world.take_engine_logs();
    let jobs = world.into_jobs();
    let stats = compute_stats(cfg, &jobs, busy, final_time_us);

    info!(
        policy = policy.name(),
        jobs = jobs.len(),
        finished,
        makespan_us = stats.makespan_us,
        fairness = stats.fairness,
        "运行结束"
    );

    SimRun {
        policy,
        stats,
        jobs,
        engine_logs,
        finished,
        final_time_us,
        events: sim.executed(),
    }
}

/// 只要统计结果时的便捷入口。
pub fn run_simulation(
    cfg: &HwConfig,
    workload: &Workload,
    policy: Policy,
    opts: RunOptions,
) -> SimStats {
    simulate(cfg, workload, policy, opts).stats
}
