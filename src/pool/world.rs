//! 引擎池世界
//!
//! 一次运行的全部可变状态。只有 [`PoolStep`](super::PoolStep) 会修改它。

use super::engine::{Engine, EngineSlice};
use super::run::RunOptions;
use super::transfer::TransferPool;
use crate::hw::HwConfig;
use crate::sched::{Hps, PickContext, Policy, SchedulerPolicy, bootstrap_time_us};
use crate::sim::{Simulator, World};
use crate::workload::{Job, KeyTransferState, Workload};
use std::any::Any;
use tracing::{Level, debug, enabled, info, trace};

const MB_TO_BITS: f64 = 8e6;
/// Gb/s → bit/µs
const GBPS_TO_BITS_PER_US: f64 = 1_000.0;

pub struct PoolWorld {
    cfg: HwConfig,
    policy: Policy,
    opts: RunOptions,
    pub(crate) jobs: Vec<Job>,
    pub(crate) engines: Vec<Engine>,
    pub(crate) transfers: TransferPool,
    now_us: f64,
    busy_engine_us: f64,
    finished: usize,
    next_progress: usize,
}

impl PoolWorld {
    /// 从静态工作负载克隆出一份全新的运行状态。
    pub fn new(cfg: &HwConfig, workload: &Workload, policy: Policy, opts: RunOptions) -> Self {
        let jobs = workload.instantiate(cfg);
        let engines = (0..cfg.engine_count)
            .map(|_| Engine::new(opts.record_engine_log))
            .collect();
        let pcie_bits_per_us = cfg.pcie_bandwidth_gbps * opts.pcie_scale * GBPS_TO_BITS_PER_US;
        Self {
            cfg: cfg.clone(),
            policy,
            opts,
            jobs,
            engines,
            transfers: TransferPool::new(pcie_bits_per_us),
            now_us: 0.0,
            busy_engine_us: 0.0,
            finished: 0,
            next_progress: progress_step(workload.len()),
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn now_us(&self) -> f64 {
        self.now_us
    }

    /// 引擎忙碌时间积分（引擎·微秒）。
    pub fn busy_engine_us(&self) -> f64 {
        self.busy_engine_us
    }

    pub fn finished(&self) -> usize {
        self.finished
    }

    pub fn all_finished(&self) -> bool {
        self.finished == self.jobs.len()
    }

    pub(crate) fn busy_engines(&self) -> usize {
        self.engines.iter().filter(|e| !e.is_idle()).count()
    }

    fn idle_engines(&self) -> usize {
        self.engines.len() - self.busy_engines()
    }

    /// 推进到 `t_us`：累计忙碌时间，并按当前并发推进传输。
    pub(crate) fn advance_to(&mut self, t_us: f64) {
        let elapsed = t_us - self.now_us;
        if elapsed > 0.0 {
            self.busy_engine_us += elapsed * self.busy_engines() as f64;
            self.transfers.advance(elapsed);
            self.now_us = t_us;
        }
    }

    pub(crate) fn resolve_transfers(&mut self) {
        for j in self.transfers.drain_completed() {
            self.jobs[j].key_transfer = KeyTransferState::Complete;
            debug!(job_id = self.jobs[j].spec.id, now = self.now_us, "密钥传输完成");
        }
    }

    pub(crate) fn resolve_engines(&mut self) {
        let now = self.now_us;
        for (e, engine) in self.engines.iter_mut().enumerate() {
            let Some(j) = engine.release_if_done(now) else {
                continue;
            };
            let job = &mut self.jobs[j];
            job.remaining_bootstraps -= 1;
            job.in_flight -= 1;
            trace!(engine = e, job_id = job.spec.id, rem = job.remaining_bootstraps, "bootstrap 完成");
            if job.remaining_bootstraps == 0 {
                job.completion_time_us = Some(now);
                self.finished += 1;
                debug!(
                    job_id = job.spec.id,
                    tenant = job.spec.tenant_id,
                    now,
                    finished = self.finished,
                    "作业完成"
                );
            }
        }
    }

    /// 请求作业的密钥；大小为 0 的传输直接完成。
    fn request_key(&mut self, j: usize) {
        if self.jobs[j].key_transfer == KeyTransferState::Complete || self.transfers.is_active(j) {
            return;
        }
        let mut mb = self.jobs[j].spec.key_size_mb;
        if self.opts.pcie_cap_mb > 0.0 {
            mb = mb.min(self.opts.pcie_cap_mb);
        }
        let bits = mb * MB_TO_BITS;
        self.jobs[j].key_transfer = if self.transfers.admit(j, bits) {
            KeyTransferState::InProgress
        } else {
            KeyTransferState::Complete
        };
    }

    /// 把空闲引擎派给就绪作业。
    ///
    /// 密钥未就绪的作业在本时刻被屏蔽；没有派出任何引擎的尝试累计到作业数即停止。
    pub(crate) fn dispatch(&mut self) {
        let n = self.jobs.len();
        let mut blocked = vec![false; n];
        let mut stalled = 0;

        while stalled < n {
            let idle = self.idle_engines();
            if idle == 0 {
                break;
            }
            let ctx = PickContext::new(&self.cfg, &self.jobs, self.now_us).with_blocked(&blocked);
            let Some(j) = self.policy.pick(&ctx) else {
                break;
            };

            if self.opts.trace_picks {
                info!(
                    "[{}] pick at {:.0} us -> job {} (rem={})",
                    self.policy.name(),
                    self.now_us,
                    self.jobs[j].spec.id,
                    self.jobs[j].remaining_bootstraps
                );
            } else {
                trace!(policy = self.policy.name(), now = self.now_us, job = j, "pick");
            }
            if let Policy::Hps { weights } = self.policy {
                if enabled!(Level::TRACE) {
                    let score = Hps::new(weights).score(&self.cfg, &self.jobs[j], self.now_us);
                    trace!(job_id = self.jobs[j].spec.id, ?score, "HPS 得分");
                }
            }

            if !self.jobs[j].key_ready() {
                self.request_key(j);
                if !self.jobs[j].key_ready() {
                    blocked[j] = true;
                    stalled += 1;
                    continue;
                }
            }

            self.assign(j, idle);
        }
    }

    fn assign(&mut self, j: usize, idle: usize) {
        let now = self.now_us;
        let job = &mut self.jobs[j];
        let batch = (self.cfg.batch_size.max(1) as usize)
            .min(job.unassigned() as usize)
            .min(idle);
        let until = now + bootstrap_time_us(&self.cfg, &job.spec) + self.cfg.ctx_switch_overhead_us;

        let job_id = job.spec.id;
        for engine in self.engines.iter_mut().filter(|e| e.is_idle()).take(batch) {
            engine.assign(j, job_id, now, until);
        }
        job.in_flight += batch as u32;
        if !job.started {
            job.started = true;
            job.start_time_us = Some(now);
        }
        trace!(job_id, batch, until, "派发");
    }

    /// 下一个事件时刻：引擎完成、作业到达、传输完成三者中严格晚于 now 的最早者。
    pub(crate) fn next_event_us(&self) -> Option<f64> {
        let now = self.now_us;
        let engine_done = self
            .engines
            .iter()
            .filter(|e| !e.is_idle() && e.busy_until_us > now)
            .map(|e| e.busy_until_us);
        let arrival = self
            .jobs
            .iter()
            .map(|j| j.spec.arrival_time_us)
            .filter(|&a| a > now);
        let transfer = self.transfers.next_completion(now);

        engine_done
            .chain(arrival)
            .chain(transfer)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub(crate) fn take_engine_logs(&mut self) -> Option<Vec<Vec<EngineSlice>>> {
        if !self.opts.record_engine_log {
            return None;
        }
        Some(
            self.engines
                .iter_mut()
                .map(|e| e.take_log().unwrap_or_default())
                .collect(),
        )
    }

    pub(crate) fn into_jobs(self) -> Vec<Job> {
        self.jobs
    }

    fn report_progress(&mut self) {
        if self.finished < self.next_progress {
            return;
        }
        let total = self.jobs.len();
        info!(
            policy = self.policy.name(),
            finished = self.finished,
            total,
            now_us = self.now_us,
            "进度"
        );
        let step = progress_step(total);
        self.next_progress = (self.finished / step + 1) * step;
        if self.finished < total {
            self.next_progress = self.next_progress.min(total);
        }
    }
}

/// 每完成约 10% 的作业报告一次。
fn progress_step(total: usize) -> usize {
    total.div_ceil(10).max(1)
}

impl World for PoolWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        if self.opts.show_progress {
            self.report_progress();
        }
    }

    fn is_done(&self) -> bool {
        self.all_finished()
    }
}
