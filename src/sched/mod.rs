//! 调度策略
//!
//! 策略是纯函数式的选择器：给定硬件配置、全部作业状态与当前时间，返回下一个要派发的作业下标。
//! 策略不修改任何作业状态；同一输入总是得到同一输出。
//!
//! 策略身份用 [`Policy`] 枚举显式标识，HPS 权重作为值随策略一起传入每次运行。

mod fifo;
mod hps;

pub use fifo::Fifo;
pub use hps::{Hps, HpsScore, HpsWeights};

use crate::hw::HwConfig;
use crate::workload::{Job, JobSpec};
use serde::Serialize;

/// 单个 bootstrap 在一个引擎上的耗时（微秒），下限 1µs。
///
/// 耗时 = 密钥大小（Mb）/ 单引擎 HBM 带宽（Mb/µs）。
pub fn bootstrap_time_us(cfg: &HwConfig, job: &JobSpec) -> f64 {
    let t = job.key_size_mb * 8.0 / cfg.per_engine_mbit_per_us();
    if t.is_finite() { t.max(1.0) } else { 1.0 }
}

/// 一次挑选时策略能看到的全部信息。
pub struct PickContext<'a> {
    pub cfg: &'a HwConfig,
    pub jobs: &'a [Job],
    pub now_us: f64,
    /// 本时刻已因密钥未就绪而跳过的作业；为空切片表示不屏蔽任何作业
    pub blocked: &'a [bool],
}

impl<'a> PickContext<'a> {
    pub fn new(cfg: &'a HwConfig, jobs: &'a [Job], now_us: f64) -> Self {
        Self {
            cfg,
            jobs,
            now_us,
            blocked: &[],
        }
    }

    pub fn with_blocked(mut self, blocked: &'a [bool]) -> Self {
        self.blocked = blocked;
        self
    }

    /// 按下标顺序枚举可选作业：已到达、仍有未派发的 bootstrap、且本时刻未被屏蔽。
    pub fn candidates(&self) -> impl Iterator<Item = (usize, &'a Job)> + '_ {
        self.jobs.iter().enumerate().filter(move |(i, j)| {
            j.is_ready(self.now_us) && !self.blocked.get(*i).copied().unwrap_or(false)
        })
    }
}

/// 调度策略接口。
pub trait SchedulerPolicy {
    fn name(&self) -> &'static str;
    fn pick(&self, ctx: &PickContext<'_>) -> Option<usize>;
}

/// 显式标识的策略。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    Fifo,
    Hps { weights: HpsWeights },
}

impl Policy {
    pub fn hps(weights: HpsWeights) -> Self {
        Policy::Hps { weights }
    }

    /// 用于文件名等场合的短标签。
    pub fn slug(&self) -> &'static str {
        match self {
            Policy::Fifo => "fifo",
            Policy::Hps { .. } => "hps",
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::hps(HpsWeights::default())
    }
}

impl SchedulerPolicy for Policy {
    fn name(&self) -> &'static str {
        match self {
            Policy::Fifo => Fifo.name(),
            Policy::Hps { weights } => Hps::new(*weights).name(),
        }
    }

    fn pick(&self, ctx: &PickContext<'_>) -> Option<usize> {
        match self {
            Policy::Fifo => Fifo.pick(ctx),
            Policy::Hps { weights } => Hps::new(*weights).pick(ctx),
        }
    }
}
