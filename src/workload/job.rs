use crate::error::LoadError;
use crate::hw::HwConfig;
use serde::{Deserialize, Serialize};

/// 作业的静态部分，由工作负载文件给出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: u64,
    pub tenant_id: u32,
    pub arrival_time_us: f64,
    pub num_bootstraps: u32,
    pub key_size_mb: f64,
    pub noise_budget: f64,
    #[serde(default)]
    pub priority: i32,
    /// 0 表示没有截止时间
    #[serde(default)]
    pub deadline_us: f64,
}

impl JobSpec {
    pub fn has_deadline(&self) -> bool {
        self.deadline_us > 0.0
    }
}

/// 密钥从主机搬到设备内存的进度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTransferState {
    NotStarted,
    InProgress,
    Complete,
}

impl KeyTransferState {
    /// 导出 CSV 时使用的编码：0 未开始，-1 传输中，1 完成。
    pub fn code(self) -> i8 {
        match self {
            KeyTransferState::NotStarted => 0,
            KeyTransferState::InProgress => -1,
            KeyTransferState::Complete => 1,
        }
    }
}

/// 一次运行中的作业：静态描述 + 运行状态。
///
/// `remaining_bootstraps` 只在引擎完成时递减；`in_flight` 记录已经派发到引擎但尚未完成的数量，
/// 策略只看 `unassigned()`，因此同一个 bootstrap 不会被派给两个引擎。
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub spec: JobSpec,
    pub remaining_bootstraps: u32,
    pub in_flight: u32,
    pub start_time_us: Option<f64>,
    pub completion_time_us: Option<f64>,
    pub started: bool,
    pub key_transfer: KeyTransferState,
}

impl Job {
    /// 从静态描述初始化运行状态。PCIe 关闭时密钥视为已在设备上。
    pub fn new(spec: JobSpec, pcie_enabled: bool) -> Self {
        Self {
            remaining_bootstraps: spec.num_bootstraps,
            in_flight: 0,
            start_time_us: None,
            completion_time_us: None,
            started: false,
            key_transfer: if pcie_enabled {
                KeyTransferState::NotStarted
            } else {
                KeyTransferState::Complete
            },
            spec,
        }
    }

    /// 还没派发到任何引擎的 bootstrap 数。
    pub fn unassigned(&self) -> u32 {
        self.remaining_bootstraps.saturating_sub(self.in_flight)
    }

    pub fn has_arrived(&self, now_us: f64) -> bool {
        self.spec.arrival_time_us <= now_us
    }

    /// 策略可选：已到达且还有未派发的工作。
    pub fn is_ready(&self, now_us: f64) -> bool {
        self.unassigned() > 0 && self.has_arrived(now_us)
    }

    pub fn is_finished(&self) -> bool {
        self.completion_time_us.is_some()
    }

    pub fn key_ready(&self) -> bool {
        self.key_transfer == KeyTransferState::Complete
    }
}

/// 按到达时间稳定排序的作业集合。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Workload {
    jobs: Vec<JobSpec>,
}

impl Workload {
    /// 校验后按 `arrival_time_us` 稳定排序。
    pub fn new(mut jobs: Vec<JobSpec>) -> Result<Self, LoadError> {
        if jobs.is_empty() {
            return Err(LoadError::invalid("工作负载至少需要一个作业"));
        }
        for j in &jobs {
            for (name, v) in [
                ("arrival_time_us", j.arrival_time_us),
                ("key_size_mb", j.key_size_mb),
                ("noise_budget", j.noise_budget),
                ("deadline_us", j.deadline_us),
            ] {
                if !v.is_finite() {
                    return Err(LoadError::invalid(format!("作业 {} 的 {name} 不是有限数: {v}", j.id)));
                }
            }
            if !(j.arrival_time_us >= 0.0) {
                return Err(LoadError::invalid(format!(
                    "作业 {} 的到达时间非法: {}",
                    j.id, j.arrival_time_us
                )));
            }
            if j.num_bootstraps == 0 {
                return Err(LoadError::invalid(format!("作业 {} 的 num_bootstraps 为 0", j.id)));
            }
            if !(j.key_size_mb >= 0.0) {
                return Err(LoadError::invalid(format!(
                    "作业 {} 的 key_size_mb 非法: {}",
                    j.id, j.key_size_mb
                )));
            }
        }
        jobs.sort_by(|a, b| a.arrival_time_us.total_cmp(&b.arrival_time_us));
        Ok(Self { jobs })
    }

    pub fn jobs(&self) -> &[JobSpec] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// 为一次运行克隆出全新的可变作业状态。
    pub fn instantiate(&self, cfg: &HwConfig) -> Vec<Job> {
        let pcie = cfg.pcie_enabled();
        self.jobs.iter().cloned().map(|s| Job::new(s, pcie)).collect()
    }
}
