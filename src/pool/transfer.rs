//! 密钥传输（PCIe）
//!
//! 所有同时进行的传输平分 PCIe 带宽（max-min 公平）。每个作业同一时刻至多一个传输。
//! 槽位按线性扫描查找，作业数很大时可以换成按作业下标索引的表。

use tracing::debug;

/// 剩余比特低于该值视为传完，吸收浮点误差。
const BITS_EPSILON: f64 = 1e-6;
/// 预计完成时刻与推进后时刻的比较容差（微秒）。
const ETA_EPSILON_US: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub job: usize,
    pub remaining_bits: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TransferPool {
    bits_per_us: f64,
    slots: Vec<Transfer>,
}

impl TransferPool {
    /// `bits_per_us`：有效 PCIe 总带宽（比特/微秒）。
    pub fn new(bits_per_us: f64) -> Self {
        Self {
            bits_per_us,
            slots: Vec::new(),
        }
    }

    pub fn active(&self) -> usize {
        self.slots.len()
    }

    pub fn is_active(&self, job: usize) -> bool {
        self.slots.iter().any(|t| t.job == job)
    }

    pub fn get(&self, job: usize) -> Option<&Transfer> {
        self.slots.iter().find(|t| t.job == job)
    }

    /// 每个传输当前分到的带宽。
    fn share(&self) -> f64 {
        if self.slots.is_empty() {
            0.0
        } else {
            self.bits_per_us / self.slots.len() as f64
        }
    }

    /// 为作业开启传输。已有传输或大小为 0 时返回 false（后者视为立即完成）。
    pub fn admit(&mut self, job: usize, bits: f64) -> bool {
        if self.is_active(job) || !(bits > 0.0) {
            return false;
        }
        self.slots.push(Transfer {
            job,
            remaining_bits: bits,
        });
        debug!(job, bits, active = self.slots.len(), "开始密钥传输");
        true
    }

    /// 在当前并发数下最早完成的传输时刻，严格晚于 `now_us`。
    ///
    /// 剩余时间小于 `now_us` 的浮点精度时取下一个可表示的时刻，推进一步即被 ETA 容差收尾。
    pub fn next_completion(&self, now_us: f64) -> Option<f64> {
        let share = self.share();
        if !(share > 0.0) {
            return None;
        }
        self.slots
            .iter()
            .map(|t| {
                let eta = now_us + t.remaining_bits / share;
                if eta > now_us { eta } else { next_instant(now_us) }
            })
            .min_by(|a, b| a.total_cmp(b))
    }

    /// 以当前并发数推进 `elapsed_us`。
    pub fn advance(&mut self, elapsed_us: f64) {
        let share = self.share();
        if !(elapsed_us > 0.0) || !(share > 0.0) {
            return;
        }
        for t in &mut self.slots {
            let eta = t.remaining_bits / share;
            if eta <= elapsed_us + ETA_EPSILON_US {
                t.remaining_bits = 0.0;
            } else {
                t.remaining_bits -= elapsed_us * share;
                if t.remaining_bits < BITS_EPSILON {
                    t.remaining_bits = 0.0;
                }
            }
        }
    }

    /// 移除已传完的槽位，返回对应的作业下标（按开始顺序）。
    pub fn drain_completed(&mut self) -> Vec<usize> {
        let mut done = Vec::new();
        self.slots.retain(|t| {
            if t.remaining_bits <= 0.0 {
                done.push(t.job);
                false
            } else {
                true
            }
        });
        done
    }
}

/// 大于 `t` 的最小 f64（`t` 为非负有限值）。
fn next_instant(t: f64) -> f64 {
    if t == 0.0 {
        f64::from_bits(1)
    } else {
        f64::from_bits(t.to_bits() + 1)
    }
}
