//! HPS（Hardware-Parametric Scheduler）
//!
//! 对每个可选作业计算五项加权得分，取最高者：
//! - 密钥亲和：`1 / (key_size_mb + 1)`，小密钥优先
//! - 噪声紧迫度：`1 - clamp(noise_budget, 0, 1)`
//! - 带宽代价：`1 / (bootstrap_time_us * effective_batch + 1)`
//! - 租户公平项：`1 / (1 + tenant_id * 0.2)`，静态代理，偏向小 tenant_id
//! - 截止时间：`1 - slack / (slack + 500)`，slack 截断在 [0, 20000]µs
//!
//! 各项都有界，噪声预算或 slack 趋零时得分不会爆炸。

use super::{PickContext, SchedulerPolicy, bootstrap_time_us};
use crate::hw::HwConfig;
use crate::workload::Job;
use serde::{Deserialize, Serialize};

const DEADLINE_SLACK_CAP_US: f64 = 20_000.0;
const DEADLINE_SLACK_KNEE_US: f64 = 500.0;
const TENANT_PENALTY: f64 = 0.2;

/// 五项得分的权重，非负。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HpsWeights {
    pub key_affinity: f64,
    pub noise_urgency: f64,
    pub bw_penalty: f64,
    pub fairness: f64,
    pub deadline: f64,
}

impl Default for HpsWeights {
    fn default() -> Self {
        Self {
            key_affinity: 3.0,
            noise_urgency: 4.0,
            bw_penalty: 2.0,
            fairness: 1.5,
            deadline: 2.0,
        }
    }
}

impl HpsWeights {
    /// 所有权重都是有限的非负数。
    pub fn is_valid(&self) -> bool {
        [
            self.key_affinity,
            self.noise_urgency,
            self.bw_penalty,
            self.fairness,
            self.deadline,
        ]
        .iter()
        .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// 单个作业的得分明细。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HpsScore {
    pub key_affinity: f64,
    pub noise_urgency: f64,
    pub bw_penalty: f64,
    pub fairness: f64,
    pub deadline: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Hps {
    pub weights: HpsWeights,
}

impl Hps {
    pub fn new(weights: HpsWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, cfg: &HwConfig, job: &Job, now_us: f64) -> HpsScore {
        let spec = &job.spec;
        let w = &self.weights;

        let key_affinity = 1.0 / (spec.key_size_mb + 1.0);
        let noise_urgency = 1.0 - spec.noise_budget.clamp(0.0, 1.0);

        let deadline = if spec.has_deadline() {
            let slack = (spec.deadline_us - now_us).clamp(0.0, DEADLINE_SLACK_CAP_US);
            1.0 - slack / (slack + DEADLINE_SLACK_KNEE_US)
        } else {
            0.0
        };

        let fairness = 1.0 / (1.0 + spec.tenant_id as f64 * TENANT_PENALTY);

        let effective_batch = if cfg.batch_size > 1 {
            cfg.batch_size.min(job.unassigned()).max(1)
        } else {
            1
        };
        let bw_penalty = 1.0 / (bootstrap_time_us(cfg, spec) * effective_batch as f64 + 1.0);

        let total = w.key_affinity * key_affinity
            + w.noise_urgency * noise_urgency
            + w.bw_penalty * bw_penalty
            + w.fairness * fairness
            + w.deadline * deadline;

        HpsScore {
            key_affinity,
            noise_urgency,
            bw_penalty,
            fairness,
            deadline,
            total,
        }
    }

    /// 按得分从高到低排列的可选作业下标（得分相同保持扫描顺序）。
    pub fn rank(&self, ctx: &PickContext<'_>) -> Vec<usize> {
        let mut scored: Vec<(usize, f64)> = ctx
            .candidates()
            .map(|(i, j)| (i, self.score(ctx.cfg, j, ctx.now_us).total))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().map(|(i, _)| i).collect()
    }
}

impl SchedulerPolicy for Hps {
    fn name(&self) -> &'static str {
        "HPS"
    }

    fn pick(&self, ctx: &PickContext<'_>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, job) in ctx.candidates() {
            let s = self.score(ctx.cfg, job, ctx.now_us).total;
            if best.is_none_or(|(_, b)| s > b) {
                best = Some((i, s));
            }
        }
        best.map(|(i, _)| i)
    }
}
