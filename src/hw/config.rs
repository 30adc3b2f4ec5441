use crate::error::LoadError;
use serde::{Deserialize, Serialize};

fn default_batch_size() -> u32 {
    1
}

/// 硬件池配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HwConfig {
    /// 引擎数量（≥1）
    pub engine_count: usize,
    /// HBM 总带宽（Gb/s），在引擎间平均分配
    pub hbm_bandwidth_gbps: f64,
    /// 设备上的密钥内存（MB），仅用于展示
    #[serde(default)]
    pub key_mem_mb: f64,
    /// PCIe 带宽（Gb/s）；0 表示不建模密钥传输
    #[serde(default)]
    pub pcie_bandwidth_gbps: f64,
    #[serde(default)]
    pub freq_ghz: f64,
    /// 每次派发的固定开销（微秒）
    #[serde(default)]
    pub ctx_switch_overhead_us: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

impl HwConfig {
    /// 单个引擎可用的 HBM 带宽，单位 Mb/µs。
    pub fn per_engine_mbit_per_us(&self) -> f64 {
        self.hbm_bandwidth_gbps / self.engine_count as f64 / 1_000.0
    }

    pub fn pcie_enabled(&self) -> bool {
        self.pcie_bandwidth_gbps > 0.0
    }

    /// 校验并补齐缺省值（batch_size < 1 视为 1）。
    pub fn validated(mut self) -> Result<Self, LoadError> {
        if self.engine_count == 0 {
            return Err(LoadError::invalid("engine_count 必须 ≥ 1"));
        }
        for (name, v) in [
            ("hbm_bandwidth_gbps", self.hbm_bandwidth_gbps),
            ("key_mem_mb", self.key_mem_mb),
            ("pcie_bandwidth_gbps", self.pcie_bandwidth_gbps),
            ("freq_ghz", self.freq_ghz),
            ("ctx_switch_overhead_us", self.ctx_switch_overhead_us),
        ] {
            if !v.is_finite() {
                return Err(LoadError::invalid(format!("{name} 不是有限数: {v}")));
            }
        }
        if !(self.hbm_bandwidth_gbps > 0.0) {
            return Err(LoadError::invalid(format!(
                "hbm_bandwidth_gbps 必须 > 0，实际 {}",
                self.hbm_bandwidth_gbps
            )));
        }
        if !(self.pcie_bandwidth_gbps >= 0.0) {
            return Err(LoadError::invalid(format!(
                "pcie_bandwidth_gbps 不能为负，实际 {}",
                self.pcie_bandwidth_gbps
            )));
        }
        if !(self.ctx_switch_overhead_us >= 0.0) {
            return Err(LoadError::invalid(format!(
                "ctx_switch_overhead_us 不能为负，实际 {}",
                self.ctx_switch_overhead_us
            )));
        }
        self.batch_size = self.batch_size.max(1);
        Ok(self)
    }
}
