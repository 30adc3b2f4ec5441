//! 仿真时间类型
//!
//! 定义仿真时间及其单位转换。池仿真里所有时间都以微秒浮点表示。

use std::cmp::Ordering;

/// 仿真时间（微秒，f64）。
///
/// 使用 `f64::total_cmp` 提供全序，便于放入 `BinaryHeap`。
#[derive(Debug, Clone, Copy, Default)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    pub fn from_micros(us: f64) -> SimTime {
        SimTime(us)
    }
    pub fn from_millis(ms: f64) -> SimTime {
        SimTime(ms * 1_000.0)
    }
    pub fn from_secs(s: f64) -> SimTime {
        SimTime(s * 1_000_000.0)
    }

    pub fn as_micros(self) -> f64 {
        self.0
    }

    /// 距离 `earlier` 过去了多少微秒（不会为负）。
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
