//! 引擎
//!
//! 每个引擎同一时刻至多服务一个作业；可选地记录执行片段用于甘特图导出。

use serde::Serialize;

/// 一段执行记录：`[start_us, end_us)` 内引擎在为 `job_id` 工作。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineSlice {
    pub start_us: f64,
    pub end_us: f64,
    pub job_id: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// 当前作业在运行作业数组中的下标
    pub assigned: Option<usize>,
    pub busy_until_us: f64,
    log: Option<Vec<EngineSlice>>,
}

impl Engine {
    pub fn new(record_log: bool) -> Self {
        Self {
            assigned: None,
            busy_until_us: 0.0,
            log: record_log.then(Vec::new),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.assigned.is_none()
    }

    /// 把作业 `job` 派到本引擎，直到 `until_us`。
    pub fn assign(&mut self, job: usize, job_id: u64, now_us: f64, until_us: f64) {
        debug_assert!(self.is_idle(), "engine already holds a job");
        self.assigned = Some(job);
        self.busy_until_us = until_us;
        if let Some(log) = self.log.as_mut() {
            log.push(EngineSlice {
                start_us: now_us,
                end_us: until_us,
                job_id,
            });
        }
    }

    /// 若已到期则释放并返回之前的作业下标。
    pub fn release_if_done(&mut self, now_us: f64) -> Option<usize> {
        match self.assigned {
            Some(j) if self.busy_until_us <= now_us => {
                self.assigned = None;
                Some(j)
            }
            _ => None,
        }
    }

    pub fn take_log(&mut self) -> Option<Vec<EngineSlice>> {
        self.log.take()
    }
}
