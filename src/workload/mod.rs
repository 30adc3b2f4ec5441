//! 工作负载
//!
//! 静态作业描述（`JobSpec`，只读、可跨运行共享）与每次运行私有的作业状态（`Job`）。

mod job;
mod loader;

pub use job::{Job, JobSpec, KeyTransferState, Workload};
pub use loader::{load_workload, parse_workload};
