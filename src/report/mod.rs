//! 诊断输出
//!
//! 作业/引擎 CSV（供绘图脚本使用）、JSON 汇总与文本统计块。这些输出不影响仿真结果。

mod csv;
mod summary;

pub use csv::{engine_csv, job_csv, write_run_csv};
pub use summary::{RunSummary, Summary, format_stats};
