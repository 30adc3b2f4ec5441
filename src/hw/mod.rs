//! 硬件配置
//!
//! 引擎数量、HBM/PCIe 带宽、上下文切换开销与批大小。每次运行只读。

mod config;
mod loader;

pub use config::HwConfig;
pub use loader::{load_hw_config, parse_hw_config};
