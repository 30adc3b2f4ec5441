//! 引擎池仿真
//!
//! 每次运行拥有一份私有的作业状态、引擎池和传输池，由 [`PoolStep`] 事件在仿真内核上逐个时刻推进：
//!
//! 1. 推进时间：累计引擎忙碌时间，按当前并发数平分 PCIe 带宽推进所有传输
//! 2. 结算到期的密钥传输与引擎
//! 3. 反复询问策略，把空闲引擎派给就绪作业
//! 4. 计算下一个事件时刻（引擎完成、作业到达、传输完成三者最早者），没有则结束
//!
//! 同一工作负载换策略重跑时，每次都从静态描述重新克隆，互不影响。

mod engine;
mod run;
mod step;
mod transfer;
mod world;

pub use engine::{Engine, EngineSlice};
pub use run::{RunOptions, SimRun, run_simulation, simulate};
pub use step::PoolStep;
pub use transfer::{Transfer, TransferPool};
pub use world::PoolWorld;
