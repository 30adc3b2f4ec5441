//! 仿真核心模块
//!
//! 事件驱动仿真的通用内核：仿真时间、事件、世界和仿真器。
//! 具体业务（引擎池、调度策略）在 `crate::pool` 里实现 `World` 与 `Event`。

mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

pub use event::Event;
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
