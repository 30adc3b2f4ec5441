//! 事件 trait
//!
//! 仿真内核只认识 `Event`：到点执行，执行时可以继续往队列里调度新事件。

use super::simulator::Simulator;
use super::world::World;

/// 可调度事件。`self: Box<Self>` 让事件在执行时拿回自己携带的数据的所有权。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
