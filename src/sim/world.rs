//! 世界 trait
//!
//! 事件操作的可变状态由业务层提供（例如引擎池、传输池）。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界。事件通过 `as_any_mut` 向下转型拿到具体类型。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每个事件执行完后回调一次。
    fn on_tick(&mut self, _sim: &mut Simulator) {}

    /// 世界已经没有需要推进的工作；`Simulator::run` 见到 true 即停止，剩余事件留在队列里。
    fn is_done(&self) -> bool {
        false
    }
}
