//! 池推进事件

use super::world::PoolWorld;
use crate::sim::{Event, SimTime, Simulator, World};
use tracing::debug;

/// 事件：在当前时刻推进引擎池一步，并调度下一个事件时刻。
///
/// 下一个时刻不存在（没有在途工作、没有未到达作业、没有传输）时不再调度，运行自然结束。
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolStep;

impl Event for PoolStep {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<PoolWorld>()
            .expect("world must be PoolWorld");

        w.advance_to(sim.now().as_micros());
        w.resolve_transfers();
        w.resolve_engines();
        w.dispatch();

        debug!(
            now = w.now_us(),
            finished = w.finished(),
            busy_engines = w.busy_engines(),
            active_transfers = w.transfers.active(),
            "池推进一步"
        );

        if w.all_finished() {
            return;
        }
        match w.next_event_us() {
            Some(next) => sim.schedule(SimTime::from_micros(next), PoolStep),
            None => debug!(
                now = w.now_us(),
                unfinished = w.jobs().len() - w.finished(),
                "没有后续事件，提前结束"
            ),
        }
    }
}
