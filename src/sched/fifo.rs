use super::{PickContext, SchedulerPolicy};

/// 先到先服务：到达时间最早者优先，同时到达取下标最小者。
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl SchedulerPolicy for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn pick(&self, ctx: &PickContext<'_>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, job) in ctx.candidates() {
            let arrival = job.spec.arrival_time_us;
            if best.is_none_or(|(_, b)| arrival < b) {
                best = Some((i, arrival));
            }
        }
        best.map(|(i, _)| i)
    }
}
