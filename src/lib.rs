pub mod error;
pub mod hw;
pub mod pool;
pub mod report;
pub mod sched;
pub mod sim;
pub mod stats;
pub mod workload;

mod input;

#[cfg(test)]
mod test;
