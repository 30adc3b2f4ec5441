mod hw_config;

use crate::hw::HwConfig;
use crate::workload::{JobSpec, Workload};

/// 1000 Gb/s HBM：单引擎带宽 = 1/engines Mb/µs，1MB 密钥的 bootstrap 耗时 8·engines µs。
pub(crate) fn hw(engines: usize, pcie_gbps: f64) -> HwConfig {
    HwConfig {
        engine_count: engines,
        hbm_bandwidth_gbps: 1_000.0,
        key_mem_mb: 1_024.0,
        pcie_bandwidth_gbps: pcie_gbps,
        freq_ghz: 1.0,
        ctx_switch_overhead_us: 0.0,
        batch_size: 1,
    }
}

pub(crate) fn spec(id: u64, tenant: u32, arrival_us: f64, boots: u32, key_mb: f64) -> JobSpec {
    JobSpec {
        id,
        tenant_id: tenant,
        arrival_time_us: arrival_us,
        num_bootstraps: boots,
        key_size_mb: key_mb,
        noise_budget: 0.5,
        priority: 0,
        deadline_us: 0.0,
    }
}

pub(crate) fn workload(jobs: Vec<JobSpec>) -> Workload {
    Workload::new(jobs).expect("valid workload")
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    let tol = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual}"
    );
}

/// 确定性的伪随机工作负载（xorshift），用于不变量检查。
pub(crate) fn mixed_workload(n: usize, tenants: u32, seed: u64) -> Workload {
    let mut s = seed.max(1);
    let mut next = move || {
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        s
    };
    let mut arrival = 0.0;
    let jobs = (0..n as u64)
        .map(|id| {
            arrival += (next() % 400) as f64;
            let mut j = spec(
                id,
                (next() % tenants as u64) as u32,
                arrival,
                1 + (next() % 12) as u32,
                (next() % 8) as f64 * 0.5,
            );
            j.noise_budget = (next() % 100) as f64 / 100.0;
            if next() % 4 == 0 {
                j.deadline_us = arrival + (next() % 5_000) as f64;
            }
            j
        })
        .collect();
    workload(jobs)
}

pub(crate) fn unique_temp_dir(prefix: &str) -> std::path::PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "tfhe-pool-sim-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
