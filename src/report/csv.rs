use crate::pool::SimRun;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 每个作业一行：`job_id,tenant_id,arrival_us,start_us,completion_us,num_bootstraps,key_size_mb,pcie_transferred`。
///
/// 未开始/未完成的时刻写作 -1。
pub fn job_csv(run: &SimRun) -> String {
    let mut out = String::from(
        "job_id,tenant_id,arrival_us,start_us,completion_us,num_bootstraps,key_size_mb,pcie_transferred\n",
    );
    for j in &run.jobs {
        out.push_str(&format!(
            "{},{},{:.3},{:.3},{:.3},{},{:.3},{}\n",
            j.spec.id,
            j.spec.tenant_id,
            j.spec.arrival_time_us,
            j.start_time_us.unwrap_or(-1.0),
            j.completion_time_us.unwrap_or(-1.0),
            j.spec.num_bootstraps,
            j.spec.key_size_mb,
            j.key_transfer.code()
        ));
    }
    out
}

/// 每个执行片段一行：`engine,job_id,start_us,end_us`。没有记录引擎日志时返回 None。
pub fn engine_csv(run: &SimRun) -> Option<String> {
    let logs = run.engine_logs.as_ref()?;
    let mut out = String::from("engine,job_id,start_us,end_us\n");
    for (e, slices) in logs.iter().enumerate() {
        for s in slices {
            out.push_str(&format!(
                "{},{},{:.3},{:.3}\n",
                e, s.job_id, s.start_us, s.end_us
            ));
        }
    }
    Some(out)
}

/// 写出 `<prefix>-<policy>.csv` 和（如有）`<prefix>-<policy>-engines.csv`，返回写出的路径。
pub fn write_run_csv(prefix: &Path, run: &SimRun) -> io::Result<Vec<PathBuf>> {
    let base = prefix.to_string_lossy();
    let slug = run.policy.slug();
    let mut written = Vec::new();

    let jobs_path = PathBuf::from(format!("{base}-{slug}.csv"));
    fs::write(&jobs_path, job_csv(run))?;
    written.push(jobs_path);

    if let Some(engines) = engine_csv(run) {
        let engines_path = PathBuf::from(format!("{base}-{slug}-engines.csv"));
        fs::write(&engines_path, engines)?;
        written.push(engines_path);
    }
    Ok(written)
}
