use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "tfhe-pool-sim-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

const HW: &str = "\
# engines hbm_gbps key_mem_mb pcie_gbps freq_ghz ctx_us batch
4 1000 1024 16 1.5 0.5 2
";

const WORKLOAD: &str = "\
# id tenant arrival nboot key_mb noise prio [deadline]
0 0 0 8 1.0 0.9 0
1 1 10 2 0.5 0.1 1 500
2 2 20 4 2.0 0.5 0
3 0 30 1 0.0 0.3 0 0
";

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tfhe_sim"))
        .args(args)
        .output()
        .expect("run tfhe_sim")
}

#[test]
fn tfhe_sim_runs_both_policies_and_writes_json() {
    let dir = unique_temp_dir("cli-json");
    let hw = write_file(&dir, "hw.txt", HW);
    let wl = write_file(&dir, "jobs.txt", WORKLOAD);
    let out_json = dir.join("summary.json");

    let output = run_sim(&[
        "--hw",
        hw.to_str().unwrap(),
        "--workload",
        wl.to_str().unwrap(),
        "--json-out",
        out_json.to_str().unwrap(),
        "--quiet",
    ]);
    assert!(
        output.status.success(),
        "tfhe_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== FIFO Baseline ==="), "stdout={stdout}");
    assert!(stdout.contains("=== HPS Scheduler ==="), "stdout={stdout}");
    assert_eq!(stdout.matches("Jobs: 4").count(), 2);

    let raw = fs::read_to_string(&out_json).expect("read summary.json");
    let v: Value = serde_json::from_str(&raw).expect("parse summary.json");
    assert_eq!(v["hw"]["engine_count"].as_u64(), Some(4));
    assert_eq!(v["hw"]["batch_size"].as_u64(), Some(2));
    let runs = v["runs"].as_array().expect("runs must be an array");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["label"].as_str(), Some("FIFO"));
    assert_eq!(runs[1]["label"].as_str(), Some("HPS"));
    for run in runs {
        assert_eq!(run["finished"].as_u64(), Some(4));
        let util = run["stats"]["engine_utilization"].as_f64().expect("utilization");
        assert!((0.0..=1.0).contains(&util), "utilization={util}");
        let fairness = run["stats"]["fairness"].as_f64().expect("fairness");
        assert!(fairness > 0.0 && fairness <= 1.0, "fairness={fairness}");
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tfhe_sim_writes_per_policy_csv() {
    let dir = unique_temp_dir("cli-csv");
    let hw = write_file(&dir, "hw.txt", HW);
    let wl = write_file(&dir, "jobs.txt", WORKLOAD);
    let prefix = dir.join("trace");

    let output = run_sim(&[
        "--hw",
        hw.to_str().unwrap(),
        "--workload",
        wl.to_str().unwrap(),
        "--csv-prefix",
        prefix.to_str().unwrap(),
        "--quiet",
    ]);
    assert!(
        output.status.success(),
        "tfhe_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    for slug in ["fifo", "hps"] {
        let jobs = fs::read_to_string(dir.join(format!("trace-{slug}.csv"))).expect("job csv");
        let mut lines = jobs.lines();
        assert_eq!(
            lines.next(),
            Some("job_id,tenant_id,arrival_us,start_us,completion_us,num_bootstraps,key_size_mb,pcie_transferred")
        );
        assert_eq!(lines.count(), 4);

        let engines =
            fs::read_to_string(dir.join(format!("trace-{slug}-engines.csv"))).expect("engine csv");
        let mut lines = engines.lines();
        assert_eq!(lines.next(), Some("engine,job_id,start_us,end_us"));
        // 8 + 2 + 4 + 1 个 bootstrap
        assert_eq!(lines.count(), 15);
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tfhe_sim_single_policy_accepts_json_inputs() {
    let dir = unique_temp_dir("cli-single");
    let hw = write_file(
        &dir,
        "hw.json",
        r#"{ "engine_count": 2, "hbm_bandwidth_gbps": 800, "key_mem_mb": 512,
             "pcie_bandwidth_gbps": 0, "freq_ghz": 1.0, "ctx_switch_overhead_us": 0 }"#,
    );
    let wl = write_file(
        &dir,
        "jobs.json",
        r#"[
            { "id": 7, "tenant_id": 1, "arrival_time_us": 0, "num_bootstraps": 3,
              "key_size_mb": 1.0, "noise_budget": 0.2 }
        ]"#,
    );
    let out_json = dir.join("summary.json");

    let output = run_sim(&[
        "--hw",
        hw.to_str().unwrap(),
        "--workload",
        wl.to_str().unwrap(),
        "--policy",
        "fifo",
        "--json-out",
        out_json.to_str().unwrap(),
        "--quiet",
    ]);
    assert!(
        output.status.success(),
        "tfhe_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== FIFO Baseline ==="));
    assert!(!stdout.contains("HPS Scheduler"));

    let v: Value =
        serde_json::from_str(&fs::read_to_string(&out_json).expect("read summary")).expect("json");
    let runs = v["runs"].as_array().expect("runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["policy"]["kind"].as_str(), Some("fifo"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tfhe_sim_rejects_bad_inputs() {
    let dir = unique_temp_dir("cli-bad");
    let good_hw = write_file(&dir, "hw.txt", HW);
    let bad_hw = write_file(&dir, "bad_hw.txt", "0 1000 1024 16 1.5 0.5\n");
    let wl = write_file(&dir, "jobs.txt", WORKLOAD);
    let empty_wl = write_file(&dir, "empty.txt", "# nothing here\n");
    let missing = dir.join("missing.txt");

    let cases: [&[&str]; 4] = [
        &["--hw", bad_hw.to_str().unwrap(), "--workload", wl.to_str().unwrap()],
        &["--hw", good_hw.to_str().unwrap(), "--workload", empty_wl.to_str().unwrap()],
        &[
            "--hw",
            good_hw.to_str().unwrap(),
            "--workload",
            missing.to_str().unwrap(),
        ],
        &[
            "--hw",
            good_hw.to_str().unwrap(),
            "--workload",
            wl.to_str().unwrap(),
            "--pcie-scale",
            "0",
        ],
    ];
    for args in cases {
        let mut full = args.to_vec();
        full.push("--quiet");
        let output = run_sim(&full);
        assert!(!output.status.success(), "expected failure for {args:?}");
        assert!(!output.stderr.is_empty());
        assert!(output.stdout.is_empty());
    }

    let _ = fs::remove_dir_all(&dir);
}
