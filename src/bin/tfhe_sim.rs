//! TFHE bootstrap 引擎池仿真
//!
//! 读取硬件配置与工作负载，分别用 FIFO 和 HPS（或其中之一）跑一遍，打印统计并按需导出 CSV/JSON。

use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tfhe_pool_sim::hw::load_hw_config;
use tfhe_pool_sim::pool::{RunOptions, simulate};
use tfhe_pool_sim::report::{RunSummary, Summary, format_stats, write_run_csv};
use tfhe_pool_sim::sched::{HpsWeights, Policy};
use tfhe_pool_sim::workload::load_workload;

#[derive(Debug, Parser)]
#[command(
    name = "tfhe-sim",
    about = "多租户 TFHE bootstrap 引擎池调度仿真：FIFO vs HPS"
)]
struct Args {
    /// 硬件配置文件（文本或 .json）
    #[arg(long)]
    hw: PathBuf,

    /// 工作负载文件（文本或 .json）
    #[arg(long)]
    workload: PathBuf,

    /// 运行哪些策略
    #[arg(long, value_enum, default_value_t = PolicyChoice::Both)]
    policy: PolicyChoice,

    /// PCIe 带宽缩放系数（> 0）
    #[arg(long, default_value_t = 1.0)]
    pcie_scale: f64,

    /// 单次密钥传输大小上限（MB），0 表示不限
    #[arg(long, default_value_t = 0.0)]
    pcie_cap_mb: f64,

    #[arg(long, default_value_t = 3.0)]
    w_key: f64,
    #[arg(long, default_value_t = 4.0)]
    w_noise: f64,
    #[arg(long, default_value_t = 2.0)]
    w_bw: f64,
    #[arg(long, default_value_t = 1.5)]
    w_fair: f64,
    #[arg(long, default_value_t = 2.0)]
    w_deadline: f64,

    /// 导出 `<prefix>-<policy>.csv` 与 `<prefix>-<policy>-engines.csv`
    #[arg(long)]
    csv_prefix: Option<PathBuf>,

    /// 把统计汇总写成 JSON
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// 打印每一次调度挑选
    #[arg(long)]
    log_picks: bool,

    /// 按约 10% 的粒度打印进度
    #[arg(long)]
    progress: bool,

    /// 不输出日志
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyChoice {
    Fifo,
    Hps,
    Both,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.quiet {
            tracing_subscriber::EnvFilter::new("off")
        } else {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        })
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if !(args.pcie_scale > 0.0) {
        eprintln!("--pcie-scale 必须 > 0，实际 {}", args.pcie_scale);
        return ExitCode::FAILURE;
    }
    if !(args.pcie_cap_mb >= 0.0) {
        eprintln!("--pcie-cap-mb 不能为负，实际 {}", args.pcie_cap_mb);
        return ExitCode::FAILURE;
    }
    let weights = HpsWeights {
        key_affinity: args.w_key,
        noise_urgency: args.w_noise,
        bw_penalty: args.w_bw,
        fairness: args.w_fair,
        deadline: args.w_deadline,
    };
    if !weights.is_valid() {
        eprintln!("HPS 权重必须是非负有限数: {weights:?}");
        return ExitCode::FAILURE;
    }

    let cfg = match load_hw_config(&args.hw) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let workload = match load_workload(&args.workload) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let opts = RunOptions {
        pcie_scale: args.pcie_scale,
        pcie_cap_mb: args.pcie_cap_mb,
        record_engine_log: args.csv_prefix.is_some(),
        show_progress: args.progress,
        trace_picks: args.log_picks,
    };

    let policies: Vec<(&str, Policy)> = match args.policy {
        PolicyChoice::Fifo => vec![("FIFO Baseline", Policy::Fifo)],
        PolicyChoice::Hps => vec![("HPS Scheduler", Policy::hps(weights))],
        PolicyChoice::Both => vec![
            ("FIFO Baseline", Policy::Fifo),
            ("HPS Scheduler", Policy::hps(weights)),
        ],
    };

    // 每个策略各自从同一份静态工作负载克隆，互不影响
    let runs: Vec<_> = policies
        .iter()
        .map(|(title, p)| (*title, simulate(&cfg, &workload, *p, opts)))
        .collect();

    for (title, run) in &runs {
        println!("{}", format_stats(title, &cfg, &run.stats, workload.len()));
        if !run.completed() {
            eprintln!(
                "警告: {} 有 {} 个作业未完成",
                title,
                run.jobs.len() - run.finished
            );
        }
    }

    if let Some(prefix) = &args.csv_prefix {
        for (_, run) in &runs {
            match write_run_csv(prefix, run) {
                Ok(paths) => {
                    for p in paths {
                        eprintln!("wrote {}", p.display());
                    }
                }
                Err(e) => {
                    eprintln!("写 CSV 失败: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    if let Some(path) = &args.json_out {
        let summary = Summary {
            hw: cfg.clone(),
            runs: runs.iter().map(|(_, r)| RunSummary::from(r)).collect(),
        };
        let json = match serde_json::to_string_pretty(&summary) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("序列化汇总失败: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = fs::write(path, json) {
            eprintln!("写 {} 失败: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
