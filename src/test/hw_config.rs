use crate::error::LoadError;
use crate::hw::{HwConfig, load_hw_config, parse_hw_config};
use std::path::Path;

fn parse(text: &str) -> Result<HwConfig, LoadError> {
    parse_hw_config(text, Path::new("hw.cfg"))
}

#[test]
fn parses_six_fields_and_defaults_batch_to_one() {
    let cfg = parse("# engines hbm keymem pcie freq ctx\n\n4 1024 2048 16 1.5 2.0\n").expect("parse");
    assert_eq!(cfg.engine_count, 4);
    assert_eq!(cfg.hbm_bandwidth_gbps, 1024.0);
    assert_eq!(cfg.key_mem_mb, 2048.0);
    assert_eq!(cfg.pcie_bandwidth_gbps, 16.0);
    assert_eq!(cfg.freq_ghz, 1.5);
    assert_eq!(cfg.ctx_switch_overhead_us, 2.0);
    assert_eq!(cfg.batch_size, 1);
    assert!(cfg.pcie_enabled());
}

#[test]
fn batch_size_below_one_is_raised_to_one() {
    let cfg = parse("2 512 1024 0 1.0 0.5 0").expect("parse");
    assert_eq!(cfg.batch_size, 1);
    assert!(!cfg.pcie_enabled());

    let cfg = parse("2 512 1024 0 1.0 0.5 -3").expect("parse");
    assert_eq!(cfg.batch_size, 1);

    let cfg = parse("2 512 1024 0 1.0 0.5 8").expect("parse");
    assert_eq!(cfg.batch_size, 8);
}

#[test]
fn only_first_data_line_is_used() {
    let cfg = parse("1 100 1 0 1 0\n8 800 1 0 1 0\n").expect("parse");
    assert_eq!(cfg.engine_count, 1);
}

#[test]
fn rejects_short_lines_and_bad_numbers() {
    match parse("4 1024 2048 16 1.5") {
        Err(LoadError::InvalidLine { line_no, .. }) => assert_eq!(line_no, 1),
        other => panic!("expected InvalidLine, got {other:?}"),
    }
    assert!(matches!(
        parse("# c\nfour 1024 2048 16 1.5 2"),
        Err(LoadError::InvalidLine { line_no: 2, .. })
    ));
}

#[test]
fn rejects_empty_and_invalid_values() {
    assert!(matches!(parse("# only comments\n\n"), Err(LoadError::Empty { .. })));
    assert!(parse("0 1024 2048 16 1.5 2").is_err());
    assert!(parse("-1 1024 2048 16 1.5 2").is_err());
    assert!(parse("2 0 2048 16 1.5 2").is_err());
    assert!(parse("2 100 2048 -1 1.5 2").is_err());
    assert!(parse("2 100 2048 1 1.5 -2").is_err());
    for line in [
        "2 inf 2048 16 1.5 2",
        "2 100 2048 NaN 1.5 2",
        "2 100 2048 inf 1.5 2",
        "2 100 2048 16 1.5 NaN",
    ] {
        assert!(
            matches!(parse(line), Err(LoadError::Invalid { .. })),
            "accepted `{line}`"
        );
    }
}

#[test]
fn per_engine_bandwidth_splits_hbm_evenly() {
    let cfg = parse("4 1000 0 0 1 0").expect("parse");
    assert!((cfg.per_engine_mbit_per_us() - 0.25).abs() < 1e-12);
}

#[test]
fn loads_json_and_text_files() {
    let dir = super::unique_temp_dir("hw");
    let json = dir.join("hw.json");
    std::fs::write(
        &json,
        r#"{ "engine_count": 3, "hbm_bandwidth_gbps": 600.0, "pcie_bandwidth_gbps": 8.0 }"#,
    )
    .expect("write json");
    let cfg = load_hw_config(&json).expect("load json");
    assert_eq!(cfg.engine_count, 3);
    assert_eq!(cfg.batch_size, 1);
    assert_eq!(cfg.ctx_switch_overhead_us, 0.0);

    let txt = dir.join("hw.cfg");
    std::fs::write(&txt, "3 600 0 8 1 0 2\n").expect("write cfg");
    let cfg = load_hw_config(&txt).expect("load cfg");
    assert_eq!(cfg.batch_size, 2);

    assert!(matches!(
        load_hw_config(&dir.join("missing.cfg")),
        Err(LoadError::Io { .. })
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
