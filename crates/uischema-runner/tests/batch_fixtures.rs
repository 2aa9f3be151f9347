use std::path::{Path, PathBuf};

use tempfile::tempdir;
use uischema_parser::ScanMode;
use uischema_runner::{BatchReport, Config, Runner};
use uischema_validate::{Tier, CONVERSATION_PROP_USAGE, NO_EXPORT_INTERFACE, NO_REACT_NODE};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/datapoints")
}

fn runner() -> Runner {
    Runner::new(Config::default())
}

#[test]
fn clean_folder_is_high_tier() {
    let out = runner().validate_folder(&fixtures().join("clean-card")).unwrap();
    assert_eq!(out.id, "clean-card");
    assert!(out.report.all_passed, "{:?}", out.report);
    assert_eq!(out.tier, Tier::High);
    let names: Vec<&str> = out.components[0].prop_names().collect();
    assert_eq!(names, vec!["label", "value", "trend"]);
    assert_eq!(
        out.components[0].props[0].description.as_deref(),
        Some("Label shown above the value")
    );
}

#[test]
fn flat_mode_only_keeps_commented_members() {
    let mut cfg = Config::default();
    cfg.parser.mode = ScanMode::Flat;
    let out = Runner::new(cfg)
        .validate_folder(&fixtures().join("clean-card"))
        .unwrap();
    let names: Vec<&str> = out.components[0].prop_names().collect();
    assert_eq!(names, vec!["label", "value"]);
}

#[test]
fn safe_mismatches_land_in_medium() {
    let out = runner().validate_folder(&fixtures().join("filtered-chart")).unwrap();
    assert!(out.path.ends_with("filtered-chart"));
    assert!(out.report.all_passed, "{:?}", out.report);
    assert_eq!(out.report.mismatch_totals().total_safe_mismatches, 3);
    assert_eq!(out.tier, Tier::Medium);
}

#[test]
fn schema_drift_is_low() {
    let out = runner().validate_folder(&fixtures().join("schema-drift")).unwrap();
    assert_eq!(out.tier, Tier::Low);
    assert_eq!(out.report.mismatch_totals().total_unsafe_mismatches, 1);
    let usage = out.report.result(CONVERSATION_PROP_USAGE).unwrap();
    assert!(!usage.passed);
    assert_eq!(
        usage.details,
        vec![
            "Message 1, DataTable.caption: Not in schema params",
            "Message 1, DataTable.striped: Not in schema params",
        ]
    );
}

#[test]
fn structural_failures_reject() {
    let out = runner().validate_folder(&fixtures().join("react-slot")).unwrap();
    assert_eq!(out.tier, Tier::Rejected);
    assert!(!out.report.result(NO_EXPORT_INTERFACE).unwrap().passed);
    assert!(!out.report.result(NO_REACT_NODE).unwrap().passed);
}

#[test]
fn batch_covers_every_folder_and_records_load_errors() {
    let batch = runner().run_batch(&fixtures()).unwrap();
    let ids: Vec<&str> = batch.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["clean-card", "filtered-chart", "react-slot", "schema-drift"]);
    assert_eq!(batch.load_errors.len(), 1);
    assert!(batch.load_errors[0].path.ends_with("broken-json"));
    assert!(batch.load_errors[0].error.contains("conversation.json"));

    let counts = batch.tier_counts();
    for tier in [Tier::High, Tier::Medium, Tier::Low, Tier::Rejected] {
        assert_eq!(counts[&tier], 1, "{tier:?}");
    }

    let out = tempdir().unwrap();
    let (json, md) = batch.write_to(out.path()).unwrap();
    let back: BatchReport = serde_json::from_slice(&std::fs::read(json).unwrap()).unwrap();
    assert_eq!(back.entries.len(), 4);
    let md = std::fs::read_to_string(md).unwrap();
    assert!(md.contains("## rejected (1)"));
    assert!(md.contains("## Load errors"));
}

#[test]
fn init_writes_config_once() {
    let dir = tempdir().unwrap();
    let path = Runner::init(dir.path()).unwrap();
    std::fs::write(&path, "[parser]\nmode = \"flat\"\n").unwrap();
    Runner::init(dir.path()).unwrap();
    let r = Runner::open(dir.path()).unwrap();
    assert_eq!(r.cfg.parser.mode, ScanMode::Flat);
}
