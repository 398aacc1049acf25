use hisco::handlers::*;
use hisco::command_argument_builder;
use hisco_core::graph::Graph;
use hisco_core::harvest::{HarvestReport, HarvestTargets};
use hisco_core::hierarchy::HierarchyStats;
use hisco_scanner::ScanError;
use std::path::{Path, PathBuf};

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = command_argument_builder()
        .try_get_matches_from(args)
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    sub.clone()
}

#[test]
fn test_expand_path_leaves_plain_paths() {
    assert_eq!(expand_path("out/hisco.nt"), PathBuf::from("out/hisco.nt"));
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/.cache/hisco/pages.db");
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with(".cache/hisco/pages.db"));
}

#[test]
fn test_targets_for_subcommands() {
    assert_eq!(targets_for("hierarchy"), Some(HarvestTargets::HIERARCHY));
    assert_eq!(targets_for("titles"), Some(HarvestTargets::TITLES));
    assert_eq!(targets_for("harvest"), Some(HarvestTargets::ALL));
    assert_eq!(targets_for("fuzz"), None);
}

#[test]
fn test_options_from_explicit_flags() {
    let matches = sub_matches(&[
        "hisco",
        "harvest",
        "--base-url",
        "http://localhost:8080/hisco/",
        "--cache",
        "/tmp/hisco-test.db",
        "-o",
        "/tmp/out.nt",
        "--timeout",
        "5",
        "--major-page",
        "groups.php",
        "--start-page",
        "titles.php?step=0",
    ]);

    let options = options_from_matches(&matches, HarvestTargets::ALL, true);

    assert_eq!(options.base_url, "http://localhost:8080/hisco/");
    assert_eq!(options.cache_path, Some(PathBuf::from("/tmp/hisco-test.db")));
    assert_eq!(options.output_path, PathBuf::from("/tmp/out.nt"));
    assert_eq!(options.timeout_secs, 5);
    assert_eq!(options.major_page, "groups.php");
    assert_eq!(options.start_page, "titles.php?step=0");
    assert!(!options.show_progress_bars);
}

#[test]
fn test_options_defaults() {
    let matches = sub_matches(&["hisco", "titles", "--output", "hisco.nt"]);

    let options = options_from_matches(&matches, HarvestTargets::TITLES, false);

    assert_eq!(options.output_path, PathBuf::from("hisco.nt"));
    assert_eq!(options.timeout_secs, 30);
    assert_eq!(options.major_page, "major.php");
    assert_eq!(options.start_page, "list_hiswi.php?step=0&publish=Y");
    assert_eq!(options.targets, HarvestTargets::TITLES);
    assert!(options.show_progress_bars);
}

#[test]
fn test_no_cache_flag_uses_memory_store() {
    let matches = sub_matches(&["hisco", "hierarchy", "--no-cache"]);
    let options = options_from_matches(&matches, HarvestTargets::HIERARCHY, false);
    assert!(options.cache_path.is_none());
}

#[test]
fn test_no_cache_conflicts_with_fresh() {
    let result =
        command_argument_builder().try_get_matches_from(["hisco", "harvest", "--no-cache", "--fresh"]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_base_url_rejected() {
    let result = command_argument_builder().try_get_matches_from([
        "hisco",
        "harvest",
        "--base-url",
        "not a url",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_quiet_is_global() {
    let matches = command_argument_builder()
        .try_get_matches_from(["hisco", "harvest", "-q"])
        .unwrap();
    assert!(matches.get_flag("quiet"));
}

#[test]
fn test_format_summary() {
    let mut graph = Graph::new();
    graph.add_literal("http://example.org#scheme-1", "http://purl.org/dc/terms/title", "x");
    let report = HarvestReport {
        graph,
        hierarchy: Some(HierarchyStats {
            major: 1,
            minor: 2,
            rubri: 3,
            micro: 4,
        }),
        titles: None,
        network_fetches: 7,
        error: Some(ScanError::LookupFailure("unknown language label 'Klingon'".to_string())),
    };

    let summary = format_summary(&report, Path::new("hisco.nt"));

    assert!(summary.contains("1 major, 2 minor, 3 rubri, 4 micro groups"));
    assert!(!summary.contains("Titles:"));
    assert!(summary.contains("1 statements, 7 pages fetched"));
    assert!(summary.contains("hisco.nt"));
    assert!(summary.contains("Klingon"));
}
