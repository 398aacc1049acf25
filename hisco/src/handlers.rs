use clap::ArgMatches;
use colored::Colorize;
use hisco_core::data::Database;
use hisco_core::harvest::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_TIMEOUT_SECS,
    HarvestOptions, HarvestReport, HarvestTargets, execute_harvest, write_outputs,
};
use hisco_core::hierarchy::DEFAULT_MAJOR_PAGE;
use hisco_core::titles::DEFAULT_START_PAGE;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Install the log subscriber. Logs go to stderr; stdout carries the graph.
pub fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Traversals selected by a subcommand name.
pub fn targets_for(subcommand: &str) -> Option<HarvestTargets> {
    match subcommand {
        "hierarchy" => Some(HarvestTargets::HIERARCHY),
        "titles" => Some(HarvestTargets::TITLES),
        "harvest" => Some(HarvestTargets::ALL),
        _ => None,
    }
}

fn string_arg(matches: &ArgMatches, id: &str, default: &str) -> String {
    matches
        .get_one::<String>(id)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

pub fn options_from_matches(
    matches: &ArgMatches,
    targets: HarvestTargets,
    quiet: bool,
) -> HarvestOptions {
    let base_url = matches
        .get_one::<Url>("base-url")
        .map(|url| url.to_string())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let cache_path = if matches.get_flag("no-cache") {
        None
    } else {
        Some(expand_path(&string_arg(matches, "cache", DEFAULT_CACHE_PATH)))
    };

    HarvestOptions {
        base_url,
        cache_path,
        output_path: expand_path(&string_arg(matches, "output", DEFAULT_OUTPUT_PATH)),
        timeout_secs: matches
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        major_page: string_arg(matches, "major-page", DEFAULT_MAJOR_PAGE),
        start_page: string_arg(matches, "start-page", DEFAULT_START_PAGE),
        targets,
        show_progress_bars: !quiet,
    }
}

/// Human-readable run summary for stderr.
pub fn format_summary(report: &HarvestReport, output_path: &Path) -> String {
    let mut summary = String::new();

    if let Some(ref stats) = report.hierarchy {
        summary.push_str(&format!(
            "{} Classification: {} major, {} minor, {} rubri, {} micro groups\n",
            "✓".green().bold(),
            stats.major,
            stats.minor,
            stats.rubri,
            stats.micro
        ));
    }
    if let Some(ref stats) = report.titles {
        summary.push_str(&format!(
            "{} Titles: {} titles on {} pages, {} status pages\n",
            "✓".green().bold(),
            stats.titles,
            stats.pages,
            stats.status_pages
        ));
    }
    summary.push_str(&format!(
        "{} {} statements, {} pages fetched over the network\n",
        "→".blue(),
        report.graph.len(),
        report.network_fetches
    ));
    summary.push_str(&format!(
        "{} Output: {}\n",
        "→".blue(),
        output_path.display().to_string().bright_white()
    ));
    if let Some(ref error) = report.error {
        summary.push_str(&format!(
            "{} Harvest stopped early: {}\n",
            "✗".red().bold(),
            error
        ));
    }

    summary
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message);
    std::process::exit(1);
}

/// Run the traversals a subcommand selects, then write the graph to stdout
/// and the output file. A traversal failure still writes what was gathered
/// before exiting with status 1.
pub async fn handle_harvest(sub_matches: &ArgMatches, targets: HarvestTargets, quiet: bool) {
    let options = options_from_matches(sub_matches, targets, quiet);

    if sub_matches.get_flag("fresh")
        && let Some(ref cache_path) = options.cache_path
        && Database::exists(cache_path)
    {
        info!("Deleting page cache at {}", cache_path.display());
        if let Err(e) = Database::drop(cache_path) {
            fail(format!("Could not delete {}: {}", cache_path.display(), e));
        }
    }

    let report = match execute_harvest(&options, None).await {
        Ok(report) => report,
        Err(e) => fail(e),
    };

    if let Err(e) = write_outputs(&report.graph, &mut io::stdout().lock(), &options.output_path) {
        fail(format!(
            "Could not write {}: {}",
            options.output_path.display(),
            e
        ));
    }

    if !quiet {
        eprint!("{}", format_summary(&report, &options.output_path));
    }

    if let Some(ref error) = report.error {
        warn!("Partial graph written after failure: {}", error);
        std::process::exit(1);
    }
}
