use crate::CLAP_STYLING;
use clap::{arg, command};
use hisco_core::harvest::{DEFAULT_BASE_URL, DEFAULT_CACHE_PATH, DEFAULT_OUTPUT_PATH};
use hisco_core::hierarchy::DEFAULT_MAJOR_PAGE;
use hisco_core::titles::DEFAULT_START_PAGE;
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("hisco")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("hisco")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress and non-essential output")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(source_args(
            command!("hierarchy")
                .about("Crawl the four-level classification (major, minor, rubri, micro groups)"),
        ))
        .subcommand(source_args(
            command!("titles")
                .about("Walk the occupational title listing, with sex, translation and status"),
        ))
        .subcommand(source_args(
            command!("harvest").about("Crawl the classification, then the titles, into one graph"),
        ))
}

/// Arguments shared by every traversal subcommand.
fn source_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(--"base-url" <URL>)
            .required(false)
            .help("Root of the HISCO site every page link is resolved against")
            .env("HISCO_BASE_URL")
            .value_parser(clap::value_parser!(Url))
            .default_value(DEFAULT_BASE_URL),
    )
    .arg(
        arg!(--"cache" <PATH>)
            .required(false)
            .help("SQLite page cache; a second run against a warm cache makes no requests")
            .env("HISCO_CACHE")
            .default_value(DEFAULT_CACHE_PATH),
    )
    .arg(
        arg!(--"no-cache")
            .required(false)
            .help("Keep fetched pages in memory for this run only")
            .action(clap::ArgAction::SetTrue)
            .conflicts_with("fresh"),
    )
    .arg(
        arg!(--"fresh")
            .required(false)
            .help("Delete the page cache before running")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("File receiving the N-Triples output (also written to stdout)")
            .env("HISCO_OUTPUT")
            .default_value(DEFAULT_OUTPUT_PATH),
    )
    .arg(
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Request timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("30"),
    )
    .arg(
        arg!(--"major-page" <PAGE>)
            .required(false)
            .help("Major group page, relative to the base URL")
            .default_value(DEFAULT_MAJOR_PAGE),
    )
    .arg(
        arg!(--"start-page" <PAGE>)
            .required(false)
            .help("First page of the title listing, relative to the base URL")
            .default_value(DEFAULT_START_PAGE),
    )
}
