use crate::data::Database;
use crate::graph::Graph;
use crate::hierarchy::{DEFAULT_MAJOR_PAGE, HierarchyCrawler, HierarchyStats};
use crate::titles::{DEFAULT_START_PAGE, TitlePaginator, TitleStats};
use hisco_scanner::{PageFetcher, PageStore, ProgressCallback, Result, ScanError};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::error;

pub const DEFAULT_BASE_URL: &str = "http://historyofwork.iisg.nl/";
pub const DEFAULT_CACHE_PATH: &str = "~/.cache/hisco/pages.db";
pub const DEFAULT_OUTPUT_PATH: &str = "hisco.nt";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which traversals a harvest runs. The classification goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestTargets {
    pub hierarchy: bool,
    pub titles: bool,
}

impl HarvestTargets {
    pub const ALL: HarvestTargets = HarvestTargets {
        hierarchy: true,
        titles: true,
    };
    pub const HIERARCHY: HarvestTargets = HarvestTargets {
        hierarchy: true,
        titles: false,
    };
    pub const TITLES: HarvestTargets = HarvestTargets {
        hierarchy: false,
        titles: true,
    };
}

/// Options for configuring a harvest
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub base_url: String,
    /// `None` keeps fetched pages in memory for this run only.
    pub cache_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub timeout_secs: u64,
    pub major_page: String,
    pub start_page: String,
    pub targets: HarvestTargets,
    pub show_progress_bars: bool,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_path: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            major_page: DEFAULT_MAJOR_PAGE.to_string(),
            start_page: DEFAULT_START_PAGE.to_string(),
            targets: HarvestTargets::ALL,
            show_progress_bars: false,
        }
    }
}

/// Everything a run produced, including what was accumulated before a
/// fatal error.
#[derive(Debug)]
pub struct HarvestReport {
    pub graph: Graph,
    pub hierarchy: Option<HierarchyStats>,
    pub titles: Option<TitleStats>,
    pub network_fetches: usize,
    pub error: Option<ScanError>,
}

impl HarvestReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

fn open_store(cache_path: Option<&Path>) -> Result<Box<dyn PageStore>> {
    match cache_path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(|e| {
                    ScanError::CacheError(format!("{}: {}", parent.display(), e))
                })?;
            }
            let db = Database::new(path)
                .map_err(|e| ScanError::CacheError(format!("{}: {}", path.display(), e)))?;
            Ok(Box::new(db))
        }
        None => Ok(Box::new(hisco_scanner::MemoryStore::new())),
    }
}

/// Run the selected traversals sequentially against one fetcher and one graph.
///
/// Setup failures (cache, client, base URL) are returned as `Err`. A failure
/// during a traversal stops the run but still hands back the partial graph in
/// the report.
pub async fn execute_harvest(
    options: &HarvestOptions,
    progress_callback: Option<ProgressCallback>,
) -> Result<HarvestReport> {
    let store = open_store(options.cache_path.as_deref())?;
    let fetcher = PageFetcher::with_timeout(&options.base_url, store, options.timeout_secs)?;

    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting harvest...");
        Some(pb)
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));
    let internal_callback: ProgressCallback = {
        let pb = progress_bar.clone();
        let count = processed_count.clone();
        let outer = progress_callback.clone();
        Arc::new(move |url: String| {
            let n = count.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb {
                pb.set_message(format!("{} pages :: {}", n, url));
            }
            if let Some(ref outer) = outer {
                outer(url);
            }
        })
    };

    let mut report = HarvestReport {
        graph: Graph::new(),
        hierarchy: None,
        titles: None,
        network_fetches: 0,
        error: None,
    };

    if options.targets.hierarchy {
        let crawler = HierarchyCrawler::new(&fetcher)
            .with_major_page(options.major_page.as_str())
            .with_progress_callback(internal_callback.clone());
        match crawler.crawl(&mut report.graph).await {
            Ok(stats) => report.hierarchy = Some(stats),
            Err(e) => {
                error!("Classification crawl failed: {}", e);
                report.error = Some(e);
            }
        }
    }

    if options.targets.titles && report.error.is_none() {
        let mut paginator = TitlePaginator::new(&fetcher)
            .with_start_page(options.start_page.as_str())
            .with_progress_callback(internal_callback.clone());
        match paginator.paginate(&mut report.graph).await {
            Ok(stats) => report.titles = Some(stats),
            Err(e) => {
                error!("Title listing failed: {}", e);
                report.error = Some(e);
            }
        }
    }

    report.network_fetches = fetcher.network_fetches();

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        if report.is_success() {
            pb.finish_with_message(format!(
                "Harvest complete! {} pages, {} statements",
                total,
                report.graph.len()
            ));
        } else {
            pb.abandon_with_message(format!("Harvest stopped after {} pages", total));
        }
    }

    Ok(report)
}

/// Render the graph to `stdout` and to the output file. Both sinks receive
/// the same bytes.
pub fn write_outputs<W: Write>(graph: &Graph, stdout: &mut W, output_path: &Path) -> io::Result<()> {
    let rendered = graph.to_ntriples();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(File::create(output_path)?);
    file.write_all(rendered.as_bytes())?;
    file.flush()
}
