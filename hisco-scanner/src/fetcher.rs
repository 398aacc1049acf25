use crate::error::{Result, ScanError};
use reqwest::Client;
use scraper::Html;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Durable storage of raw page bodies keyed by absolute URL.
///
/// A stored body is never replaced: the first write for a URL wins, so the
/// same URL always yields the same bytes for the lifetime of the store.
pub trait PageStore {
    fn load(&self, url: &str) -> Result<Option<String>>;
    fn store(&self, url: &str, body: &str) -> Result<()>;
}

/// Process-local page store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a page, mostly useful to simulate a warm cache.
    pub fn with_page(self, url: &str, body: &str) -> Self {
        if let Ok(mut pages) = self.pages.lock() {
            pages.insert(url.to_string(), body.to_string());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.pages.lock().map(|pages| pages.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PageStore for MemoryStore {
    fn load(&self, url: &str) -> Result<Option<String>> {
        let pages = self
            .pages
            .lock()
            .map_err(|_| ScanError::CacheError("memory store lock poisoned".to_string()))?;
        Ok(pages.get(url).cloned())
    }

    fn store(&self, url: &str, body: &str) -> Result<()> {
        let mut pages = self
            .pages
            .lock()
            .map_err(|_| ScanError::CacheError("memory store lock poisoned".to_string()))?;
        pages
            .entry(url.to_string())
            .or_insert_with(|| body.to_string());
        Ok(())
    }
}

/// Cache-backed page retrieval.
///
/// Every lookup goes to the store first; only a miss touches the network, and
/// the raw body is stored before it is parsed. Parsing is redone on every call.
/// Failures are not retried.
pub struct PageFetcher {
    client: Client,
    base_url: Url,
    store: Box<dyn PageStore>,
    network_fetches: AtomicUsize,
}

impl PageFetcher {
    pub fn new(base_url: &str, store: Box<dyn PageStore>) -> Result<Self> {
        Self::with_timeout(base_url, store, 30)
    }

    pub fn with_timeout(base_url: &str, store: Box<dyn PageStore>, timeout_secs: u64) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent("hisco/0.1 (https://github.com/trapdoorsec/hisco)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            base_url,
            store,
            network_fetches: AtomicUsize::new(0),
        })
    }

    pub fn store(&self) -> &dyn PageStore {
        self.store.as_ref()
    }

    /// Number of GET requests actually sent so far.
    pub fn network_fetches(&self) -> usize {
        self.network_fetches.load(Ordering::Relaxed)
    }

    /// Resolve `href` against the base URL. Absolute hrefs pass through;
    /// fragments are dropped so they never split a cache entry.
    pub fn resolve(&self, href: &str) -> Result<String> {
        let mut url = self
            .base_url
            .join(href.trim())
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", href, e)))?;
        url.set_fragment(None);
        Ok(url.to_string())
    }

    pub async fn fetch_body(&self, href: &str) -> Result<String> {
        let url = self.resolve(href)?;

        if let Some(body) = self.store.load(&url)? {
            debug!("Cache hit for {}", url);
            return Ok(body);
        }

        info!("Fetching {}", url);
        self.network_fetches.fetch_add(1, Ordering::Relaxed);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;

        self.store.store(&url, &body)?;
        Ok(body)
    }

    pub async fn fetch(&self, href: &str) -> Result<Html> {
        let body = self.fetch_body(href).await?;
        Ok(Html::parse_document(&body))
    }
}
