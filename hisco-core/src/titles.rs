use crate::graph::Graph;
use crate::status::emit_status_page;
use crate::vocab::{
    RDF_TYPE, SDMX_SEX, SKOS_ALT_LABEL, SKOS_CONCEPT, SKOS_MEMBER, SKOS_PREF_LABEL,
    STATUS_PROPERTY, Sex, collection_uri, occupation_uri, status_uri,
};
use hisco_scanner::listing::{
    ListingRow, parse_detail_attributes, parse_listing_page, record_id, status_code,
};
use hisco_scanner::status::parse_status_page;
use hisco_scanner::{PageFetcher, ProgressCallback, Result, ScanError};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const DEFAULT_START_PAGE: &str = "list_hiswi.php?step=0&publish=Y";

const GENDER_KEY: &str = "Gender";
const TRANSLATION_KEY: &str = "Translation";
const STATUS_KEY: &str = "Status";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitleStats {
    pub pages: usize,
    pub titles: usize,
    pub status_pages: usize,
}

/// Translations use a typographic apostrophe in places; emit the plain one.
pub fn normalize_apostrophes(text: &str) -> String {
    text.replace('\u{2019}', "'")
}

/// Walks the occupational title listing page by page.
///
/// Each row becomes a concept; its detail page adds sex, English translation
/// and status. Status pages are parsed at most once per paginator no matter
/// how many rows point at them. The next page is only known once the current
/// one is parsed, so pages are strictly sequential.
pub struct TitlePaginator<'a> {
    fetcher: &'a PageFetcher,
    start_page: String,
    visited_status_urls: HashSet<String>,
    progress_callback: Option<ProgressCallback>,
}

impl<'a> TitlePaginator<'a> {
    pub fn new(fetcher: &'a PageFetcher) -> Self {
        Self {
            fetcher,
            start_page: DEFAULT_START_PAGE.to_string(),
            visited_status_urls: HashSet::new(),
            progress_callback: None,
        }
    }

    pub fn with_start_page(mut self, start_page: impl Into<String>) -> Self {
        self.start_page = start_page.into();
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report(&self, url: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(url.to_string());
        }
    }

    pub async fn paginate(&mut self, graph: &mut Graph) -> Result<TitleStats> {
        info!("Walking occupational titles from {}", self.start_page);
        let mut stats = TitleStats::default();
        let mut visited_pages = HashSet::new();
        let mut current_page = Some(self.fetcher.resolve(&self.start_page)?);

        while let Some(page_url) = current_page.take() {
            visited_pages.insert(page_url.clone());
            self.report(&page_url);

            let page = {
                let document = self.fetcher.fetch(&page_url).await?;
                parse_listing_page(&document)?
            };
            debug!("{} titles on {}", page.rows.len(), page_url);

            for row in &page.rows {
                self.process_row(row, graph, &mut stats).await?;
            }
            stats.pages += 1;

            if let Some(next) = page.next_link {
                let next_url = self.fetcher.resolve(&next)?;
                if visited_pages.contains(&next_url) {
                    warn!("Listing links back to {}; stopping", next_url);
                } else {
                    current_page = Some(next_url);
                }
            }
        }

        info!(
            "Titles complete: {} titles on {} pages, {} status pages",
            stats.titles, stats.pages, stats.status_pages
        );
        Ok(stats)
    }

    async fn process_row(
        &mut self,
        row: &ListingRow,
        graph: &mut Graph,
        stats: &mut TitleStats,
    ) -> Result<()> {
        let detail_url = self.fetcher.resolve(&row.detail_link)?;
        let concept = occupation_uri(&record_id(&detail_url)?);

        graph.add_resource(&concept, RDF_TYPE, SKOS_CONCEPT);
        graph.add_lang_literal(&concept, SKOS_PREF_LABEL, &row.title, row.language);
        graph.add_resource(&collection_uri(&row.code), SKOS_MEMBER, &concept);
        stats.titles += 1;

        let attributes = {
            let document = self.fetcher.fetch(&detail_url).await?;
            parse_detail_attributes(&document)
        };

        if let Some(gender) = attributes.get(GENDER_KEY) {
            graph.add_resource(&concept, SDMX_SEX, &Sex::from_label(&gender.value).uri());
        }

        if let Some(translation) = attributes.get(TRANSLATION_KEY)
            && !translation.value.is_empty()
        {
            graph.add_lang_literal(
                &concept,
                SKOS_ALT_LABEL,
                &normalize_apostrophes(&translation.value),
                "en",
            );
        }

        if let Some(status) = attributes.get(STATUS_KEY) {
            let code = status_code(&status.value)?;
            graph.add_resource(&concept, STATUS_PROPERTY, &status_uri(&code));

            let link = status.link.as_deref().ok_or_else(|| {
                ScanError::MalformedRecord(format!("status '{}' carries no link", status.value))
            })?;
            let status_url = self.fetcher.resolve(link)?;
            if !self.visited_status_urls.contains(&status_url) {
                let status_page = {
                    let document = self.fetcher.fetch(&status_url).await?;
                    parse_status_page(&document)?
                };
                emit_status_page(graph, &status_page);
                self.visited_status_urls.insert(status_url);
                stats.status_pages += 1;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_apostrophes() {
        assert_eq!(normalize_apostrophes("baker’s wife"), "baker's wife");
        assert_eq!(normalize_apostrophes("plain's"), "plain's");
    }
}
