use crate::error::{Result, ScanError};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static ANCHOR_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\s+(\w.*)$").unwrap());
static TRANSLATION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2}):\t(\w.*)$").unwrap());

/// One status code with its labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub code: String,
    pub label: String,
    /// (lower-cased language tag, label), in page order.
    pub translations: Vec<(String, String)>,
}

/// Human description of the status attribute itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDescription {
    pub label: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPage {
    pub entries: Vec<StatusEntry>,
    pub description: StatusDescription,
}

/// Read the free-text status vocabulary line by line.
///
/// `<digits> <label>` opens an entry; `<XX>:<tab><label>` adds a translation
/// to the entry opened last. Every other line is ignored, including
/// translations seen before any entry.
pub fn parse_status_text(text: &str) -> Vec<StatusEntry> {
    let mut entries: Vec<StatusEntry> = Vec::new();

    for line in text.lines().map(str::trim) {
        if let Some(caps) = ANCHOR_LINE.captures(line) {
            entries.push(StatusEntry {
                code: caps[1].to_string(),
                label: caps[2].trim().to_string(),
                translations: Vec::new(),
            });
        } else if let Some(caps) = TRANSLATION_LINE.captures(line) {
            match entries.last_mut() {
                Some(entry) => entry
                    .translations
                    .push((caps[1].to_lowercase(), caps[2].trim().to_string())),
                None => debug!("Translation '{}' precedes any status entry", line),
            }
        }
    }

    entries
}

/// First non-empty line is the label, the second (if any) the comment.
pub fn parse_status_description(text: &str) -> Option<StatusDescription> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let label = lines.next()?.to_string();
    let comment = lines.next().map(str::to_string);
    Some(StatusDescription { label, comment })
}

/// Parse a status page: the vocabulary lives in `pre` blocks, the description
/// of the attribute in the first table.
pub fn parse_status_page(document: &Html) -> Result<StatusPage> {
    let pre_selector = Selector::parse("pre").unwrap();
    let table_selector = Selector::parse("table").unwrap();

    let blocks: Vec<String> = document
        .select(&pre_selector)
        .map(|pre| pre.text().collect::<String>())
        .collect();
    if blocks.is_empty() {
        return Err(ScanError::MalformedRecord(
            "status page has no free-text block".to_string(),
        ));
    }
    let entries = parse_status_text(&blocks.join("\n"));

    let table = document.select(&table_selector).next().ok_or_else(|| {
        ScanError::MalformedRecord("status page has no description table".to_string())
    })?;
    let description = parse_status_description(&table_text(table)).ok_or_else(|| {
        ScanError::MalformedRecord("status description table is empty".to_string())
    })?;

    debug!("Parsed {} status entries", entries.len());
    Ok(StatusPage {
        entries,
        description,
    })
}

/// Table text with one line per row.
fn table_text(table: scraper::ElementRef<'_>) -> String {
    let row_selector = Selector::parse("tr").unwrap();
    table
        .select(&row_selector)
        .map(|row| row.text().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_text() {
        let text = "Status codes\n\
                    11 Employer\n\
                    EN:\tEmployer\n\
                    NL:\tWerkgever\n\
                    \n\
                    12 Own account worker\n\
                    FR:\tIndépendant\n\
                    some trailing remark\n";

        let entries = parse_status_text(text);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "11");
        assert_eq!(entries[0].label, "Employer");
        assert_eq!(
            entries[0].translations,
            vec![
                ("en".to_string(), "Employer".to_string()),
                ("nl".to_string(), "Werkgever".to_string()),
            ]
        );
        assert_eq!(entries[1].code, "12");
        assert_eq!(entries[1].label, "Own account worker");
        assert_eq!(
            entries[1].translations,
            vec![("fr".to_string(), "Indépendant".to_string())]
        );
    }

    #[test]
    fn test_translation_needs_tab_and_anchor() {
        let text = "DE:\tOrphan\n\
                    21 Worker\n\
                    DE: Arbeiter\n\
                    de:\tArbeiter\n";

        let entries = parse_status_text(text);

        assert_eq!(entries.len(), 1);
        assert!(entries[0].translations.is_empty());
    }

    #[test]
    fn test_parse_status_description() {
        let description = parse_status_description("\n  Status  \nSocial position of the worker\nextra").unwrap();
        assert_eq!(description.label, "Status");
        assert_eq!(description.comment.as_deref(), Some("Social position of the worker"));

        let label_only = parse_status_description("Status").unwrap();
        assert_eq!(label_only.comment, None);

        assert_eq!(parse_status_description("  \n "), None);
    }

    #[test]
    fn test_parse_status_page() {
        let html = "<html><body>\
            <table><tr><td>Status</td></tr><tr><td>Social position of the worker</td></tr></table>\
            <pre>11 Employer\nNL:\tWerkgever\n12 Own account worker</pre>\
            </body></html>";
        let document = Html::parse_document(html);

        let page = parse_status_page(&document).unwrap();

        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].translations.len(), 1);
        assert_eq!(page.description.label, "Status");
        assert_eq!(
            page.description.comment.as_deref(),
            Some("Social position of the worker")
        );
    }

    #[test]
    fn test_status_page_without_block_is_malformed() {
        let document = Html::parse_document("<html><body><table><tr><td>Status</td></tr></table></body></html>");
        assert!(matches!(
            parse_status_page(&document),
            Err(ScanError::MalformedRecord(_))
        ));
    }
}
