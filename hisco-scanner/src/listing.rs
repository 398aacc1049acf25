use crate::error::{Result, ScanError};
use crate::node::Cell;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Query parameter of a detail-page link carrying the canonical record id.
pub const RECORD_ID_PARAM: &str = "know_id";

const TITLE_COLUMN: usize = 0;
const LANGUAGE_COLUMN: usize = 1;
const CODE_COLUMN: usize = 2;

/// Map a language label from the title listing to its language tag.
/// Labels outside the fixed set are a lookup failure, never a default.
pub fn language_tag(label: &str) -> Result<&'static str> {
    let tag = match label.trim() {
        "French" => "fr",
        "German" => "de",
        "Dutch" => "nl",
        "Swedish" => "sv",
        "Portugese" => "pt",
        "English" => "en",
        "Norwegian" => "no",
        "Spanish" => "es",
        "Catalan" => "ct",
        "Danish" => "da",
        "Greek" => "gr",
        other => {
            return Err(ScanError::LookupFailure(format!(
                "unknown language label '{}'",
                other
            )));
        }
    };
    Ok(tag)
}

/// One row of the occupational title listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub title: String,
    pub detail_link: String,
    pub language: &'static str,
    /// Micro group code, without the trailing `*` marker.
    pub code: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub rows: Vec<ListingRow>,
    pub next_link: Option<String>,
}

/// Parse one page of the title listing: its data rows and the "Next" link.
pub fn parse_listing_page(document: &Html) -> Result<ListingPage> {
    let table = listing_table(document)
        .ok_or_else(|| ScanError::MalformedRecord("no title listing table found".to_string()))?;

    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut rows = Vec::new();
    for row in table.select(&row_selector).skip(1) {
        let cells: Vec<Cell> = row.select(&cell_selector).map(Cell::from_element).collect();
        if cells.is_empty() {
            continue;
        }
        rows.push(parse_listing_row(&cells)?);
    }

    debug!("Parsed {} listing rows", rows.len());
    Ok(ListingPage {
        rows,
        next_link: next_page_link(document),
    })
}

pub fn parse_listing_row(cells: &[Cell]) -> Result<ListingRow> {
    if cells.len() <= CODE_COLUMN {
        return Err(ScanError::MalformedRecord(format!(
            "listing row has {} cells, expected at least {}",
            cells.len(),
            CODE_COLUMN + 1
        )));
    }

    let title_cell = &cells[TITLE_COLUMN];
    let detail_link = title_cell.first_link().ok_or_else(|| {
        ScanError::MalformedRecord(format!("title '{}' carries no detail link", title_cell.text))
    })?;

    let code = cells[CODE_COLUMN].text.trim().trim_end_matches('*').trim();
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScanError::MalformedRecord(format!(
            "title '{}' has no micro group code (cell reads '{}')",
            title_cell.text, cells[CODE_COLUMN].text
        )));
    }

    Ok(ListingRow {
        title: title_cell.text.clone(),
        detail_link: detail_link.to_string(),
        language: language_tag(&cells[LANGUAGE_COLUMN].text)?,
        code: code.to_string(),
    })
}

/// The innermost table holding links to detail pages.
fn listing_table(document: &Html) -> Option<ElementRef<'_>> {
    let table_selector = Selector::parse("table").unwrap();
    let detail_selector = Selector::parse(&format!(r#"a[href*="{}="]"#, RECORD_ID_PARAM)).unwrap();

    let holds_details = |table: &ElementRef<'_>| table.select(&detail_selector).next().is_some();

    document.select(&table_selector).filter(holds_details).find(|table| {
        !table
            .select(&table_selector)
            .filter(|inner| inner.id() != table.id())
            .any(|inner| holds_details(&inner))
    })
}

/// Target of the first navigation link reading "Next", if the listing goes on.
pub fn next_page_link(document: &Html) -> Option<String> {
    let link_selector = Selector::parse("a[href]").unwrap();
    document
        .select(&link_selector)
        .find(|a| a.text().collect::<String>().contains("Next"))
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
}

/// Canonical record id of a resolved detail-page URL.
pub fn record_id(detail_url: &str) -> Result<String> {
    let url = Url::parse(detail_url)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", detail_url, e)))?;

    let id = url
        .query_pairs()
        .find(|(key, _)| *key == RECORD_ID_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            ScanError::LookupFailure(format!(
                "detail link {} has no {} parameter",
                detail_url, RECORD_ID_PARAM
            ))
        })?;

    // The id becomes part of a resource IRI
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(ScanError::LookupFailure(format!(
            "detail link {} carries unusable record id '{}'",
            detail_url, id
        )));
    }
    Ok(id)
}

/// Value cell of one row of a detail page's attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailAttribute {
    pub value: String,
    pub link: Option<String>,
}

/// Key/value pairs of a detail page: first cell of each row is the key, last
/// cell the value. The first occurrence of a key wins.
pub fn parse_detail_attributes(document: &Html) -> HashMap<String, DetailAttribute> {
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut attributes = HashMap::new();
    for row in document.select(&row_selector) {
        let cells: Vec<Cell> = row.select(&cell_selector).map(Cell::from_element).collect();
        let (Some(key), Some(value)) = (cells.first(), cells.last()) else {
            continue;
        };
        if cells.len() < 2 || key.text.is_empty() {
            continue;
        }
        if attributes.contains_key(&key.text) {
            warn!("Duplicate detail attribute '{}' ignored", key.text);
            continue;
        }
        attributes.insert(
            key.text.clone(),
            DetailAttribute {
                value: value.text.clone(),
                link: value.first_link().map(str::to_string),
            },
        );
    }
    attributes
}

/// Leading numeric code of a status value such as "21 Employee".
pub fn status_code(value: &str) -> Result<String> {
    let code: String = value.trim().chars().take_while(char::is_ascii_digit).collect();
    if code.is_empty() {
        return Err(ScanError::LookupFailure(format!(
            "status '{}' carries no numeric code",
            value
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body>
        <table width="100%"><tr><td>
            <table cellspacing="4">
                <tr><th>Occupational title</th><th>Language</th><th>Hisco</th></tr>
                <tr>
                    <td><a href="detail_hiswi.php?know_id=101&lang=">boulanger</a></td>
                    <td>French</td>
                    <td>77610*</td>
                </tr>
                <tr>
                    <td><a href="detail_hiswi.php?know_id=102&lang=">Bäcker</a></td>
                    <td>German</td>
                    <td>77610</td>
                </tr>
            </table>
        </td></tr></table>
        <div class="nav"><a href="list_hiswi.php?step=0">Previous</a> <a href="list_hiswi.php?step=20">Next &gt;&gt;</a></div>
    </body></html>"#;

    #[test]
    fn test_language_mapping() {
        assert_eq!(language_tag("French").unwrap(), "fr");
        assert_eq!(language_tag(" Portugese ").unwrap(), "pt");
        assert_eq!(language_tag("Catalan").unwrap(), "ct");
        assert_eq!(language_tag("Greek").unwrap(), "gr");
    }

    #[test]
    fn test_unknown_language_is_lookup_failure() {
        assert!(matches!(
            language_tag("Klingon"),
            Err(ScanError::LookupFailure(_))
        ));
    }

    #[test]
    fn test_parse_listing_page() {
        let document = Html::parse_document(LISTING);

        let page = parse_listing_page(&document).unwrap();

        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].title, "boulanger");
        assert_eq!(page.rows[0].language, "fr");
        assert_eq!(page.rows[0].code, "77610");
        assert_eq!(page.rows[0].detail_link, "detail_hiswi.php?know_id=101&lang=");
        assert_eq!(page.rows[1].language, "de");
        assert_eq!(page.next_link.as_deref(), Some("list_hiswi.php?step=20"));
    }

    #[test]
    fn test_last_page_has_no_next_link() {
        let html = LISTING.replace("Next &gt;&gt;", "Back to start");
        let document = Html::parse_document(&html);

        let page = parse_listing_page(&document).unwrap();
        assert_eq!(page.next_link, None);
    }

    #[test]
    fn test_unknown_language_row_fails_page() {
        let html = LISTING.replace("<td>German</td>", "<td>Klingon</td>");
        let document = Html::parse_document(&html);

        assert!(matches!(
            parse_listing_page(&document),
            Err(ScanError::LookupFailure(_))
        ));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let cells = vec![Cell::link("boulanger", "detail_hiswi.php?know_id=1")];
        assert!(matches!(
            parse_listing_row(&cells),
            Err(ScanError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_blank_code_is_malformed() {
        for code in ["*", "", " * "] {
            let cells = vec![
                Cell::link("boulanger", "detail_hiswi.php?know_id=1"),
                Cell::plain("French"),
                Cell::plain(code),
            ];
            assert!(matches!(
                parse_listing_row(&cells),
                Err(ScanError::MalformedRecord(_))
            ));
        }
    }

    #[test]
    fn test_non_numeric_code_is_malformed() {
        let cells = vec![
            Cell::link("boulanger", "detail_hiswi.php?know_id=1"),
            Cell::plain("French"),
            Cell::plain("776a0"),
        ];
        assert!(matches!(
            parse_listing_row(&cells),
            Err(ScanError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_record_id_rejects_iri_unsafe_characters() {
        let result = record_id("http://h/detail_hiswi.php?know_id=a%20b%3E");
        assert!(matches!(result, Err(ScanError::LookupFailure(_))));

        assert_eq!(
            record_id("http://h/detail_hiswi.php?know_id=abc_12-3").unwrap(),
            "abc_12-3"
        );
    }

    #[test]
    fn test_missing_listing_table_is_malformed() {
        let document = Html::parse_document("<html><body><table><tr><td>x</td></tr></table></body></html>");
        assert!(matches!(
            parse_listing_page(&document),
            Err(ScanError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_record_id() {
        assert_eq!(
            record_id("http://historyofwork.iisg.nl/detail_hiswi.php?know_id=8426&lang=").unwrap(),
            "8426"
        );
        assert!(matches!(
            record_id("http://historyofwork.iisg.nl/detail_hiswi.php?lang=en"),
            Err(ScanError::LookupFailure(_))
        ));
    }

    #[test]
    fn test_parse_detail_attributes() {
        let html = r#"<html><body><table>
            <tr><td>Gender</td><td>:</td><td> Female </td></tr>
            <tr><td>Translation</td><td>baker’s wife</td></tr>
            <tr><td>Status</td><td><a href="status.php?id=11">11 Worker</a></td></tr>
            <tr><td>lonely cell</td></tr>
            <tr><td>Gender</td><td>Male</td></tr>
        </table></body></html>"#;
        let document = Html::parse_document(html);

        let attributes = parse_detail_attributes(&document);

        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes["Gender"].value, "Female");
        assert_eq!(attributes["Translation"].value, "baker’s wife");
        assert_eq!(attributes["Status"].link.as_deref(), Some("status.php?id=11"));
        assert_eq!(attributes["Gender"].link, None);
    }

    #[test]
    fn test_status_code() {
        assert_eq!(status_code("11 Worker").unwrap(), "11");
        assert_eq!(status_code(" 3").unwrap(), "3");
        assert!(matches!(
            status_code("unknown"),
            Err(ScanError::LookupFailure(_))
        ));
    }
}
