use crate::error::{Result, ScanError};
use crate::node::{Cell, HierarchyNode, Level};
use scraper::{Html, Selector};
use tracing::debug;

/// The table holding minor, rubri and micro group listings.
pub const RECORD_TABLE_SELECTOR: &str = r#"table[cellspacing="8"][cellpadding="0"]"#;

/// Label of the micro-group cell that links to the group's occupational titles.
pub const DISPLAY_TITLES: &str = "Display Titles";

/// Flatten the record table of a level 2-4 page into its cells, document order.
pub fn record_cells(document: &Html) -> Result<Vec<Cell>> {
    let table_selector = Selector::parse(RECORD_TABLE_SELECTOR).unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let table = document.select(&table_selector).next().ok_or_else(|| {
        ScanError::MalformedRecord(format!("no table matching {}", RECORD_TABLE_SELECTOR))
    })?;

    Ok(table.select(&cell_selector).map(Cell::from_element).collect())
}

/// True when `text` opens with exactly `digits` ASCII digits. The match is
/// anchored at the start only; anything may follow.
fn starts_with_code(text: &str, digits: usize) -> bool {
    text.len() >= digits && text.bytes().take(digits).all(|b| b.is_ascii_digit())
}

/// Extract fixed-width-code records from a flat cell sequence.
///
/// A cell opening with `level`'s code width starts a record. The next cell
/// gives the title and the single child link, the one after that the
/// description. A fourth cell labelled "Display Titles" contributes the
/// titles link. The record being built is sealed when the next marker shows
/// up and once more after the scan, since the last row has no marker after
/// it.
pub fn parse_records(cells: &[Cell], level: Level) -> Result<Vec<HierarchyNode>> {
    let digits = level.code_digits().ok_or_else(|| {
        ScanError::MalformedRecord(format!("{} groups are not laid out as coded records", level))
    })?;

    let mut records = Vec::new();
    let mut current: Option<HierarchyNode> = None;

    for (index, cell) in cells.iter().enumerate() {
        if !starts_with_code(&cell.text, digits) {
            continue;
        }

        if let Some(node) = current.take() {
            records.push(node);
        }

        let code = cell.text.trim();
        let title_cell = cells.get(index + 1).ok_or_else(|| {
            ScanError::MalformedRecord(format!("{} group {} has no title cell", level, code))
        })?;
        let description_cell = cells.get(index + 2).ok_or_else(|| {
            ScanError::MalformedRecord(format!("{} group {} has no description cell", level, code))
        })?;
        let child_link = title_cell.first_link().ok_or_else(|| {
            ScanError::MalformedRecord(format!(
                "{} group {} title '{}' carries no link",
                level, code, title_cell.text
            ))
        })?;

        let mut node = HierarchyNode::new(level, code, title_cell.text.as_str());
        node.description = Some(description_cell.text.clone());
        node.child_links.push(child_link.to_string());

        if let Some(titles_cell) = cells.get(index + 3)
            && titles_cell.text == DISPLAY_TITLES
        {
            let titles_link = titles_cell.first_link().ok_or_else(|| {
                ScanError::MalformedRecord(format!(
                    "{} group {} '{}' cell carries no link",
                    level, code, DISPLAY_TITLES
                ))
            })?;
            node.titles_link = Some(titles_link.to_string());
        }

        current = Some(node);
    }

    if let Some(node) = current {
        records.push(node);
    }

    debug!("Parsed {} {} records", records.len(), level);
    Ok(records)
}
