use crate::error::{Result, ScanError};
use crate::node::{Cell, HierarchyNode, Level};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Cells of the major group page live in borderless layout tables.
pub const MAJOR_CELL_SELECTOR: &str = r#"table[border="0"] td"#;

static MAJOR_GROUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Majorgroup\s+(\S+)").unwrap());

const DESCRIPTION_PREFIX: &str = "Workers";
const MINOR_LINK_PREFIX: &str = "List Minor";

enum ScanState {
    SeekingGroup,
    BuildingGroup(HierarchyNode),
}

/// State machine over the cells of the major group page.
///
/// A "Majorgroup <code> ..." header opens a group (sealing the previous one),
/// a "Workers ..." cell describes it and each "List Minor ..." cell adds a
/// link to one of its minor group pages.
pub struct MajorGroupScanner {
    state: ScanState,
    groups: Vec<HierarchyNode>,
}

impl MajorGroupScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::SeekingGroup,
            groups: Vec::new(),
        }
    }

    pub fn feed(&mut self, cell: &Cell) -> Result<()> {
        let text = cell.text.trim();
        if text.is_empty() {
            return Ok(());
        }

        if let Some(code) = major_group_code(text) {
            self.seal();
            debug!("Opening major group {}", code);
            self.state = ScanState::BuildingGroup(HierarchyNode::new(Level::Major, code, text));
            return Ok(());
        }

        match &mut self.state {
            ScanState::BuildingGroup(group) if text.starts_with(DESCRIPTION_PREFIX) => {
                group.description = Some(text.to_string());
            }
            ScanState::BuildingGroup(group) if text.starts_with(MINOR_LINK_PREFIX) => {
                let link = cell.first_link().ok_or_else(|| {
                    ScanError::MalformedRecord(format!(
                        "major group {} '{}' cell carries no link",
                        group.code, text
                    ))
                })?;
                group.child_links.push(link.to_string());
            }
            ScanState::SeekingGroup if text.starts_with(MINOR_LINK_PREFIX) => {
                return Err(ScanError::MalformedRecord(format!(
                    "'{}' appears before any major group",
                    text
                )));
            }
            _ => {}
        }

        Ok(())
    }

    fn seal(&mut self) {
        if let ScanState::BuildingGroup(group) =
            std::mem::replace(&mut self.state, ScanState::SeekingGroup)
        {
            if group.child_links.is_empty() {
                warn!("Major group {} lists no minor groups", group.code);
            }
            self.groups.push(group);
        }
    }

    /// Seal the group in progress and hand back every group, page order.
    pub fn finish(mut self) -> Vec<HierarchyNode> {
        self.seal();
        self.groups
    }
}

impl Default for MajorGroupScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// The code token following "Majorgroup", with `/` made URI-safe.
pub fn major_group_code(text: &str) -> Option<String> {
    MAJOR_GROUP_PATTERN
        .captures(text)
        .map(|caps| caps[1].replace('/', "-"))
}

pub fn parse_major_cells(cells: &[Cell]) -> Result<Vec<HierarchyNode>> {
    let mut scanner = MajorGroupScanner::new();
    for cell in cells {
        scanner.feed(cell)?;
    }
    Ok(scanner.finish())
}

pub fn parse_major_groups(document: &Html) -> Result<Vec<HierarchyNode>> {
    let selector = Selector::parse(MAJOR_CELL_SELECTOR).unwrap();
    let cells: Vec<Cell> = document.select(&selector).map(Cell::from_element).collect();
    parse_major_cells(&cells)
}
