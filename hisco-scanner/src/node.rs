use scraper::{ElementRef, Selector};
use std::fmt;
use std::sync::LazyLock;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// The four nesting levels of the classification, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Major,
    Minor,
    Rubri,
    Micro,
}

impl Level {
    /// Width of the numeric code that opens a record on this level's pages.
    /// Major groups are announced by a header instead of a bare code.
    pub fn code_digits(&self) -> Option<usize> {
        match self {
            Level::Major => None,
            Level::Minor => Some(2),
            Level::Rubri => Some(3),
            Level::Micro => Some(5),
        }
    }

    pub fn child(&self) -> Option<Level> {
        match self {
            Level::Major => Some(Level::Minor),
            Level::Minor => Some(Level::Rubri),
            Level::Rubri => Some(Level::Micro),
            Level::Micro => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Major => "major",
            Level::Minor => "minor",
            Level::Rubri => "rubri",
            Level::Micro => "micro",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification entry as read off a hierarchy page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    pub level: Level,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    /// Pages listing the next level down, in page order.
    pub child_links: Vec<String>,
    /// Only set on micro groups ("Display Titles").
    pub titles_link: Option<String>,
}

impl HierarchyNode {
    pub fn new(level: Level, code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            level,
            code: code.into(),
            title: title.into(),
            description: None,
            child_links: Vec::new(),
            titles_link: None,
        }
    }
}

/// Text and link targets of a single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub text: String,
    pub links: Vec<String>,
}

impl Cell {
    pub fn new(text: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            text: text.into(),
            links,
        }
    }

    /// A cell carrying plain text and no anchors.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// A cell whose text is wrapped in a single anchor.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(text, vec![href.into()])
    }

    pub fn from_element(element: ElementRef<'_>) -> Self {
        let text = element.text().collect::<String>().trim().to_string();
        let links = element
            .select(&LINK_SELECTOR)
            .filter_map(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .collect();
        Self { text, links }
    }

    pub fn first_link(&self) -> Option<&str> {
        self.links.first().map(String::as_str)
    }
}
