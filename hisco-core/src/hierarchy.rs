use crate::graph::Graph;
use crate::vocab::{
    DCTERMS_DESCRIPTION, DCTERMS_TITLE, RDF_TYPE, SKOS_RELATED, node_type, node_uri,
};
use hisco_scanner::major::parse_major_groups;
use hisco_scanner::records::{parse_records, record_cells};
use hisco_scanner::{HierarchyNode, Level, PageFetcher, ProgressCallback, Result};
use tracing::{debug, info};

pub const DEFAULT_MAJOR_PAGE: &str = "major.php";

/// Counts of nodes emitted per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    pub major: usize,
    pub minor: usize,
    pub rubri: usize,
    pub micro: usize,
}

impl HierarchyStats {
    fn record(&mut self, level: Level, count: usize) {
        match level {
            Level::Major => self.major += count,
            Level::Minor => self.minor += count,
            Level::Rubri => self.rubri += count,
            Level::Micro => self.micro += count,
        }
    }

    pub fn total(&self) -> usize {
        self.major + self.minor + self.rubri + self.micro
    }
}

/// A page still to be parsed: its level, where it lives and the node it
/// hangs under.
struct WorkItem {
    level: Level,
    url: String,
    parent: String,
}

/// Top-down traversal of the four-level classification.
///
/// The major page is scanned by the header state machine, every page below by
/// the coded-record parser. Pages are visited depth first, left to right,
/// from an explicit stack rather than by recursion; all nodes of a page are
/// emitted before its first child page is opened.
pub struct HierarchyCrawler<'a> {
    fetcher: &'a PageFetcher,
    major_page: String,
    progress_callback: Option<ProgressCallback>,
}

impl<'a> HierarchyCrawler<'a> {
    pub fn new(fetcher: &'a PageFetcher) -> Self {
        Self {
            fetcher,
            major_page: DEFAULT_MAJOR_PAGE.to_string(),
            progress_callback: None,
        }
    }

    pub fn with_major_page(mut self, major_page: impl Into<String>) -> Self {
        self.major_page = major_page.into();
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

    pub async fn crawl(&self, graph: &mut Graph) -> Result<HierarchyStats> {
        info!("Crawling classification from {}", self.major_page);
        let mut stats = HierarchyStats::default();

        self.report(&self.major_page);
        let groups = {
            let document = self.fetcher.fetch(&self.major_page).await?;
            parse_major_groups(&document)?
        };
        for group in &groups {
            emit_node(graph, group);
        }
        stats.record(Level::Major, groups.len());

        let mut worklist = Vec::new();
        push_children(&mut worklist, &groups, Level::Minor);

        while let Some(item) = worklist.pop() {
            self.report(&item.url);
            let nodes = {
                let document = self.fetcher.fetch(&item.url).await?;
                parse_records(&record_cells(&document)?, item.level)?
            };
            debug!(
                "{} {} groups under {}",
                nodes.len(),
                item.level,
                item.parent
            );

            for node in &nodes {
                emit_node(graph, node);
                graph.add_resource(&item.parent, SKOS_RELATED, &node_uri(node));
            }
            stats.record(item.level, nodes.len());

            if let Some(child_level) = item.level.child() {
                push_children(&mut worklist, &nodes, child_level);
            }
        }

        info!(
            "Classification complete: {} major, {} minor, {} rubri, {} micro",
            stats.major, stats.minor, stats.rubri, stats.micro
        );
        Ok(stats)
    }
}

/// Queue the child pages of `nodes` so the first link of the first node is
/// popped next.
fn push_children(worklist: &mut Vec<WorkItem>, nodes: &[HierarchyNode], level: Level) {
    for node in nodes.iter().rev() {
        let parent = node_uri(node);
        for link in node.child_links.iter().rev() {
            worklist.push(WorkItem {
                level,
                url: link.clone(),
                parent: parent.clone(),
            });
        }
    }
}

/// Type, title and description statements for one classification node.
pub fn emit_node(graph: &mut Graph, node: &HierarchyNode) {
    let uri = node_uri(node);
    graph.add_resource(&uri, RDF_TYPE, node_type(node.level));
    graph.add_literal(&uri, DCTERMS_TITLE, &node.title);
    if let Some(ref description) = node.description {
        graph.add_literal(&uri, DCTERMS_DESCRIPTION, description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Term;
    use crate::vocab::{SKOS_COLLECTION, SKOS_CONCEPT_SCHEME};

    #[test]
    fn test_emit_scheme_node() {
        let mut graph = Graph::new();
        let mut node = HierarchyNode::new(Level::Major, "1", "Majorgroup 1 Professionals");
        node.description = Some("Workers in science".to_string());

        emit_node(&mut graph, &node);

        let uri = "http://example.org#scheme-1";
        assert_eq!(graph.len(), 3);
        assert!(graph.contains(uri, RDF_TYPE, &Term::iri(SKOS_CONCEPT_SCHEME)));
        assert!(graph.contains(uri, DCTERMS_TITLE, &Term::literal("Majorgroup 1 Professionals")));
        assert!(graph.contains(uri, DCTERMS_DESCRIPTION, &Term::literal("Workers in science")));
    }

    #[test]
    fn test_emit_micro_node_without_description() {
        let mut graph = Graph::new();
        let node = HierarchyNode::new(Level::Micro, "01110", "Chemist, General");

        emit_node(&mut graph, &node);

        assert_eq!(graph.len(), 2);
        assert!(graph.contains(
            "http://example.org#collection-01110",
            RDF_TYPE,
            &Term::iri(SKOS_COLLECTION)
        ));
    }

    #[test]
    fn test_worklist_pops_in_document_order() {
        let mut first = HierarchyNode::new(Level::Minor, "10", "a");
        first.child_links = vec!["a1".to_string(), "a2".to_string()];
        let mut second = HierarchyNode::new(Level::Minor, "11", "b");
        second.child_links = vec!["b1".to_string()];

        let mut worklist = Vec::new();
        push_children(&mut worklist, &[first, second], Level::Rubri);

        let order: Vec<String> = std::iter::from_fn(|| worklist.pop().map(|i| i.url)).collect();
        assert_eq!(order, vec!["a1", "a2", "b1"]);
    }
}
