pub mod data;
pub mod graph;
pub mod harvest;
pub mod hierarchy;
pub mod status;
pub mod titles;
pub mod vocab;

pub use data::Database;
pub use graph::{Graph, Term, Triple};
pub use hierarchy::{HierarchyCrawler, HierarchyStats};
pub use titles::{TitlePaginator, TitleStats};

/// One-line banner printed by the CLI.
pub fn banner() -> String {
    format!(
        "hisco {} :: HISCO occupational classification to RDF",
        env!("CARGO_PKG_VERSION")
    )
}
