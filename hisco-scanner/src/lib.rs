pub mod error;
pub mod fetcher;
pub mod listing;
pub mod major;
pub mod node;
pub mod records;
pub mod status;

pub use error::{Result, ScanError};
pub use fetcher::{MemoryStore, PageFetcher, PageStore};
pub use node::{HierarchyNode, Level};

use std::sync::Arc;

/// Invoked with the URL (or a short message) each time a traversal moves on.
pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;
