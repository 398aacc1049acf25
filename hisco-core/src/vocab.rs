//! Namespaces, predicates and the URI scheme of emitted resources.

use hisco_scanner::{HierarchyNode, Level};

pub const HISCO: &str = "http://example.org#";
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const SDMX_DIMENSION: &str = "http://purl.org/linked-data/sdmx/2009/dimension#";
pub const SDMX_CODE: &str = "http://purl.org/linked-data/sdmx/2009/code#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";

pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";

pub const SKOS_CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
pub const SKOS_COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#Collection";
pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
pub const SKOS_NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";
pub const SKOS_RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";
pub const SKOS_MEMBER: &str = "http://www.w3.org/2004/02/skos/core#member";

pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
pub const DCTERMS_DESCRIPTION: &str = "http://purl.org/dc/terms/description";

pub const SDMX_SEX: &str = "http://purl.org/linked-data/sdmx/2009/dimension#sex";

pub const STATUS_CLASS: &str = "http://example.org#Status";
pub const STATUS_PROPERTY: &str = "http://example.org#status";

pub fn scheme_uri(code: &str) -> String {
    format!("{}scheme-{}", HISCO, code)
}

pub fn collection_uri(code: &str) -> String {
    format!("{}collection-{}", HISCO, code)
}

pub fn occupation_uri(record_id: &str) -> String {
    format!("{}occupation-{}", HISCO, record_id)
}

pub fn status_uri(code: &str) -> String {
    format!("{}status-{}", HISCO, code)
}

/// Micro groups are the leaf collections titles hang off; every other level
/// is a concept scheme.
pub fn node_uri(node: &HierarchyNode) -> String {
    match node.level {
        Level::Micro => collection_uri(&node.code),
        _ => scheme_uri(&node.code),
    }
}

pub fn node_type(level: Level) -> &'static str {
    match level {
        Level::Micro => SKOS_COLLECTION,
        _ => SKOS_CONCEPT_SCHEME,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Male" => Sex::Male,
            "Female" => Sex::Female,
            _ => Sex::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => "U",
        }
    }

    pub fn uri(&self) -> String {
        format!("{}sex-{}", SDMX_CODE, self.code())
    }
}
