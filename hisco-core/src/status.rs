use crate::graph::Graph;
use crate::vocab::{
    RDF_PROPERTY, RDF_TYPE, RDFS_CLASS, RDFS_COMMENT, RDFS_DOMAIN, RDFS_LABEL, RDFS_RANGE,
    SKOS_ALT_LABEL, SKOS_CONCEPT, SKOS_NOTATION, STATUS_CLASS, STATUS_PROPERTY, status_uri,
};
use hisco_scanner::status::{StatusDescription, StatusEntry, StatusPage};

/// Statements for one parsed status page: every entry plus the status class
/// and property. Running it twice duplicates statements, so callers parse a
/// given status page once per run.
pub fn emit_status_page(graph: &mut Graph, page: &StatusPage) {
    for entry in &page.entries {
        emit_status_entry(graph, entry);
    }
    emit_status_description(graph, &page.description);
}

pub fn emit_status_entry(graph: &mut Graph, entry: &StatusEntry) {
    let uri = status_uri(&entry.code);
    graph.add_resource(&uri, RDF_TYPE, STATUS_CLASS);
    graph.add_literal(&uri, RDFS_LABEL, &entry.label);
    graph.add_literal(&uri, SKOS_NOTATION, &entry.code);
    for (language, label) in &entry.translations {
        graph.add_lang_literal(&uri, SKOS_ALT_LABEL, label, language);
    }
}

pub fn emit_status_description(graph: &mut Graph, description: &StatusDescription) {
    graph.add_resource(STATUS_CLASS, RDF_TYPE, RDFS_CLASS);
    graph.add_literal(STATUS_CLASS, RDFS_LABEL, &description.label);
    if let Some(ref comment) = description.comment {
        graph.add_literal(STATUS_CLASS, RDFS_COMMENT, comment);
    }

    graph.add_resource(STATUS_PROPERTY, RDF_TYPE, RDF_PROPERTY);
    graph.add_literal(STATUS_PROPERTY, RDFS_LABEL, &description.label);
    graph.add_resource(STATUS_PROPERTY, RDFS_RANGE, STATUS_CLASS);
    graph.add_resource(STATUS_PROPERTY, RDFS_DOMAIN, SKOS_CONCEPT);
}
