// Append-only triple accumulator and its N-Triples rendering

use std::fmt::Write as _;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Literal {
        value: String,
        language: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            language: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            language: Some(language.into()),
        }
    }

    fn write_ntriples(&self, out: &mut String) {
        match self {
            Term::Iri(iri) => write_iri(iri, out),
            Term::Literal { value, language } => {
                out.push('"');
                escape_literal(value, out);
                out.push('"');
                if let Some(language) = language {
                    out.push('@');
                    out.push_str(language);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn to_ntriples(&self) -> String {
        let mut line = String::new();
        write_iri(&self.subject, &mut line);
        line.push(' ');
        write_iri(&self.predicate, &mut line);
        line.push(' ');
        self.object.write_ntriples(&mut line);
        line.push_str(" .");
        line
    }
}

/// `<iri>`, with characters N-Triples forbids inside an IRI percent-encoded.
fn write_iri(iri: &str, out: &mut String) {
    out.push('<');
    for c in iri.chars() {
        match c {
            '\u{00}'..='\u{20}' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                let _ = write!(out, "%{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('>');
}

fn escape_literal(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
}

/// Every statement emitted during a run, in emission order.
///
/// Nothing is deduplicated on insert; callers avoid re-issuing statements
/// (see the status memoisation in the title paginator).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, subject: &str, predicate: &str, object: Term) {
        self.triples.push(Triple {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object,
        });
    }

    pub fn add_resource(&mut self, subject: &str, predicate: &str, object: &str) {
        self.add(subject, predicate, Term::iri(object));
    }

    pub fn add_literal(&mut self, subject: &str, predicate: &str, value: &str) {
        self.add(subject, predicate, Term::literal(value));
    }

    pub fn add_lang_literal(&mut self, subject: &str, predicate: &str, value: &str, language: &str) {
        self.add(subject, predicate, Term::lang_literal(value, language));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn objects<'a>(&'a self, subject: &'a str, predicate: &'a str) -> impl Iterator<Item = &'a Term> {
        self.triples
            .iter()
            .filter(move |t| t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn subjects<'a, 'p, 'o>(&'a self, predicate: &'p str, object: &'o Term) -> impl Iterator<Item = &'a str> + use<'a, 'p, 'o> {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate && &t.object == object)
            .map(|t| t.subject.as_str())
    }

    /// Number of statements with the given predicate and object.
    pub fn count(&self, predicate: &str, object: &Term) -> usize {
        self.subjects(predicate, object).count()
    }

    pub fn contains(&self, subject: &str, predicate: &str, object: &Term) -> bool {
        self.objects(subject, predicate).any(|o| o == object)
    }

    /// Write one N-Triples line per statement, insertion order.
    pub fn write_ntriples<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for triple in &self.triples {
            writeln!(writer, "{}", triple.to_ntriples())?;
        }
        writer.flush()
    }

    pub fn to_ntriples(&self) -> String {
        let mut out = String::new();
        for triple in &self.triples {
            out.push_str(&triple.to_ntriples());
            out.push('\n');
        }
        out
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
