//! SPARQL result wire formats (JSON and XML) decoded into [`ResultSet`]

use std::collections::HashMap;

use classmap_core::{ResultSet, Row, Term};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;

use crate::error::FormatError;

pub const JSON_MEDIA_TYPE: &str = "application/sparql-results+json";
pub const XML_MEDIA_TYPE: &str = "application/sparql-results+xml";

/// `Accept` header sent with every query: JSON preferred, XML accepted.
pub const ACCEPT: &str = "application/sparql-results+json, application/sparql-results+xml;q=0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFormat {
    Json,
    Xml,
}

impl ResultFormat {
    /// Format named by a `Content-Type` header, if recognisable.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media = content_type.split(';').next().unwrap_or_default().trim();
        match media {
            JSON_MEDIA_TYPE | "application/json" => Some(ResultFormat::Json),
            XML_MEDIA_TYPE | "application/xml" | "text/xml" => Some(ResultFormat::Xml),
            _ => None,
        }
    }

    /// Guess from the first non-whitespace character.
    pub fn sniff(body: &str) -> Self {
        match body.trim_start().chars().next() {
            Some('{') => ResultFormat::Json,
            _ => ResultFormat::Xml,
        }
    }
}

/// Decode a body, trusting `content_type` when it names a known format.
pub fn decode(body: &str, content_type: Option<&str>) -> Result<ResultSet, FormatError> {
    let format = content_type
        .and_then(ResultFormat::from_content_type)
        .unwrap_or_else(|| ResultFormat::sniff(body));
    match format {
        ResultFormat::Json => decode_json(body),
        ResultFormat::Xml => decode_xml(body),
    }
}

// ── JSON ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JsonDocument {
    head: JsonHead,
    results: Option<JsonResults>,
}

#[derive(Debug, Deserialize)]
struct JsonHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonResults {
    bindings: Vec<HashMap<String, JsonTerm>>,
}

#[derive(Debug, Deserialize)]
struct JsonTerm {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

pub fn decode_json(body: &str) -> Result<ResultSet, FormatError> {
    let doc: JsonDocument = serde_json::from_str(body)?;
    let results = doc
        .results
        .ok_or_else(|| FormatError::Structure("expected SELECT results, found none".to_string()))?;

    let rows = results
        .bindings
        .into_iter()
        .map(|solution| {
            let mut row = Row::new();
            for (name, term) in solution {
                match term.kind.as_str() {
                    "uri" => row.bind(name, Term::Iri(term.value)),
                    "literal" | "typed-literal" => row.bind(name, Term::Literal(term.value)),
                    other => tracing::debug!("Ignoring {} binding for ?{}", other, name),
                }
            }
            row
        })
        .collect();

    Ok(ResultSet::new(doc.head.vars, rows))
}

// ── XML ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Uri,
    Literal,
    Bnode,
}

/// Event-driven state for the SPARQL XML results format.
#[derive(Default)]
struct XmlResultsParser {
    variables: Vec<String>,
    rows: Vec<Row>,
    row: Option<Row>,
    binding: Option<String>,
    value: Option<ValueKind>,
    text: String,
}

fn name_attr(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"name")
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

impl XmlResultsParser {
    fn handle_start(&mut self, e: &BytesStart<'_>) {
        match e.local_name().as_ref() {
            b"variable" => self.variables.extend(name_attr(e)),
            b"result" => self.row = Some(Row::new()),
            b"binding" => self.binding = name_attr(e),
            b"uri" => self.open_value(ValueKind::Uri),
            b"literal" => self.open_value(ValueKind::Literal),
            b"bnode" => self.open_value(ValueKind::Bnode),
            _ => {}
        }
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>) {
        match e.local_name().as_ref() {
            b"variable" => self.variables.extend(name_attr(e)),
            b"result" => self.rows.push(Row::new()),
            b"literal" => {
                self.open_value(ValueKind::Literal);
                self.close_value();
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.value.is_some() {
            self.text.push_str(text);
        }
    }

    fn handle_end(&mut self, local_name: &[u8]) {
        match local_name {
            b"uri" | b"literal" | b"bnode" => self.close_value(),
            b"binding" => self.binding = None,
            b"result" => {
                if let Some(row) = self.row.take() {
                    self.rows.push(row);
                }
            }
            _ => {}
        }
    }

    fn open_value(&mut self, kind: ValueKind) {
        self.value = Some(kind);
        self.text.clear();
    }

    fn close_value(&mut self) {
        let Some(kind) = self.value.take() else {
            return;
        };
        let text = std::mem::take(&mut self.text);
        let (Some(row), Some(name)) = (self.row.as_mut(), self.binding.as_ref()) else {
            return;
        };
        match kind {
            ValueKind::Uri => row.bind(name.clone(), Term::Iri(text)),
            ValueKind::Literal => row.bind(name.clone(), Term::Literal(text)),
            ValueKind::Bnode => tracing::debug!("Ignoring bnode binding for ?{}", name),
        }
    }
}

pub fn decode_xml(body: &str) -> Result<ResultSet, FormatError> {
    let mut reader = Reader::from_str(body);
    let mut parser = XmlResultsParser::default();
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|source| FormatError::Xml {
            position: reader.buffer_position(),
            source,
        })?;
        match event {
            Event::Start(ref e) => {
                saw_root |= e.local_name().as_ref() == b"sparql";
                parser.handle_start(e);
            }
            Event::Empty(ref e) => parser.handle_empty(e),
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|source| FormatError::Xml {
                    position: reader.buffer_position(),
                    source,
                })?;
                parser.handle_text(&text);
            }
            Event::CData(ref e) => parser.handle_text(&String::from_utf8_lossy(e)),
            Event::End(ref e) => parser.handle_end(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(FormatError::Structure(
            "missing <sparql> root element".to_string(),
        ));
    }
    Ok(ResultSet::new(parser.variables, parser.rows))
}
