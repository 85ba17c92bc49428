//! Fixed query texts sent to the triple store and to Wikidata

use classmap_core::MediatorKey;

pub use classmap_core::model::WIKIDATA_ENTITY_PREFIX;

/// Public Wikidata SPARQL endpoint used for label lookup.
pub const WIKIDATA_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Per-graph class usage counts recorded in the T1 schema annotations.
///
/// Binds `?graph`, `?classUri`, `?count` and optionally `?graphLabel`.
pub const USED_CLASSES: &str = r#"
PREFIX dct: <http://purl.org/dc/terms/>
PREFIX linkml: <https://w3id.org/linkml/>
PREFIX okn: <https://purl.org/okn/>
PREFIX okns: <https://purl.org/okn/schema/>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>

SELECT ?graph ?graphLabel ?classUri ?count WHERE {
  ?graph dct:isPartOf okn:proto-okn ;
         a linkml:SchemaDefinition .

  ?graph linkml:annotations [
    linkml:tag okns:counts ;
    skos:example/linkml:classes/skos:example [ ?classUri ?s ]
  ] .

  optional { ?graph dct:title ?graphLabel }

  ?s ?p ?count .
  filter(?p = skos:example)
}
"#;

/// SKOS mapping relations between any two classes. Binds `?class1`, `?class2`.
pub const DIRECT_RELATIONS: &str = r#"
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>

SELECT ?class1 ?class2 WHERE {
  { ?class1 skos:exactMatch ?class2 }
  UNION
  { ?class1 skos:closeMatch ?class2 }
  UNION
  { ?class1 skos:broadMatch ?class2 }
  UNION
  { ?class1 skos:narrowMatch ?class2 }

  FILTER(?class1 != ?class2)
}
"#;

/// Classes that a Wikidata entity declares as exact matches.
/// Binds `?class`, `?wikidata`.
pub const WIKIDATA_LINKS: &str = r#"
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>

SELECT ?class ?wikidata WHERE {
  ?class ^skos:exactMatch ?wikidata .
  FILTER(STRSTARTS(STR(?wikidata), "http://www.wikidata.org/entity/"))
}
"#;

/// English labels for a batch of Wikidata entities. Binds `?entity`, `?label`.
pub fn wikidata_labels(keys: &[MediatorKey]) -> String {
    let values: Vec<String> = keys.iter().map(|k| format!("<{}>", k)).collect();
    format!(
        r#"
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>

SELECT ?entity ?label WHERE {{
  VALUES ?entity {{ {} }}
  ?entity rdfs:label ?label .
  FILTER(LANG(?label) = "en")
}}
"#,
        values.join(" ")
    )
}
