//! Input documents and element scopes
//!
//! An [`InputContext`] answers path lookups against the input document. Array
//! sub-walks narrow the context to one element: lookups addressed at or
//! below the element's concrete path are answered from the element itself,
//! which for XML input is a node rather than a JSON value.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::jsonpath::JSONPath;
use crate::types::InputFormat;
use crate::value::SourceValue;
use crate::xml::{NodePath, XmlDocument, XmlNode};
use crate::{Error, Result};
use serde_json::Value;
use tracing::trace;

/// A parsed input document
#[derive(Debug, Clone)]
pub enum Document {
    Json(Value),
    Xml(XmlDocument),
}

impl Document {
    /// Parse raw bytes as `format`
    pub fn parse(raw: &[u8], format: InputFormat) -> Result<Self> {
        let input_error = |message: String| Error::Input { format, message };
        match format {
            InputFormat::Json => serde_json::from_slice(raw)
                .map(Document::Json)
                .map_err(|e| input_error(e.to_string())),
            InputFormat::Xml => {
                let text = std::str::from_utf8(raw).map_err(|e| input_error(e.to_string()))?;
                XmlDocument::parse(text)
                    .map(Document::Xml)
                    .map_err(|e| input_error(e.to_string()))
            }
        }
    }

    /// Format the document was parsed from
    pub fn format(&self) -> InputFormat {
        match self {
            Document::Json(_) => InputFormat::Json,
            Document::Xml(_) => InputFormat::Xml,
        }
    }
}

#[derive(Debug, Clone)]
struct Scope {
    /// Concrete path of the element, e.g. `$.crops[1]`
    prefix: String,
    seed: SourceValue,
}

/// Lookup view over a document, optionally narrowed to array elements
#[derive(Debug, Clone)]
pub struct InputContext<'a> {
    document: &'a Document,
    scopes: Vec<Scope>,
}

impl<'a> InputContext<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            scopes: Vec::new(),
        }
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// A context whose lookups under `prefix` resolve against `seed`
    pub fn narrow(&self, prefix: &str, seed: SourceValue) -> Self {
        let mut scopes = self.scopes.clone();
        scopes.push(Scope {
            prefix: prefix.to_string(),
            seed,
        });
        Self {
            document: self.document,
            scopes,
        }
    }

    /// Look up a concrete JSONPath
    ///
    /// Element scopes are consulted innermost first; paths outside every
    /// scope go to the whole document. For XML documents the JSONPath is
    /// mapped onto the element tree. `null` and empty results are misses.
    pub fn lookup_json(&self, path: &str) -> Result<Option<SourceValue>> {
        for scope in self.scopes.iter().rev() {
            if let Some(rest) = strip_scope(path, &scope.prefix) {
                let found = lookup_in_seed(&scope.seed, rest)?;
                trace!(path, scope = %scope.prefix, hit = found.is_some(), "scoped lookup");
                return Ok(found);
            }
        }

        let found = match self.document {
            Document::Json(root) => select_json(&JSONPath::parse(path)?, root),
            Document::Xml(xml) => {
                let json_path = JSONPath::parse(path)?;
                NodePath::from_json_path(json_path.expression(), true)
                    .and_then(|node_path| SourceValue::from_nodes(xml.select(&node_path, None)))
            }
        };
        trace!(path, hit = found.is_some(), "document lookup");
        Ok(found)
    }

    /// Evaluate a node path against an XML document
    ///
    /// Relative paths start at the innermost element node in scope, or at the
    /// root element outside any array. JSON documents never match.
    pub fn lookup_xml(&self, path: &NodePath) -> Option<SourceValue> {
        let Document::Xml(xml) = self.document else {
            return None;
        };

        let context = self.scopes.iter().rev().find_map(|scope| match &scope.seed {
            SourceValue::Nodes(nodes) => nodes.first(),
            SourceValue::Json(_) => None,
        });
        let found = SourceValue::from_nodes(xml.select(path, context));
        trace!(path = %path, hit = found.is_some(), "node path lookup");
        found
    }
}

/// Remainder of `path` below `prefix`, if `path` is at or under it
fn strip_scope<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('.') || rest.starts_with('[')).then_some(rest)
}

fn lookup_in_seed(seed: &SourceValue, rest: &str) -> Result<Option<SourceValue>> {
    let relative = JSONPath::parse(&format!("${}", rest))?;
    let found = match seed {
        SourceValue::Json(value) => select_json(&relative, value),
        SourceValue::Nodes(nodes) => NodePath::from_json_path(relative.expression(), false).and_then(|node_path| {
            let selected: Vec<XmlNode> = nodes.iter().flat_map(|node| node_path.select_from(node)).collect();
            SourceValue::from_nodes(selected)
        }),
    };
    Ok(found)
}

fn select_json(path: &JSONPath, root: &Value) -> Option<SourceValue> {
    let matches = path.execute(root);
    if path.is_definite() {
        return matches.into_iter().next().cloned().and_then(SourceValue::from_json);
    }
    if matches.is_empty() {
        return None;
    }
    Some(SourceValue::Json(Value::Array(matches.into_iter().cloned().collect())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_document() -> Document {
        Document::Json(json!({
            "title": "Headlines",
            "missing": null,
            "crops": [{"path": "p0"}, {"path": "p1", "name": "n1"}]
        }))
    }

    #[test]
    fn test_document_lookup() {
        let document = json_document();
        let context = InputContext::new(&document);
        assert_eq!(
            context.lookup_json("$.title").unwrap(),
            Some(SourceValue::Json(json!("Headlines")))
        );
        assert_eq!(context.lookup_json("$.missing").unwrap(), None);
        assert_eq!(context.lookup_json("$.nothing").unwrap(), None);
    }

    #[test]
    fn test_wildcard_lookup_collects_matches() {
        let document = json_document();
        let context = InputContext::new(&document);
        assert_eq!(
            context.lookup_json("$.crops[*].path").unwrap(),
            Some(SourceValue::Json(json!(["p0", "p1"])))
        );
        assert_eq!(context.lookup_json("$.crops[*].size").unwrap(), None);
    }

    #[test]
    fn test_scoped_lookup_uses_seed() {
        let document = json_document();
        let context = InputContext::new(&document);
        let scoped = context.narrow("$.crops[1]", SourceValue::Json(json!({"path": "seeded"})));

        assert_eq!(
            scoped.lookup_json("$.crops[1].path").unwrap(),
            Some(SourceValue::Json(json!("seeded")))
        );
        assert_eq!(
            scoped.lookup_json("$.crops[1]").unwrap(),
            Some(SourceValue::Json(json!({"path": "seeded"})))
        );
        assert_eq!(scoped.lookup_json("$.crops[1].name").unwrap(), None);
        assert_eq!(
            scoped.lookup_json("$.crops[10].path").unwrap(),
            None,
            "a longer index is not inside the scope"
        );
        assert_eq!(
            scoped.lookup_json("$.title").unwrap(),
            Some(SourceValue::Json(json!("Headlines")))
        );
    }

    #[test]
    fn test_xml_direct_lookup_maps_paths() {
        let raw = b"<feed><title> Headlines </title><item><headline>A</headline></item><item><headline>B</headline></item></feed>";
        let document = Document::parse(raw, InputFormat::Xml).unwrap();
        let context = InputContext::new(&document);

        let title = context.lookup_json("$.title").unwrap().unwrap();
        assert_eq!(title.into_json(), json!("Headlines"));

        let second = context.lookup_json("$.item[1].headline").unwrap().unwrap();
        assert_eq!(second.into_json(), json!("B"));
    }

    #[test]
    fn test_xml_scoped_lookups() {
        let raw = br#"<feed><item id="7"><headline>A</headline></item></feed>"#;
        let document = Document::parse(raw, InputFormat::Xml).unwrap();
        let context = InputContext::new(&document);

        let items = context.lookup_xml(&NodePath::parse("/feed/item").unwrap()).unwrap();
        let seed = items.into_seeds().remove(0);
        let scoped = context.narrow("$.items[0]", seed);

        let headline = scoped.lookup_json("$.items[0].headline").unwrap().unwrap();
        assert_eq!(headline.into_json(), json!("A"));

        let id = scoped.lookup_xml(&NodePath::parse("./@id").unwrap()).unwrap();
        assert_eq!(id.into_json(), json!("7"));
    }

    #[test]
    fn test_xml_path_ignored_for_json_documents() {
        let document = json_document();
        let context = InputContext::new(&document);
        assert_eq!(context.lookup_xml(&NodePath::parse("/title").unwrap()), None);
    }

    #[test]
    fn test_unparseable_input() {
        assert!(matches!(
            Document::parse(b"{\"open\": ", InputFormat::Json),
            Err(Error::Input { format: InputFormat::Json, .. })
        ));
        assert!(matches!(
            Document::parse(b"<a><b></a>", InputFormat::Xml),
            Err(Error::Input { format: InputFormat::Xml, .. })
        ));
    }
}
