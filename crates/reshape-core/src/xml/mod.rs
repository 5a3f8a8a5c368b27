//! Owned XML node tree for XML input documents
//!
//! Raw text is parsed with `roxmltree` and copied into reference-counted
//! nodes, so node-sets can be held as values and narrowed into element
//! scopes without borrowing the source text.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

mod path;

pub use path::{Axis, NodePath, NodeTest, Predicate, Step};

use std::sync::Arc;
use thiserror::Error;

/// XML parsing and path errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XmlError {
    /// The raw document is not well-formed XML
    #[error("{message}")]
    Parse { message: String },

    /// A node path expression could not be parsed
    #[error("Invalid node path '{path}': {message}")]
    InvalidPath { path: String, message: String },
}

/// A node in an owned XML tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element with its attributes and children
    Element(Arc<XmlElement>),
    /// A text (or CDATA) node
    Text(Arc<str>),
    /// An attribute selected by a node path
    Attribute(Arc<XmlAttribute>),
}

/// Element payload
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Local name, without namespace prefix
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<XmlAttribute>,
    /// Element and text children in document order
    pub children: Vec<XmlNode>,
}

/// Attribute payload
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

impl XmlNode {
    /// Name of an element or attribute node
    pub fn name(&self) -> Option<&str> {
        match self {
            XmlNode::Element(element) => Some(&element.name),
            XmlNode::Attribute(attribute) => Some(&attribute.name),
            XmlNode::Text(_) => None,
        }
    }

    /// Element payload, if this is an element
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of the node and all its descendants
    pub fn inner_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Attribute(attribute) => out.push_str(&attribute.value),
            XmlNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Element children of this node
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlNode> {
        let children: &[XmlNode] = match self {
            XmlNode::Element(element) => &element.children,
            _ => &[],
        };
        children.iter().filter(|child| matches!(child, XmlNode::Element(_)))
    }
}

/// A parsed XML document
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// Synthetic parent whose only child is the root element
    document: XmlNode,
    root: XmlNode,
}

impl XmlDocument {
    /// Parse raw XML text
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        let parsed = roxmltree::Document::parse(text).map_err(|e| XmlError::Parse {
            message: e.to_string(),
        })?;
        let root = convert(parsed.root_element());
        let document = XmlNode::Element(Arc::new(XmlElement {
            name: String::new(),
            attributes: Vec::new(),
            children: vec![root.clone()],
        }));
        Ok(Self { document, root })
    }

    /// The document (root) element
    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    /// Evaluate `path`, using `context` for relative paths
    ///
    /// Relative paths without a context node start at the root element.
    pub fn select(&self, path: &NodePath, context: Option<&XmlNode>) -> Vec<XmlNode> {
        let start = if path.is_absolute() {
            &self.document
        } else {
            context.unwrap_or(&self.root)
        };
        path.select_from(start)
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> XmlNode {
    let attributes = node
        .attributes()
        .map(|attribute| XmlAttribute {
            name: attribute.name().to_string(),
            value: attribute.value().to_string(),
        })
        .collect();

    let children = node
        .children()
        .filter_map(|child| {
            if child.is_element() {
                Some(convert(child))
            } else if child.is_text() {
                child.text().map(|text| XmlNode::Text(Arc::from(text)))
            } else {
                None
            }
        })
        .collect();

    XmlNode::Element(Arc::new(XmlElement {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<feed xmlns:m="urn:media">
  <title>Morning <b>news</b></title>
  <item id="1"><headline>A</headline></item>
  <item id="2"><headline>B</headline><m:thumb url="t.png"/></item>
</feed>"#;

    #[test]
    fn test_parse_builds_owned_tree() {
        let document = XmlDocument::parse(FEED).unwrap();
        assert_eq!(document.root().name(), Some("feed"));

        let names: Vec<&str> = document
            .root()
            .child_elements()
            .filter_map(XmlNode::name)
            .collect();
        assert_eq!(names, vec!["title", "item", "item"]);
    }

    #[test]
    fn test_inner_text_includes_descendants() {
        let document = XmlDocument::parse(FEED).unwrap();
        let title = document.root().child_elements().next().unwrap();
        assert_eq!(title.inner_text(), "Morning news");
    }

    #[test]
    fn test_namespace_prefix_dropped_from_names() {
        let document = XmlDocument::parse(FEED).unwrap();
        let path = NodePath::parse("//thumb/@url").unwrap();
        let urls: Vec<String> = document.select(&path, None).iter().map(XmlNode::inner_text).collect();
        assert_eq!(urls, vec!["t.png"]);
    }

    #[test]
    fn test_parse_error() {
        let err = XmlDocument::parse("<feed><item></feed>").unwrap_err();
        assert!(matches!(err, XmlError::Parse { .. }));
    }
}
