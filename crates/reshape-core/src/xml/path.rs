//! Node-path queries over [`XmlNode`] trees
//!
//! Supports the location-path subset used by `xmlPath` sources: absolute
//! (`/feed/item`), descendant (`//item`) and relative (`./headline`, `title`)
//! paths, `*`, `@name`, `@*`, `text()`, and `[n]`, `[@a='v']`, `[child='v']`
//! predicates.

use super::{XmlError, XmlNode};
use crate::jsonpath::{Expression, IndexSelector, Selector};
use std::fmt;
use std::sync::Arc;

/// A parsed node path
#[derive(Debug, Clone, PartialEq)]
pub struct NodePath {
    absolute: bool,
    steps: Vec<Step>,
    source: String,
}

/// One location step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

/// How a step moves from its context nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Children (and attributes for attribute tests)
    Child,
    /// Children of the context and of every descendant (`//`)
    Descendant,
    /// The context node itself (`.`)
    SelfNode,
}

/// Which nodes a step keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    Name(String),
    AnyElement,
    Attribute(String),
    AnyAttribute,
    Text,
}

/// Step filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// 1-based position within the step's result for one context node
    Position(usize),
    AttributeEquals { name: String, value: String },
    ChildEquals { name: String, value: String },
}

impl NodePath {
    /// Parse a node path expression
    pub fn parse(path: &str) -> Result<Self, XmlError> {
        let source = path.trim();
        if source.is_empty() {
            return Err(invalid(path, "empty node path"));
        }

        let (absolute, mut axis, mut rest) = if let Some(rest) = source.strip_prefix("//") {
            (true, Axis::Descendant, rest)
        } else if let Some(rest) = source.strip_prefix('/') {
            (true, Axis::Child, rest)
        } else {
            (false, Axis::Child, source)
        };

        let mut steps = Vec::new();
        loop {
            let end = step_end(rest).ok_or_else(|| invalid(source, "unbalanced brackets or quotes"))?;
            let text = &rest[..end];
            if text.is_empty() {
                return Err(invalid(source, "empty location step"));
            }
            steps.push(parse_step(source, axis, text)?);

            rest = &rest[end..];
            if rest.is_empty() {
                break;
            }
            if let Some(next) = rest.strip_prefix("//") {
                axis = Axis::Descendant;
                rest = next;
            } else {
                axis = Axis::Child;
                rest = &rest[1..];
            }
            if rest.is_empty() {
                return Err(invalid(source, "trailing '/'"));
            }
        }

        Ok(Self {
            absolute,
            steps,
            source: source.to_string(),
        })
    }

    /// Map a JSONPath onto the equivalent node path
    ///
    /// With `absolute`, `$` is the root element (`$.a.b[2]` becomes
    /// `/*/a/b[3]`); otherwise the selectors apply to a context node.
    /// Property names starting with `@` select attributes. Returns `None` for
    /// selectors that have no node-path equivalent.
    pub fn from_json_path(expression: &Expression, absolute: bool) -> Option<Self> {
        let mut steps: Vec<Step> = Vec::new();
        if absolute {
            steps.push(Step::new(Axis::Child, NodeTest::AnyElement));
        }

        let mut descend = false;
        for selector in &expression.selectors {
            let axis = if descend { Axis::Descendant } else { Axis::Child };
            match selector {
                Selector::RecursiveDescent => {
                    descend = true;
                    continue;
                }
                Selector::Child(name) => {
                    let test = match name.strip_prefix('@') {
                        Some(attribute) => NodeTest::Attribute(attribute.to_string()),
                        None => NodeTest::Name(name.clone()),
                    };
                    steps.push(Step::new(axis, test));
                }
                Selector::Wildcard => steps.push(Step::new(axis, NodeTest::AnyElement)),
                Selector::Index(IndexSelector::Positive(index)) => {
                    if descend {
                        return None;
                    }
                    let step = steps.last_mut()?;
                    step.predicates.push(Predicate::Position(index + 1));
                }
                Selector::Index(IndexSelector::Negative(_)) => return None,
            }
            descend = false;
        }

        if steps.is_empty() {
            steps.push(Step::new(Axis::SelfNode, NodeTest::AnyElement));
        }

        let mut path = Self {
            absolute,
            steps,
            source: String::new(),
        };
        path.source = path.to_string();
        Some(path)
    }

    /// Whether the path starts at the document
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Location steps in order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate the steps starting from `start`
    pub fn select_from(&self, start: &XmlNode) -> Vec<XmlNode> {
        let mut current = vec![start.clone()];
        for step in &self.steps {
            let mut next = Vec::new();
            for context in &current {
                step.apply(context, &mut next);
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step.axis {
                Axis::Descendant => write!(f, "//")?,
                Axis::Child if i > 0 || self.absolute => write!(f, "/")?,
                Axis::SelfNode if i > 0 => write!(f, "/")?,
                Axis::SelfNode => {}
                Axis::Child => write!(f, "./")?,
            }
            match (&step.axis, &step.test) {
                (Axis::SelfNode, _) => write!(f, ".")?,
                (_, NodeTest::Name(name)) => write!(f, "{}", name)?,
                (_, NodeTest::AnyElement) => write!(f, "*")?,
                (_, NodeTest::Attribute(name)) => write!(f, "@{}", name)?,
                (_, NodeTest::AnyAttribute) => write!(f, "@*")?,
                (_, NodeTest::Text) => write!(f, "text()")?,
            }
            for predicate in &step.predicates {
                match predicate {
                    Predicate::Position(n) => write!(f, "[{}]", n)?,
                    Predicate::AttributeEquals { name, value } => write!(f, "[@{}='{}']", name, value)?,
                    Predicate::ChildEquals { name, value } => write!(f, "[{}='{}']", name, value)?,
                }
            }
        }
        Ok(())
    }
}

impl Step {
    fn new(axis: Axis, test: NodeTest) -> Self {
        Self {
            axis,
            test,
            predicates: Vec::new(),
        }
    }

    fn apply(&self, context: &XmlNode, out: &mut Vec<XmlNode>) {
        match self.axis {
            Axis::SelfNode => {
                let mut selected = vec![context.clone()];
                self.filter(&mut selected);
                out.extend(selected);
            }
            Axis::Child => {
                let mut selected = self.matching_children(context);
                self.filter(&mut selected);
                out.extend(selected);
            }
            Axis::Descendant => {
                let mut scopes = Vec::new();
                descendants_or_self(context, &mut scopes);
                for scope in &scopes {
                    let mut selected = self.matching_children(scope);
                    self.filter(&mut selected);
                    out.extend(selected);
                }
            }
        }
    }

    fn matching_children(&self, context: &XmlNode) -> Vec<XmlNode> {
        let Some(element) = context.as_element() else {
            return Vec::new();
        };

        match &self.test {
            NodeTest::Name(name) => element
                .children
                .iter()
                .filter(|child| matches!(child, XmlNode::Element(e) if e.name == local_name(name)))
                .cloned()
                .collect(),
            NodeTest::AnyElement => context.child_elements().cloned().collect(),
            NodeTest::Text => element
                .children
                .iter()
                .filter(|child| matches!(child, XmlNode::Text(_)))
                .cloned()
                .collect(),
            NodeTest::Attribute(name) => element
                .attributes
                .iter()
                .filter(|attribute| attribute.name == local_name(name))
                .map(|attribute| XmlNode::Attribute(Arc::new(attribute.clone())))
                .collect(),
            NodeTest::AnyAttribute => element
                .attributes
                .iter()
                .map(|attribute| XmlNode::Attribute(Arc::new(attribute.clone())))
                .collect(),
        }
    }

    fn filter(&self, selected: &mut Vec<XmlNode>) {
        for predicate in &self.predicates {
            match predicate {
                Predicate::Position(n) => {
                    let kept = selected.get(n - 1).cloned();
                    selected.clear();
                    selected.extend(kept);
                }
                Predicate::AttributeEquals { name, value } => selected.retain(|node| {
                    node.as_element()
                        .map(|e| e.attributes.iter().any(|a| &a.name == name && &a.value == value))
                        .unwrap_or(false)
                }),
                Predicate::ChildEquals { name, value } => selected.retain(|node| {
                    node.child_elements()
                        .any(|child| child.name() == Some(name.as_str()) && child.inner_text().trim() == value)
                }),
            }
        }
    }
}

fn descendants_or_self(node: &XmlNode, out: &mut Vec<XmlNode>) {
    out.push(node.clone());
    for child in node.child_elements() {
        descendants_or_self(child, out);
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn invalid(path: &str, message: &str) -> XmlError {
    XmlError::InvalidPath {
        path: path.to_string(),
        message: message.to_string(),
    }
}

/// Byte offset of the next top-level '/' (or the end of input)
fn step_end(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (offset, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'') | (None, '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.checked_sub(1)?,
            (None, '/') if depth == 0 => return Some(offset),
            _ => {}
        }
    }
    (depth == 0 && quote.is_none()).then_some(input.len())
}

fn parse_step(source: &str, axis: Axis, text: &str) -> Result<Step, XmlError> {
    let (head, predicates) = match text.find('[') {
        Some(open) => (&text[..open], parse_predicates(source, &text[open..])?),
        None => (text, Vec::new()),
    };

    let (axis, test) = match head {
        "." => (Axis::SelfNode, NodeTest::AnyElement),
        ".." => return Err(invalid(source, "parent steps are not supported")),
        "*" => (axis, NodeTest::AnyElement),
        "@*" => (axis, NodeTest::AnyAttribute),
        "text()" => (axis, NodeTest::Text),
        _ => match head.strip_prefix('@') {
            Some(name) if is_name(name) => (axis, NodeTest::Attribute(name.to_string())),
            None if is_name(head) => (axis, NodeTest::Name(head.to_string())),
            _ => return Err(invalid(source, &format!("invalid location step '{}'", head))),
        },
    };

    Ok(Step {
        axis,
        test,
        predicates,
    })
}

fn parse_predicates(source: &str, mut text: &str) -> Result<Vec<Predicate>, XmlError> {
    let mut predicates = Vec::new();
    while !text.is_empty() {
        let body_end = text
            .find(']')
            .filter(|_| text.starts_with('['))
            .ok_or_else(|| invalid(source, "malformed predicate"))?;
        predicates.push(parse_predicate(source, text[1..body_end].trim())?);
        text = &text[body_end + 1..];
    }
    Ok(predicates)
}

fn parse_predicate(source: &str, body: &str) -> Result<Predicate, XmlError> {
    if let Ok(position) = body.parse::<usize>() {
        if position == 0 {
            return Err(invalid(source, "positions start at 1"));
        }
        return Ok(Predicate::Position(position));
    }

    let (left, right) = body
        .split_once('=')
        .ok_or_else(|| invalid(source, &format!("unsupported predicate '{}'", body)))?;
    let right = right.trim();
    let value = right
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| right.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .ok_or_else(|| invalid(source, "predicate value must be quoted"))?
        .to_string();

    let left = left.trim();
    match left.strip_prefix('@') {
        Some(name) if is_name(name) => Ok(Predicate::AttributeEquals {
            name: name.to_string(),
            value,
        }),
        None if is_name(left) => Ok(Predicate::ChildEquals {
            name: left.to_string(),
            value,
        }),
        _ => Err(invalid(source, &format!("unsupported predicate '{}'", body))),
    }
}

fn is_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
