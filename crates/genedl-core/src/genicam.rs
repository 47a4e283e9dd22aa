//! GenICam XML reader
//!
//! Builds a [`FeatureTree`] from a GenICam register description. Only the
//! parts the panel generator needs are kept: node element, `Name`, access
//! mode, help text and the `<pFeature>` references of categories.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::feature::{AccessMode, FeatureKind, FeatureNode, FeatureTree, Insert};
use crate::warning::Warning;

#[derive(Error, Debug)]
pub enum GenicamError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Neither of these lines looks like valid XML:\n{0}")]
    NotXml(String),
    #[error("Failed to parse GenICam XML: {0}")]
    ParseError(#[from] quick_xml::Error),
    #[error("Invalid GenICam structure: {0}")]
    ValidationError(String),
}

/// A parsed description together with the problems found while reading it
#[derive(Debug, Clone, Default)]
pub struct GenicamDocument {
    pub tree: FeatureTree,
    pub warnings: Vec<Warning>,
}

impl GenicamDocument {
    /// Parse a GenICam description from an XML string
    pub fn from_xml(xml: &str) -> Result<Self, GenicamError> {
        let xml = skip_leading_junk(xml)?;
        let root = parse_elements(xml)?;
        debug!(root = %root.name, nodes = root.children.len(), "Parsed GenICam document");

        let mut doc = Self::default();
        doc.collect(&root);
        Ok(doc)
    }

    /// Parse a GenICam description from a file
    pub fn from_file(path: &Path) -> Result<Self, GenicamError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_xml(&content)
    }

    fn collect(&mut self, parent: &Element) {
        for element in &parent.children {
            // Groups only bundle nodes for tooling, they are not nodes themselves
            if element.name == "Group" {
                self.collect(element);
                continue;
            }

            match self.tree.insert(element.to_feature()) {
                Insert::Added(_) => {}
                Insert::Unnamed(_) => {
                    if element.name != "StructReg" {
                        warn!(element = %element.name, "Node has no Name attribute");
                        self.warnings.push(Warning::UnnamedNode {
                            element: element.name.clone(),
                        });
                    }
                }
                Insert::Duplicate { .. } => {
                    let name = element.attr("Name").unwrap_or_default().to_string();
                    warn!(
                        name = %name,
                        element = %element.name,
                        "Duplicate node name, replacing earlier definition"
                    );
                    self.warnings.push(Warning::DuplicateName {
                        name,
                        element: element.name.clone(),
                    });
                }
            }
        }
    }
}

/// `arv-tool` may leave the camera id on the first line of a dumped
/// description. The document starts at whichever of the first two lines
/// begins with `<`.
pub fn skip_leading_junk(text: &str) -> Result<&str, GenicamError> {
    let mut offset = 0;
    let mut seen = Vec::new();
    for line in text.split_inclusive('\n').take(2) {
        if line.trim_start().starts_with('<') {
            return Ok(text[offset..].trim_start());
        }
        seen.push(line.trim_end());
        offset += line.len();
    }
    Err(GenicamError::NotXml(seen.join("\n")))
}

/// Minimal element tree, enough to walk a description once
#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart) -> Result<Self, GenicamError> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attrs,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn to_feature(&self) -> FeatureNode {
        let kind = FeatureKind::from_element(&self.name);
        let mut node = FeatureNode {
            name: self.attr("Name").map(str::to_string),
            kind,
            access_mode: AccessMode::Unknown,
            description: String::new(),
            children: Vec::new(),
        };

        for child in &self.children {
            match child.name.as_str() {
                "pFeature" if node.kind.is_category() => {
                    node.children.push(child.text.trim().to_string())
                }
                "AccessMode" => node.access_mode = AccessMode::parse(&child.text),
                // Last one in document order wins
                "ToolTip" | "Description" => node.description = child.text.clone(),
                _ => {}
            }
        }
        node
    }
}

fn parse_elements(xml: &str) -> Result<Element, GenicamError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(Element::open(&e)?),
            Event::Empty(e) => {
                let element = Element::open(&e)?;
                close(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    GenicamError::ValidationError("unbalanced closing tag".to_string())
                })?;
                close(&mut stack, &mut root, element);
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(GenicamError::ValidationError(format!(
            "element <{}> is never closed",
            open.name
        )));
    }
    root.ok_or_else(|| GenicamError::ValidationError("document has no root element".to_string()))
}

fn close(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
