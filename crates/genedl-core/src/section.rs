//! Category flattening
//!
//! Turns the category graph into an ordered list of bounded-size sections,
//! one box per section on the generated screen.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, trace};

use crate::feature::{FeatureTree, NodeId};

/// Default maximum number of features in one section box
pub const DEFAULT_MAX_SECTION_FEATURES: usize = 32;

/// The tree is internally inconsistent and cannot be laid out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("Category {category} references unknown feature {feature}")]
    UnresolvedReference { category: String, feature: String },
    #[error("Category cycle detected: {}", .path.join(" -> "))]
    CategoryCycle { path: Vec<String> },
    #[error("Node {0} is not a named category")]
    NotACategory(NodeId),
}

/// A group of features shown in one box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Category name, with a 1-based index when the category was split
    pub title: String,
    pub features: Vec<NodeId>,
}

/// Walks categories depth-first, each feature claimed by the first category
/// that reaches it
#[derive(Debug)]
pub struct Flattener<'a> {
    tree: &'a FeatureTree,
    max_features: usize,
    sections: Vec<Section>,
    /// Categories fully expanded
    done: HashSet<NodeId>,
    /// Categories currently being expanded, outermost first
    stack: Vec<NodeId>,
    claimed: HashSet<NodeId>,
}

impl<'a> Flattener<'a> {
    pub fn new(tree: &'a FeatureTree, max_features: usize) -> Self {
        Self {
            tree,
            max_features: max_features.max(1),
            sections: Vec::new(),
            done: HashSet::new(),
            stack: Vec::new(),
            claimed: HashSet::new(),
        }
    }

    /// Flatten the given categories, in order, into sections
    pub fn flatten(mut self, categories: &[NodeId]) -> Result<Vec<Section>, StructuralError> {
        for &category in categories {
            self.visit(category)?;
        }
        debug!(
            sections = self.sections.len(),
            features = self.claimed.len(),
            "Flattened categories"
        );
        Ok(self.sections)
    }

    fn visit(&mut self, category: NodeId) -> Result<(), StructuralError> {
        let tree = self.tree;
        if self.done.contains(&category) {
            return Ok(());
        }
        if let Some(pos) = self.stack.iter().position(|&c| c == category) {
            let mut path: Vec<String> = self.stack[pos..]
                .iter()
                .map(|&c| tree.node(c).display_name().to_string())
                .collect();
            path.push(tree.node(category).display_name().to_string());
            return Err(StructuralError::CategoryCycle { path });
        }

        let node = tree
            .get(category)
            .filter(|n| n.kind.is_category() && n.name.is_some())
            .ok_or(StructuralError::NotACategory(category))?;
        let title = node.display_name();

        let mut features = Vec::new();
        let mut nested = Vec::new();
        for child in &node.children {
            let id = tree
                .lookup(child)
                .ok_or_else(|| StructuralError::UnresolvedReference {
                    category: title.to_string(),
                    feature: child.clone(),
                })?;
            if tree.node(id).kind.is_category() {
                nested.push(id);
            } else if self.claimed.insert(id) {
                features.push(id);
            } else {
                trace!(category = %title, feature = %child, "Feature already claimed");
            }
        }

        self.emit(title, features);

        self.stack.push(category);
        for id in nested {
            self.visit(id)?;
        }
        self.stack.pop();
        self.done.insert(category);
        Ok(())
    }

    fn emit(&mut self, title: &str, features: Vec<NodeId>) {
        if features.is_empty() {
            return;
        }
        if features.len() <= self.max_features {
            self.sections.push(Section {
                title: title.to_string(),
                features,
            });
            return;
        }
        for (i, chunk) in features.chunks(self.max_features).enumerate() {
            self.sections.push(Section {
                title: format!("{}{}", title, i + 1),
                features: chunk.to_vec(),
            });
        }
    }
}

/// Flatten every category of the tree in document order
pub fn flatten(tree: &FeatureTree, max_features: usize) -> Result<Vec<Section>, StructuralError> {
    Flattener::new(tree, max_features).flatten(tree.categories())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureKind, FeatureNode};

    fn category(name: &str, children: &[&str]) -> FeatureNode {
        FeatureNode::new(name, FeatureKind::Category).with_children(children.iter().copied())
    }

    fn integer(name: &str) -> FeatureNode {
        FeatureNode::new(name, FeatureKind::Integer)
    }

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    fn names<'t>(tree: &'t FeatureTree, section: &Section) -> Vec<&'t str> {
        section
            .features
            .iter()
            .map(|&id| tree.node(id).display_name())
            .collect()
    }

    #[test]
    fn test_nested_categories_follow_parent() {
        let tree: FeatureTree = vec![
            category("Root", &["A", "B", "Top"]),
            category("A", &["A1", "Inner"]),
            category("Inner", &["I1"]),
            category("B", &["B1"]),
            integer("Top"),
            integer("A1"),
            integer("I1"),
            integer("B1"),
        ]
        .into_iter()
        .collect();

        let sections = flatten(&tree, DEFAULT_MAX_SECTION_FEATURES).unwrap();
        assert_eq!(titles(&sections), vec!["Root", "A", "Inner", "B"]);
        assert_eq!(names(&tree, &sections[0]), vec!["Top"]);
        assert_eq!(names(&tree, &sections[2]), vec!["I1"]);
    }

    #[test]
    fn test_shared_subcategory_appears_once() {
        let tree: FeatureTree = vec![
            category("Left", &["L", "Shared"]),
            category("Right", &["R", "Shared"]),
            category("Shared", &["S1", "S2"]),
            integer("L"),
            integer("R"),
            integer("S1"),
            integer("S2"),
        ]
        .into_iter()
        .collect();

        let sections = flatten(&tree, DEFAULT_MAX_SECTION_FEATURES).unwrap();
        assert_eq!(titles(&sections), vec!["Left", "Shared", "Right"]);
    }

    #[test]
    fn test_feature_claimed_by_first_category_only() {
        let tree: FeatureTree = vec![
            category("First", &["Gain", "Width"]),
            category("Second", &["Width", "Height"]),
            category("Third", &["Gain"]),
            integer("Gain"),
            integer("Width"),
            integer("Height"),
        ]
        .into_iter()
        .collect();

        let sections = flatten(&tree, DEFAULT_MAX_SECTION_FEATURES).unwrap();
        // Third has nothing left to show, so no section
        assert_eq!(titles(&sections), vec!["First", "Second"]);
        assert_eq!(names(&tree, &sections[0]), vec!["Gain", "Width"]);
        assert_eq!(names(&tree, &sections[1]), vec!["Height"]);
    }

    #[test]
    fn test_large_category_is_split() {
        let children: Vec<String> = (0..70).map(|i| format!("F{i}")).collect();
        let mut nodes =
            vec![FeatureNode::new("Big", FeatureKind::Category).with_children(children.clone())];
        nodes.extend(children.iter().map(|c| integer(c)));
        let tree: FeatureTree = nodes.into_iter().collect();

        let sections = flatten(&tree, DEFAULT_MAX_SECTION_FEATURES).unwrap();
        assert_eq!(titles(&sections), vec!["Big1", "Big2", "Big3"]);
        let sizes: Vec<_> = sections.iter().map(|s| s.features.len()).collect();
        assert_eq!(sizes, vec![32, 32, 6]);

        let flat: Vec<_> = sections.iter().flat_map(|s| names(&tree, s)).collect();
        let expected: Vec<_> = children.iter().map(String::as_str).collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn test_exactly_full_category_keeps_title() {
        let children: Vec<String> = (0..32).map(|i| format!("F{i}")).collect();
        let mut nodes =
            vec![FeatureNode::new("Full", FeatureKind::Category).with_children(children.clone())];
        nodes.extend(children.iter().map(|c| integer(c)));
        let tree: FeatureTree = nodes.into_iter().collect();

        let sections = flatten(&tree, DEFAULT_MAX_SECTION_FEATURES).unwrap();
        assert_eq!(titles(&sections), vec!["Full"]);
        assert_eq!(sections[0].features.len(), 32);
    }

    #[test]
    fn test_unresolved_reference_is_fatal() {
        let tree: FeatureTree = vec![category("Root", &["Missing"])].into_iter().collect();
        let err = flatten(&tree, DEFAULT_MAX_SECTION_FEATURES).unwrap_err();
        assert_eq!(
            err,
            StructuralError::UnresolvedReference {
                category: "Root".to_string(),
                feature: "Missing".to_string()
            }
        );
    }

    #[test]
    fn test_cycle_is_detected() {
        let tree: FeatureTree = vec![
            category("A", &["B"]),
            category("B", &["C"]),
            category("C", &["A", "X"]),
            integer("X"),
        ]
        .into_iter()
        .collect();

        let err = flatten(&tree, DEFAULT_MAX_SECTION_FEATURES).unwrap_err();
        assert_eq!(
            err,
            StructuralError::CategoryCycle {
                path: vec!["A".into(), "B".into(), "C".into(), "A".into()]
            }
        );
        assert_eq!(err.to_string(), "Category cycle detected: A -> B -> C -> A");
    }

    #[test]
    fn test_every_feature_lands_in_exactly_one_section() {
        let tree: FeatureTree = vec![
            category("Root", &["Image", "Acq", "Shared"]),
            category("Image", &["Width", "Height", "Shared"]),
            category("Acq", &["Start", "Width", "Shared"]),
            category("Shared", &["Gain", "Start"]),
            integer("Width"),
            integer("Height"),
            integer("Gain"),
            FeatureNode::new("Start", FeatureKind::Command),
        ]
        .into_iter()
        .collect();

        let sections = flatten(&tree, 2).unwrap();
        let mut seen = HashSet::new();
        for section in &sections {
            assert!(!section.features.is_empty() && section.features.len() <= 2);
            for id in &section.features {
                assert!(seen.insert(*id), "feature {id} listed twice");
            }
        }
        assert_eq!(seen.len(), 4);
    }
}
