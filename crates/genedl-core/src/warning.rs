//! Recoverable problems found while generating a panel

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal issue; the run continues and the affected node is skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// Node without a `Name` attribute, so it gets no record and no row
    UnnamedNode { element: String },
    /// A second node with an existing name; the later definition is kept
    DuplicateName { name: String, element: String },
    /// Feature occupies a row but has no widget rule for its kind
    UnknownKind { name: String, element: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnnamedNode { element } => write!(f, "<{}> node has no Name attribute", element),
            Self::DuplicateName { name, element } => {
                write!(f, "duplicate <{}> node {:?} replaces earlier definition", element, name)
            }
            Self::UnknownKind { name, element } => {
                write!(f, "don't know what widget to use for {} ({})", name, element)
            }
        }
    }
}
