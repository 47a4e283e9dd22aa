//! Panel layout
//!
//! Sections are stacked top to bottom as boxes, one feature per row. When a
//! box would run past the maximum screen height a new column is started to
//! the right. Columns are filled strictly left to right.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::feature::{AccessMode, FeatureKind, FeatureTree, NodeId};
use crate::section::Section;
use crate::warning::Warning;

/// Horizontal offsets of the parts of a feature row, relative to the box
pub const HELP_OFFSET: i32 = 5;
pub const LABEL_OFFSET: i32 = 15;
pub const WIDGET_OFFSET: i32 = 125;
pub const READBACK_OFFSET: i32 = 190;

/// Distance of the exit button from the right edge, and the height of its strip
const EXIT_INSET: i32 = 100;
const EXIT_STRIP: i32 = 30;

/// Screen geometry settings, in pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_left_margin")]
    pub left_margin: i32,
    /// Top of each column, below the title bar
    #[serde(default = "default_top_margin")]
    pub top_margin: i32,
    #[serde(default = "default_column_stride")]
    pub column_stride: i32,
    /// A box that would extend below this starts a new column
    #[serde(default = "default_max_height")]
    pub max_height: i32,
    #[serde(default = "default_row_pitch")]
    pub row_pitch: i32,
    #[serde(default = "default_box_padding")]
    pub box_padding: i32,
    #[serde(default = "default_section_gap")]
    pub section_gap: i32,
    #[serde(default = "default_box_width")]
    pub box_width: i32,
    /// Screen height before anything is placed
    #[serde(default = "default_min_height")]
    pub min_height: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            left_margin: default_left_margin(),
            top_margin: default_top_margin(),
            column_stride: default_column_stride(),
            max_height: default_max_height(),
            row_pitch: default_row_pitch(),
            box_padding: default_box_padding(),
            section_gap: default_section_gap(),
            box_width: default_box_width(),
            min_height: default_min_height(),
        }
    }
}

fn default_left_margin() -> i32 {
    5
}

fn default_top_margin() -> i32 {
    50
}

fn default_column_stride() -> i32 {
    260
}

fn default_max_height() -> i32 {
    850
}

fn default_row_pitch() -> i32 {
    25
}

fn default_box_padding() -> i32 {
    5
}

fn default_section_gap() -> i32 {
    15
}

fn default_box_width() -> i32 {
    255
}

fn default_min_height() -> i32 {
    40
}

/// Widget used to show a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Text readback of `<record>_RBV`
    ReadOnly,
    /// Text entry on `<record>` next to a readback of `<record>_RBV`
    DemandReadback,
    /// Menu button for enumerations and booleans
    Menu,
    /// Momentary button processing `<record>.PROC`
    Command,
    /// No widget rule for this kind; the row is left empty
    Unrecognized,
}

impl WidgetKind {
    /// Pick the widget for a feature. Read-only access wins over the kind.
    pub fn classify(kind: &FeatureKind, access: AccessMode) -> Self {
        if matches!(kind, FeatureKind::String) || !access.is_writable() {
            Self::ReadOnly
        } else if kind.is_numeric() {
            Self::DemandReadback
        } else {
            match kind {
                FeatureKind::Enumeration | FeatureKind::Boolean => Self::Menu,
                FeatureKind::Command => Self::Command,
                _ => Self::Unrecognized,
            }
        }
    }
}

/// Placement of one feature row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGeometry {
    pub node: NodeId,
    /// Row index inside the section box
    pub row: usize,
    pub y: i32,
    pub widget: WidgetKind,
    pub help_x: i32,
    pub label_x: i32,
    pub widget_x: i32,
    /// Second widget of a demand/readback pair
    pub readback_x: Option<i32>,
}

/// Placement of one section box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionGeometry {
    pub title: String,
    pub column: usize,
    pub x: i32,
    pub top_y: i32,
    /// Caption sits across the top edge of the box
    pub label_y: i32,
    pub width: i32,
    pub height: i32,
    pub features: Vec<FeatureGeometry>,
}

/// Whole screen layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: i32,
    pub height: i32,
    pub exit_x: i32,
    pub exit_y: i32,
    pub columns: usize,
    pub sections: Vec<SectionGeometry>,
}

/// Running layout state, fed one section at a time
#[derive(Debug)]
pub struct LayoutEngine<'a> {
    tree: &'a FeatureTree,
    config: LayoutConfig,
    column: usize,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    sections: Vec<SectionGeometry>,
    warnings: Vec<Warning>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(tree: &'a FeatureTree, config: LayoutConfig) -> Self {
        Self {
            tree,
            column: 0,
            x: config.left_margin,
            y: config.top_margin,
            width: config.column_stride,
            height: config.min_height,
            sections: Vec::new(),
            warnings: Vec::new(),
            config,
        }
    }

    /// Box height for a section with `features` rows
    pub fn box_height(&self, features: usize) -> i32 {
        self.config.row_pitch * features as i32 + self.config.box_padding
    }

    /// Place the next section below the previous one, or in a new column
    pub fn place(&mut self, section: &Section) {
        let box_height = self.box_height(section.features.len());
        if self.y + box_height > self.config.max_height {
            self.y = self.config.top_margin;
            self.column += 1;
            self.x += self.config.column_stride;
            self.width += self.config.column_stride;
            debug!(column = self.column, section = %section.title, "Starting new column");
        }

        let top_y = self.y;
        self.y += self.config.box_padding;
        self.height = self.height.max(self.y);

        let mut features = Vec::with_capacity(section.features.len());
        for (row, &id) in section.features.iter().enumerate() {
            let node = self.tree.node(id);
            let widget = WidgetKind::classify(&node.kind, node.access_mode);
            if widget == WidgetKind::Unrecognized {
                warn!(
                    feature = %node.display_name(),
                    kind = %node.kind,
                    "Don't know what widget to use"
                );
                self.warnings.push(Warning::UnknownKind {
                    name: node.display_name().to_string(),
                    element: node.kind.to_string(),
                });
            }
            features.push(FeatureGeometry {
                node: id,
                row,
                y: self.y,
                widget,
                help_x: self.x + HELP_OFFSET,
                label_x: self.x + LABEL_OFFSET,
                widget_x: self.x + WIDGET_OFFSET,
                readback_x: (widget == WidgetKind::DemandReadback)
                    .then_some(self.x + READBACK_OFFSET),
            });
            self.y += self.config.row_pitch;
        }

        self.y += self.config.section_gap;
        self.height = self.height.max(self.y);

        self.sections.push(SectionGeometry {
            title: section.title.clone(),
            column: self.column,
            x: self.x,
            top_y,
            label_y: top_y - 10,
            width: self.config.box_width,
            height: box_height,
            features,
        });
    }

    /// Close the screen: add the right margin and place the exit button
    /// under the tallest column
    pub fn finish(self) -> (Geometry, Vec<Warning>) {
        let width = self.width + self.config.left_margin;
        let exit_x = width - EXIT_INSET;
        let exit_y = self.height - EXIT_STRIP.min(self.height - self.y);
        let geometry = Geometry {
            width,
            height: exit_y + EXIT_STRIP,
            exit_x,
            exit_y,
            columns: if self.sections.is_empty() { 0 } else { self.column + 1 },
            sections: self.sections,
        };
        (geometry, self.warnings)
    }
}

/// Lay out all sections in order
pub fn layout(
    tree: &FeatureTree,
    sections: &[Section],
    config: LayoutConfig,
) -> (Geometry, Vec<Warning>) {
    let mut engine = LayoutEngine::new(tree, config);
    for section in sections {
        engine.place(section);
    }
    engine.finish()
}
