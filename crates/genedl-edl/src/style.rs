//! Fonts and colours of generated screens

use serde::{Deserialize, Serialize};

/// EDM colour indices refer to the site colour map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdlStyle {
    #[serde(default = "default_font_class")]
    pub font_class: String,
    /// Control widgets (entries, menus, buttons)
    #[serde(default = "default_fg_control")]
    pub fg_control: u32,
    #[serde(default = "default_bg_control")]
    pub bg_control: u32,
    /// Monitor widgets (readbacks)
    #[serde(default = "default_fg_monitor")]
    pub fg_monitor: u32,
    #[serde(default = "default_bg_monitor")]
    pub bg_monitor: u32,
}

impl Default for EdlStyle {
    fn default() -> Self {
        Self {
            font_class: default_font_class(),
            fg_control: default_fg_control(),
            bg_control: default_bg_control(),
            fg_monitor: default_fg_monitor(),
            bg_monitor: default_bg_monitor(),
        }
    }
}

fn default_font_class() -> String {
    "arial".to_string()
}

fn default_fg_control() -> u32 {
    25
}

fn default_bg_control() -> u32 {
    3
}

fn default_fg_monitor() -> u32 {
    16
}

fn default_bg_monitor() -> u32 {
    10
}
