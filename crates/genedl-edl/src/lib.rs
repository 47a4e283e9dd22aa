//! genedl EDL - EDM screen rendering
//!
//! Turns a computed panel layout into the text of EDM `.edl` screens:
//! - `<camera>-features.edl` with one widget row per feature
//! - `<camera>.edl`, an editable summary screen linking to the features

pub mod escape;
pub mod screen;
pub mod style;
pub mod widgets;

pub use screen::{summary_screen, FeatureScreen};
pub use style::EdlStyle;
