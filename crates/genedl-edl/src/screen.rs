//! Whole-screen rendering
//!
//! The features screen is regenerated on every run. The summary screen is a
//! starting point meant to be edited by hand.

use genedl_core::{FeatureTree, PipelineOutput, WidgetKind};
use tracing::warn;

use crate::escape::{ascii_lossy, help_symbols};
use crate::style::EdlStyle;
use crate::widgets;

/// Macro prefix of every PV on the generated screens
const PV_PREFIX: &str = "$(P)$(R)";

/// Width of a read-only monitor and of each half of a demand/readback pair
const WIDE_WIDGET: i32 = 125;
const NARROW_WIDGET: i32 = 60;

/// `<camera>-features.edl`: every feature, grouped by section
#[derive(Debug)]
pub struct FeatureScreen<'a> {
    camera: &'a str,
    tree: &'a FeatureTree,
    output: &'a PipelineOutput,
    style: &'a EdlStyle,
}

impl<'a> FeatureScreen<'a> {
    pub fn new(
        camera: &'a str,
        tree: &'a FeatureTree,
        output: &'a PipelineOutput,
        style: &'a EdlStyle,
    ) -> Self {
        Self {
            camera,
            tree,
            output,
            style,
        }
    }

    pub fn render(&self) -> String {
        let geometry = &self.output.geometry;
        let mut out = String::new();
        self.header(&mut out, geometry.width, geometry.height);

        let mut body = String::new();
        for section in &geometry.sections {
            let (x, y) = (section.x, section.top_y);
            widgets::section_box(&mut body, x, y, section.width, section.height);
            widgets::section_caption(&mut body, self.style, x, section.label_y, &section.title);

            for row in &section.features {
                let node = self.tree.node(row.node);
                let name = node.display_name();
                let Some(record) = self.output.identifiers.get(name) else {
                    warn!(feature = %name, "No record name allocated, skipping row");
                    continue;
                };
                let pv = format!("{PV_PREFIX}{record}");
                let rbv = format!("{pv}_RBV");

                let desc = help_symbols(name, &node.description);
                widgets::help_button(&mut body, self.style, row.help_x, row.y, &desc);
                body.push('\n');
                widgets::label(&mut body, self.style, row.label_x, row.y, name);

                match row.widget {
                    WidgetKind::ReadOnly => widgets::text_update(
                        &mut body,
                        self.style,
                        row.widget_x,
                        row.y,
                        WIDE_WIDGET,
                        &rbv,
                    ),
                    WidgetKind::DemandReadback => {
                        widgets::text_entry(&mut body, self.style, row.widget_x, row.y, &pv);
                        let x = row.readback_x.unwrap_or(row.widget_x + NARROW_WIDGET + 5);
                        widgets::text_update(&mut body, self.style, x, row.y, NARROW_WIDGET, &rbv);
                    }
                    WidgetKind::Menu => {
                        widgets::menu_button(&mut body, self.style, row.widget_x, row.y, &pv, &rbv)
                    }
                    WidgetKind::Command => widgets::message_button(
                        &mut body,
                        self.style,
                        row.widget_x,
                        row.y,
                        &format!("{pv}.PROC"),
                        name,
                    ),
                    WidgetKind::Unrecognized => {}
                }
            }
        }
        out.push_str(&body);

        widgets::exit_button(&mut out, self.style, geometry.exit_x, geometry.exit_y);
        ascii_lossy(&out)
    }

    fn header(&self, out: &mut String, w: i32, h: i32) {
        let EdlStyle {
            font_class: font,
            fg_control,
            bg_control,
            fg_monitor,
            bg_monitor,
        } = self.style;
        let title = format!("{} features - {PV_PREFIX}", self.camera);
        out.push_str(&format!(
            r#"4 0 1
beginScreenProperties
major 4
minor 0
release 1
x 50
y 50
w {w}
h {h}
font "{font}-bold-r-12.0"
ctlFont "{font}-bold-r-12.0"
btnFont "{font}-bold-r-12.0"
fgColor index 14
bgColor index 3
textColor index 14
ctlFgColor1 index {fg_monitor}
ctlFgColor2 index {fg_control}
ctlBgColor1 index {bg_monitor}
ctlBgColor2 index {bg_control}
topShadowColor index 1
botShadowColor index 11
title "{title}"
showGrid
snapToGrid
gridSize 5
endScreenProperties

# (Group)
object activeGroupClass
beginObjectProperties
major 4
minor 0
release 0
x 0
y 0
w {w}
h 30

beginGroup

# (Rectangle)
object activeRectangleClass
beginObjectProperties
major 4
minor 0
release 0
x 0
y 0
w {w}
h 30
lineColor index 3
fill
fillColor index 3
endObjectProperties

# (Lines)
object activeLineClass
beginObjectProperties
major 4
minor 0
release 1
x 0
y 2
w {w}
h 24
lineColor index 11
fillColor index 0
numPoints 3
xPoints {{
  0 0
  1 {w}
  2 {w}
}}
yPoints {{
  0 26
  1 26
  2 2
}}
endObjectProperties

# (Static Text)
object activeXTextClass
beginObjectProperties
major 4
minor 1
release 0
x 0
y 2
w {w}
h 24
font "{font}-bold-r-16.0"
fontAlign "center"
fgColor index 14
bgColor index 48
value {{
  "{title}"
}}
endObjectProperties

# (Lines)
object activeLineClass
beginObjectProperties
major 4
minor 0
release 1
x 0
y 2
w {w}
h 24
lineColor index 1
fillColor index 0
numPoints 3
xPoints {{
  0 0
  1 0
  2 {w}
}}
yPoints {{
  0 26
  1 2
  2 2
}}
endObjectProperties

endGroup

endObjectProperties

"#
        ));
    }
}

/// `<camera>.edl`: ADBase and aravisCamera panels plus a link to the
/// features screen
pub fn summary_screen(camera: &str, style: &EdlStyle) -> String {
    let EdlStyle {
        font_class: font,
        fg_control,
        bg_control,
        fg_monitor,
        bg_monitor,
    } = style;
    let text = format!(
        r#"4 0 1
beginScreenProperties
major 4
minor 0
release 1
x 713
y 157
w 390
h 820
font "{font}-bold-r-12.0"
ctlFont "{font}-bold-r-12.0"
btnFont "{font}-bold-r-12.0"
fgColor index 14
bgColor index 3
textColor index 14
ctlFgColor1 index {fg_monitor}
ctlFgColor2 index {fg_control}
ctlBgColor1 index {bg_monitor}
ctlBgColor2 index {bg_control}
topShadowColor index 1
botShadowColor index 11
showGrid
snapToGrid
gridSize 5
endScreenProperties

# (Rectangle)
object activeRectangleClass
beginObjectProperties
major 4
minor 0
release 0
x 0
y 470
w 390
h 350
lineColor index 5
fill
fillColor index 5
endObjectProperties

# (Embedded Window)
object activePipClass
beginObjectProperties
major 4
minor 1
release 0
x 0
y 0
w 390
h 470
fgColor index 14
bgColor index 3
topShadowColor index 1
botShadowColor index 11
displaySource "file"
file "ADBase"
sizeOfs 5
numDsps 0
noScroll
endObjectProperties

# (Embedded Window)
object activePipClass
beginObjectProperties
major 4
minor 1
release 0
x 0
y 470
w 390
h 140
fgColor index 14
bgColor index 3
topShadowColor index 1
botShadowColor index 11
displaySource "file"
file "aravisCamera"
sizeOfs 5
numDsps 0
noScroll
endObjectProperties

# (Related Display)
object relatedDisplayClass
beginObjectProperties
major 4
minor 2
release 0
x 5
y 790
w 380
h 25
fgColor index 43
bgColor index 3
topShadowColor index 1
botShadowColor index 11
font "{font}-bold-r-14.0"
buttonLabel "more features..."
numPvs 4
numDsps 1
displayFileName {{
  0 "{camera}-features"
}}
setPosition {{
  0 "parentWindow"
}}
endObjectProperties"#
    );
    ascii_lossy(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use genedl_core::pipeline::{self, PipelineConfig};
    use genedl_core::{AccessMode, FeatureKind, FeatureNode};

    fn camera() -> (FeatureTree, PipelineOutput) {
        let tree: FeatureTree = vec![
            FeatureNode::new("AnalogControl", FeatureKind::Category).with_children([
                "Gain",
                "GainAuto",
                "DeviceTemperature",
                "TriggerSoftware",
                "LUTValueAll",
            ]),
            FeatureNode::new("Gain", FeatureKind::Float)
                .with_access(AccessMode::ReadWrite)
                .with_description("Gain, in dB {raw} \u{b1}1"),
            FeatureNode::new("GainAuto", FeatureKind::Enumeration),
            FeatureNode::new("DeviceTemperature", FeatureKind::Float)
                .with_access(AccessMode::ReadOnly),
            FeatureNode::new("TriggerSoftware", FeatureKind::Command),
            FeatureNode::new("LUTValueAll", FeatureKind::Unknown("Register".into())),
        ]
        .into_iter()
        .collect();
        let output = pipeline::run(&tree, &PipelineConfig::default()).unwrap();
        (tree, output)
    }

    #[test]
    fn test_feature_screen_widgets() {
        let (tree, output) = camera();
        let style = EdlStyle::default();
        let text = FeatureScreen::new("cam1", &tree, &output, &style).render();

        assert!(text.starts_with("4 0 1\nbeginScreenProperties\n"));
        assert!(text.contains("title \"cam1 features - $(P)$(R)\"\n"));
        assert!(text.contains("  \"  AnalogControl  \"\n"));

        // Demand and readback for a writable float
        assert!(text.contains("controlPv \"$(P)$(R)GC_Gain\"\n"));
        assert!(text.contains("controlPv \"$(P)$(R)GC_Gain_RBV\"\n"));
        // Menu, read-only monitor, command
        assert!(text.contains("indicatorPv \"$(P)$(R)GC_GainAuto_RBV\"\n"));
        assert!(text.contains("controlPv \"$(P)$(R)GC_DeviceTemperature_RBV\"\n"));
        assert!(!text.contains("controlPv \"$(P)$(R)GC_DeviceTemperature\"\n"));
        assert!(text.contains("controlPv \"$(P)$(R)GC_TriggerSoftware.PROC\"\n"));
        assert!(text.contains("onLabel \"TriggerSoftware\"\n"));

        // Unrecognised kinds keep their label but get no widget
        assert!(text.contains("  \"LUTValueAll\"\n"));
        assert!(!text.contains("GC_LUTValueAll"));

        // Help text escaped, non-ASCII replaced
        assert!(text.contains(r#"desc0=Gain: Gain; in dB \{raw\} ?1 "#));
        assert!(text.is_ascii());

        assert!(text.ends_with(
            "label \"EXIT\"\nfont \"arial-bold-r-14.0\"\n3d\nendObjectProperties\n"
        ));
    }

    #[test]
    fn test_feature_screen_uses_layout_geometry() {
        let (tree, output) = camera();
        let style = EdlStyle::default();
        let text = FeatureScreen::new("cam1", &tree, &output, &style).render();
        let g = &output.geometry;
        assert!(text.contains(&format!("w {}\nh {}\nfont", g.width, g.height)));
        assert!(text.contains(&format!("x {}\ny {}\nw 95\nh 25\n", g.exit_x, g.exit_y)));
        // Box of 5 rows at the top of the first column
        assert!(text.contains("x 5\ny 50\nw 255\nh 130\n"));
    }

    #[test]
    fn test_summary_screen_links_features() {
        let text = summary_screen("cam1", &EdlStyle::default());
        assert!(text.contains("file \"ADBase\"\n"));
        assert!(text.contains("file \"aravisCamera\"\n"));
        assert!(text.contains("  0 \"cam1-features\"\n"));
        assert!(text.ends_with("endObjectProperties"));
    }
}
