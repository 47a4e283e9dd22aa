//! EDM object templates
//!
//! Each function appends one `object ... endObjectProperties` block.

use crate::escape::HELP_LINES;
use crate::style::EdlStyle;

/// Filled background box of a section
pub fn section_box(out: &mut String, x: i32, y: i32, w: i32, h: i32) {
    out.push_str(&format!(
        r#"# (Rectangle)
object activeRectangleClass
beginObjectProperties
major 4
minor 0
release 0
x {x}
y {y}
w {w}
h {h}
lineColor index 14
fill
fillColor index 5
endObjectProperties

"#
    ));
}

/// Bordered caption across the top edge of a section box
pub fn section_caption(out: &mut String, style: &EdlStyle, x: i32, y: i32, title: &str) {
    let font = &style.font_class;
    out.push_str(&format!(
        r#"# (Static Text)
object activeXTextClass
beginObjectProperties
major 4
minor 1
release 0
x {x}
y {y}
w 150
h 14
font "{font}-medium-r-12.0"
fontAlign "center"
fgColor index 14
bgColor index 8
value {{
  "  {title}  "
}}
autoSize
border
endObjectProperties

"#
    ));
}

/// `?` button opening the help display with the feature description
pub fn help_button(
    out: &mut String,
    style: &EdlStyle,
    x: i32,
    y: i32,
    desc: &[String; HELP_LINES],
) {
    let font = &style.font_class;
    let symbols = desc
        .iter()
        .enumerate()
        .map(|(i, d)| format!("desc{i}={d}"))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&format!(
        r#"# (Related Display)
object relatedDisplayClass
beginObjectProperties
major 4
minor 2
release 0
x {x}
y {y}
w 10
h 20
fgColor index 14
bgColor index 3
topShadowColor index 1
botShadowColor index 11
font "{font}-bold-r-10.0"
xPosOffset -100
yPosOffset -85
useFocus
buttonLabel "?"
numPvs 4
numDsps 1
displayFileName {{
  0 "aravisHelp"
}}
setPosition {{
  0 "button"
}}
symbols {{
  0 "{symbols}"
}}
endObjectProperties

"#
    ));
}

/// Feature name next to its widget
pub fn label(out: &mut String, style: &EdlStyle, x: i32, y: i32, text: &str) {
    let font = &style.font_class;
    out.push_str(&format!(
        r#"# (Static Text)
object activeXTextClass
beginObjectProperties
major 4
minor 1
release 0
x {x}
y {y}
w 110
h 20
font "{font}-bold-r-10.0"
fgColor index 14
bgColor index 3
useDisplayBg
value {{
  "{text}"
}}
endObjectProperties

"#
    ));
}

/// Monitor of a readback record
pub fn text_update(out: &mut String, style: &EdlStyle, x: i32, y: i32, w: i32, pv: &str) {
    let EdlStyle {
        font_class: font,
        fg_monitor,
        bg_monitor,
        ..
    } = style;
    out.push_str(&format!(
        r#"# (Textupdate)
object TextupdateClass
beginObjectProperties
major 10
minor 0
release 0
x {x}
y {y}
w {w}
h 20
controlPv "{pv}"
fgColor index {fg_monitor}
fgAlarm
bgColor index {bg_monitor}
fill
font "{font}-bold-r-12.0"
fontAlign "center"
endObjectProperties

"#
    ));
}

/// Entry field writing a demand record
pub fn text_entry(out: &mut String, style: &EdlStyle, x: i32, y: i32, pv: &str) {
    let EdlStyle {
        font_class: font,
        fg_control,
        bg_control,
        ..
    } = style;
    out.push_str(&format!(
        r#"# (Textentry)
object TextentryClass
beginObjectProperties
major 10
minor 0
release 0
x {x}
y {y}
w 60
h 20
controlPv "{pv}"
fgColor index {fg_control}
fgAlarm
bgColor index {bg_control}
fill
font "{font}-bold-r-12.0"
endObjectProperties

"#
    ));
}

pub fn menu_button(out: &mut String, style: &EdlStyle, x: i32, y: i32, pv: &str, readback: &str) {
    let EdlStyle {
        font_class: font,
        fg_control,
        bg_control,
        ..
    } = style;
    out.push_str(&format!(
        r#"# (Menu Button)
object activeMenuButtonClass
beginObjectProperties
major 4
minor 0
release 0
x {x}
y {y}
w 125
h 20
fgColor index {fg_control}
bgColor index {bg_control}
inconsistentColor index 0
topShadowColor index 1
botShadowColor index 11
controlPv "{pv}"
indicatorPv "{readback}"
font "{font}-bold-r-12.0"
endObjectProperties

"#
    ));
}

/// Momentary button writing 1 to the given PV
pub fn message_button(out: &mut String, style: &EdlStyle, x: i32, y: i32, pv: &str, text: &str) {
    let EdlStyle {
        font_class: font,
        fg_control,
        ..
    } = style;
    out.push_str(&format!(
        r#"# (Message Button)
object activeMessageButtonClass
beginObjectProperties
major 4
minor 0
release 0
x {x}
y {y}
w 125
h 20
fgColor index {fg_control}
onColor index 3
offColor index 3
topShadowColor index 1
botShadowColor index 11
controlPv "{pv}"
pressValue "1"
onLabel "{text}"
offLabel "{text}"
3d
font "{font}-bold-r-12.0"
endObjectProperties

"#
    ));
}

pub fn exit_button(out: &mut String, style: &EdlStyle, x: i32, y: i32) {
    let font = &style.font_class;
    out.push_str(&format!(
        r#"# (Exit Button)
object activeExitButtonClass
beginObjectProperties
major 4
minor 1
release 0
x {x}
y {y}
w 95
h 25
fgColor index 46
bgColor index 3
topShadowColor index 1
botShadowColor index 11
label "EXIT"
font "{font}-bold-r-14.0"
3d
endObjectProperties
"#
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_update_uses_monitor_colours() {
        let mut out = String::new();
        text_update(&mut out, &EdlStyle::default(), 130, 55, 60, "$(P)$(R)GC_Gain_RBV");
        assert!(out.starts_with("# (Textupdate)\nobject TextupdateClass\n"));
        assert!(out.contains("x 130\ny 55\nw 60\nh 20\n"));
        assert!(out.contains("controlPv \"$(P)$(R)GC_Gain_RBV\"\n"));
        assert!(out.contains("fgColor index 16\n"));
        assert!(out.contains("bgColor index 10\n"));
    }

    #[test]
    fn test_help_button_symbols() {
        let mut out = String::new();
        let desc = [
            "Gain: ".to_string(),
            "''".to_string(),
            "''".to_string(),
            "''".to_string(),
            "''".to_string(),
            "''".to_string(),
        ];
        help_button(&mut out, &EdlStyle::default(), 10, 55, &desc);
        assert!(out.contains(
            "  0 \"desc0=Gain: ,desc1='',desc2='',desc3='',desc4='',desc5=''\"\n"
        ));
        assert!(out.contains("displayFileName {\n  0 \"aravisHelp\"\n}\n"));
    }

    #[test]
    fn test_caption_braces() {
        let mut out = String::new();
        section_caption(&mut out, &EdlStyle::default(), 5, 40, "AnalogControl");
        assert!(out.contains("value {\n  \"  AnalogControl  \"\n}\n"));
        assert!(out.contains("font \"arial-medium-r-12.0\""));
    }
}
