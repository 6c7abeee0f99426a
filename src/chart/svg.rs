use super::{Chart, Primitive, TextAnchor};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

const FONT_FAMILY: &str = "Helvetica";
const FONT_SIZE: u32 = 14;

/// SVG rendering of a [`Chart`]. Bar tooltips become `<title>` elements.
pub struct Svg<'a>(pub &'a Chart);

impl fmt::Display for Svg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.0;
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = chart.width,
            h = chart.height
        )?;
        writeln!(
            f,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            escape(&chart.background)
        )?;

        for primitive in &chart.primitives {
            match primitive {
                Primitive::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                } => writeln!(
                    f,
                    r#"  <line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}"/>"#,
                    escape(color)
                )?,
                Primitive::Text {
                    x,
                    y,
                    text,
                    anchor,
                    color,
                } => {
                    let anchor = match anchor {
                        TextAnchor::Start => "start",
                        TextAnchor::Middle => "middle",
                    };
                    writeln!(
                        f,
                        r#"  <text x="{x}" y="{y}" text-anchor="{anchor}" dominant-baseline="middle" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE}" fill="{}">{}</text>"#,
                        escape(color),
                        escape(text)
                    )?
                }
                Primitive::Bar {
                    task_id,
                    x,
                    y,
                    width,
                    height,
                    fill,
                    outline,
                    tooltip,
                } => writeln!(
                    f,
                    r#"  <rect data-task-id="{task_id}" x="{x}" y="{y}" width="{width}" height="{height}" fill="{}" stroke="{}"><title>{}</title></rect>"#,
                    escape(fill),
                    escape(outline),
                    escape(tooltip)
                )?,
            }
        }

        writeln!(f, "</svg>")
    }
}

pub fn write_svg<P: AsRef<Path>>(chart: &Chart, path: P) -> std::io::Result<()> {
    std::fs::write(path, chart.to_svg())
}

fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
