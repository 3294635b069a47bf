//! Paint commands and the minimal styling the rasterizer understands

use super::layout::LayoutNode;
use crate::Viewport;
use scraper::{Html, Selector};

pub type Rgba = (u8, u8, u8, u8);

pub const WHITE: Rgba = (255, 255, 255, 255);
pub const BLACK: Rgba = (0, 0, 0, 255);

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: Rgba,
    },
    Text {
        x: i32,
        y: i32,
        scale: u32,
        text: String,
        rgba: Rgba,
    },
}

/// Page colors taken from inline `style` attributes on `<html>`/`<body>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageStyle {
    pub background: Rgba,
    pub color: Rgba,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            background: WHITE,
            color: BLACK,
        }
    }
}

/// Parse `#rgb`, `#rrggbb` or a handful of named colors
pub fn parse_color(value: &str) -> Option<Rgba> {
    let v = value.trim().to_ascii_lowercase();
    if let Some(hex) = v.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        return match digits.as_slice() {
            [r, g, b] => Some((r * 17, g * 17, b * 17, 255)),
            [r1, r2, g1, g2, b1, b2] => Some((r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255)),
            _ => None,
        };
    }
    match v.as_str() {
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "red" => Some((255, 0, 0, 255)),
        "green" => Some((0, 128, 0, 255)),
        "blue" => Some((0, 0, 255, 255)),
        "gray" | "grey" => Some((128, 128, 128, 255)),
        _ => None,
    }
}

/// Look up one declaration in an inline style string
fn declaration<'a>(style: &'a str, property: &str) -> Option<&'a str> {
    style.split(';').find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        (name.trim().eq_ignore_ascii_case(property)).then_some(value.trim())
    })
}

/// Resolve page colors; `<body>` wins over `<html>`.
pub fn page_style(document: &Html) -> PageStyle {
    let mut style = PageStyle::default();
    for tag in ["html", "body"] {
        let Ok(sel) = Selector::parse(tag) else { continue };
        let Some(inline) = document.select(&sel).next().and_then(|el| el.value().attr("style")) else {
            continue;
        };
        if let Some(bg) = declaration(inline, "background-color")
            .or_else(|| declaration(inline, "background"))
            .and_then(parse_color)
        {
            style.background = bg;
        }
        if let Some(fg) = declaration(inline, "color").and_then(parse_color) {
            style.color = fg;
        }
    }
    style
}

/// Turn a layout into paint commands: one background fill, then text runs.
pub fn build_display_list(nodes: &[LayoutNode], style: PageStyle, viewport: Viewport) -> Vec<PaintCommand> {
    let mut cmds = vec![PaintCommand::SolidRect {
        x: 0,
        y: 0,
        width: viewport.width,
        height: viewport.height,
        rgba: style.background,
    }];

    for node in nodes {
        let glyph = super::layout::CELL * node.scale;
        let x = node.lb.rect.x + node.lb.box_model.padding as i32;
        let mut y = node.lb.rect.y + node.lb.box_model.padding as i32;
        for line in &node.lines {
            cmds.push(PaintCommand::Text {
                x,
                y,
                scale: node.scale,
                text: line.clone(),
                rgba: style.color,
            });
            y += glyph as i32;
        }
    }

    cmds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_forms() {
        assert_eq!(parse_color("#fff"), Some(WHITE));
        assert_eq!(parse_color("#0A1b2C"), Some((10, 27, 44, 255)));
        assert_eq!(parse_color("Black"), Some(BLACK));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("rebeccapurple"), None);
    }

    #[test]
    fn body_style_overrides_html() {
        let doc = Html::parse_document(
            r#"<html style="background:#000"><body style="background-color: #102030; color: white"></body></html>"#,
        );
        let style = page_style(&doc);
        assert_eq!(style.background, (16, 32, 48, 255));
        assert_eq!(style.color, WHITE);
    }

    #[test]
    fn display_list_starts_with_background() {
        let v = Viewport { width: 10, height: 10 };
        let cmds = build_display_list(&[], PageStyle::default(), v);
        match &cmds[0] {
            PaintCommand::SolidRect { width, height, rgba, .. } => {
                assert_eq!((*width, *height, *rgba), (10, 10, WHITE));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
