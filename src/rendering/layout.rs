//! Block layout for the built-in rasterizer

use crate::Viewport;
use scraper::{ElementRef, Html, Selector};

/// Width and height of one glyph cell at scale 1
pub const CELL: u32 = 8;

/// Horizontal page margin
const PAGE_MARGIN: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxModel {
    pub margin: u32,
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub rect: Rect,
    pub box_model: BoxModel,
}

impl LayoutBox {
    pub fn content_width(&self) -> u32 {
        self.rect.width.saturating_sub(self.box_model.padding * 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Title,
    Heading,
    Paragraph,
}

impl ElementType {
    fn scale(self) -> u32 {
        match self {
            ElementType::Title => 3,
            ElementType::Heading => 2,
            ElementType::Paragraph => 1,
        }
    }

    fn padding(self) -> u32 {
        match self {
            ElementType::Title => 8,
            ElementType::Heading | ElementType::Paragraph => 6,
        }
    }
}

/// A laid-out block: its box, the wrapped lines it shows and its glyph scale.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub lb: LayoutBox,
    pub lines: Vec<String>,
    pub elem_type: ElementType,
    pub scale: u32,
}

/// Greedy word wrap at `chars_per_line` (always at least one char)
pub fn wrap_text(text: &str, chars_per_line: usize) -> Vec<String> {
    let limit = chars_per_line.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        if !cur.is_empty() && cur.chars().count() + word.chars().count() + 1 > limit {
            lines.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

fn classify(name: &str) -> Option<ElementType> {
    match name {
        "h1" => Some(ElementType::Title),
        "h2" | "h3" | "h4" => Some(ElementType::Heading),
        "p" | "li" | "blockquote" | "figcaption" => Some(ElementType::Paragraph),
        _ => None,
    }
}

/// Compute a stacked block layout for the document at the given viewport.
///
/// Headings and paragraph-like elements become blocks in document order. When
/// the body has no `<h1>`, the `<title>` is used as the title block. Layout
/// stops once the next block would start below the viewport.
pub fn layout_document(document: &Html, viewport: Viewport) -> Vec<LayoutNode> {
    let mut blocks: Vec<(ElementType, String)> = Vec::new();

    if let Ok(sel) = Selector::parse("body h1, body h2, body h3, body h4, body p, body li, body blockquote, body figcaption") {
        for el in document.select(&sel) {
            if let Some(kind) = classify(el.value().name()) {
                let text = text_of(el);
                if !text.trim().is_empty() {
                    blocks.push((kind, text));
                }
            }
        }
    }

    if !blocks.iter().any(|(k, _)| *k == ElementType::Title) {
        let title = Selector::parse("title")
            .ok()
            .and_then(|sel| document.select(&sel).next().map(text_of))
            .unwrap_or_default();
        if !title.trim().is_empty() {
            blocks.insert(0, (ElementType::Title, title));
        }
    }

    let page_width = viewport.width.saturating_sub(PAGE_MARGIN * 2);
    let mut y = PAGE_MARGIN;
    let mut nodes = Vec::new();

    for (kind, text) in blocks {
        if y >= viewport.height {
            break;
        }
        let scale = kind.scale();
        let padding = kind.padding();
        let glyph = CELL * scale;
        let content_w = page_width.saturating_sub(padding * 2);
        let lines = wrap_text(&text, (content_w / glyph) as usize);
        let line_count = (lines.len() as u32).max(1);
        let box_h = line_count * glyph + padding * 2;
        let margin = padding;

        nodes.push(LayoutNode {
            lb: LayoutBox {
                rect: Rect {
                    x: PAGE_MARGIN as i32,
                    y: y as i32,
                    width: page_width,
                    height: box_h,
                },
                box_model: BoxModel { margin, padding },
            },
            lines,
            elem_type: kind,
            scale,
        });
        y += box_h + margin;
    }

    nodes
}
