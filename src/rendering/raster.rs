//! Rasterizer: paint commands onto an RGBA canvas, then PNG

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use super::layout::CELL;
use super::paint::PaintCommand;
use crate::{Result, Viewport};

fn fill_rect(canvas: &mut RgbaImage, x: i32, y: i32, width: u32, height: u32, rgba: (u8, u8, u8, u8)) {
    let (cw, ch) = canvas.dimensions();
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = (x.saturating_add(width as i32)).clamp(0, cw as i32) as u32;
    let y1 = (y.saturating_add(height as i32)).clamp(0, ch as i32) as u32;
    let px = Rgba([rgba.0, rgba.1, rgba.2, rgba.3]);
    for py in y0..y1 {
        for pxx in x0..x1 {
            canvas.put_pixel(pxx, py, px);
        }
    }
}

/// Execute the display list on a canvas the size of the viewport.
///
/// Text is drawn as one solid block per visible character, inset by one
/// scaled pixel inside its glyph cell.
pub fn rasterize(commands: &[PaintCommand], viewport: Viewport) -> RgbaImage {
    let mut canvas = RgbaImage::new(viewport.width, viewport.height);
    for cmd in commands {
        match cmd {
            PaintCommand::SolidRect { x, y, width, height, rgba } => {
                fill_rect(&mut canvas, *x, *y, *width, *height, *rgba);
            }
            PaintCommand::Text { x, y, scale, text, rgba } => {
                let glyph = (CELL * scale) as i32;
                let inset = *scale as i32;
                let ink = CELL.saturating_sub(2) * scale;
                for (i, ch) in text.chars().enumerate() {
                    if ch.is_whitespace() {
                        continue;
                    }
                    let gx = x + glyph * i as i32 + inset;
                    fill_rect(&mut canvas, gx, y + inset, ink, ink, *rgba);
                }
            }
        }
    }
    canvas
}

/// Encode a canvas as PNG bytes
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    canvas.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::paint::{BLACK, WHITE};

    #[test]
    fn rasterize_fills_background_and_glyphs() {
        let v = Viewport { width: 64, height: 32 };
        let cmds = vec![
            PaintCommand::SolidRect { x: 0, y: 0, width: 64, height: 32, rgba: WHITE },
            PaintCommand::Text { x: 0, y: 0, scale: 1, text: "a b".into(), rgba: BLACK },
        ];
        let img = rasterize(&cmds, v);
        assert_eq!(img.dimensions(), (64, 32));
        // first glyph ink
        assert_eq!(img.get_pixel(2, 2), &Rgba([0, 0, 0, 255]));
        // the space cell stays background
        assert_eq!(img.get_pixel(10, 2), &Rgba([255, 255, 255, 255]));
        // third cell is inked
        assert_eq!(img.get_pixel(18, 2), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn rects_are_clipped_to_canvas() {
        let v = Viewport { width: 4, height: 4 };
        let cmds = vec![PaintCommand::SolidRect { x: -10, y: 2, width: 100, height: 100, rgba: BLACK }];
        let img = rasterize(&cmds, v);
        assert_eq!(img.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn encode_png_has_signature() {
        let png = encode_png(&RgbaImage::new(3, 3)).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }
}
