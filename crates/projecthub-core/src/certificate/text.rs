//! Bitmap text drawing onto an RGB canvas
//!
//! Glyphs come from the 8x8 `font8x8` tables and are scaled with
//! nearest-neighbour sampling, so output depends only on the text, the font
//! size and the position. Pixels falling outside the canvas are clipped.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

use super::layout::Font;

/// Glyph rows above the baseline; the last row holds descenders
const ROWS_ABOVE_BASELINE: u32 = 7;

/// Glyph used for characters the font tables do not cover
const REPLACEMENT: char = '?';

/// Side of the square cell one glyph is scaled into
pub fn cell_size(font: Font) -> u32 {
    (font.size * 3 / 5).max(8)
}

fn bold_offset(font: Font) -> u32 {
    if font.bold { (cell_size(font) / 10).max(1) } else { 0 }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get(REPLACEMENT))
        .unwrap_or([0; 8])
}

/// Width in pixels of a rendered string
pub fn text_width(text: &str, font: Font) -> u32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return 0;
    }
    chars * cell_size(font) + bold_offset(font)
}

/// Draw `text` horizontally centred on the canvas with its baseline at `baseline`
pub fn draw_centered(canvas: &mut RgbImage, text: &str, font: Font, baseline: u32, color: Rgb<u8>) {
    let left = (i64::from(canvas.width()) - i64::from(text_width(text, font))) / 2;
    draw_text(canvas, text, font, left, baseline, color);
}

/// Draw `text` starting at `left` with its baseline at `baseline`
pub fn draw_text(
    canvas: &mut RgbImage,
    text: &str,
    font: Font,
    left: i64,
    baseline: u32,
    color: Rgb<u8>,
) {
    let cell = cell_size(font);
    let top = i64::from(baseline) - i64::from(cell * ROWS_ABOVE_BASELINE / 8);
    let smear = bold_offset(font);

    for (index, c) in text.chars().enumerate() {
        let rows = glyph(c);
        let origin_x = left + index as i64 * i64::from(cell);

        for dy in 0..cell {
            let bits = rows[(dy * 8 / cell) as usize];
            if bits == 0 {
                continue;
            }
            for dx in 0..cell {
                let column = dx * 8 / cell;
                if bits & (1 << column) == 0 {
                    continue;
                }
                for extra in 0..=smear {
                    put(
                        canvas,
                        origin_x + i64::from(dx + extra),
                        top + i64::from(dy),
                        color,
                    );
                }
            }
        }
    }
}

/// Fill the axis-aligned rectangle `[x0, x1) x [y0, y1)`, clipped to the canvas
pub fn fill_rect(canvas: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(canvas.width());
    let y1 = y1.min(canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}

fn put(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < canvas.width() && y < canvas.height() {
        canvas.put_pixel(x, y, color);
    }
}
