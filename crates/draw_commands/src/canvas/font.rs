use font8x8::{
    UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, HIRAGANA_FONTS, LATIN_FONTS,
    MISC_FONTS, SGA_FONTS,
};
use image::{Rgb, RgbImage};

use super::raster::{coord, fill_block};

pub const GLYPH_SIZE: i64 = 8;
const MAX_SCALE: i64 = 64;

fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| BLOCK_FONTS.get(c))
        .or_else(|| HIRAGANA_FONTS.get(c))
        .or_else(|| MISC_FONTS.get(c))
        .or_else(|| SGA_FONTS.get(c))
}

pub fn scale_for(font_size: f64) -> i64 {
    if !font_size.is_finite() {
        return 1;
    }
    ((font_size / GLYPH_SIZE as f64).round() as i64).clamp(1, MAX_SCALE)
}

/// Draw `text` with its top-left corner at `at`. Returns how many glyphs were
/// found; characters without a glyph still advance the pen.
pub(crate) fn draw(img: &mut RgbImage, at: (f64, f64), text: &str, font_size: f64, color: Rgb<u8>) -> usize {
    let scale = scale_for(font_size);
    let advance = GLYPH_SIZE * scale;
    let left = coord(at.0);
    let mut pen_x = left;
    let mut top = coord(at.1);
    let mut drawn = 0usize;

    for c in text.chars() {
        if c == '\n' {
            pen_x = left;
            top = top.saturating_add(advance + scale);
            continue;
        }
        if let Some(rows) = glyph(c) {
            for (row_idx, row) in rows.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if row & (1 << col) != 0 {
                        let x = pen_x.saturating_add(col * scale);
                        let y = top.saturating_add(row_idx as i64 * scale);
                        fill_block(img, x, y, scale, color);
                    }
                }
            }
            drawn += 1;
        }
        pen_x = pen_x.saturating_add(advance);
    }
    drawn
}
