//! Built-in 5x7 bitmap font
//!
//! Covers uppercase ASCII, digits and the punctuation the overlays need;
//! lowercase input folds to uppercase, unknown glyphs render as a hollow
//! box. Each glyph row is a 5-bit mask, most significant bit leftmost.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::render::frame::{Color, FrameBuffer};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character at scale 1, including spacing
pub const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

type Glyph = [u8; 7];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    let table: &[(char, Glyph)] = &[
        (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
        ('A', [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
        ('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
        ('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
        ('D', [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E]),
        ('E', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
        ('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
        ('G', [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
        ('H', [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
        ('I', [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
        ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
        ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
        ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
        ('M', [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
        ('N', [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
        ('O', [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
        ('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
        ('Q', [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
        ('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
        ('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
        ('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
        ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
        ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
        ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
        ('X', [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
        ('Y', [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04]),
        ('Z', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
        ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
        ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
        ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
        ('3', [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
        ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
        ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
        ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
        ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
        ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
        ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
        ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
        (',', [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08]),
        (':', [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]),
        ('-', [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
        ('+', [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00]),
        ('_', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F]),
        ('/', [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10]),
        ('%', [0x19, 0x1A, 0x02, 0x04, 0x08, 0x0B, 0x13]),
        ('(', [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02]),
        (')', [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08]),
        ('[', [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E]),
        (']', [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E]),
        ('<', [0x01, 0x02, 0x04, 0x08, 0x04, 0x02, 0x01]),
        ('>', [0x10, 0x08, 0x04, 0x02, 0x04, 0x08, 0x10]),
        ('=', [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00]),
        ('*', [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00]),
        ('\'', [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00]),
        ('!', [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]),
        ('?', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04]),
        ('|', [0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ];
    table.iter().copied().collect()
});

// Hollow box for characters outside the table
const FALLBACK: Glyph = [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F];

fn glyph_for(c: char) -> &'static Glyph {
    let folded = c.to_ascii_uppercase();
    GLYPHS.get(&folded).unwrap_or(&FALLBACK)
}

/// Pixel width of `text` at the given integer scale
pub fn text_width(text: &str, scale: u32) -> u32 {
    let count = text.chars().count() as u32;
    if count == 0 {
        return 0;
    }
    (count * GLYPH_ADVANCE - 1) * scale
}

/// Pixel height of one text line at the given integer scale
pub fn text_height(scale: u32) -> u32 {
    GLYPH_HEIGHT * scale
}

impl FrameBuffer {
    /// Draw `text` with its top-left corner at (x, y)
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32, color: Color) {
        let scale = scale.max(1);
        let mut pen_x = x;
        for c in text.chars() {
            let glyph = glyph_for(c);
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0x10 >> col) != 0 {
                        let px = pen_x + (col * scale) as i32;
                        let py = y + (row as u32 * scale) as i32;
                        self.fill_rect(px, py, scale, scale, color);
                    }
                }
            }
            pen_x += (GLYPH_ADVANCE * scale) as i32;
        }
    }

    /// Draw `text` horizontally centered on `center_x`
    pub fn draw_text_centered(&mut self, text: &str, center_x: i32, y: i32, scale: u32, color: Color) {
        let x = center_x - (text_width(text, scale) / 2) as i32;
        self.draw_text(text, x, y, scale, color);
    }
}
