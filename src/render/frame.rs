//! RGBA frame buffer and drawing primitives
//!
//! One buffer per frame, width and height fixed for the session. A pixel is
//! four bytes (r, g, b, a) at offset `(y * width + x) * 4`. All primitives
//! clip silently at the buffer edges.

/// RGBA color, straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    /// Parse a palette name or `#rrggbb` hex string
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "yellow" => Some(Color::YELLOW),
            "red" => Some(Color::RED),
            "green" => Some(Color::GREEN),
            "cyan" => Some(Color::CYAN),
            "orange" => Some(Color::ORANGE),
            "gray" | "grey" => Some(Color::GRAY),
            hex => {
                let hex = hex.strip_prefix('#')?;
                // length alone is not enough: slicing a 6-byte value with
                // multi-byte characters would panic mid-codepoint
                if hex.len() != 6 || !hex.is_ascii() {
                    return None;
                }
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
        }
    }
}

/// Owned RGBA8 image buffer
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// New opaque black buffer
    pub fn new(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        for pixel in data.chunks_exact_mut(4) {
            pixel[3] = 255;
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.offset(x, y).map(|o| Color {
            r: self.data[o],
            g: self.data[o + 1],
            b: self.data[o + 2],
            a: self.data[o + 3],
        })
    }

    /// Write one pixel, ignoring the source alpha (direct store)
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(o) = self.offset(x, y) {
            self.data[o] = color.r;
            self.data[o + 1] = color.g;
            self.data[o + 2] = color.b;
            self.data[o + 3] = color.a;
        }
    }

    /// Source-over blend of one pixel by the color's alpha
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if color.a == 255 {
            self.set_pixel(x, y, color);
            return;
        }
        if color.a == 0 {
            return;
        }
        if let Some(o) = self.offset(x, y) {
            let a = color.a as u32;
            let inv = 255 - a;
            self.data[o] = ((color.r as u32 * a + self.data[o] as u32 * inv) / 255) as u8;
            self.data[o + 1] = ((color.g as u32 * a + self.data[o + 1] as u32 * inv) / 255) as u8;
            self.data[o + 2] = ((color.b as u32 * a + self.data[o + 2] as u32 * inv) / 255) as u8;
            self.data[o + 3] = 255;
        }
    }

    pub fn fill(&mut self, color: Color) {
        for pixel in self.data.chunks_exact_mut(4) {
            pixel[0] = color.r;
            pixel[1] = color.g;
            pixel[2] = color.b;
            pixel[3] = color.a;
        }
    }

    /// Filled rectangle, alpha-blended and clipped
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let x_end = x.saturating_add(width as i32);
        let y_end = y.saturating_add(height as i32);
        for py in y.max(0)..y_end.min(self.height as i32) {
            for px in x.max(0)..x_end.min(self.width as i32) {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Rectangle outline of the given thickness, drawn inward
    pub fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color, thickness: u32) {
        let t = thickness.min(width / 2 + 1).min(height / 2 + 1);
        // top and bottom bands
        self.fill_rect(x, y, width, t, color);
        self.fill_rect(x, y + height as i32 - t as i32, width, t, color);
        // left and right bands
        self.fill_rect(x, y, t, height, color);
        self.fill_rect(x + width as i32 - t as i32, y, t, height, color);
    }

    /// Line from (x0, y0) to (x1, y1), fast paths for axis-aligned lines,
    /// Bresenham otherwise
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if y0 == y1 {
            for x in x0.min(x1)..=x0.max(x1) {
                self.blend_pixel(x, y0, color);
            }
            return;
        }
        if x0 == x1 {
            for y in y0.min(y1)..=y0.max(y1) {
                self.blend_pixel(x0, y, color);
            }
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.blend_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Binary PPM (P6) encoding, alpha discarded
    pub fn to_ppm_bytes(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.data.len() / 4 * 3);
        out.extend_from_slice(header.as_bytes());
        for pixel in self.data.chunks_exact(4) {
            out.extend_from_slice(&pixel[..3]);
        }
        out
    }
}
