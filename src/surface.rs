// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn opaque(self) -> Rgba {
        Rgba(self, 255)
    }

    pub const fn with_alpha(self, alpha: u8) -> Rgba {
        Rgba(self, alpha)
    }
}

/// A colour plus coverage. Anything below 255 is blended over what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub Rgb, pub u8);

impl Rgba {
    fn over(self, dst: Rgb) -> Rgb {
        match self.1 {
            255 => self.0,
            0 => dst,
            a => Rgb::lerp(dst, self.0, (a as u16 * 256) / 255),
        }
    }
}

// ── Text ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    /// Nominal size in surface units.
    pub size: u16,
    pub bold: bool,
    pub align: Align,
}

impl Font {
    pub const fn new(size: u16) -> Self {
        Self {
            size,
            bold: false,
            align: Align::Center,
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub const fn align(self, align: Align) -> Self {
        Self { align, ..self }
    }
}

/// A string anchored at `(x, y)`, where `y` is the baseline and `x` is interpreted by `font.align`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: Font,
    pub color: Rgba,
}

// ── Surface ─────────────────────────────────────────────────────────────────

/// The drawing capabilities the game needs. Coordinates are surface units with the origin
/// at the top left.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba);
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Rgba);
    fn fill_triangle(&mut self, a: (f64, f64), b: (f64, f64), c: (f64, f64), color: Rgba);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, color: Rgba);
}

// ── Pixel buffer ────────────────────────────────────────────────────────────

const CLEAR: Rgb = Rgb(0, 0, 0);

/// In-memory surface: an RGB grid plus the text drawn on top of it, in draw order.
///
/// Text is kept as runs instead of being rasterised so the presenter can print real glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
    texts: Vec<TextRun>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![CLEAR; w * h],
            texts: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    fn blend(&mut self, x: i32, y: i32, c: Rgba) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            let i = y as usize * self.w + x as usize;
            self.px[i] = c.over(self.px[i]);
        }
    }

    /// Visits the pixels whose centres fall inside `[x0, x1) x [y0, y1)`, clipped to the buffer.
    fn span(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> (i32, i32, i32, i32) {
        let clip = |v: f64, max: usize| (v - 0.5).ceil().clamp(0.0, max as f64) as i32;
        (
            clip(x0, self.w),
            clip(y0, self.h),
            clip(x1, self.w),
            clip(y1, self.h),
        )
    }
}

impl Surface for PixelBuf {
    fn size(&self) -> (u32, u32) {
        (self.w as u32, self.h as u32)
    }

    fn clear(&mut self) {
        self.px.fill(CLEAR);
        self.texts.clear();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, c: Rgba) {
        let (x0, y0, x1, y1) = self.span(x, y, x + w, y + h);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, c);
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, c: Rgba) {
        let (x0, y0, x1, y1) = self.span(cx - r, cy - r, cx + r, cy + r);
        let r2 = r * r;
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, c);
                }
            }
        }
    }

    fn fill_triangle(&mut self, a: (f64, f64), b: (f64, f64), c: (f64, f64), color: Rgba) {
        let edge = |p: (f64, f64), q: (f64, f64), x: f64, y: f64| {
            (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
        };
        let area = edge(a, b, c.0, c.1);
        if area == 0.0 {
            return;
        }

        let (x0, y0, x1, y1) = self.span(
            a.0.min(b.0).min(c.0),
            a.1.min(b.1).min(c.1),
            a.0.max(b.0).max(c.0),
            a.1.max(b.1).max(c.1),
        );
        for py in y0..y1 {
            for px in x0..x1 {
                let (x, y) = (px as f64 + 0.5, py as f64 + 0.5);
                // Same sign as the winding for all three edges means inside.
                let w0 = edge(b, c, x, y) * area;
                let w1 = edge(c, a, x, y) * area;
                let w2 = edge(a, b, x, y) * area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, color: Rgba) {
        self.texts.push(TextRun {
            text: text.to_owned(),
            x,
            y,
            font,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgb(255, 0, 0).opaque();

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut buf = PixelBuf::new(4, 4);
        buf.fill_rect(-2.0, 2.0, 10.0, 10.0, RED);
        assert_eq!(buf.get(0, 1), CLEAR);
        assert_eq!(buf.get(0, 2), RED.0);
        assert_eq!(buf.get(3, 3), RED.0);
    }

    #[test]
    fn test_fill_rect_covers_exact_integer_area() {
        let mut buf = PixelBuf::new(8, 8);
        buf.fill_rect(2.0, 3.0, 2.0, 1.0, RED);
        let lit: Vec<(usize, usize)> = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get(x, y) == RED.0)
            .collect();
        assert_eq!(lit, vec![(2, 3), (3, 3)]);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut buf = PixelBuf::new(1, 1);
        buf.fill_rect(0.0, 0.0, 1.0, 1.0, Rgb(200, 100, 0).opaque());
        buf.fill_rect(0.0, 0.0, 1.0, 1.0, Rgb(0, 0, 0).with_alpha(128));
        let Rgb(r, g, b) = buf.get(0, 0);
        assert!((99..=101).contains(&r), "r = {r}");
        assert!((49..=51).contains(&g), "g = {g}");
        assert_eq!(b, 0);
    }

    #[test]
    fn test_circle_is_round() {
        let mut buf = PixelBuf::new(21, 21);
        buf.fill_circle(10.5, 10.5, 5.0, RED);
        assert_eq!(buf.get(10, 10), RED.0);
        assert_eq!(buf.get(10, 6), RED.0);
        assert_eq!(buf.get(6, 6), CLEAR);
        assert_eq!(buf.get(16, 10), CLEAR);
    }

    #[test]
    fn test_triangle_either_winding() {
        for (a, b, c) in [
            ((0.0, 0.0), (8.0, 0.0), (0.0, 8.0)),
            ((0.0, 0.0), (0.0, 8.0), (8.0, 0.0)),
        ] {
            let mut buf = PixelBuf::new(8, 8);
            buf.fill_triangle(a, b, c, RED);
            assert_eq!(buf.get(1, 1), RED.0);
            assert_eq!(buf.get(7, 7), CLEAR);
        }
    }

    #[test]
    fn test_clear_drops_pixels_and_text() {
        let mut buf = PixelBuf::new(2, 2);
        buf.fill_rect(0.0, 0.0, 2.0, 2.0, RED);
        buf.fill_text("hi", 1.0, 1.0, Font::new(12), RED);
        assert_eq!(buf.texts().len(), 1);

        buf.clear();
        assert_eq!(buf, PixelBuf::new(2, 2));
    }
}
