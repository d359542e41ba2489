//! RGBA drawing surface used for figure composition.

/// RGBA color.
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

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

/// Fixed-size RGBA pixel buffer with simple drawing primitives.
///
/// All primitives clip to the canvas bounds, so callers may pass
/// coordinates that fall partly outside the surface.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let mut pixels = vec![0u8; width * height * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[0] = background.r;
            px[1] = background.g;
            px[2] = background.b;
            px[3] = background.a;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        self.pixels[idx] = color.r;
        self.pixels[idx + 1] = color.g;
        self.pixels[idx + 2] = color.b;
        self.pixels[idx + 3] = color.a;
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        })
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: usize, h: usize, color: Color) {
        for dy in 0..h as i64 {
            for dx in 0..w as i64 {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    pub fn hline(&mut self, y: i64, x0: i64, x1: i64, color: Color) {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in lo..=hi {
            self.set_pixel(x, y, color);
        }
    }

    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, color: Color) {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        for y in lo..=hi {
            self.set_pixel(x, y, color);
        }
    }

    /// One-pixel rectangle outline with the given corner and size.
    pub fn draw_rect_outline(&mut self, x: i64, y: i64, w: usize, h: usize, color: Color) {
        if w == 0 || h == 0 {
            return;
        }
        let x1 = x + w as i64 - 1;
        let y1 = y + h as i64 - 1;
        self.hline(y, x, x1, color);
        self.hline(y1, x, x1, color);
        self.vline(x, y, y1, color);
        self.vline(x1, y, y1, color);
    }

    /// Copies an RGBA source buffer onto the canvas at `(x, y)`.
    /// Regions falling outside the canvas are dropped.
    pub fn blit(&mut self, x: usize, y: usize, src: &[u8], src_w: usize, src_h: usize) {
        let rows = src_h.min(self.height.saturating_sub(y));
        let cols = src_w.min(self.width.saturating_sub(x));
        for row in 0..rows {
            let src_start = row * src_w * 4;
            let dst_start = ((y + row) * self.width + x) * 4;
            self.pixels[dst_start..dst_start + cols * 4]
                .copy_from_slice(&src[src_start..src_start + cols * 4]);
        }
    }

    /// Bresenham line clipped to the canvas.
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        let clip = (0, 0, self.width as i64 - 1, self.height as i64 - 1);
        self.draw_line_clipped(x0, y0, x1, y1, color, clip);
    }

    /// Bresenham line restricted to an inclusive `(x0, y0, x1, y1)` window.
    pub fn draw_line_clipped(
        &mut self,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        color: Color,
        clip: (i64, i64, i64, i64),
    ) {
        let (cx0, cy0, cx1, cy1) = clip;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            if x >= cx0 && x <= cx1 && y >= cy0 && y <= cy1 {
                self.set_pixel(x, y, color);
            }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_filled_with_background() {
        let canvas = Canvas::new(4, 3, Color::rgb(10, 20, 30));
        assert_eq!(canvas.pixels().len(), 4 * 3 * 4);
        assert_eq!(canvas.pixel(0, 0), Some(Color::rgb(10, 20, 30)));
        assert_eq!(canvas.pixel(3, 2), Some(Color::rgb(10, 20, 30)));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_ignored() {
        let mut canvas = Canvas::new(2, 2, Color::WHITE);
        canvas.set_pixel(-1, 0, Color::BLACK);
        canvas.set_pixel(0, -1, Color::BLACK);
        canvas.set_pixel(2, 0, Color::BLACK);
        canvas.set_pixel(0, 2, Color::BLACK);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(canvas.pixel(x, y), Some(Color::WHITE));
            }
        }
    }

    #[test]
    fn test_fill_rect_covers_expected_region() {
        let mut canvas = Canvas::new(5, 5, Color::WHITE);
        canvas.fill_rect(1, 1, 2, 3, Color::BLACK);
        assert_eq!(canvas.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(canvas.pixel(2, 3), Some(Color::BLACK));
        assert_eq!(canvas.pixel(3, 1), Some(Color::WHITE));
        assert_eq!(canvas.pixel(1, 4), Some(Color::WHITE));
    }

    #[test]
    fn test_draw_line_touches_both_endpoints() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.draw_line(1, 1, 8, 6, Color::BLACK);
        assert_eq!(canvas.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(canvas.pixel(8, 6), Some(Color::BLACK));
    }

    #[test]
    fn test_clipped_line_stays_inside_window() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.draw_line_clipped(0, 0, 9, 9, Color::BLACK, (3, 3, 6, 6));
        assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(canvas.pixel(9, 9), Some(Color::WHITE));
        assert_eq!(canvas.pixel(4, 4), Some(Color::BLACK));
    }

    #[test]
    fn test_blit_clamps_to_canvas_edges() {
        let mut canvas = Canvas::new(4, 4, Color::WHITE);
        let src = vec![0u8; 3 * 3 * 4];
        canvas.blit(2, 2, &src, 3, 3);
        assert_eq!(canvas.pixel(2, 2), Some(Color { r: 0, g: 0, b: 0, a: 0 }));
        assert_eq!(canvas.pixel(3, 3), Some(Color { r: 0, g: 0, b: 0, a: 0 }));
        assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
    }
}
