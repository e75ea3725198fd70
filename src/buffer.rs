use crate::blend::BlendMode;

/// Axis-aligned pixel rectangle, shared by source and destination sides of
/// every blit. Coordinates may be negative or overhang the buffer; blits
/// clamp rather than fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn clamped(self, buf_w: u32, buf_h: u32) -> Option<Rect> {
        let bw = buf_w as i32;
        let bh = buf_h as i32;
        let x0 = self.x.clamp(0, bw);
        let y0 = self.y.clamp(0, bh);
        let x1 = self.x.saturating_add(self.width.max(0)).clamp(0, bw);
        let y1 = self.y.saturating_add(self.height.max(0)).clamp(0, bh);
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// RGBA8 pixel buffer at fixed density 1; coordinate math is exact.
#[derive(Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let mut buf = Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        };
        buf.clear_black();
        buf
    }

    pub fn from_rgba(width: u32, height: u32, mut pixels: Vec<u8>) -> Self {
        pixels.resize(width as usize * height as usize * 4, 0);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Read one pixel, clamping coordinates to the buffer edge.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let i = self.idx(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.idx(x, y);
        self.pixels[i..i + 4].copy_from_slice(&px);
    }

    pub fn fill(&mut self, r: u8, g: u8, b: u8) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = r;
            px[1] = g;
            px[2] = b;
            px[3] = 255;
        }
    }

    pub fn clear_black(&mut self) {
        self.fill(0, 0, 0);
    }

    /// Composite `src` onto this buffer at `(offset_x, offset_y)` with the
    /// given blend mode. Out-of-range rows and columns are skipped.
    pub fn composite(&mut self, src: &PixelBuffer, offset_x: i32, offset_y: i32, mode: BlendMode) {
        for sy in 0..src.height {
            let dy = offset_y + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width {
                let dx = offset_x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let d = self.pixel(dx as u32, dy as u32);
                let s = src.pixel(sx, sy);
                self.put_pixel(dx as u32, dy as u32, mode.mix_px(d, s));
            }
        }
    }

    /// Self-referential blit: copy `src_rect` of this buffer into its own
    /// `dest_rect`. The source region is snapshotted first so overlapping
    /// rects read pre-blit pixels.
    pub fn copy_region_within(&mut self, src_rect: Rect, dest_rect: Rect) {
        let Some(s) = src_rect.clamped(self.width, self.height) else {
            return;
        };
        let Some(d) = dest_rect.clamped(self.width, self.height) else {
            return;
        };

        let row_len = s.width as usize * 4;
        let mut snap = vec![0u8; s.height as usize * row_len];
        for j in 0..s.height {
            let i = self.idx(s.x as u32, (s.y + j) as u32);
            snap[j as usize * row_len..(j as usize + 1) * row_len]
                .copy_from_slice(&self.pixels[i..i + row_len]);
        }

        for j in 0..d.height {
            let sy = (j as i64 * s.height as i64 / d.height as i64) as usize;
            for i in 0..d.width {
                let sx = (i as i64 * s.width as i64 / d.width as i64) as usize;
                let at = sy * row_len + sx * 4;
                let px = [snap[at], snap[at + 1], snap[at + 2], snap[at + 3]];
                self.put_pixel((d.x + i) as u32, (d.y + j) as u32, px);
            }
        }
    }
}

/// The scanline blit primitive shared by all distortion algorithms.
///
/// Copies `src_rect` of `src` into `dest_rect` of `dest`. Rects are clamped
/// to buffer extents; when the clamped sizes differ the source region is
/// nearest-neighbour resampled to fill the destination exactly, which keeps
/// the result deterministic for a fixed input.
pub fn copy_region(src: &PixelBuffer, src_rect: Rect, dest: &mut PixelBuffer, dest_rect: Rect) {
    let Some(s) = src_rect.clamped(src.width, src.height) else {
        return;
    };
    let Some(d) = dest_rect.clamped(dest.width, dest.height) else {
        return;
    };

    if s.width == d.width && s.height == d.height {
        // Equal-size fast path: straight row copies.
        let row_len = s.width as usize * 4;
        for j in 0..s.height {
            let si = src.idx(s.x as u32, (s.y + j) as u32);
            let di = dest.idx(d.x as u32, (d.y + j) as u32);
            dest.pixels[di..di + row_len].copy_from_slice(&src.pixels[si..si + row_len]);
        }
        return;
    }

    for j in 0..d.height {
        let sy = s.y + (j as i64 * s.height as i64 / d.height as i64) as i32;
        for i in 0..d.width {
            let sx = s.x + (i as i64 * s.width as i64 / d.width as i64) as i32;
            let px = src.pixel(sx as u32, sy as u32);
            dest.put_pixel((d.x + i) as u32, (d.y + j) as u32, px);
        }
    }
}
