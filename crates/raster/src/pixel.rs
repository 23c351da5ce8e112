//! CPU pixel buffer that implements [`Surface`].
//!
//! Colors are kept premultiplied in `f32` and blended source-over, the way a
//! canvas 2D context composites by default. Alpha is clamped to [0, 1] when a
//! draw call is rasterized, so the simulator can hand over unclamped line
//! opacities exactly as it computes them.

use particle_field_core::{DVec2, Rgba, Srgb, Surface};

/// Distance between line samples, in pixels.
const LINE_SAMPLE_STEP: f64 = 0.5;

/// RGBA pixel buffer, premultiplied, row-major from the top-left corner.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<[f32; 4]>,
    /// Per-row `(x0, x1)` coverage of the line being stroked, kept between
    /// calls so the connection pass does not allocate per line.
    row_spans: Vec<(i64, i64)>,
}

impl Pixmap {
    /// A transparent `width` × `height` pixmap. Zero sizes are allowed and
    /// simply have no pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 4]; width as usize * height as usize],
            row_spans: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Straight-alpha RGBA8 value at (x, y), or `None` outside the pixmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(unpremultiply(self.data[self.index(x, y)]))
    }

    /// Straight-alpha RGBA8 buffer, `width * height * 4` bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|&px| unpremultiply(px)).collect()
    }

    /// Composites the pixmap over an opaque background and returns RGBA8 with
    /// alpha 255 everywhere.
    pub fn flatten(&self, background: Srgb) -> Vec<u8> {
        let bg = [background.r as f32, background.g as f32, background.b as f32];
        self.data
            .iter()
            .flat_map(|px| {
                let keep = 1.0 - px[3];
                [
                    to_u8(px[0] + bg[0] * keep),
                    to_u8(px[1] + bg[1] * keep),
                    to_u8(px[2] + bg[2] * keep),
                    255,
                ]
            })
            .collect()
    }

    /// Number of pixels with any coverage.
    pub fn painted_pixels(&self) -> usize {
        self.data.iter().filter(|px| px[3] > 0.0).count()
    }

    /// Pixel columns `[x0, x1]` clipped to the pixmap; empty when `x0 > x1`.
    fn clip_x(&self, x0: i64, x1: i64) -> (i64, i64) {
        (x0.max(0), x1.min(self.width as i64 - 1))
    }

    fn clip_y(&self, y0: i64, y1: i64) -> (i64, i64) {
        (y0.max(0), y1.min(self.height as i64 - 1))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Source-over blend of `color` into (x, y); out-of-range pixels are ignored.
    fn blend(&mut self, x: i64, y: i64, color: [f32; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = self.index(x as u32, y as u32);
        let dst = &mut self.data[i];
        let keep = 1.0 - color[3];
        for (d, s) in dst.iter_mut().zip(color) {
            *d = s + *d * keep;
        }
    }
}

impl Surface for Pixmap {
    fn resize(&mut self, width: u32, height: u32) {
        *self = Pixmap::new(width, height);
    }

    fn clear(&mut self) {
        self.data.fill([0.0; 4]);
    }

    /// Covers every pixel whose center lies inside the circle.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let Some(src) = premultiply(color) else {
            return;
        };
        if !(radius > 0.0) {
            return;
        }
        let r2 = radius * radius;
        let (x0, x1) = self.clip_x(
            (center.x - radius).floor() as i64,
            (center.x + radius).ceil() as i64,
        );
        let (y0, y1) = self.clip_y(
            (center.y - radius).floor() as i64,
            (center.y + radius).ceil() as i64,
        );
        for y in y0..=y1 {
            for x in x0..=x1 {
                let px = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if px.distance_squared(center) <= r2 {
                    self.blend(x, y, src);
                }
            }
        }
    }

    /// Sweeps a square brush of side `max(width, 1)` along the segment; each
    /// pixel is blended at most once per line. Zero-length lines draw nothing,
    /// as with a canvas context's default butt caps.
    ///
    /// Consecutive brush positions overlap, so the covered pixels of any row
    /// form one run; only its ends are tracked.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        let Some(src) = premultiply(color) else {
            return;
        };
        let length = from.distance(to);
        if !(length > f64::EPSILON) {
            return;
        }
        let half = width.max(1.0) / 2.0;
        let (top, _) = brush_span(from.y.min(to.y), half);
        let (_, bottom) = brush_span(from.y.max(to.y), half);
        let (top, bottom) = self.clip_y(top, bottom);
        if top > bottom {
            return;
        }

        let mut rows = std::mem::take(&mut self.row_spans);
        rows.clear();
        rows.resize((bottom - top + 1) as usize, (i64::MAX, i64::MIN));
        let steps = (length / LINE_SAMPLE_STEP).ceil() as usize;
        for i in 0..=steps {
            let p = from.lerp(to, i as f64 / steps as f64);
            let (x0, x1) = brush_span(p.x, half);
            let (y0, y1) = brush_span(p.y, half);
            for y in y0.max(top)..=y1.min(bottom) {
                let run = &mut rows[(y - top) as usize];
                run.0 = run.0.min(x0);
                run.1 = run.1.max(x1);
            }
        }
        for (y, &(x0, x1)) in (top..).zip(rows.iter()) {
            let (x0, x1) = self.clip_x(x0, x1);
            for x in x0..=x1 {
                self.blend(x, y, src);
            }
        }
        self.row_spans = rows;
    }
}

/// Pixel indices whose centers fall within `[c - half, c + half]`.
fn brush_span(c: f64, half: f64) -> (i64, i64) {
    ((c - half - 0.5).ceil() as i64, (c + half - 0.5).floor() as i64)
}

/// Premultiplied color with clamped alpha; `None` when fully transparent.
fn premultiply(color: Rgba) -> Option<[f32; 4]> {
    let a = color.clamped_alpha() as f32;
    if a <= 0.0 {
        return None;
    }
    Some([
        color.r as f32 / 255.0 * a,
        color.g as f32 / 255.0 * a,
        color.b as f32 / 255.0 * a,
        a,
    ])
}

fn unpremultiply(px: [f32; 4]) -> [u8; 4] {
    let a = px[3];
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    [to_u8(px[0] / a), to_u8(px[1] / a), to_u8(px[2] / a), to_u8(a)]
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
