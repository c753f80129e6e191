use egui::{Color32, Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage, imageops};

use crate::geometry::{rotated_bounds, world_to_local};

/// How a mark combines with the pixels already on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    /// Paint on top
    SourceOver,
    /// Remove alpha where the mark covers
    DestinationOut,
}

/// An RGBA pixel buffer at canvas resolution (straight, not premultiplied,
/// alpha). A zero-sized surface is "unavailable" and ignores every draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Surface {
    /// A fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.pixels.get_pixel(x, y))
    }

    /// Make every pixel transparent
    pub fn clear(&mut self) {
        self.fill(Color32::TRANSPARENT);
    }

    pub fn fill(&mut self, color: Color32) {
        let rgba = Rgba(color.to_srgba_unmultiplied());
        for pixel in self.pixels.pixels_mut() {
            *pixel = rgba;
        }
    }

    /// Deep copy of the current pixels
    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    /// Replace the pixels with a snapshot. The surface takes the snapshot's
    /// dimensions.
    pub fn restore(&mut self, snapshot: RgbaImage) {
        self.pixels = snapshot;
    }

    /// Reallocate the backing store, discarding the contents
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
    }

    /// Reallocate the backing store and stretch the old contents to fill it
    pub fn resize_stretched(&mut self, width: u32, height: u32) {
        let previous = std::mem::replace(&mut self.pixels, RgbaImage::new(width, height));
        if previous.width() == 0 || previous.height() == 0 || width == 0 || height == 0 {
            return;
        }
        self.pixels = imageops::resize(&previous, width, height, imageops::FilterType::Triangle);
    }

    /// Convert for upload as an egui texture
    pub fn to_color_image(&self) -> egui::ColorImage {
        let size = [self.width() as usize, self.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, self.pixels.as_raw())
    }

    /// Blend `color` into one pixel with the given coverage (0..=1)
    pub fn blend(&mut self, x: u32, y: u32, color: Color32, coverage: f32, mode: Composite) {
        if x >= self.width() || y >= self.height() || coverage <= 0.0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x, y);
        match mode {
            Composite::SourceOver => {
                let src = color.to_srgba_unmultiplied();
                *dst = source_over(*dst, src, coverage.min(1.0));
            }
            Composite::DestinationOut => {
                let alpha = dst[3] as f32 * (1.0 - coverage.min(1.0));
                dst[3] = alpha.round() as u8;
            }
        }
    }

    /// Pixel index range covering `rect`, clipped to the surface
    fn pixel_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        if self.is_empty() || !rect.is_finite() || rect.is_negative() {
            return None;
        }
        let x0 = rect.min.x.floor().max(0.0) as u32;
        let y0 = rect.min.y.floor().max(0.0) as u32;
        let x1 = (rect.max.x.ceil().max(0.0) as u32).min(self.width());
        let y1 = (rect.max.y.ceil().max(0.0) as u32).min(self.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Stroke a line segment with round caps. `a == b` paints a round dot.
    pub fn stroke_segment(&mut self, a: Pos2, b: Pos2, width: f32, color: Color32, mode: Composite) {
        let radius = (width / 2.0).max(0.5);
        let bounds = Rect::from_two_pos(a, b).expand(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.pixel_span(bounds) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let center = pixel_center(x, y);
                let coverage = radius + 0.5 - distance_to_segment(center, a, b);
                self.blend(x, y, color, coverage.clamp(0.0, 1.0), mode);
            }
        }
    }

    /// Fill a rectangle of `size` centered on `center`, rotated by `rotation`
    /// radians.
    pub fn fill_rotated_rect(&mut self, center: Pos2, size: Vec2, rotation: f32, color: Color32) {
        let half = size / 2.0;
        let Some((x0, y0, x1, y1)) = self.pixel_span(rotated_bounds(center, size, rotation).expand(1.0)) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let local = world_to_local(pixel_center(x, y), center, rotation);
                let coverage = box_coverage(local, half);
                self.blend(x, y, color, coverage, Composite::SourceOver);
            }
        }
    }

    /// Outline a rotated rectangle; the line is centered on the rectangle's
    /// edge.
    pub fn stroke_rotated_rect(
        &mut self,
        center: Pos2,
        size: Vec2,
        rotation: f32,
        line_width: f32,
        color: Color32,
    ) {
        let outer = size / 2.0 + Vec2::splat(line_width / 2.0);
        let inner = size / 2.0 - Vec2::splat(line_width / 2.0);
        let Some((x0, y0, x1, y1)) = self.pixel_span(rotated_bounds(center, outer * 2.0, rotation).expand(1.0))
        else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let local = world_to_local(pixel_center(x, y), center, rotation);
                let coverage = box_coverage(local, outer) - box_coverage(local, inner.max(Vec2::ZERO));
                self.blend(x, y, color, coverage, Composite::SourceOver);
            }
        }
    }

    /// Draw `bitmap` into a rotated box, scaled to fit inside it with its
    /// aspect ratio kept and centered along the slack axis. Nothing is drawn
    /// outside the box.
    pub fn draw_image_fitted(&mut self, bitmap: &RgbaImage, center: Pos2, size: Vec2, rotation: f32) {
        let (bw, bh) = bitmap.dimensions();
        if bw == 0 || bh == 0 || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }

        let scale = (size.x / bw as f32).min(size.y / bh as f32);
        let drawn_half = Vec2::new(bw as f32, bh as f32) * scale / 2.0;
        let Some((x0, y0, x1, y1)) = self.pixel_span(rotated_bounds(center, size, rotation)) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let local = world_to_local(pixel_center(x, y), center, rotation);
                if local.x.abs() > drawn_half.x || local.y.abs() > drawn_half.y {
                    continue;
                }
                let u = (local.x + drawn_half.x) / scale - 0.5;
                let v = (local.y + drawn_half.y) / scale - 0.5;
                let sample = sample_bilinear(bitmap, u, v);
                let dst = self.pixels.get_pixel_mut(x, y);
                *dst = source_over(*dst, sample, 1.0);
            }
        }
    }

    /// Dashed horizontal and vertical lines every `pitch` pixels
    pub fn draw_grid(&mut self, pitch: u32, dash: (u32, u32), color: Color32) {
        if pitch == 0 || self.is_empty() {
            return;
        }
        let period = (dash.0 + dash.1).max(1);
        let on = |t: u32| t % period < dash.0;

        for x in (0..self.width()).step_by(pitch as usize) {
            for y in (0..self.height()).filter(|y| on(*y)) {
                self.blend(x, y, color, 1.0, Composite::SourceOver);
            }
        }
        for y in (0..self.height()).step_by(pitch as usize) {
            for x in (0..self.width()).filter(|x| on(*x)) {
                self.blend(x, y, color, 1.0, Composite::SourceOver);
            }
        }
    }

    /// Paint `top` over this surface. Both must have the same dimensions.
    pub fn composite_over(&mut self, top: &Surface) {
        if self.dimensions() != top.dimensions() {
            log::warn!(
                "Skipping composite of {:?} surface onto {:?}",
                top.dimensions(),
                self.dimensions()
            );
            return;
        }
        for (dst, src) in self.pixels.pixels_mut().zip(top.pixels.pixels()) {
            *dst = source_over(*dst, src.0, 1.0);
        }
    }
}

fn pixel_center(x: u32, y: u32) -> Pos2 {
    Pos2::new(x as f32 + 0.5, y as f32 + 0.5)
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Approximate area of the pixel at `local` inside a box of half extent `half`
fn box_coverage(local: Vec2, half: Vec2) -> f32 {
    let cx = (half.x + 0.5 - local.x.abs()).clamp(0.0, 1.0);
    let cy = (half.y + 0.5 - local.y.abs()).clamp(0.0, 1.0);
    cx * cy
}

fn source_over(dst: Rgba<u8>, src: [u8; 4], coverage: f32) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}

/// Bilinear sample with edge clamping; `u`, `v` are in texel-center space
fn sample_bilinear(bitmap: &RgbaImage, u: f32, v: f32) -> [u8; 4] {
    let max_x = bitmap.width() as i64 - 1;
    let max_y = bitmap.height() as i64 - 1;
    let x0 = u.floor();
    let y0 = v.floor();
    let fx = u - x0;
    let fy = v - y0;

    let texel = |x: i64, y: i64| bitmap.get_pixel(x.clamp(0, max_x) as u32, y.clamp(0, max_y) as u32).0;
    let (x0, y0) = (x0 as i64, y0 as i64);
    let corners = [
        (texel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (texel(x0 + 1, y0), fx * (1.0 - fy)),
        (texel(x0, y0 + 1), (1.0 - fx) * fy),
        (texel(x0 + 1, y0 + 1), fx * fy),
    ];

    // Weight colour by alpha so transparent texels do not bleed their colour
    let mut alpha = 0.0;
    let mut rgb = [0.0f32; 3];
    for (texel, weight) in corners {
        let a = texel[3] as f32 * weight;
        alpha += a;
        for i in 0..3 {
            rgb[i] += texel[i] as f32 * a;
        }
    }
    if alpha <= 0.0 {
        return [0, 0, 0, 0];
    }
    [
        (rgb[0] / alpha).round() as u8,
        (rgb[1] / alpha).round() as u8,
        (rgb[2] / alpha).round() as u8,
        alpha.round().clamp(0.0, 255.0) as u8,
    ]
}
