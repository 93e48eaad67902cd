//! CPU rasterizer.
//!
//! Each visible layer is drawn into its own premultiplied buffer, then the
//! layers are composited source-over, bottom to top. Strokes are
//! anti-aliased polylines with round caps and joins.

use crate::renderer::{RenderContext, RenderResult, Renderer};
use gt5_core::stroke::{Stroke, point_to_segment_dist};
use gt5_core::tools::BlendMode;
use image::{Rgba, RgbaImage};
use kurbo::{Point, Rect};
use peniko::Color;

/// Premultiplied RGBA, channels in `0.0..=1.0`.
type Premul = [f32; 4];

const CLEAR: Premul = [0.0; 4];

/// Coverage of one stroke over a pixel rectangle of the output.
struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl CoverageMask {
    /// Rasterize a polyline of the given width, in device pixels.
    ///
    /// Coverage at a pixel center is `half_width + 0.5 - distance`, clamped;
    /// overlapping segments take the maximum, not the sum.
    fn stroke(points: &[Point], width: f64, bounds: (u32, u32)) -> Option<Self> {
        let half = width / 2.0;
        let reach = half + 1.0;
        let first = *points.first()?;
        let area = points
            .iter()
            .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p))
            .inflate(reach, reach)
            .intersect(Rect::new(0.0, 0.0, bounds.0 as f64, bounds.1 as f64));
        if area.width() <= 0.0 || area.height() <= 0.0 {
            return None;
        }

        let x0 = area.x0.floor() as u32;
        let y0 = area.y0.floor() as u32;
        let x1 = (area.x1.ceil() as u32).min(bounds.0);
        let y1 = (area.y1.ceil() as u32).min(bounds.1);
        let mut mask = Self {
            x0,
            y0,
            width: x1 - x0,
            height: y1 - y0,
            values: vec![0.0; ((x1 - x0) * (y1 - y0)) as usize],
        };

        // A lone point is a zero-length segment: a round dot
        let segments: Vec<(Point, Point)> = if points.len() == 1 {
            vec![(first, first)]
        } else {
            points.windows(2).map(|w| (w[0], w[1])).collect()
        };
        for (a, b) in segments {
            mask.add_segment(a, b, half, reach);
        }
        Some(mask)
    }

    fn add_segment(&mut self, a: Point, b: Point, half: f64, reach: f64) {
        let seg = Rect::from_points(a, b).inflate(reach, reach);
        let to_col = |x: f64| (x.max(self.x0 as f64) as u32).clamp(self.x0, self.x0 + self.width);
        let to_row = |y: f64| (y.max(self.y0 as f64) as u32).clamp(self.y0, self.y0 + self.height);
        let (cx0, cx1) = (to_col(seg.x0.floor()), to_col(seg.x1.ceil()));
        let (cy0, cy1) = (to_row(seg.y0.floor()), to_row(seg.y1.ceil()));

        for y in cy0..cy1 {
            for x in cx0..cx1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (half + 0.5 - point_to_segment_dist(center, a, b)).clamp(0.0, 1.0);
                let idx = ((y - self.y0) * self.width + (x - self.x0)) as usize;
                let value = &mut self.values[idx];
                *value = value.max(coverage as f32);
            }
        }
    }
}

/// A layer's pixels while it is being drawn.
struct LayerBuffer<'a> {
    width: u32,
    pixels: &'a mut [Premul],
}

impl LayerBuffer<'_> {
    fn paint(&mut self, mask: &CoverageMask, color: [f32; 4], mode: BlendMode) {
        let [r, g, b, a] = color;
        for my in 0..mask.height {
            for mx in 0..mask.width {
                let coverage = mask.values[(my * mask.width + mx) as usize] * a;
                if coverage <= 0.0 {
                    continue;
                }
                let idx = ((mask.y0 + my) * self.width + mask.x0 + mx) as usize;
                let dst = &mut self.pixels[idx];
                match mode {
                    BlendMode::SourceOver => {
                        *dst = over([r * coverage, g * coverage, b * coverage, coverage], *dst);
                    }
                    BlendMode::DestinationOut => {
                        // Eraser: reduce alpha by coverage
                        let keep = 1.0 - coverage;
                        for channel in dst.iter_mut() {
                            *channel *= keep;
                        }
                    }
                }
            }
        }
    }
}

/// Porter-Duff source-over on premultiplied pixels.
fn over(src: Premul, dst: Premul) -> Premul {
    let keep = 1.0 - src[3];
    [
        src[0] + dst[0] * keep,
        src[1] + dst[1] * keep,
        src[2] + dst[2] * keep,
        src[3] + dst[3] * keep,
    ]
}

fn premultiply(color: Color) -> Premul {
    let rgba = color.to_rgba8();
    let a = rgba.a as f32 / 255.0;
    [
        rgba.r as f32 / 255.0 * a,
        rgba.g as f32 / 255.0 * a,
        rgba.b as f32 / 255.0 * a,
        a,
    ]
}

fn to_straight_rgba8(pixel: Premul) -> Rgba<u8> {
    let a = pixel[3].clamp(0.0, 1.0);
    if a <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |v: f32| ((v / a).clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        channel(pixel[0]),
        channel(pixel[1]),
        channel(pixel[2]),
        (a * 255.0).round() as u8,
    ])
}

/// Software renderer producing an [`RgbaImage`].
#[derive(Debug, Default)]
pub struct RasterRenderer {
    /// Layer buffer reused between layers and frames.
    scratch: Vec<Premul>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw_stroke(layer: &mut LayerBuffer<'_>, stroke: &Stroke, ratio: f64, size: (u32, u32)) {
        let points: Vec<Point> = stroke
            .points
            .iter()
            .map(|p| Point::new(p.x * ratio, p.y * ratio))
            .collect();
        if let Some(mask) = CoverageMask::stroke(&points, stroke.size * ratio, size) {
            layer.paint(&mask, stroke.color.to_f32(), stroke.tool.blend_mode());
        }
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RgbaImage> {
        let (width, height) = ctx.output_size()?;
        let len = (width * height) as usize;
        let background = ctx.background_color.map_or(CLEAR, premultiply);
        let mut out = vec![background; len];

        let store = ctx.store;
        let mut layers_drawn = 0;
        for layer in store.layers().iter().filter(|l| l.visible) {
            self.scratch.clear();
            self.scratch.resize(len, CLEAR);
            let mut buffer = LayerBuffer {
                width,
                pixels: &mut self.scratch,
            };

            let mut strokes = 0;
            for stroke in store.lines().iter().filter(|s| s.layer_id == layer.id) {
                Self::draw_stroke(&mut buffer, stroke, ctx.pixel_ratio, (width, height));
                strokes += 1;
            }
            if strokes == 0 {
                continue;
            }

            for (dst, src) in out.iter_mut().zip(&self.scratch) {
                if src[3] > 0.0 {
                    *dst = over(*src, *dst);
                }
            }
            layers_drawn += 1;
        }
        log::debug!("Rendered {layers_drawn} layers at {width}x{height}");

        Ok(RgbaImage::from_fn(width, height, |x, y| {
            to_straight_rgba8(out[(y * width + x) as usize])
        }))
    }
}
