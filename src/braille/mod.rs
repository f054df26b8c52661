mod canvas;
pub mod raster;

use glam::DVec2;

use crate::draw::{LayerKind, Primitive, RenderSink, Shape};
use crate::map::projection::Viewport;

pub use canvas::BrailleCanvas;

/// Segments longer than this many canvas diagonals are dropped
const MAX_SEGMENT_DIAGONALS: f64 = 4.0;

/// Maps chart-plane coordinates onto braille pixels, keeping the aspect ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelTransform {
    pub origin: DVec2,
    pub scale: f64,
    pub offset: DVec2,
}

impl PixelTransform {
    /// Fit `viewport` centred inside a `px_width x px_height` pixel grid
    pub fn fit(viewport: &Viewport, px_width: usize, px_height: usize) -> Self {
        let avail = DVec2::new(
            px_width.saturating_sub(1) as f64,
            px_height.saturating_sub(1) as f64,
        );
        let scale = if viewport.width() > 0.0 && viewport.height() > 0.0 {
            (avail.x / viewport.width()).min(avail.y / viewport.height())
        } else {
            1.0
        };
        let used = DVec2::new(viewport.width(), viewport.height()) * scale;
        Self {
            origin: viewport.top_left(),
            scale,
            offset: ((avail - used) / 2.0).max(DVec2::ZERO),
        }
    }

    #[inline(always)]
    pub fn apply(&self, p: DVec2) -> (i32, i32) {
        let q = (p - self.origin) * self.scale + self.offset;
        (q.x.round() as i32, q.y.round() as i32)
    }

    #[inline(always)]
    pub fn length(&self, d: f64) -> i32 {
        (d * self.scale).round() as i32
    }
}

/// Text placed over the braille layers, in character cells
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub layer: LayerKind,
    pub col: u16,
    pub row: u16,
    pub text: String,
}

/// Rasterizes primitives onto one braille canvas per layer
pub struct BrailleSink {
    canvases: Vec<BrailleCanvas>,
    labels: Vec<Label>,
    transform: PixelTransform,
    max_segment: f64,
}

impl BrailleSink {
    /// A sink for a `width x height` character area showing `viewport`
    pub fn new(viewport: &Viewport, width: usize, height: usize) -> Self {
        let transform = PixelTransform::fit(viewport, width * 2, height * 4);
        let diagonal = ((width * 2) as f64).hypot((height * 4) as f64);
        Self {
            canvases: LayerKind::ALL
                .iter()
                .map(|_| BrailleCanvas::new(width, height))
                .collect(),
            labels: Vec::new(),
            transform,
            max_segment: diagonal * MAX_SEGMENT_DIAGONALS,
        }
    }

    pub fn transform(&self) -> PixelTransform {
        self.transform
    }

    pub fn canvas(&self, layer: LayerKind) -> &BrailleCanvas {
        &self.canvases[layer.index()]
    }

    /// Layers in paint order
    pub fn layers(&self) -> impl Iterator<Item = (LayerKind, &BrailleCanvas)> {
        LayerKind::ALL.into_iter().zip(self.canvases.iter())
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn segment(&mut self, layer: LayerKind, a: DVec2, b: DVec2, dash: Option<raster::DashPattern>) {
        let t = self.transform;
        let (x0, y0) = t.apply(a);
        let (x1, y1) = t.apply(b);
        let canvas = &mut self.canvases[layer.index()];
        let (w, h) = (canvas.pixel_width() as i32, canvas.pixel_height() as i32);

        // both ends off the same side of the canvas
        if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= w && x1 >= w) || (y0 >= h && y1 >= h) {
            return;
        }
        if ((x1 - x0) as f64).hypot((y1 - y0) as f64) > self.max_segment {
            return;
        }
        raster::draw_line_pattern(canvas, x0, y0, x1, y1, dash);
    }

    fn dash_pixels(&self, dash: Option<(f64, f64)>) -> Option<raster::DashPattern> {
        dash.map(|(on, off)| {
            (
                self.transform.length(on).max(1) as u32,
                self.transform.length(off).max(1) as u32,
            )
        })
    }
}

impl RenderSink for BrailleSink {
    fn emit(&mut self, primitive: Primitive) {
        let Primitive {
            layer,
            shape,
            style,
        } = primitive;
        let t = self.transform;
        let dash = self.dash_pixels(style.dash);

        match shape {
            Shape::Circle { center, radius } => {
                let (cx, cy) = t.apply(center);
                let r = t.length(radius);
                let canvas = &mut self.canvases[layer.index()];
                match (style.fill, dash) {
                    (Some(_), _) => raster::fill_circle(canvas, cx, cy, r),
                    (None, Some(pattern)) => raster::draw_dashed_circle(canvas, cx, cy, r, pattern),
                    (None, None) => raster::draw_circle(canvas, cx, cy, r),
                }
            }
            Shape::Ellipse { center, rx, ry } => {
                let (cx, cy) = t.apply(center);
                let canvas = &mut self.canvases[layer.index()];
                raster::draw_ellipse(canvas, cx, cy, t.length(rx), t.length(ry));
            }
            Shape::Line { from, to } => self.segment(layer, from, to, dash),
            Shape::Polyline { points, closed } => {
                for pair in points.windows(2) {
                    self.segment(layer, pair[0], pair[1], dash);
                }
                if closed && points.len() > 2 {
                    if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
                        self.segment(layer, last, first, dash);
                    }
                }
            }
            Shape::Rect {
                corner,
                width,
                height,
            } => {
                let (x, y) = t.apply(corner);
                let (w, h) = (t.length(width), t.length(height));
                let canvas = &mut self.canvases[layer.index()];
                if style.fill.is_some() {
                    raster::fill_rect(canvas, x, y, w, h);
                } else {
                    raster::draw_rect(canvas, x, y, w, h);
                }
            }
            Shape::Text { position, content, .. } => {
                let (px, py) = t.apply(position);
                if px < 0 || py < 0 {
                    return;
                }
                let canvas = &self.canvases[layer.index()];
                let (col, row) = (px as usize / 2, py as usize / 4);
                if col < canvas.width() && row < canvas.height() {
                    self.labels.push(Label {
                        layer,
                        col: col as u16,
                        row: row as u16,
                        text: content,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Rgb, Style};

    fn viewport() -> Viewport {
        Viewport::from_corners(DVec2::new(-100.0, -50.0), DVec2::new(100.0, 50.0))
    }

    #[test]
    fn test_fit_keeps_aspect() {
        // 81 x 81 pixels for a 2:1 viewport: width limits
        let t = PixelTransform::fit(&viewport(), 81, 81);
        assert!((t.scale - 0.4).abs() < 1e-12);
        assert_eq!(t.apply(DVec2::new(-100.0, -50.0)), (0, 20));
        assert_eq!(t.apply(DVec2::new(100.0, 50.0)), (80, 60));
        assert_eq!(t.apply(DVec2::ZERO), (40, 40));
    }

    #[test]
    fn test_primitives_land_on_their_layer() {
        let mut sink = BrailleSink::new(&viewport(), 40, 20);
        sink.emit(Primitive::new(
            LayerKind::Stars,
            Shape::Circle {
                center: DVec2::ZERO,
                radius: 5.0,
            },
            Style::fill(Rgb::BLACK),
        ));
        sink.emit(Primitive::new(
            LayerKind::Grid,
            Shape::Line {
                from: DVec2::new(-100.0, 0.0),
                to: DVec2::new(100.0, 0.0),
            },
            Style::stroke(Rgb::BLACK, 1.0),
        ));
        assert!(!sink.canvas(LayerKind::Stars).is_blank());
        assert!(!sink.canvas(LayerKind::Grid).is_blank());
        assert!(sink.canvas(LayerKind::Messier).is_blank());

        let order: Vec<LayerKind> = sink.layers().map(|(k, _)| k).collect();
        assert_eq!(order, LayerKind::ALL.to_vec());
    }

    #[test]
    fn test_text_becomes_label() {
        let mut sink = BrailleSink::new(&viewport(), 40, 20);
        sink.emit(Primitive::new(
            LayerKind::MapLabel,
            Shape::Text {
                position: DVec2::new(-96.0, -38.0),
                content: "Map 10".into(),
                size: 10.0,
            },
            Style::fill(Rgb::BLACK),
        ));
        // off the chart
        sink.emit(Primitive::new(
            LayerKind::Messier,
            Shape::Text {
                position: DVec2::new(-500.0, 0.0),
                content: "M1".into(),
                size: 7.0,
            },
            Style::fill(Rgb::BLACK),
        ));
        assert_eq!(sink.labels().len(), 1);
        assert_eq!(sink.labels()[0].text, "Map 10");
        assert!(sink.canvas(LayerKind::MapLabel).is_blank());
    }

    #[test]
    fn test_offscreen_segment_dropped() {
        let mut sink = BrailleSink::new(&viewport(), 10, 5);
        sink.emit(Primitive::new(
            LayerKind::ConstellationLines,
            Shape::Line {
                from: DVec2::new(-400.0, 0.0),
                to: DVec2::new(-300.0, 10.0),
            },
            Style::stroke(Rgb::BLACK, 1.0),
        ));
        assert!(sink.canvas(LayerKind::ConstellationLines).is_blank());
    }

    #[test]
    fn test_closed_polyline_and_frame() {
        let vp = viewport();
        let mut sink = BrailleSink::new(&vp, 40, 20);
        sink.emit(Primitive::new(
            LayerKind::FrameBorder,
            Shape::Rect {
                corner: vp.top_left(),
                width: vp.width(),
                height: vp.height(),
            },
            Style::stroke(Rgb::BLACK, 1.0),
        ));
        let frame = sink.canvas(LayerKind::FrameBorder);
        let (x0, y0) = sink.transform().apply(vp.top_left());
        assert!(frame.is_set(x0 as usize, y0 as usize));

        let ring = vec![
            DVec2::new(-50.0, -20.0),
            DVec2::new(50.0, -20.0),
            DVec2::new(50.0, 20.0),
        ];
        let mut lit = Vec::new();
        for closed in [false, true] {
            let mut sink = BrailleSink::new(&vp, 40, 20);
            sink.emit(Primitive::new(
                LayerKind::MilkyWay,
                Shape::Polyline {
                    points: ring.clone(),
                    closed,
                },
                Style::fill(Rgb::grey(200)),
            ));
            let canvas = sink.canvas(LayerKind::MilkyWay);
            let n = (0..canvas.pixel_height())
                .flat_map(|y| (0..canvas.pixel_width()).map(move |x| (x, y)))
                .filter(|&(x, y)| canvas.is_set(x, y))
                .count();
            lit.push(n);
        }
        // the closing edge back to the first vertex adds pixels
        assert!(lit[1] > lit[0]);
    }
}
