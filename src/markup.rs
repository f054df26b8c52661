//! SVG output: one `<g>` per layer, clipped to the chart frame.

use svg::node::element::path::Data;
use svg::node::element::{Circle, ClipPath, Definitions, Ellipse, Group, Line, Path, Rectangle, Text};
use svg::Document;

use crate::draw::{LayerKind, Primitive, RenderSink, Rgb, Shape, Style};
use crate::map::projection::Viewport;

const CLIP_ID: &str = "frame";

/// Set fill, stroke and dash attributes on any svg element
macro_rules! painted {
    ($element:expr, $style:expr) => {{
        let style: &Style = $style;
        let mut element = $element
            .set("fill", paint(style.fill))
            .set("stroke", paint(style.stroke));
        if style.stroke.is_some() {
            element = element.set("stroke-width", style.stroke_width);
        }
        if let Some((on, off)) = style.dash {
            element = element.set("stroke-dasharray", format!("{} {}", on, off));
        }
        element
    }};
}

fn paint(color: Option<Rgb>) -> String {
    color.map_or_else(|| "none".to_string(), Rgb::to_hex)
}

/// Content layers are clipped to the frame; the frame stroke itself is not
fn layer_group(layer: LayerKind) -> Group {
    let group = Group::new().set("class", layer.name());
    if layer == LayerKind::FrameBorder {
        return group;
    }
    group.set("clip-path", format!("url(#{})", CLIP_ID))
}

fn path_data(points: &[glam::DVec2], closed: bool) -> Option<Data> {
    let (first, rest) = points.split_first()?;
    let mut data = Data::new().move_to((first.x, first.y));
    for p in rest {
        data = data.line_to((p.x, p.y));
    }
    Some(if closed { data.close() } else { data })
}

fn add_shape(group: Group, primitive: &Primitive) -> Group {
    let style = &primitive.style;
    match &primitive.shape {
        Shape::Circle { center, radius } => group.add(painted!(
            Circle::new()
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", *radius),
            style
        )),
        Shape::Ellipse { center, rx, ry } => group.add(painted!(
            Ellipse::new()
                .set("cx", center.x)
                .set("cy", center.y)
                .set("rx", *rx)
                .set("ry", *ry),
            style
        )),
        Shape::Line { from, to } => group.add(painted!(
            Line::new()
                .set("x1", from.x)
                .set("y1", from.y)
                .set("x2", to.x)
                .set("y2", to.y),
            style
        )),
        Shape::Polyline { points, closed } => match path_data(points, *closed) {
            Some(data) => group.add(painted!(Path::new().set("d", data), style)),
            None => group,
        },
        Shape::Rect {
            corner,
            width,
            height,
        } => group.add(painted!(
            Rectangle::new()
                .set("x", corner.x)
                .set("y", corner.y)
                .set("width", *width)
                .set("height", *height),
            style
        )),
        Shape::Text {
            position,
            content,
            size,
        } => group.add(painted!(
            Text::new(content.as_str())
                .set("x", position.x)
                .set("y", position.y)
                .set("font-size", *size)
                .set("font-family", "sans-serif"),
            style
        )),
    }
}

/// Builds an SVG document from the primitive stream
pub struct SvgSink {
    viewport: Viewport,
    finished: Vec<Group>,
    current: Option<(LayerKind, Group)>,
    emitted: usize,
}

impl SvgSink {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            finished: Vec::new(),
            current: None,
            emitted: 0,
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Close the last layer and assemble the document
    pub fn finish(mut self) -> Document {
        if let Some((_, group)) = self.current.take() {
            self.finished.push(group);
        }

        let vp = self.viewport;
        let frame_rect = || {
            Rectangle::new()
                .set("x", vp.xmin)
                .set("y", vp.ymin)
                .set("width", vp.width())
                .set("height", vp.height())
        };

        let mut document = Document::new()
            .set("viewBox", (vp.xmin, vp.ymin, vp.width(), vp.height()))
            .set("width", vp.width())
            .set("height", vp.height())
            .add(Definitions::new().add(ClipPath::new().set("id", CLIP_ID).add(frame_rect())))
            .add(frame_rect().set("fill", "#ffffff"));

        for group in self.finished {
            document = document.add(group);
        }
        document
    }
}

impl RenderSink for SvgSink {
    fn emit(&mut self, primitive: Primitive) {
        let group = match self.current.take() {
            Some((layer, group)) if layer == primitive.layer => group,
            Some((_, group)) => {
                self.finished.push(group);
                layer_group(primitive.layer)
            }
            None => layer_group(primitive.layer),
        };
        self.current = Some((primitive.layer, add_shape(group, &primitive)));
        self.emitted += 1;
    }
}
