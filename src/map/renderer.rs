use glam::DVec2;
use tracing::debug;

use crate::data::{DsoRecord, SkyCatalog};
use crate::draw::{LayerKind, Primitive, RenderSink, Shape, Style};
use crate::geo::{CelestialCoordinate, DEGREES_PER_HOUR};
use crate::map::densify::{densify_horizontal, great_circle};
use crate::map::frame::ChartLayout;
use crate::map::rotation::rotate_ring;
use crate::map::symbols::{select_symbol, star_radius, style_for, Drawable, DSO_SYMBOL_SIZE};

/// Parallels are drawn every this many degrees of declination
pub const GRID_PARALLEL_STEP: usize = 10;
/// Sampling step along grid lines (degrees)
pub const GRID_SAMPLE_STEP: usize = 1;

const DSO_LABEL_SIZE: f64 = 7.0;
const MAP_LABEL_SIZE: f64 = 10.0;
const MAP_LABEL_OFFSET: DVec2 = DVec2::new(4.0, 12.0);

/// Display settings for chart layers
#[derive(Clone, Debug, PartialEq)]
pub struct DisplaySettings {
    pub show_milky_way: bool,
    pub show_grid: bool,
    pub show_stars: bool,
    pub show_lines: bool,
    pub show_borders: bool,
    pub show_messier: bool,
    pub show_dsos: bool,
    pub show_herschel: bool,
    pub show_label: bool,
    pub show_frame: bool,
    /// Draw every deep-sky object as a plus sign
    pub marker_override: bool,
    /// Faintest star drawn
    pub star_limit: f64,
    /// Faintest generic deep-sky object drawn
    pub dso_limit: f64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_milky_way: true,
            show_grid: true,
            show_stars: true,
            show_lines: true,
            show_borders: true,
            show_messier: true,
            show_dsos: true,
            show_herschel: true,
            show_label: true,
            show_frame: true,
            marker_override: false,
            star_limit: 6.5,
            dso_limit: 12.0,
        }
    }
}

impl DisplaySettings {
    fn flag_mut(&mut self, kind: LayerKind) -> &mut bool {
        match kind {
            LayerKind::MilkyWay => &mut self.show_milky_way,
            LayerKind::Grid => &mut self.show_grid,
            LayerKind::Stars => &mut self.show_stars,
            LayerKind::ConstellationLines => &mut self.show_lines,
            LayerKind::ConstellationBorders => &mut self.show_borders,
            LayerKind::Messier => &mut self.show_messier,
            LayerKind::DeepSky => &mut self.show_dsos,
            LayerKind::Herschel => &mut self.show_herschel,
            LayerKind::MapLabel => &mut self.show_label,
            LayerKind::FrameBorder => &mut self.show_frame,
        }
    }

    pub fn set_layer(&mut self, kind: LayerKind, enabled: bool) {
        *self.flag_mut(kind) = enabled;
    }

    pub fn toggle_layer(&mut self, kind: LayerKind) {
        let flag = self.flag_mut(kind);
        *flag = !*flag;
    }

    pub fn layer_enabled(&self, kind: LayerKind) -> bool {
        LAYER_ORDER[kind.index()].is_enabled(self)
    }

    pub fn toggle_markers(&mut self) {
        self.marker_override = !self.marker_override;
    }
}

/// What every layer function reads
pub struct LayerContext<'a> {
    pub layout: &'a ChartLayout,
    pub catalog: &'a SkyCatalog,
    pub settings: &'a DisplaySettings,
}

impl LayerContext<'_> {
    #[inline(always)]
    fn project(&self, ra_deg: f64, dec_deg: f64) -> DVec2 {
        self.layout.frame.project_degrees(ra_deg, dec_deg)
    }

    fn project_line(&self, line: &[(f64, f64)]) -> Vec<DVec2> {
        line.iter().map(|&(ra, dec)| self.project(ra, dec)).collect()
    }
}

/// One entry of the paint order
pub struct LayerDescriptor {
    pub kind: LayerKind,
    pub name: &'static str,
    pub enabled: fn(&DisplaySettings) -> bool,
    pub draw: fn(&LayerContext<'_>, &mut dyn RenderSink),
}

impl LayerDescriptor {
    pub fn is_enabled(&self, settings: &DisplaySettings) -> bool {
        (self.enabled)(settings)
    }
}

/// Layers back to front. Later entries paint over earlier ones.
pub const LAYER_ORDER: [LayerDescriptor; 10] = [
    LayerDescriptor {
        kind: LayerKind::MilkyWay,
        name: "milky-way",
        enabled: |s| s.show_milky_way,
        draw: draw_milky_way,
    },
    LayerDescriptor {
        kind: LayerKind::Grid,
        name: "grid",
        enabled: |s| s.show_grid,
        draw: draw_grid,
    },
    LayerDescriptor {
        kind: LayerKind::Stars,
        name: "stars",
        enabled: |s| s.show_stars,
        draw: draw_stars,
    },
    LayerDescriptor {
        kind: LayerKind::ConstellationLines,
        name: "lines",
        enabled: |s| s.show_lines,
        draw: draw_constellation_lines,
    },
    LayerDescriptor {
        kind: LayerKind::ConstellationBorders,
        name: "borders",
        enabled: |s| s.show_borders,
        draw: draw_constellation_borders,
    },
    LayerDescriptor {
        kind: LayerKind::Messier,
        name: "messier",
        enabled: |s| s.show_messier,
        draw: draw_messier,
    },
    LayerDescriptor {
        kind: LayerKind::DeepSky,
        name: "dso",
        enabled: |s| s.show_dsos,
        draw: draw_dsos,
    },
    LayerDescriptor {
        kind: LayerKind::Herschel,
        name: "herschel",
        enabled: |s| s.show_herschel,
        draw: draw_herschel,
    },
    LayerDescriptor {
        kind: LayerKind::MapLabel,
        name: "label",
        enabled: |s| s.show_label,
        draw: draw_map_label,
    },
    LayerDescriptor {
        kind: LayerKind::FrameBorder,
        name: "frame",
        enabled: |s| s.show_frame,
        draw: draw_frame,
    },
];

/// Counts what one layer emits before passing it on
struct CountingSink<'s> {
    inner: &'s mut dyn RenderSink,
    count: usize,
}

impl RenderSink for CountingSink<'_> {
    fn emit(&mut self, primitive: Primitive) {
        self.count += 1;
        self.inner.emit(primitive);
    }
}

/// Chart renderer: walks the layer list once per call
#[derive(Clone, Debug)]
pub struct ChartRenderer {
    pub layout: ChartLayout,
    pub settings: DisplaySettings,
}

impl ChartRenderer {
    pub fn new(layout: ChartLayout, settings: DisplaySettings) -> Self {
        Self { layout, settings }
    }

    /// Emit every enabled layer into `sink`, back to front
    pub fn render(&self, catalog: &SkyCatalog, sink: &mut dyn RenderSink) {
        let ctx = LayerContext {
            layout: &self.layout,
            catalog,
            settings: &self.settings,
        };

        let mut total = 0;
        for layer in LAYER_ORDER.iter() {
            if !layer.is_enabled(&self.settings) {
                debug!(layer = layer.name, "layer disabled");
                continue;
            }
            let mut counting = CountingSink {
                inner: &mut *sink,
                count: 0,
            };
            (layer.draw)(&ctx, &mut counting);
            debug!(layer = layer.name, primitives = counting.count, "layer emitted");
            total += counting.count;
        }
        debug!(chart = %self.layout.label, primitives = total, "chart rendered");
    }
}

fn emit(sink: &mut dyn RenderSink, layer: LayerKind, shape: Shape, style: Style) {
    sink.emit(Primitive::new(layer, shape, style));
}

fn draw_milky_way(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    let ra0 = ctx.layout.frame.ra0_degrees();
    for contour in &ctx.catalog.milky_way {
        let ring = rotate_ring(&contour.ring, ra0);
        let points = ctx.project_line(&ring);
        if points.len() < 3 || !ctx.layout.viewport.any_in_bounds(&points) {
            continue;
        }
        emit(
            sink,
            LayerKind::MilkyWay,
            Shape::Polyline {
                points,
                closed: true,
            },
            style_for(&Drawable::MwContour {
                level: contour.level,
            }),
        );
    }
}

fn draw_grid(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    let style = style_for(&Drawable::GridLine);
    let mut emit_line = |line: Vec<(f64, f64)>| {
        let points = ctx.project_line(&line);
        if ctx.layout.viewport.any_in_bounds(&points) {
            emit(
                &mut *sink,
                LayerKind::Grid,
                Shape::Polyline {
                    points,
                    closed: false,
                },
                style,
            );
        }
    };

    // meridians every hour
    for hour in 0..24 {
        let ra = hour as f64 * DEGREES_PER_HOUR;
        emit_line(
            (-89..=89)
                .step_by(GRID_SAMPLE_STEP)
                .map(|dec| (ra, dec as f64))
                .collect(),
        );
    }

    // parallels stop just short of the meridian opposite the centre
    let ra0 = ctx.layout.frame.ra0_degrees();
    for dec in (-80..=80).step_by(GRID_PARALLEL_STEP) {
        emit_line(
            (-179..=179)
                .step_by(GRID_SAMPLE_STEP)
                .map(|d| (ra0 + d as f64, dec as f64))
                .collect(),
        );
    }
}

fn draw_stars(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    for star in &ctx.catalog.stars {
        if star.mag > ctx.settings.star_limit {
            continue;
        }
        let center = ctx.project(star.ra, star.dec);
        if !ctx.layout.viewport.contains(center) {
            continue;
        }
        emit(
            sink,
            LayerKind::Stars,
            Shape::Circle {
                center,
                radius: star_radius(star.mag),
            },
            style_for(&Drawable::Star),
        );
    }
}

fn draw_constellation_lines(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    let style = style_for(&Drawable::ConstLine);
    let frame = &ctx.layout.frame;
    // a step wider than the chart has wrapped round the far meridian
    let max_step = ctx.layout.viewport.width();

    for line in &ctx.catalog.constellation_lines {
        for pair in line.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let path: Vec<DVec2> = great_circle(
                CelestialCoordinate::from_degrees(a.0, a.1),
                CelestialCoordinate::from_degrees(b.0, b.1),
            )
            .into_iter()
            .map(|p| frame.project(p))
            .collect();

            if !ctx.layout.viewport.any_in_bounds(&path) {
                continue;
            }
            for seg in path.windows(2) {
                if (seg[1] - seg[0]).length() >= max_step {
                    continue;
                }
                emit(
                    sink,
                    LayerKind::ConstellationLines,
                    Shape::Line {
                        from: seg[0],
                        to: seg[1],
                    },
                    style,
                );
            }
        }
    }
}

fn draw_constellation_borders(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    let style = style_for(&Drawable::ConstBorder);
    for line in &ctx.catalog.constellation_borders {
        let points = ctx.project_line(&densify_horizontal(line));
        if points.len() < 2 || !ctx.layout.viewport.any_in_bounds(&points) {
            continue;
        }
        emit(
            sink,
            LayerKind::ConstellationBorders,
            Shape::Polyline {
                points,
                closed: false,
            },
            style,
        );
    }
}

/// Symbol plus name label for each object in bounds
fn draw_objects(
    ctx: &LayerContext<'_>,
    sink: &mut dyn RenderSink,
    layer: LayerKind,
    objects: &[DsoRecord],
    limit: Option<f64>,
) {
    let marker_override = ctx.settings.marker_override;
    let label_style = style_for(&Drawable::DsoLabel);
    let label_offset = DVec2::new(DSO_SYMBOL_SIZE + 1.0, -(DSO_SYMBOL_SIZE + 1.0));

    for obj in objects {
        if limit.is_some_and(|limit| obj.mag > limit) {
            continue;
        }
        let center = ctx.project(obj.ra, obj.dec);
        if !ctx.layout.viewport.contains(center) {
            continue;
        }

        let style = style_for(&Drawable::Dso {
            type_code: &obj.type_code,
            marker_override,
        });
        let symbol = select_symbol(&obj.type_code, marker_override);
        for shape in symbol.shapes(center, DSO_SYMBOL_SIZE) {
            emit(sink, layer, shape, style);
        }

        if !obj.name.is_empty() {
            emit(
                sink,
                layer,
                Shape::Text {
                    position: center + label_offset,
                    content: obj.name.clone(),
                    size: DSO_LABEL_SIZE,
                },
                label_style,
            );
        }
    }
}

fn draw_messier(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    draw_objects(ctx, sink, LayerKind::Messier, &ctx.catalog.messier, None);
}

fn draw_dsos(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    let limit = Some(ctx.settings.dso_limit);
    draw_objects(ctx, sink, LayerKind::DeepSky, &ctx.catalog.dsos, limit);
}

fn draw_herschel(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    draw_objects(ctx, sink, LayerKind::Herschel, &ctx.catalog.herschel, None);
}

fn draw_map_label(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    let text = ctx.layout.label.as_str();
    emit(
        sink,
        LayerKind::MapLabel,
        Shape::Text {
            position: ctx.layout.viewport.top_left() + MAP_LABEL_OFFSET,
            content: text.to_string(),
            size: MAP_LABEL_SIZE,
        },
        style_for(&Drawable::MapLabel),
    );
}

fn draw_frame(ctx: &LayerContext<'_>, sink: &mut dyn RenderSink) {
    let vp = &ctx.layout.viewport;
    emit(
        sink,
        LayerKind::FrameBorder,
        Shape::Rect {
            corner: vp.top_left(),
            width: vp.width(),
            height: vp.height(),
        },
        style_for(&Drawable::Frame),
    );
}
