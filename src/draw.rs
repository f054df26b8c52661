use glam::DVec2;

/// Chart layers. Declaration order is paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    MilkyWay,
    Grid,
    Stars,
    ConstellationLines,
    ConstellationBorders,
    Messier,
    DeepSky,
    Herschel,
    MapLabel,
    FrameBorder,
}

impl LayerKind {
    pub const ALL: [LayerKind; 10] = [
        LayerKind::MilkyWay,
        LayerKind::Grid,
        LayerKind::Stars,
        LayerKind::ConstellationLines,
        LayerKind::ConstellationBorders,
        LayerKind::Messier,
        LayerKind::DeepSky,
        LayerKind::Herschel,
        LayerKind::MapLabel,
        LayerKind::FrameBorder,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name used in configuration and as the SVG group class
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::MilkyWay => "milky-way",
            LayerKind::Grid => "grid",
            LayerKind::Stars => "stars",
            LayerKind::ConstellationLines => "lines",
            LayerKind::ConstellationBorders => "borders",
            LayerKind::Messier => "messier",
            LayerKind::DeepSky => "dso",
            LayerKind::Herschel => "herschel",
            LayerKind::MapLabel => "label",
            LayerKind::FrameBorder => "frame",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub const fn grey(v: u8) -> Self {
        Rgb(v, v, v)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Paint attributes of one primitive
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f64,
    /// Dash and gap lengths in plane units
    pub dash: Option<(f64, f64)>,
}

impl Style {
    pub const fn stroke(color: Rgb, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
            dash: None,
        }
    }

    pub const fn fill(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
            dash: None,
        }
    }

    pub const fn dashed(self, on: f64, off: f64) -> Self {
        Self {
            dash: Some((on, off)),
            ..self
        }
    }

    pub const fn with_stroke(self, color: Rgb, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..self
        }
    }
}

/// Geometry in chart-plane units (y down)
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { center: DVec2, radius: f64 },
    Ellipse { center: DVec2, rx: f64, ry: f64 },
    Line { from: DVec2, to: DVec2 },
    Polyline { points: Vec<DVec2>, closed: bool },
    Rect { corner: DVec2, width: f64, height: f64 },
    Text { position: DVec2, content: String, size: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub layer: LayerKind,
    pub shape: Shape,
    pub style: Style,
}

impl Primitive {
    pub fn new(layer: LayerKind, shape: Shape, style: Style) -> Self {
        Self { layer, shape, style }
    }
}

/// Consumer of the ordered primitive stream. Emission order is paint order.
pub trait RenderSink {
    fn emit(&mut self, primitive: Primitive);
}

/// Keeps every primitive in emission order
#[derive(Default)]
pub struct DrawList {
    pub primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn in_layer(&self, layer: LayerKind) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.layer == layer)
    }
}

impl RenderSink for DrawList {
    fn emit(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }
}
