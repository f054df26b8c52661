//! Star chart engine: conic sky projection, seam-aware polygon handling and
//! layered rendering to SVG or braille.

pub mod braille;
pub mod config;
pub mod data;
pub mod draw;
pub mod error;
pub mod geo;
pub mod map;
pub mod markup;

pub use config::{ChartConfig, OutputMode};
pub use data::{builtin_sky, load_catalog, SkyCatalog};
pub use draw::{DrawList, LayerKind, Primitive, RenderSink, Shape, Style};
pub use error::{ChartError, ChartResult};
pub use geo::CelestialCoordinate;
pub use map::{ChartLayout, ChartRenderer, DisplaySettings, MapFrame, MapSelection, Sizing, Viewport};
pub use markup::SvgSink;
