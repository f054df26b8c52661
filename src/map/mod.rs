pub mod densify;
pub mod frame;
pub mod projection;
pub mod renderer;
pub mod rotation;
pub mod symbols;

pub use frame::{ChartLayout, MapSelection, Sizing, ATLAS_MAP_COUNT};
pub use projection::{MapFrame, Viewport};
pub use renderer::{ChartRenderer, DisplaySettings, LAYER_ORDER};
