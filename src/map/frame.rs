use std::f64::consts::TAU;

use crate::error::{ChartError, ChartResult};
use crate::geo::{hours_to_radians, parse_corner, wrap_hours, CelestialCoordinate};
use crate::map::projection::{MapFrame, Viewport};

/// One printed-atlas chart: `(phi1°, phi2°, ra0 h, dec0°, ra1 h, dec1°, ra2 h, dec2°)`.
/// Corner 1 is upper left, corner 2 lower right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasEntry {
    pub phi1: f64,
    pub phi2: f64,
    pub ra0: f64,
    pub dec0: f64,
    pub ra1: f64,
    pub dec1: f64,
    pub ra2: f64,
    pub dec2: f64,
}

pub const ATLAS_MAP_COUNT: usize = 26;

const fn entry(phi1: f64, phi2: f64, ra0: f64, dec0: f64, ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> AtlasEntry {
    AtlasEntry { phi1, phi2, ra0, dec0, ra1, dec1, ra2, dec2 }
}

#[rustfmt::skip]
pub const ATLAS: [AtlasEntry; ATLAS_MAP_COUNT] = [
    // north cap
    entry(78.0, 62.0,  0.0,  70.0,  6.0,  60.0, 20.7,  48.0),
    entry(78.0, 62.0,  8.0,  70.0, 14.0,  60.0,  4.7,  48.0),
    entry(78.0, 62.0, 16.0,  70.0, 22.0,  60.0, 12.7,  48.0),
    // north band
    entry(48.0, 32.0,  2.0,  40.0,  5.9,  56.0, 23.8,  20.0),
    entry(48.0, 32.0,  6.0,  40.0,  9.9,  56.0,  3.8,  20.0),
    entry(48.0, 32.0, 10.0,  40.0, 13.9,  56.0,  7.8,  20.0),
    entry(48.0, 32.0, 14.0,  40.0, 17.9,  56.0, 11.8,  20.0),
    entry(48.0, 32.0, 18.0,  40.0, 21.9,  56.0, 15.8,  20.0),
    entry(48.0, 32.0, 22.0,  40.0,  1.9,  56.0, 19.8,  20.0),
    // equator
    entry(14.0, -14.0,  2.0,  0.0,  4.0,  20.0,  0.0, -20.0),
    entry(14.0, -14.0,  5.0,  0.0,  7.0,  20.0,  3.0, -20.0),
    entry(14.0, -14.0,  8.0,  0.0, 10.0,  20.0,  6.0, -20.0),
    entry(14.0, -14.0, 11.0,  0.0, 13.0,  20.0,  9.0, -20.0),
    entry(14.0, -14.0, 14.0,  0.0, 16.0,  20.0, 12.0, -20.0),
    entry(14.0, -14.0, 17.0,  0.0, 19.0,  20.0, 15.0, -20.0),
    entry(14.0, -14.0, 20.0,  0.0, 22.0,  20.0, 18.0, -20.0),
    entry(14.0, -14.0, 23.0,  0.0,  1.0,  20.0, 21.0, -20.0),
    // south band
    entry(-32.0, -48.0,  2.0, -40.0,  4.2, -20.0, 22.1, -56.0),
    entry(-32.0, -48.0,  6.0, -40.0,  8.2, -20.0,  2.1, -56.0),
    entry(-32.0, -48.0, 10.0, -40.0, 12.2, -20.0,  6.1, -56.0),
    entry(-32.0, -48.0, 14.0, -40.0, 16.2, -20.0, 10.1, -56.0),
    entry(-32.0, -48.0, 18.0, -40.0, 20.2, -20.0, 14.1, -56.0),
    entry(-32.0, -48.0, 22.0, -40.0,  0.2, -20.0, 18.1, -56.0),
    // south cap
    entry(-62.0, -78.0,  0.0, -70.0,  3.3, -48.0, 18.0, -60.0),
    entry(-62.0, -78.0,  8.0, -70.0, 11.3, -48.0,  2.0, -60.0),
    entry(-62.0, -78.0, 16.0, -70.0, 19.3, -48.0, 10.0, -60.0),
];

/// Look up a chart by its 1-based atlas number
pub fn atlas_entry(index: i64) -> ChartResult<&'static AtlasEntry> {
    if index < 1 || index > ATLAS_MAP_COUNT as i64 {
        return Err(ChartError::AtlasIndexOutOfRange(index));
    }
    Ok(&ATLAS[(index - 1) as usize])
}

/// How the chart region was chosen
#[derive(Clone, Debug, PartialEq)]
pub enum MapSelection {
    Atlas(i64),
    Corners {
        upper_left: String,
        lower_right: String,
    },
}

impl MapSelection {
    /// Build from the optional pieces configuration may supply.
    /// An atlas index wins over corners.
    pub fn from_parts(
        index: Option<i64>,
        upper_left: Option<String>,
        lower_right: Option<String>,
    ) -> ChartResult<Self> {
        match (index, upper_left, lower_right) {
            (Some(i), _, _) => Ok(Self::Atlas(i)),
            (None, Some(upper_left), Some(lower_right)) => Ok(Self::Corners {
                upper_left,
                lower_right,
            }),
            _ => Err(ChartError::MissingMapSelection),
        }
    }

    /// Projection parameters at unit scale plus the two frame corners
    pub fn resolve(&self) -> ChartResult<FrameSpec> {
        match self {
            Self::Atlas(index) => {
                let e = atlas_entry(*index)?;
                Ok(FrameSpec {
                    frame: MapFrame::new(
                        e.phi1.to_radians(),
                        e.phi2.to_radians(),
                        hours_to_radians(wrap_hours(e.ra0)),
                        e.dec0.to_radians(),
                        1.0,
                    ),
                    upper_left: CelestialCoordinate::from_hours(wrap_hours(e.ra1), e.dec1),
                    lower_right: CelestialCoordinate::from_hours(wrap_hours(e.ra2), e.dec2),
                })
            }
            Self::Corners {
                upper_left,
                lower_right,
            } => {
                let ul = parse_corner(upper_left)?;
                let lr = parse_corner(lower_right)?;
                Ok(FrameSpec::from_corners(ul, lr))
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Atlas(index) => format!("Map {}", index),
            Self::Corners {
                upper_left,
                lower_right,
            } => format!("{} - {}", upper_left.trim(), lower_right.trim()),
        }
    }
}

/// Unit-scale frame and the corners that bound it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSpec {
    pub frame: MapFrame,
    pub upper_left: CelestialCoordinate,
    pub lower_right: CelestialCoordinate,
}

impl FrameSpec {
    /// Standard parallels at 70% and 30% of the declination span,
    /// centre at the midpoint of the corners.
    ///
    /// Right ascension grows to the left, so an upper-left RA below the
    /// lower-right one means the chart straddles 0h.
    pub fn from_corners(upper_left: CelestialCoordinate, lower_right: CelestialCoordinate) -> Self {
        let (mut ra1, dec1) = (upper_left.ra, upper_left.dec);
        let (ra2, dec2) = (lower_right.ra, lower_right.dec);
        if ra1 < ra2 {
            ra1 += TAU;
        }
        let frame = MapFrame::new(
            dec2 + 0.7 * (dec1 - dec2),
            dec2 + 0.3 * (dec1 - dec2),
            ((ra1 + ra2) / 2.0).rem_euclid(TAU),
            (dec1 + dec2) / 2.0,
            1.0,
        );
        Self {
            frame,
            upper_left,
            lower_right,
        }
    }
}

/// Physical size of the rendered chart
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sizing {
    /// Target chart width in length units
    pub width: f64,
    /// Plane points per length unit
    pub resolution: f64,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            width: 7.5,
            resolution: 72.0,
        }
    }
}

/// Everything fixed for one chart: projection, visible rectangle and title
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    pub frame: MapFrame,
    pub viewport: Viewport,
    pub label: String,
}

impl ChartLayout {
    pub fn new(selection: &MapSelection, sizing: Sizing) -> ChartResult<Self> {
        let spec = selection.resolve()?;
        Self::from_spec(&spec, sizing, selection.label())
    }

    /// Project the corners at unit scale to find the chart's angular width,
    /// pick the scale that fits the target width, then re-project.
    pub fn from_spec(spec: &FrameSpec, sizing: Sizing, label: String) -> ChartResult<Self> {
        let unit = spec.frame.with_scale(1.0);
        let unit_view = Viewport::from_corners(
            unit.project(spec.upper_left),
            unit.project(spec.lower_right),
        );
        let unit_width = unit_view.width();
        if !(unit_width > 0.0 && unit_view.height() > 0.0) {
            return Err(ChartError::DegenerateFrame);
        }

        let scale = sizing.width * sizing.resolution / unit_width;
        let frame = spec.frame.with_scale(scale);
        let viewport = Viewport::from_corners(
            frame.project(spec.upper_left),
            frame.project(spec.lower_right),
        );

        Ok(Self {
            frame,
            viewport,
            label,
        })
    }
}
