//! Catalog object to symbol mapping and the default style table.

use glam::DVec2;

use crate::draw::{Rgb, Shape, Style};

/// Star disc radius `STAR_SIZE_BASE * STAR_SIZE_RATIO^k`
pub const STAR_SIZE_BASE: f64 = 10.0;
pub const STAR_SIZE_RATIO: f64 = 0.70;
/// Valid exponents; magnitudes brighter than 1.5 share the largest disc
pub const STAR_SIZE_MIN_STEP: i32 = 2;
pub const STAR_SIZE_MAX_STEP: i32 = 9;

/// Half-size of a deep-sky symbol in plane units
pub const DSO_SYMBOL_SIZE: f64 = 6.0;

/// Disc radius for a star of magnitude `mag`; brighter stars get larger discs
pub fn star_radius(mag: f64) -> f64 {
    let step = ((mag - 0.5).floor() as i32 + 2).clamp(STAR_SIZE_MIN_STEP, STAR_SIZE_MAX_STEP);
    STAR_SIZE_BASE * STAR_SIZE_RATIO.powi(step)
}

/// Object family behind a catalog type code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DsoFamily {
    Galaxy,
    GlobularCluster,
    PlanetaryNebula,
    OpenCluster,
    DiffuseNebula,
    Other,
}

impl DsoFamily {
    /// Case-insensitive type code lookup; anything unknown is `Other`
    pub fn from_type_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "g" | "gg" | "gx" | "s" | "sb" | "s0" | "sd" | "e" | "i" | "gal" => DsoFamily::Galaxy,
            "gc" | "glc" => DsoFamily::GlobularCluster,
            "pn" | "pl" => DsoFamily::PlanetaryNebula,
            "oc" | "oca" | "ocn" | "ast" | "cl" => DsoFamily::OpenCluster,
            "bn" | "en" | "rn" | "dn" | "sn" | "snr" | "hii" | "neb" | "c+n" => DsoFamily::DiffuseNebula,
            _ => DsoFamily::Other,
        }
    }
}

/// Glyph drawn for a deep-sky object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// Simplified marker mode: a plus sign for everything
    PlusMarker,
    GalaxyEllipse,
    CircleCross,
    CircleLongCross,
    DashedCircle,
    Square,
    FilledSquare,
}

struct SymbolRecord {
    family: DsoFamily,
    symbol: Symbol,
    style: Style,
}

const GALAXY_RED: Rgb = Rgb(0xc0, 0x20, 0x20);
const CLUSTER_GOLD: Rgb = Rgb(0xb0, 0x80, 0x00);
const NEBULA_GREEN: Rgb = Rgb(0x20, 0x80, 0x40);

const SYMBOL_TABLE: [SymbolRecord; 6] = [
    SymbolRecord {
        family: DsoFamily::Galaxy,
        symbol: Symbol::GalaxyEllipse,
        style: Style::stroke(GALAXY_RED, 1.0),
    },
    SymbolRecord {
        family: DsoFamily::GlobularCluster,
        symbol: Symbol::CircleCross,
        style: Style::stroke(CLUSTER_GOLD, 1.0),
    },
    SymbolRecord {
        family: DsoFamily::PlanetaryNebula,
        symbol: Symbol::CircleLongCross,
        style: Style::stroke(NEBULA_GREEN, 1.0),
    },
    SymbolRecord {
        family: DsoFamily::OpenCluster,
        symbol: Symbol::DashedCircle,
        style: Style::stroke(CLUSTER_GOLD, 1.0).dashed(2.0, 1.5),
    },
    SymbolRecord {
        family: DsoFamily::DiffuseNebula,
        symbol: Symbol::Square,
        style: Style::stroke(NEBULA_GREEN, 1.0),
    },
    SymbolRecord {
        family: DsoFamily::Other,
        symbol: Symbol::FilledSquare,
        style: Style::fill(Rgb::grey(90)),
    },
];

const MARKER_STYLE: Style = Style::stroke(Rgb::BLACK, 1.0);

fn record(family: DsoFamily) -> &'static SymbolRecord {
    // the table covers every family, `Other` last
    SYMBOL_TABLE
        .iter()
        .find(|r| r.family == family)
        .unwrap_or(&SYMBOL_TABLE[SYMBOL_TABLE.len() - 1])
}

/// Pick the glyph for a deep-sky object
pub fn select_symbol(type_code: &str, marker_override: bool) -> Symbol {
    if marker_override {
        return Symbol::PlusMarker;
    }
    record(DsoFamily::from_type_code(type_code)).symbol
}

impl Symbol {
    pub fn style(self) -> Style {
        match self {
            Symbol::PlusMarker => MARKER_STYLE,
            _ => SYMBOL_TABLE
                .iter()
                .find(|r| r.symbol == self)
                .map(|r| r.style)
                .unwrap_or(MARKER_STYLE),
        }
    }

    /// Geometry of the glyph centred on `c` with half-size `r`
    pub fn shapes(self, c: DVec2, r: f64) -> Vec<Shape> {
        let cross = |reach: f64| {
            [
                Shape::Line {
                    from: c - DVec2::new(reach, 0.0),
                    to: c + DVec2::new(reach, 0.0),
                },
                Shape::Line {
                    from: c - DVec2::new(0.0, reach),
                    to: c + DVec2::new(0.0, reach),
                },
            ]
        };
        let square = Shape::Rect {
            corner: c - DVec2::splat(r),
            width: 2.0 * r,
            height: 2.0 * r,
        };

        match self {
            Symbol::PlusMarker => cross(r).to_vec(),
            Symbol::GalaxyEllipse => vec![Shape::Ellipse {
                center: c,
                rx: r,
                ry: r / 2.0,
            }],
            Symbol::CircleCross => {
                let mut v = vec![Shape::Circle { center: c, radius: r }];
                v.extend(cross(r));
                v
            }
            Symbol::CircleLongCross => {
                let mut v = vec![Shape::Circle {
                    center: c,
                    radius: r * 0.6,
                }];
                v.extend(cross(r * 1.5));
                v
            }
            Symbol::DashedCircle => vec![Shape::Circle { center: c, radius: r }],
            Symbol::Square | Symbol::FilledSquare => vec![square],
        }
    }
}

/// Something the chart draws, with what its style depends on
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drawable<'a> {
    Star,
    Dso {
        type_code: &'a str,
        marker_override: bool,
    },
    DsoLabel,
    ConstLine,
    ConstBorder,
    GridLine,
    MwContour { level: i32 },
    MapLabel,
    Frame,
}

/// Default paint for every drawable
pub fn style_for(drawable: &Drawable<'_>) -> Style {
    match drawable {
        Drawable::Star => Style::fill(Rgb::BLACK).with_stroke(Rgb::WHITE, 0.5),
        Drawable::Dso {
            type_code,
            marker_override,
        } => select_symbol(type_code, *marker_override).style(),
        Drawable::DsoLabel => Style::fill(Rgb::grey(60)),
        Drawable::ConstLine => Style::stroke(Rgb::grey(110), 0.8),
        Drawable::ConstBorder => Style::stroke(Rgb::grey(150), 0.6).dashed(4.0, 2.0),
        Drawable::GridLine => Style::stroke(Rgb(0x9c, 0xb4, 0xd4), 0.4).dashed(2.0, 2.0),
        Drawable::MwContour { level } => Style::fill(milky_way_shade(*level)),
        Drawable::MapLabel => Style::fill(Rgb::BLACK),
        Drawable::Frame => Style::stroke(Rgb::BLACK, 1.0),
    }
}

/// Brighter contours are darker on the white page
pub fn milky_way_shade(level: i32) -> Rgb {
    Rgb::grey((250 - 12 * level.clamp(0, 10)) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_codes() {
        assert_eq!(DsoFamily::from_type_code("GC"), DsoFamily::GlobularCluster);
        assert_eq!(DsoFamily::from_type_code("gc"), DsoFamily::GlobularCluster);
        assert_eq!(DsoFamily::from_type_code("Sb"), DsoFamily::Galaxy);
        assert_eq!(DsoFamily::from_type_code("PN"), DsoFamily::PlanetaryNebula);
        assert_eq!(DsoFamily::from_type_code("oc"), DsoFamily::OpenCluster);
        assert_eq!(DsoFamily::from_type_code("snr"), DsoFamily::DiffuseNebula);
        assert_eq!(DsoFamily::from_type_code("ZZ"), DsoFamily::Other);
        assert_eq!(DsoFamily::from_type_code(""), DsoFamily::Other);
    }

    #[test]
    fn test_globular_is_circle_with_cross() {
        let symbol = select_symbol("GC", false);
        assert_eq!(symbol, Symbol::CircleCross);
        let shapes = symbol.shapes(DVec2::ZERO, 5.0);
        assert_eq!(shapes.len(), 3);
        assert!(matches!(shapes[0], Shape::Circle { radius, .. } if radius == 5.0));
        assert!(matches!(shapes[1], Shape::Line { .. }));
        assert!(matches!(shapes[2], Shape::Line { .. }));
    }

    #[test]
    fn test_unknown_code_is_filled_square() {
        let symbol = select_symbol("ZZ", false);
        assert_eq!(symbol, Symbol::FilledSquare);
        assert!(symbol.style().fill.is_some());
        let shapes = symbol.shapes(DVec2::new(10.0, 10.0), 2.0);
        assert_eq!(
            shapes,
            vec![Shape::Rect {
                corner: DVec2::new(8.0, 8.0),
                width: 4.0,
                height: 4.0
            }]
        );
    }

    #[test]
    fn test_marker_override_wins() {
        for code in ["GC", "s", "pn", "ZZ"] {
            assert_eq!(select_symbol(code, true), Symbol::PlusMarker);
        }
        assert_eq!(Symbol::PlusMarker.shapes(DVec2::ZERO, 3.0).len(), 2);
    }

    #[test]
    fn test_planetary_cross_reaches_past_circle() {
        let shapes = select_symbol("pn", false).shapes(DVec2::ZERO, 4.0);
        let Shape::Circle { radius, .. } = shapes[0] else {
            panic!("expected circle first");
        };
        let Shape::Line { from, to } = shapes[1] else {
            panic!("expected cross arm");
        };
        assert!((to - from).length() / 2.0 > radius);
    }

    #[test]
    fn test_open_cluster_dashed() {
        let symbol = select_symbol("OC", false);
        assert_eq!(symbol, Symbol::DashedCircle);
        assert!(symbol.style().dash.is_some());
        assert_eq!(select_symbol("en", false), Symbol::Square);
        assert_eq!(select_symbol("S0", false), Symbol::GalaxyEllipse);
    }

    #[test]
    fn test_star_radius_sequence() {
        let largest = STAR_SIZE_BASE * STAR_SIZE_RATIO.powi(STAR_SIZE_MIN_STEP);
        let smallest = STAR_SIZE_BASE * STAR_SIZE_RATIO.powi(STAR_SIZE_MAX_STEP);
        assert!((star_radius(1.0) - largest).abs() < 1e-12);
        assert!((star_radius(-1.5) - largest).abs() < 1e-12);
        assert!((star_radius(20.0) - smallest).abs() < 1e-12);
        // floor(2.0 - 0.5) + 2 = 3
        assert!((star_radius(2.0) - 10.0 * 0.7f64.powi(3)).abs() < 1e-12);

        let mut prev = f64::INFINITY;
        for tenth in -20..=80 {
            let r = star_radius(tenth as f64 / 10.0);
            assert!(r <= prev);
            prev = r;
        }
    }

    #[test]
    fn test_milky_way_shade_darkens() {
        assert!(milky_way_shade(5).0 < milky_way_shade(1).0);
        assert_eq!(milky_way_shade(-3), milky_way_shade(0));
    }

    #[test]
    fn test_dso_style_follows_symbol() {
        let dso = |type_code, marker_override| Drawable::Dso {
            type_code,
            marker_override,
        };
        assert_eq!(style_for(&dso("GC", false)), select_symbol("GC", false).style());
        assert_eq!(style_for(&dso("ZZ", false)), select_symbol("zz", false).style());
        assert_eq!(style_for(&dso("Sb", true)), select_symbol("PN", true).style());
        assert!(style_for(&Drawable::Frame).fill.is_none());
    }
}
