use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::draw::LayerKind;
use crate::error::{ChartError, ChartResult};
use crate::map::frame::{MapSelection, Sizing};
use crate::map::renderer::DisplaySettings;

/// Atlas chart shown when nothing selects one
pub const DEFAULT_ATLAS_MAP: i64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Interactive braille preview
    Terminal,
    /// One SVG document on stdout
    Svg,
}

impl FromStr for OutputMode {
    type Err = ChartError;

    fn from_str(s: &str) -> ChartResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tui" | "terminal" => Ok(Self::Terminal),
            "svg" => Ok(Self::Svg),
            _ => Err(ChartError::invalid_config("STARCHART_OUTPUT", s)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub selection: MapSelection,
    pub sizing: Sizing,
    pub data_dir: PathBuf,
    pub settings: DisplaySettings,
    pub output: OutputMode,
}

impl ChartConfig {
    /// Read `STARCHART_*` variables from the process environment
    pub fn from_env() -> ChartResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset and empty values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ChartResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let index = get("STARCHART_MAP").map(|v| parse_value::<i64>("STARCHART_MAP", &v)).transpose()?;
        let upper_left = get("STARCHART_UL");
        let lower_right = get("STARCHART_LR");
        let selection = if index.is_none() && upper_left.is_none() && lower_right.is_none() {
            MapSelection::Atlas(DEFAULT_ATLAS_MAP)
        } else {
            MapSelection::from_parts(index, upper_left, lower_right)?
        };

        let defaults = Sizing::default();
        let sizing = Sizing {
            width: parse_or("STARCHART_WIDTH", get("STARCHART_WIDTH"), defaults.width)?,
            resolution: parse_or("STARCHART_RESOLUTION", get("STARCHART_RESOLUTION"), defaults.resolution)?,
        };
        if !(sizing.width > 0.0) {
            return Err(ChartError::invalid_config("STARCHART_WIDTH", &sizing.width.to_string()));
        }
        if !(sizing.resolution > 0.0) {
            return Err(ChartError::invalid_config(
                "STARCHART_RESOLUTION",
                &sizing.resolution.to_string(),
            ));
        }

        let mut settings = DisplaySettings::default();
        settings.star_limit = parse_or("STARCHART_STAR_LIMIT", get("STARCHART_STAR_LIMIT"), settings.star_limit)?;
        settings.dso_limit = parse_or("STARCHART_DSO_LIMIT", get("STARCHART_DSO_LIMIT"), settings.dso_limit)?;
        if let Some(v) = get("STARCHART_MARKERS") {
            settings.marker_override = parse_flag("STARCHART_MARKERS", &v)?;
        }
        if let Some(v) = get("STARCHART_HIDE") {
            for name in v.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                let kind = LayerKind::from_name(name)
                    .ok_or_else(|| ChartError::invalid_config("STARCHART_HIDE", name))?;
                settings.set_layer(kind, false);
            }
        }

        let output = match get("STARCHART_OUTPUT") {
            Some(v) => v.parse()?,
            None => OutputMode::Terminal,
        };

        Ok(Self {
            selection,
            sizing,
            data_dir: get("STARCHART_DATA").map_or_else(|| PathBuf::from("data"), PathBuf::from),
            settings,
            output,
        })
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> ChartResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ChartError::invalid_config(key, value))
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> ChartResult<T> {
    value.map_or(Ok(default), |v| parse_value(key, &v))
}

fn parse_flag(key: &str, value: &str) -> ChartResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ChartError::invalid_config(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ChartResult<ChartConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ChartConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.selection, MapSelection::Atlas(DEFAULT_ATLAS_MAP));
        assert_eq!(cfg.sizing, Sizing::default());
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.settings, DisplaySettings::default());
        assert_eq!(cfg.output, OutputMode::Terminal);
    }

    #[test]
    fn test_map_selection() {
        let cfg = config(&[("STARCHART_MAP", "17")]).unwrap();
        assert_eq!(cfg.selection, MapSelection::Atlas(17));

        let cfg = config(&[("STARCHART_UL", "0200.0+2000"), ("STARCHART_LR", "0000.0-2000")]).unwrap();
        assert_eq!(
            cfg.selection,
            MapSelection::Corners {
                upper_left: "0200.0+2000".into(),
                lower_right: "0000.0-2000".into(),
            }
        );

        // index wins
        let cfg = config(&[("STARCHART_MAP", "3"), ("STARCHART_UL", "0200.0+2000")]).unwrap();
        assert_eq!(cfg.selection, MapSelection::Atlas(3));
    }

    #[test]
    fn test_single_corner_is_missing_selection() {
        assert_eq!(
            config(&[("STARCHART_UL", "0200.0+2000")]),
            Err(ChartError::MissingMapSelection)
        );
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            config(&[("STARCHART_MAP", "ten")]),
            Err(ChartError::InvalidConfig { .. })
        ));
        assert!(matches!(
            config(&[("STARCHART_WIDTH", "-2")]),
            Err(ChartError::InvalidConfig { .. })
        ));
        assert!(matches!(
            config(&[("STARCHART_HIDE", "grid,planets")]),
            Err(ChartError::InvalidConfig { key, value }) if key == "STARCHART_HIDE" && value == "planets"
        ));
        assert!(matches!(
            config(&[("STARCHART_OUTPUT", "pdf")]),
            Err(ChartError::InvalidConfig { .. })
        ));
        assert!(matches!(
            config(&[("STARCHART_MARKERS", "maybe")]),
            Err(ChartError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_display_settings() {
        let cfg = config(&[
            ("STARCHART_HIDE", "grid, milky-way"),
            ("STARCHART_MARKERS", "true"),
            ("STARCHART_STAR_LIMIT", "5"),
            ("STARCHART_DSO_LIMIT", "9.5"),
            ("STARCHART_OUTPUT", "SVG"),
            ("STARCHART_DATA", "/srv/sky"),
        ])
        .unwrap();
        assert!(!cfg.settings.show_grid);
        assert!(!cfg.settings.show_milky_way);
        assert!(cfg.settings.show_stars);
        assert!(cfg.settings.marker_override);
        assert_eq!(cfg.settings.star_limit, 5.0);
        assert_eq!(cfg.settings.dso_limit, 9.5);
        assert_eq!(cfg.output, OutputMode::Svg);
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/sky"));
    }

    #[test]
    fn test_empty_values_take_defaults() {
        let cfg = config(&[("STARCHART_MAP", " "), ("STARCHART_WIDTH", "")]).unwrap();
        assert_eq!(cfg.selection, MapSelection::Atlas(DEFAULT_ATLAS_MAP));
        assert_eq!(cfg.sizing.width, 7.5);
    }
}
