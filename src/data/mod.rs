mod builtin;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{feature::Id, Feature, GeoJson, Geometry, JsonObject, JsonValue, Value};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::geo::LineString;

pub use builtin::builtin_sky;

/// A star, position in degrees
#[derive(Clone, Debug, PartialEq)]
pub struct StarRecord {
    pub ra: f64,
    pub dec: f64,
    pub mag: f64,
}

/// A deep-sky object, position in degrees
#[derive(Clone, Debug, PartialEq)]
pub struct DsoRecord {
    pub ra: f64,
    pub dec: f64,
    pub type_code: String,
    pub mag: f64,
    pub name: String,
}

/// One Milky Way brightness ring
#[derive(Clone, Debug, PartialEq)]
pub struct ContourRing {
    pub level: i32,
    pub ring: LineString,
}

/// Everything a chart can draw, already materialized
#[derive(Clone, Debug, Default)]
pub struct SkyCatalog {
    pub stars: Vec<StarRecord>,
    pub messier: Vec<DsoRecord>,
    pub dsos: Vec<DsoRecord>,
    pub herschel: Vec<DsoRecord>,
    pub constellation_lines: Vec<LineString>,
    pub constellation_borders: Vec<LineString>,
    pub milky_way: Vec<ContourRing>,
}

impl SkyCatalog {
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
            && self.messier.is_empty()
            && self.dsos.is_empty()
            && self.herschel.is_empty()
            && self.constellation_lines.is_empty()
            && self.constellation_borders.is_empty()
            && self.milky_way.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
enum CatalogFile {
    Stars,
    Messier,
    Dsos,
    Herschel,
    Lines,
    Borders,
    MilkyWay,
}

const CATALOG_FILES: [(&str, CatalogFile); 7] = [
    ("stars.json", CatalogFile::Stars),
    ("messier.json", CatalogFile::Messier),
    ("dsos.json", CatalogFile::Dsos),
    ("herschel.json", CatalogFile::Herschel),
    ("constellations.lines.json", CatalogFile::Lines),
    ("constellations.borders.json", CatalogFile::Borders),
    ("mw.json", CatalogFile::MilkyWay),
];

/// Load every catalog file found in `data_dir`.
/// Files are parsed in parallel and merged in table order. Missing files are
/// skipped; unreadable ones are logged and skipped.
pub fn load_catalog(data_dir: &Path) -> SkyCatalog {
    let parsed: Vec<(&str, CatalogFile, Result<GeoJson>)> = CATALOG_FILES
        .par_iter()
        .filter_map(|&(filename, kind)| {
            let path = data_dir.join(filename);
            if !path.exists() {
                debug!(file = filename, "catalog file not present");
                return None;
            }
            Some((filename, kind, read_geojson(&path)))
        })
        .collect();

    let mut catalog = SkyCatalog::default();
    for (filename, kind, result) in parsed {
        match result {
            Ok(geojson) => merge_file(&mut catalog, &geojson, filename, kind),
            Err(e) => warn!(file = filename, error = %e, "failed to load catalog file"),
        }
    }

    info!(
        stars = catalog.stars.len(),
        messier = catalog.messier.len(),
        dsos = catalog.dsos.len(),
        herschel = catalog.herschel.len(),
        lines = catalog.constellation_lines.len(),
        borders = catalog.constellation_borders.len(),
        contours = catalog.milky_way.len(),
        "catalog loaded"
    );
    catalog
}

fn read_geojson(path: &Path) -> Result<GeoJson> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(geojson)
}

fn merge_file(catalog: &mut SkyCatalog, geojson: &GeoJson, name: &str, kind: CatalogFile) {
    match kind {
        CatalogFile::Stars => {
            let (stars, skipped) = collect_points(geojson, star_from_feature);
            report_skipped(name, skipped);
            catalog.stars.extend(stars);
        }
        CatalogFile::Messier | CatalogFile::Dsos | CatalogFile::Herschel => {
            let (objects, skipped) = collect_points(geojson, dso_from_feature);
            report_skipped(name, skipped);
            let target = match kind {
                CatalogFile::Messier => &mut catalog.messier,
                CatalogFile::Herschel => &mut catalog.herschel,
                _ => &mut catalog.dsos,
            };
            target.extend(objects);
        }
        CatalogFile::Lines => {
            process_geojson_lines(geojson, |line| catalog.constellation_lines.push(line));
        }
        CatalogFile::Borders => {
            process_geojson_lines(geojson, |line| catalog.constellation_borders.push(line));
        }
        CatalogFile::MilkyWay => {
            for feature in features(geojson) {
                let Some(level) = contour_level(feature) else {
                    continue;
                };
                if let Some(ref geometry) = feature.geometry {
                    collect_contours(geometry, level, &mut catalog.milky_way);
                }
            }
        }
    }
}

fn report_skipped(file: &str, skipped: usize) {
    if skipped > 0 {
        debug!(file, skipped, "records without position, type or magnitude skipped");
    }
}

fn features(geojson: &GeoJson) -> Vec<&Feature> {
    match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.iter().collect(),
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => Vec::new(),
    }
}

/// Apply `parse` to every feature, counting the ones it rejects
fn collect_points<T>(geojson: &GeoJson, parse: fn(&Feature) -> Option<T>) -> (Vec<T>, usize) {
    let all = features(geojson);
    let total = all.len();
    let parsed: Vec<T> = all.into_iter().filter_map(parse).collect();
    let skipped = total - parsed.len();
    (parsed, skipped)
}

fn point_of(feature: &Feature) -> Option<(f64, f64)> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => Some((coords[0], coords[1])),
        _ => None,
    }
}

fn property<'a>(props: Option<&'a JsonObject>, key: &str) -> Option<&'a JsonValue> {
    props.and_then(|p| p.get(key))
}

fn star_from_feature(feature: &Feature) -> Option<StarRecord> {
    let (ra, dec) = point_of(feature)?;
    let mag = property(feature.properties.as_ref(), "mag")?.as_f64()?;
    Some(StarRecord { ra, dec, mag })
}

fn dso_from_feature(feature: &Feature) -> Option<DsoRecord> {
    let (ra, dec) = point_of(feature)?;
    let props = feature.properties.as_ref();
    let type_code = property(props, "type")?.as_str()?.to_string();
    let mag = property(props, "mag")?.as_f64()?;

    let name = property(props, "name")
        .or_else(|| property(props, "desig"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| match &feature.id {
            Some(Id::String(s)) => Some(s.clone()),
            Some(Id::Number(n)) => Some(n.to_string()),
            None => None,
        })
        .unwrap_or_default();

    Some(DsoRecord {
        ra,
        dec,
        type_code,
        mag,
        name,
    })
}

/// Brightness level from `properties.level`, or the trailing digit of the
/// feature id (`ol1`..`ol5`)
fn contour_level(feature: &Feature) -> Option<i32> {
    if let Some(level) = property(feature.properties.as_ref(), "level").and_then(|v| v.as_i64()) {
        return Some(level as i32);
    }
    match &feature.id {
        Some(Id::String(s)) => s
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as i32),
        Some(Id::Number(n)) => n.as_i64().map(|n| n as i32),
        None => None,
    }
}

fn ring_of(coords: &[Vec<f64>]) -> LineString {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

/// The first ring of a patch keeps the feature level; inner rings are one
/// level lighter.
pub fn patch_rings(level: i32, rings: impl IntoIterator<Item = LineString>, out: &mut Vec<ContourRing>) {
    for (i, ring) in rings.into_iter().enumerate() {
        let level = if i == 0 { level } else { level - 1 };
        out.push(ContourRing { level, ring });
    }
}

fn collect_contours(geometry: &Geometry, level: i32, out: &mut Vec<ContourRing>) {
    match &geometry.value {
        Value::Polygon(rings) => patch_rings(level, rings.iter().map(|r| ring_of(r)), out),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                patch_rings(level, rings.iter().map(|r| ring_of(r)), out);
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_contours(g, level, out);
            }
        }
        _ => {}
    }
}

/// Walk a GeoJSON document and hand every line to `add_line`
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(LineString),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(ring_of(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(ring_of(coords));
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(ring_of(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(ring_of(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GeoJson {
        let mut bytes = json.as_bytes().to_vec();
        simd_json::serde::from_slice(&mut bytes).unwrap()
    }

    #[test]
    fn test_stars_skip_incomplete_records() {
        let geojson = parse(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","id":1,"properties":{"mag":1.2},"geometry":{"type":"Point","coordinates":[30.0,10.0]}},
                {"type":"Feature","id":2,"properties":{},"geometry":{"type":"Point","coordinates":[31.0,11.0]}},
                {"type":"Feature","id":3,"properties":{"mag":4.0},"geometry":null}
            ]}"#,
        );
        let (stars, skipped) = collect_points(&geojson, star_from_feature);
        assert_eq!(stars, vec![StarRecord { ra: 30.0, dec: 10.0, mag: 1.2 }]);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_dso_name_fallbacks() {
        let geojson = parse(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","id":"M13","properties":{"type":"gc","mag":5.8},"geometry":{"type":"Point","coordinates":[-109.6,36.5]}},
                {"type":"Feature","id":"x","properties":{"type":"pn","mag":8.8,"name":"NGC 6826"},"geometry":{"type":"Point","coordinates":[-63.8,50.5]}},
                {"type":"Feature","id":"y","properties":{"mag":8.8},"geometry":{"type":"Point","coordinates":[1.0,1.0]}}
            ]}"#,
        );
        let (dsos, skipped) = collect_points(&geojson, dso_from_feature);
        assert_eq!(skipped, 1);
        assert_eq!(dsos[0].name, "M13");
        assert_eq!(dsos[0].type_code, "gc");
        assert_eq!(dsos[1].name, "NGC 6826");
    }

    #[test]
    fn test_milky_way_levels() {
        let geojson = parse(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","id":"ol3","properties":{},"geometry":{"type":"MultiPolygon","coordinates":[
                    [[[0,0],[10,0],[10,10],[0,0]],[[2,2],[4,2],[4,4],[2,2]]],
                    [[[20,0],[30,0],[30,10],[20,0]]]
                ]}}
            ]}"#,
        );
        let mut rings = Vec::new();
        for feature in features(&geojson) {
            let level = contour_level(feature).unwrap();
            collect_contours(feature.geometry.as_ref().unwrap(), level, &mut rings);
        }
        let levels: Vec<i32> = rings.iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![3, 2, 3]);
        assert_eq!(rings[1].ring[0], (2.0, 2.0));
    }

    #[test]
    fn test_lines_from_multilinestring() {
        let geojson = parse(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","id":"Ori","properties":{},"geometry":{"type":"MultiLineString","coordinates":[
                    [[88.8,7.4],[81.3,6.3]],[[85.2,-1.9],[84.1,-1.2],[83.0,-0.3]]
                ]}}
            ]}"#,
        );
        let mut lines = Vec::new();
        process_geojson_lines(&geojson, |l| lines.push(l));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].len(), 3);
    }

    #[test]
    fn test_load_catalog_from_directory() {
        let dir = std::env::temp_dir().join(format!("starchart-catalog-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("stars.json"),
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","id":1,"properties":{"mag":0.4},"geometry":{"type":"Point","coordinates":[88.8,7.4]}}
            ]}"#,
        )
        .unwrap();
        fs::write(dir.join("messier.json"), "not json").unwrap();

        let catalog = load_catalog(&dir);
        assert_eq!(catalog.stars.len(), 1);
        assert!(catalog.messier.is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory_is_empty_catalog() {
        let catalog = load_catalog(Path::new("/nonexistent/starchart-data"));
        assert!(catalog.is_empty());
    }
}
