use std::f64::consts::FRAC_PI_2;

use crate::geo::{wrap_degrees, CelestialCoordinate, LineString};

/// Segments flatter than this (degrees of declination) get extra vertices
pub const HORIZONTAL_DEC_THRESHOLD_DEG: f64 = 0.2;
/// Vertices inserted into each flat segment
pub const HORIZONTAL_INSERTS: usize = 5;
/// Equal steps along a great-circle arc
pub const GREAT_CIRCLE_STEPS: usize = 10;

/// First index `i >= from` where `line[i] -> line[i + 1]` is nearly horizontal
pub fn find_horizontal(line: &[(f64, f64)], from: usize) -> Option<usize> {
    (from..line.len().saturating_sub(1))
        .find(|&i| (line[i + 1].1 - line[i].1).abs() < HORIZONTAL_DEC_THRESHOLD_DEG)
}

/// Insert evenly spaced vertices into every nearly horizontal segment.
///
/// A border running along a parallel is straight in `[ra, dec]` but curved
/// on a conic chart; with only its endpoints it would be drawn as a chord.
/// Original vertices are kept as they are.
pub fn densify_horizontal(line: &[(f64, f64)]) -> LineString {
    let mut out = Vec::with_capacity(line.len());
    let mut copied = 0;

    while let Some(i) = find_horizontal(line, copied) {
        out.extend_from_slice(&line[copied..=i]);
        let (a, b) = (line[i], line[i + 1]);
        // take the short way round when the segment straddles ±180
        let d_ra = wrap_degrees(b.0 - a.0);
        let d_dec = b.1 - a.1;
        for k in 1..=HORIZONTAL_INSERTS {
            let t = k as f64 / (HORIZONTAL_INSERTS + 1) as f64;
            out.push((a.0 + d_ra * t, a.1 + d_dec * t));
        }
        copied = i + 1;
    }
    out.extend_from_slice(&line[copied.min(line.len())..]);
    out
}

/// Angular distance between two sky positions (radians), haversine form so
/// coincident and close points come out exact
pub fn angular_separation(p1: CelestialCoordinate, p2: CelestialCoordinate) -> f64 {
    let half_dec = ((p2.dec - p1.dec) / 2.0).sin();
    let half_ra = ((p2.ra - p1.ra) / 2.0).sin();
    let hav = half_dec * half_dec + p1.dec.cos() * p2.dec.cos() * half_ra * half_ra;
    2.0 * hav.clamp(0.0, 1.0).sqrt().asin()
}

/// Sample the great circle through two catalog points.
///
/// The endpoints are put in right-ascension order, the spherical triangle
/// they form with the pole is solved for the arc length (law of cosines)
/// and the departure angle at the first point (four-parts formula), and the
/// arc is cut into [`GREAT_CIRCLE_STEPS`] equal pieces. The returned path
/// starts and ends with the two endpoints exactly; coincident endpoints give
/// just the two of them.
pub fn great_circle(p1: CelestialCoordinate, p2: CelestialCoordinate) -> Vec<CelestialCoordinate> {
    let (p1, p2) = if p1.ra <= p2.ra { (p1, p2) } else { (p2, p1) };

    // sides opposite each endpoint, measured from the pole
    let a = FRAC_PI_2 - p2.dec;
    let b = FRAC_PI_2 - p1.dec;
    let delta_ra = p2.ra - p1.ra;

    // law of cosines for the arc, evaluated as a haversine
    let c = angular_separation(p1, p2);
    if c < 1e-12 {
        return vec![p1, p2];
    }

    // four-parts: cos(b) cos(C) = sin(b) cot(a) - sin(C) cot(A), scaled by sin(a)
    let bearing = (delta_ra.sin() * a.sin()).atan2(b.sin() * a.cos() - b.cos() * a.sin() * delta_ra.cos());
    let (sin_bearing, cos_bearing) = bearing.sin_cos();
    let (sin_dec1, cos_dec1) = p1.dec.sin_cos();

    let mut path = Vec::with_capacity(GREAT_CIRCLE_STEPS + 1);
    path.push(p1);
    for step in 1..GREAT_CIRCLE_STEPS {
        let d = c * step as f64 / GREAT_CIRCLE_STEPS as f64;
        let (sin_d, cos_d) = d.sin_cos();
        let sin_dec = (sin_dec1 * cos_d + cos_dec1 * sin_d * cos_bearing).clamp(-1.0, 1.0);
        let dec = sin_dec.asin();
        let d_ra = (sin_bearing * sin_d * cos_dec1).atan2(cos_d - sin_dec1 * sin_dec);
        path.push(CelestialCoordinate::new(p1.ra + d_ra, dec));
    }
    path.push(p2);
    path
}
