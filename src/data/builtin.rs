use super::{patch_rings, DsoRecord, SkyCatalog, StarRecord};
use crate::geo::{wrap_degrees, LineString};

/// Right ascension and declination of the north galactic pole (degrees)
const GALACTIC_POLE: (f64, f64) = (192.86, 27.13);

fn star(ra: f64, dec: f64, mag: f64) -> StarRecord {
    StarRecord { ra, dec, mag }
}

fn dso(name: &str, type_code: &str, ra: f64, dec: f64, mag: f64) -> DsoRecord {
    DsoRecord {
        ra: wrap_degrees(ra),
        dec,
        type_code: type_code.to_string(),
        mag,
        name: name.to_string(),
    }
}

/// Declination of the galactic equator at right ascension `ra` (degrees)
fn galactic_equator_dec(ra: f64) -> f64 {
    let (ra_p, dec_p) = (GALACTIC_POLE.0.to_radians(), GALACTIC_POLE.1.to_radians());
    (-(ra.to_radians() - ra_p).cos() / dec_p.tan()).atan().to_degrees()
}

/// A band `half_width` degrees either side of the galactic equator, cut at
/// ±180° the way contour catalogs are: along the top edge, down the seam,
/// back along the bottom edge, up the seam.
fn galactic_band(half_width: f64) -> LineString {
    let mut ring = Vec::new();
    for ra in (-180..=180).step_by(2) {
        let ra = ra as f64;
        ring.push((ra, galactic_equator_dec(ra) + half_width));
    }
    for ra in (-180..=180).rev().step_by(2) {
        let ra = ra as f64;
        ring.push((ra, galactic_equator_dec(ra) - half_width));
    }
    ring.push(ring[0]);
    ring
}

/// Small embedded sky: the brightest stars, a few figures, one object of
/// every family and a two-level Milky Way. Used when no catalog files load.
pub fn builtin_sky() -> SkyCatalog {
    let mut sky = SkyCatalog::default();

    #[rustfmt::skip]
    let bright = [
        // (ra°, dec°, mag)
        (101.287, -16.716, -1.46), (95.988, -52.696, -0.74), (213.915, 19.182, -0.05),
        (279.234, 38.784, 0.03), (79.172, 45.998, 0.08), (78.634, -8.202, 0.13),
        (114.825, 5.225, 0.34), (88.793, 7.407, 0.42), (24.429, -57.237, 0.46),
        (210.956, -60.373, 0.61), (297.696, 8.868, 0.76), (68.980, 16.509, 0.86),
        (201.298, -11.161, 0.97), (247.352, -26.432, 1.06), (116.329, 28.026, 1.14),
        (344.413, -29.622, 1.16), (310.358, 45.280, 1.25), (152.093, 11.967, 1.35),
        (113.650, 31.888, 1.58), (81.283, 6.350, 1.64), (84.053, -1.202, 1.69),
        (85.190, -1.943, 1.74), (51.081, 49.861, 1.79), (37.955, 89.264, 1.98),
        (31.793, 23.463, 2.00), (10.897, -17.987, 2.04), (17.433, 35.621, 2.05),
        (2.097, 29.090, 2.06), (86.939, -9.670, 2.09), (30.975, 42.330, 2.10),
        (47.042, 40.956, 2.12), (83.002, -0.299, 2.23), (10.127, 56.537, 2.24),
        (2.295, 59.150, 2.28), (345.944, 28.083, 2.42), (14.177, 60.717, 2.47),
        (346.190, 15.205, 2.49), (45.570, 4.090, 2.54), (21.454, 60.235, 2.68),
        (3.309, 15.184, 2.83), (28.599, 63.670, 3.37),
    ];
    sky.stars = bright
        .iter()
        .map(|&(ra, dec, mag)| star(wrap_degrees(ra), dec, mag))
        .collect();

    #[rustfmt::skip]
    let figures: [&[(f64, f64)]; 8] = [
        // Orion shoulders, belt and legs
        &[(88.793, 7.407), (81.283, 6.350)],
        &[(85.190, -1.943), (84.053, -1.202), (83.002, -0.299)],
        &[(88.793, 7.407), (85.190, -1.943), (86.939, -9.670)],
        &[(81.283, 6.350), (83.002, -0.299), (78.634, -8.202)],
        // Cassiopeia
        &[(2.295, 59.150), (10.127, 56.537), (14.177, 60.717), (21.454, 60.235), (28.599, 63.670)],
        // Great Square of Pegasus
        &[(2.097, 29.090), (345.944, 28.083), (346.190, 15.205), (3.309, 15.184), (2.097, 29.090)],
        // Andromeda
        &[(2.097, 29.090), (17.433, 35.621), (30.975, 42.330)],
        // Gemini twins
        &[(113.650, 31.888), (116.329, 28.026)],
    ];
    sky.constellation_lines = figures
        .iter()
        .map(|f| f.iter().map(|&(ra, dec)| (wrap_degrees(ra), dec)).collect())
        .collect();

    // coarse outline of Orion
    sky.constellation_borders = vec![vec![
        (73.0, 15.5),
        (73.0, 22.8),
        (93.5, 22.8),
        (93.5, 12.0),
        (94.5, 12.0),
        (94.5, -11.0),
        (76.0, -11.0),
        (76.0, 0.0),
        (72.0, 0.0),
        (72.0, 15.5),
        (73.0, 15.5),
    ]];

    sky.messier = vec![
        dso("M31", "s", 10.685, 41.269, 3.4),
        dso("M42", "en", 83.822, -5.391, 4.0),
        dso("M13", "gc", 250.423, 36.461, 5.8),
        dso("M57", "pn", 283.396, 33.029, 8.8),
        dso("M45", "oc", 56.750, 24.117, 1.6),
        dso("M1", "snr", 83.633, 22.015, 8.4),
        dso("M44", "oc", 130.100, 19.670, 3.7),
        dso("M81", "s", 148.888, 69.065, 6.9),
    ];
    sky.dsos = vec![
        dso("NGC 253", "s", 11.888, -25.288, 7.1),
        dso("NGC 869", "oc", 34.750, 57.130, 4.3),
        dso("NGC 7293", "pn", 337.411, -20.837, 7.6),
        dso("NGC 2070", "en", 84.676, -69.101, 8.0),
        dso("NGC 5139", "gc", 201.697, -47.480, 3.7),
        dso("NGC 104", "gc", 6.024, -72.081, 4.0),
        dso("NGC 1502", "ast", 61.940, 62.330, 6.9),
    ];
    sky.herschel = vec![
        dso("NGC 2392", "pn", 112.295, 20.912, 9.1),
        dso("NGC 7662", "pn", 351.473, 42.535, 8.6),
        dso("NGC 2903", "s", 143.042, 21.501, 9.0),
        dso("NGC 6826", "pn", 296.200, 50.525, 8.8),
        dso("NGC 457", "oc", 19.875, 58.330, 6.4),
    ];

    patch_rings(2, [galactic_band(9.0), galactic_band(4.0)], &mut sky.milky_way);
    sky
}
