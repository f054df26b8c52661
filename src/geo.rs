use std::f64::consts::{PI, TAU};

use crate::error::{ChartError, ChartResult};

/// Degrees of right ascension per hour
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// A catalog polyline as `[ra°, dec°]` pairs
pub type LineString = Vec<(f64, f64)>;

/// A position on the celestial sphere, both angles in radians.
/// `ra` is left unbounded; the projector normalizes it around the chart centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CelestialCoordinate {
    pub ra: f64,
    pub dec: f64,
}

impl CelestialCoordinate {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Catalog positions come as `[ra°, dec°]`
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self::new(ra_deg.to_radians(), dec_deg.to_radians())
    }

    pub fn from_hours(ra_hours: f64, dec_deg: f64) -> Self {
        Self::new(hours_to_radians(ra_hours), dec_deg.to_radians())
    }

    pub fn ra_hours(&self) -> f64 {
        radians_to_hours(self.ra)
    }

    pub fn dec_degrees(&self) -> f64 {
        self.dec.to_degrees()
    }
}

#[inline(always)]
pub fn hours_to_radians(hours: f64) -> f64 {
    (hours * DEGREES_PER_HOUR).to_radians()
}

#[inline(always)]
pub fn radians_to_hours(rad: f64) -> f64 {
    rad.to_degrees() / DEGREES_PER_HOUR
}

/// Wrap an angle in degrees into (-180, 180]
#[inline(always)]
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Wrap hours into [0, 24)
#[inline(always)]
pub fn wrap_hours(hours: f64) -> f64 {
    hours.rem_euclid(24.0)
}

/// Shift `ra` by whole turns until it lies within ±π of `ra0`
#[inline(always)]
pub fn normalize_ra(mut ra: f64, ra0: f64) -> f64 {
    while ra0 - ra > PI {
        ra += TAU;
    }
    while ra - ra0 > PI {
        ra -= TAU;
    }
    ra
}

/// Parse a compact corner coordinate `HHMM.M±DDMM`, e.g. `0200.0+2000`.
///
/// Two-digit hours `00`..`23`, minutes with one decimal, a mandatory sign, two-digit
/// degrees and two-digit arcminutes.
pub fn parse_corner(input: &str) -> ChartResult<CelestialCoordinate> {
    let s = input.trim();
    if !s.is_ascii() || s.len() != 11 {
        return Err(ChartError::coordinate_parse(
            input,
            "expected 11 characters in the form HHMM.M±DDMM",
        ));
    }

    let hours = parse_digits(input, &s[0..2], "hours")?;
    if s.as_bytes()[4] != b'.' {
        return Err(ChartError::coordinate_parse(input, "missing minute decimal point"));
    }
    let minutes: f64 = s[2..6]
        .parse()
        .map_err(|_| ChartError::coordinate_parse(input, "bad right ascension minutes"))?;
    let sign = match s.as_bytes()[6] {
        b'+' => 1.0,
        b'-' => -1.0,
        _ => return Err(ChartError::coordinate_parse(input, "declination sign must be + or -")),
    };
    let degrees = parse_digits(input, &s[7..9], "degrees")?;
    let arcmin = parse_digits(input, &s[9..11], "arcminutes")?;

    if hours >= 24.0 || minutes >= 60.0 || minutes < 0.0 {
        return Err(ChartError::coordinate_parse(input, "right ascension out of range"));
    }
    if arcmin >= 60.0 {
        return Err(ChartError::coordinate_parse(input, "arcminutes out of range"));
    }
    let dec = degrees + arcmin / 60.0;
    if dec > 90.0 {
        return Err(ChartError::coordinate_parse(input, "declination beyond the pole"));
    }

    Ok(CelestialCoordinate::from_hours(hours + minutes / 60.0, sign * dec))
}

fn parse_digits(input: &str, field: &str, what: &str) -> ChartResult<f64> {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChartError::coordinate_parse(input, format!("{} must be two digits", what)));
    }
    field
        .parse::<u32>()
        .map(f64::from)
        .map_err(|_| ChartError::coordinate_parse(input, format!("bad {}", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_corner() {
        let c = parse_corner("0200.0+2000").unwrap();
        assert!(approx_eq(c.ra_hours(), 2.0));
        assert!(approx_eq(c.dec_degrees(), 20.0));

        let c = parse_corner("1230.6-0545").unwrap();
        assert!(approx_eq(c.ra_hours(), 12.51));
        assert!(approx_eq(c.dec_degrees(), -5.75));
    }

    #[test]
    fn test_parse_corner_rejects_malformed() {
        for bad in ["", "0200.0*2000", "02000+2000", "0200.0+20", "2500.0+0000", "2430.0+0000", "2400.0+0000", "0260.0+0000", "0200.0+9100", "0a00.0+2000"] {
            assert!(
                matches!(parse_corner(bad), Err(ChartError::CoordinateParse { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_wrap_degrees() {
        assert!(approx_eq(wrap_degrees(190.0), -170.0));
        assert!(approx_eq(wrap_degrees(-180.0), 180.0));
        assert!(approx_eq(wrap_degrees(180.0), 180.0));
        assert!(approx_eq(wrap_degrees(30.0), 30.0));
        assert!(approx_eq(wrap_degrees(-540.0), 180.0));
    }

    #[test]
    fn test_normalize_ra() {
        let ra0 = hours_to_radians(23.0);
        let ra = normalize_ra(hours_to_radians(1.0), ra0);
        assert!(approx_eq(radians_to_hours(ra), 25.0));
        let ra = normalize_ra(hours_to_radians(-10.0), 0.0);
        assert!(approx_eq(radians_to_hours(ra), -10.0));
    }

    #[test]
    fn test_hour_conversions() {
        assert!(approx_eq(hours_to_radians(12.0), PI));
        assert!(approx_eq(radians_to_hours(PI / 2.0), 6.0));
        assert!(approx_eq(wrap_hours(-0.2), 23.8));
    }
}
