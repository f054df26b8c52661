use glam::DVec2;

use crate::geo::{normalize_ra, CelestialCoordinate};

/// Below this `|phi1 + phi2|` the cone opens into a cylinder
pub const CYLINDRICAL_EPSILON: f64 = 0.001;

/// Project a sky position onto the chart plane.
///
/// Conic equal-area (Albers) about `(ra0, dec0)` with standard parallels
/// `phi1`/`phi2`, degenerating to a cylinder when the parallels are symmetric
/// about the equator. All angles in radians. Plane y grows downward.
pub fn project(
    ra: f64,
    dec: f64,
    phi1: f64,
    phi2: f64,
    ra0: f64,
    dec0: f64,
    scale: f64,
) -> (f64, f64) {
    let ra = normalize_ra(ra, ra0);

    let (x, y) = if (phi1 + phi2).abs() < CYLINDRICAL_EPSILON {
        (ra0 - ra, dec.tan() * phi1.cos())
    } else {
        let n = (phi1.sin() + phi2.sin()) / 2.0;
        let theta = n * (ra0 - ra);
        let c = phi1.cos().powi(2) + 2.0 * n * phi1.sin();
        let rho = (c - 2.0 * n * dec.sin()).sqrt() / n;
        let rho0 = (c - 2.0 * n * dec0.sin()).sqrt() / n;
        (rho * theta.sin(), rho0 - rho * theta.cos())
    };

    (scale * x, -scale * y)
}

/// Fixed projection parameters for one chart. Built once, read by every layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapFrame {
    /// Standard parallels (radians)
    pub phi1: f64,
    pub phi2: f64,
    /// Projection centre (radians)
    pub ra0: f64,
    pub dec0: f64,
    /// Plane units per radian
    pub scale: f64,
}

impl MapFrame {
    pub fn new(phi1: f64, phi2: f64, ra0: f64, dec0: f64, scale: f64) -> Self {
        Self {
            phi1,
            phi2,
            ra0,
            dec0,
            scale,
        }
    }

    /// Same frame at a different scale
    pub fn with_scale(&self, scale: f64) -> Self {
        Self { scale, ..*self }
    }

    pub fn is_cylindrical(&self) -> bool {
        (self.phi1 + self.phi2).abs() < CYLINDRICAL_EPSILON
    }

    #[inline(always)]
    pub fn project(&self, coord: CelestialCoordinate) -> DVec2 {
        let (x, y) = project(
            coord.ra, coord.dec, self.phi1, self.phi2, self.ra0, self.dec0, self.scale,
        );
        DVec2::new(x, y)
    }

    /// Project a catalog position given in degrees
    #[inline(always)]
    pub fn project_degrees(&self, ra_deg: f64, dec_deg: f64) -> DVec2 {
        self.project(CelestialCoordinate::from_degrees(ra_deg, dec_deg))
    }

    pub fn ra0_degrees(&self) -> f64 {
        self.ra0.to_degrees()
    }
}

/// Visible rectangle of the chart plane, in plane units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Viewport {
    /// Rectangle spanned by two projected corners, in any order
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            xmin: a.x.min(b.x),
            xmax: a.x.max(b.x),
            ymin: a.y.min(b.y),
            ymax: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn top_left(&self) -> DVec2 {
        DVec2::new(self.xmin, self.ymin)
    }

    /// Inclusive on all four edges
    #[inline(always)]
    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    #[inline(always)]
    pub fn contains(&self, p: DVec2) -> bool {
        self.in_bounds(p.x, p.y)
    }

    /// Conservative polyline visibility: true if any vertex is inside.
    /// Segments that leave the rectangle are left to the sink's clip region.
    pub fn any_in_bounds(&self, points: &[DVec2]) -> bool {
        points.iter().any(|p| self.contains(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn frame(phi1: f64, phi2: f64, ra0_h: f64, dec0: f64) -> MapFrame {
        MapFrame::new(
            phi1.to_radians(),
            phi2.to_radians(),
            (ra0_h * 15.0).to_radians(),
            dec0.to_radians(),
            100.0,
        )
    }

    #[test]
    fn test_center_projects_to_origin() {
        for f in [
            frame(14.0, -14.0, 2.0, 0.0),
            frame(48.0, 32.0, 6.0, 40.0),
            frame(-62.0, -78.0, 16.0, -70.0),
            frame(78.0, 62.0, 0.0, 70.0),
        ] {
            let (x, y) = project(f.ra0, f.dec0, f.phi1, f.phi2, f.ra0, f.dec0, f.scale);
            assert!(x.abs() < EPS && y.abs() < EPS, "centre went to ({}, {})", x, y);
        }
    }

    #[test]
    fn test_cylindrical_branch() {
        let f = frame(14.0, -14.0, 2.0, 0.0);
        assert!(f.is_cylindrical());
        let p = f.project(CelestialCoordinate::from_hours(2.0, 20.0));
        let expected = -100.0 * 20f64.to_radians().tan() * 14f64.to_radians().cos();
        assert!(p.x.abs() < EPS);
        assert!((p.y - expected).abs() < EPS);
    }

    #[test]
    fn test_cylindrical_y_monotonic_in_dec() {
        let f = frame(10.0, -10.0, 0.0, 0.0);
        let mut prev = f64::INFINITY;
        for d in -89..=89 {
            let y = f.project_degrees(0.0, d as f64).y;
            // plane y is flipped, so it falls as dec rises
            assert!(y < prev);
            prev = y;
        }
    }

    #[test]
    fn test_east_is_left() {
        let f = frame(48.0, 32.0, 6.0, 40.0);
        let east = f.project(CelestialCoordinate::from_hours(7.0, 40.0));
        let west = f.project(CelestialCoordinate::from_hours(5.0, 40.0));
        assert!(east.x < 0.0 && west.x > 0.0);
        let north = f.project(CelestialCoordinate::from_hours(6.0, 50.0));
        assert!(north.y < 0.0);
    }

    #[test]
    fn test_ra_normalized_around_center() {
        let f = frame(14.0, -14.0, 23.0, 0.0);
        let a = f.project(CelestialCoordinate::from_hours(1.0, 5.0));
        let b = f.project(CelestialCoordinate::from_hours(25.0, 5.0));
        assert!((a - b).length() < EPS);
        // 1h lies east of 23h across the seam, so it lands on the left
        assert!(a.x < 0.0);
    }

    #[test]
    fn test_in_bounds_inclusive() {
        let vp = Viewport::from_corners(DVec2::new(-1.0, -2.0), DVec2::new(3.0, 4.0));
        assert!(vp.in_bounds(-1.0, 0.0));
        assert!(vp.in_bounds(3.0, 0.0));
        assert!(vp.in_bounds(0.0, -2.0));
        assert!(vp.in_bounds(0.0, 4.0));
        assert!(vp.in_bounds(3.0, 4.0));
        assert!(!vp.in_bounds(3.000001, 0.0));
        assert!(!vp.in_bounds(0.0, -2.1));
    }

    #[test]
    fn test_any_in_bounds() {
        let vp = Viewport::from_corners(DVec2::ZERO, DVec2::new(10.0, 10.0));
        let outside = [DVec2::new(-5.0, 5.0), DVec2::new(15.0, 5.0)];
        assert!(!vp.any_in_bounds(&outside));
        let one_in = [DVec2::new(-5.0, 5.0), DVec2::new(10.0, 10.0)];
        assert!(vp.any_in_bounds(&one_in));
        assert!(!vp.any_in_bounds(&[]));
    }
}
