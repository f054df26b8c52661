//! Moving the cut of a sky-spanning ring from the catalog seam to the
//! meridian opposite the chart centre.
//!
//! Milky Way contour rings arrive pre-split along a fixed meridian: the ring
//! runs along one edge of the band, drops straight down the seam, runs back
//! along the other edge and climbs the seam to close. Drawn on a chart centred
//! away from that seam, the two vertical seam edges show as false borders.
//! Here the ring is re-stitched across the old seam and cut again at
//! `ra0 + 180°`, which projects onto the chart's far left/right edges.

use crate::geo::{wrap_degrees, LineString};

/// Declination step (degrees) between neighbours that marks a seam edge
pub const REVERSAL_THRESHOLD_DEG: f64 = 5.0;

/// First index `i >= from` whose step to `i + 1` jumps more than the threshold
pub fn find_reversal(ring: &[(f64, f64)], from: usize) -> Option<usize> {
    (from..ring.len().saturating_sub(1))
        .find(|&i| (ring[i + 1].1 - ring[i].1).abs() > REVERSAL_THRESHOLD_DEG)
}

/// Does the step `a -> b` cross longitude `split`?
/// Steps longer than half a turn wrap the other way and never count.
#[inline(always)]
fn crosses(a: f64, b: f64, split: f64) -> bool {
    (a - b).abs() < 180.0 && (a - split) * (b - split) <= 0.0
}

/// First `k` where `arc[k] -> arc[k + 1]` crosses `split`
pub fn find_crossing_forward(arc: &[(f64, f64)], split: f64) -> Option<usize> {
    (0..arc.len().saturating_sub(1)).find(|&k| crosses(arc[k].0, arc[k + 1].0, split))
}

/// Last `k` where `arc[k] -> arc[k + 1]` crosses `split`
pub fn find_crossing_backward(arc: &[(f64, f64)], split: f64) -> Option<usize> {
    (0..arc.len().saturating_sub(1))
        .rev()
        .find(|&k| crosses(arc[k].0, arc[k + 1].0, split))
}

/// Drop the duplicated closing vertex, if any
fn open_ring(ring: &[(f64, f64)]) -> &[(f64, f64)] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Re-cut a `[ra°, dec°]` ring at the meridian opposite `ra0_deg`.
///
/// Returns the ring unchanged when `ra0_deg` is zero, when fewer than two
/// seam edges are found, or when either edge of the band never crosses the
/// new split meridian. Only the first two seam edges are used. The result is
/// always closed.
pub fn rotate_ring(ring: &[(f64, f64)], ra0_deg: f64) -> LineString {
    if ra0_deg == 0.0 {
        return ring.to_vec();
    }
    let split = wrap_degrees(ra0_deg + 180.0);
    let open = open_ring(ring);

    let Some(first) = find_reversal(open, 0) else {
        return ring.to_vec();
    };

    // start just past the first seam edge; that edge becomes the wrap-around
    let rotated: LineString = open[first + 1..]
        .iter()
        .chain(&open[..=first])
        .copied()
        .collect();

    let Some(second) = find_reversal(&rotated, 0) else {
        return ring.to_vec();
    };
    let (near, far) = rotated.split_at(second + 1);

    let (Some(near_cut), Some(far_cut)) = (
        find_crossing_forward(near, split),
        find_crossing_backward(far, split),
    ) else {
        return ring.to_vec();
    };

    let mut out = Vec::with_capacity(open.len() + 1);
    out.extend_from_slice(&far[far_cut + 1..]);
    out.extend_from_slice(&far[..=far_cut]);
    out.extend_from_slice(&near[near_cut + 1..]);
    out.extend_from_slice(&near[..=near_cut]);
    out.push(out[0]);
    out
}
