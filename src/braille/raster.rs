use std::f64::consts::TAU;

use super::BrailleCanvas;

/// On/off run lengths in pixels
pub type DashPattern = (u32, u32);

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    draw_line_pattern(canvas, x0, y0, x1, y1, None);
}

/// Bresenham with an optional dash pattern counted from the first pixel
pub fn draw_line_pattern(
    canvas: &mut BrailleCanvas,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    dash: Option<DashPattern>,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;
    let mut step: u32 = 0;

    loop {
        let on = match dash {
            Some((on, off)) if on + off > 0 => step % (on + off) < on,
            _ => true,
        };
        if on {
            canvas.set_pixel_signed(x, y);
        }
        step = step.wrapping_add(1);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Filled disc
pub fn fill_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Midpoint circle outline
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    if radius <= 0 {
        canvas.set_pixel_signed(cx, cy);
        return;
    }
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            canvas.set_pixel_signed(cx + px, cy + py);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Dashed circle: the outline sampled around the circumference, every
/// other run of `on` pixels left out
pub fn draw_dashed_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32, dash: DashPattern) {
    let (on, off) = dash;
    let period = (on + off).max(1) as f64;
    let samples = ((TAU * radius as f64).ceil() as usize).max(8);
    for i in 0..samples {
        let arc = i as f64 * TAU * radius as f64 / samples as f64;
        if arc % period >= on as f64 {
            continue;
        }
        let t = i as f64 / samples as f64 * TAU;
        let x = cx as f64 + radius as f64 * t.cos();
        let y = cy as f64 + radius as f64 * t.sin();
        canvas.set_pixel_signed(x.round() as i32, y.round() as i32);
    }
}

/// Axis-aligned ellipse outline, drawn as a closed polygon
pub fn draw_ellipse(canvas: &mut BrailleCanvas, cx: i32, cy: i32, rx: i32, ry: i32) {
    let steps = ((rx.max(ry) as usize) * 4).max(12);
    let point = |i: usize| {
        let t = i as f64 / steps as f64 * TAU;
        (
            (cx as f64 + rx as f64 * t.cos()).round() as i32,
            (cy as f64 + ry as f64 * t.sin()).round() as i32,
        )
    };
    let mut prev = point(0);
    for i in 1..=steps {
        let next = point(i);
        draw_line(canvas, prev.0, prev.1, next.0, next.1);
        prev = next;
    }
}

pub fn draw_rect(canvas: &mut BrailleCanvas, x: i32, y: i32, w: i32, h: i32) {
    let (x1, y1) = (x + w, y + h);
    draw_line(canvas, x, y, x1, y);
    draw_line(canvas, x1, y, x1, y1);
    draw_line(canvas, x1, y1, x, y1);
    draw_line(canvas, x, y1, x, y);
}

pub fn fill_rect(canvas: &mut BrailleCanvas, x: i32, y: i32, w: i32, h: i32) {
    for py in y..=y + h {
        for px in x..=x + w {
            canvas.set_pixel_signed(px, py);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(canvas: &BrailleCanvas) -> usize {
        let mut n = 0;
        for y in 0..canvas.pixel_height() {
            for x in 0..canvas.pixel_width() {
                if canvas.is_set(x, y) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_dashed_line_skips_pixels() {
        let mut canvas = BrailleCanvas::new(10, 1);
        draw_line_pattern(&mut canvas, 0, 0, 19, 0, Some((2, 2)));
        assert_eq!(count(&canvas), 10);
        assert!(canvas.is_set(0, 0) && canvas.is_set(1, 0));
        assert!(!canvas.is_set(2, 0) && !canvas.is_set(3, 0));
    }

    #[test]
    fn test_circle_outline_symmetric() {
        let mut canvas = BrailleCanvas::new(10, 5);
        draw_circle(&mut canvas, 10, 10, 5);
        for (x, y) in [(15, 10), (5, 10), (10, 15), (10, 5)] {
            assert!(canvas.is_set(x, y), "missing ({}, {})", x, y);
        }
        assert!(!canvas.is_set(10, 10));
    }

    #[test]
    fn test_filled_circle_covers_centre() {
        let mut canvas = BrailleCanvas::new(10, 5);
        fill_circle(&mut canvas, 10, 10, 3);
        assert!(canvas.is_set(10, 10));
        assert!(canvas.is_set(13, 10));
        assert!(!canvas.is_set(13, 13));
    }

    #[test]
    fn test_dashed_circle_sparser_than_solid() {
        let mut solid = BrailleCanvas::new(20, 10);
        let mut dashed = BrailleCanvas::new(20, 10);
        draw_circle(&mut solid, 20, 20, 10);
        draw_dashed_circle(&mut dashed, 20, 20, 10, (2, 2));
        assert!(count(&dashed) > 0);
        assert!(count(&dashed) < count(&solid));
    }

    #[test]
    fn test_rect_and_ellipse() {
        let mut canvas = BrailleCanvas::new(10, 5);
        draw_rect(&mut canvas, 2, 2, 10, 8);
        assert!(canvas.is_set(2, 2) && canvas.is_set(12, 10));
        assert!(!canvas.is_set(6, 6));

        let mut canvas = BrailleCanvas::new(10, 5);
        draw_ellipse(&mut canvas, 10, 10, 8, 4);
        assert!(canvas.is_set(18, 10) && canvas.is_set(2, 10));
        assert!(!canvas.is_set(10, 10));

        let mut canvas = BrailleCanvas::new(2, 1);
        fill_rect(&mut canvas, 0, 0, 3, 3);
        assert_eq!(canvas.to_string(), "⣿⣿");
    }
}
