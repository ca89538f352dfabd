//! Triangle-list tessellation for 2D primitives
//!
//! All inputs are already in output space; callers apply transforms first.

use glam::DVec2;
use std::f64::consts::TAU;

use super::vertex::Vertex;

/// Thick line as a quad (two triangles)
pub fn line(out: &mut Vec<Vertex>, from: DVec2, to: DVec2, width: f64, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    if dir == DVec2::ZERO {
        // Zero-length streak: draw a square dot so it stays visible
        let h = width / 2.0;
        let quad = [
            from + DVec2::new(-h, -h),
            from + DVec2::new(h, -h),
            from + DVec2::new(h, h),
            from + DVec2::new(-h, h),
        ];
        convex_polygon(out, &quad, color);
        return;
    }
    let perp = DVec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = from + perp;
    let b1 = from - perp;
    let a2 = to + perp;
    let b2 = to - perp;

    out.push(Vertex::at(a1, color));
    out.push(Vertex::at(b1, color));
    out.push(Vertex::at(a2, color));

    out.push(Vertex::at(a2, color));
    out.push(Vertex::at(b1, color));
    out.push(Vertex::at(b2, color));
}

/// Filled convex polygon as a triangle fan around the first vertex
pub fn convex_polygon(out: &mut Vec<Vertex>, points: &[DVec2], color: [f32; 4]) {
    if points.len() < 3 {
        return;
    }
    for i in 1..points.len() - 1 {
        out.push(Vertex::at(points[0], color));
        out.push(Vertex::at(points[i], color));
        out.push(Vertex::at(points[i + 1], color));
    }
}

/// Points on an axis-aligned ellipse, counter-clockwise from +x
pub fn ellipse_points(center: DVec2, radius: DVec2, segments: u32) -> Vec<DVec2> {
    (0..segments)
        .map(|i| {
            let theta = i as f64 / segments as f64 * TAU;
            center + DVec2::new(radius.x * theta.cos(), radius.y * theta.sin())
        })
        .collect()
}

/// Filled circle as triangles from the centre to the rim
pub fn circle(out: &mut Vec<Vertex>, center: DVec2, radius: f64, color: [f32; 4], segments: u32) {
    out.reserve(segments as usize * 3);
    for i in 0..segments {
        let theta1 = (i as f64 / segments as f64) * TAU;
        let theta2 = ((i + 1) as f64 / segments as f64) * TAU;

        out.push(Vertex::at(center, color));
        out.push(Vertex::at(
            center + radius * DVec2::new(theta1.cos(), theta1.sin()),
            color,
        ));
        out.push(Vertex::at(
            center + radius * DVec2::new(theta2.cos(), theta2.sin()),
            color,
        ));
    }
}
