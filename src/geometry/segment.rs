//! Parametric line segments
//!
//! A segment is an origin plus direction coefficients `(a, b)`; the points
//! of the segment are `origin + t·(a, b)` for `t ∈ [0, 1]`.

use glam::DVec2;

use super::Circle;

/// Real roots of `a·t² + b·t + c = 0`
///
/// A non-positive discriminant yields no roots: tangency is deliberately
/// treated as a miss.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a == 0.0 {
        return None;
    }
    let disc = b * b - 4.0 * a * c;
    if disc <= 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let two_a = 2.0 * a;
    Some(((-b + sqrt_disc) / two_a, (-b - sqrt_disc) / two_a))
}

#[inline]
fn in_unit(t: f64) -> bool {
    (0.0..=1.0).contains(&t)
}

/// A segment in parametric form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x: f64,
    pub y: f64,
    pub a: f64,
    pub b: f64,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1,
            y: y1,
            a: x2 - x1,
            b: y2 - y1,
        }
    }

    pub fn from_points(start: DVec2, end: DVec2) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    #[inline]
    pub fn start(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn end(&self) -> DVec2 {
        DVec2::new(self.x + self.a, self.y + self.b)
    }

    /// Point at parameter `t`
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec2 {
        DVec2::new(self.x + self.a * t, self.y + self.b * t)
    }

    /// Factor along `self` where the supporting lines cross
    ///
    /// `None` for parallel (including collinear) lines.
    pub fn intersection_factor(&self, other: &Segment) -> Option<f64> {
        let denom = other.b * self.a - self.b * other.a;
        if denom == 0.0 {
            return None;
        }
        let factor = (other.a * (self.y - other.y) - other.b * (self.x - other.x)) / denom;
        factor.is_finite().then_some(factor)
    }

    /// Factor along `other` for a crossing found at `factor` along `self`
    fn intersection_factor_other(&self, other: &Segment, factor: f64) -> f64 {
        if other.a != 0.0 {
            (self.x + self.a * factor - other.x) / other.a
        } else {
            (self.y + self.b * factor - other.y) / other.b
        }
    }

    /// True if the two segments cross, endpoints included
    ///
    /// Parallel segments never intersect, even when collinear and overlapping.
    pub fn intersects(&self, other: &Segment) -> bool {
        let Some(factor) = self.intersection_factor(other) else {
            return false;
        };
        if !in_unit(factor) {
            return false;
        }
        let other_factor = self.intersection_factor_other(other, factor);
        in_unit(other_factor)
    }

    /// True if the segment crosses the circle boundary
    ///
    /// A segment lying entirely inside the circle, or only grazing it, is a miss.
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let tx = self.x - circle.center.x;
        let ty = self.y - circle.center.y;

        let a = self.a * self.a + self.b * self.b;
        let b = 2.0 * (tx * self.a + ty * self.b);
        let c = tx * tx + ty * ty - circle.squared_radius();

        match solve_quadratic(a, b, c) {
            Some((t1, t2)) => in_unit(t1) || in_unit(t2),
            None => false,
        }
    }
}
