//! Polygons, circles and the shape variant used by bodies

use glam::DVec2;

use super::Segment;
use crate::math::Matrix;
use crate::squared_distance;

/// Closed polygon stored as an `n×3` homogeneous vertex list
///
/// The last vertex implicitly connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Matrix,
}

impl Polygon {
    pub fn new(points: &[DVec2]) -> Self {
        Self {
            vertices: Matrix::from_points(points),
        }
    }

    /// Number of vertices (and of boundary segments)
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> DVec2 {
        let row = self.vertices.row(i);
        DVec2::new(row[0], row[1])
    }

    pub fn vertices(&self) -> impl Iterator<Item = DVec2> + '_ {
        (0..self.len()).map(|i| self.vertex(i))
    }

    /// Boundary segments, produced lazily
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.len();
        (0..n).map(move |i| Segment::from_points(self.vertex(i), self.vertex((i + 1) % n)))
    }

    /// Write `self · transform` into `out` without allocating
    ///
    /// `out` must have the same vertex count as `self`.
    pub fn transform_into(&self, transform: &Matrix, out: &mut Polygon) {
        self.vertices.multiply_into(transform, &mut out.vertices);
    }

    pub fn transformed(&self, transform: &Matrix) -> Polygon {
        Polygon {
            vertices: self.vertices.multiply(transform),
        }
    }

    fn any_segment(&self, mut hit: impl FnMut(&Segment) -> bool) -> bool {
        self.segments().any(|s| hit(&s))
    }

    pub fn intersects_segment(&self, segment: &Segment) -> bool {
        self.any_segment(|s| s.intersects(segment))
    }

    pub fn intersects_polygon(&self, other: &Polygon) -> bool {
        self.any_segment(|s| other.intersects_segment(s))
    }

    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        self.any_segment(|s| s.intersects_circle(circle))
    }
}

/// Circle with a cached squared radius
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: DVec2,
    radius: f64,
    squared_radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self {
            center,
            radius,
            squared_radius: radius * radius,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn squared_radius(&self) -> f64 {
        self.squared_radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.squared_radius = radius * radius;
    }

    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let radius_sum = self.radius + other.radius;
        squared_distance(self.center, other.center) <= radius_sum * radius_sum
    }

    pub fn intersects_segment(&self, segment: &Segment) -> bool {
        segment.intersects_circle(self)
    }

    pub fn intersects_polygon(&self, polygon: &Polygon) -> bool {
        polygon.intersects_circle(self)
    }
}

/// Collision shape of a body
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon),
    Circle(Circle),
}

impl Shape {
    pub fn intersects(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Polygon(a), Shape::Polygon(b)) => a.intersects_polygon(b),
            (Shape::Polygon(p), Shape::Circle(c)) | (Shape::Circle(c), Shape::Polygon(p)) => {
                p.intersects_circle(c)
            }
            (Shape::Circle(a), Shape::Circle(b)) => a.intersects_circle(b),
        }
    }

    pub fn intersects_segment(&self, segment: &Segment) -> bool {
        match self {
            Shape::Polygon(p) => p.intersects_segment(segment),
            Shape::Circle(c) => c.intersects_segment(segment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(center: DVec2, half: f64) -> Polygon {
        Polygon::new(&[
            center + DVec2::new(-half, -half),
            center + DVec2::new(half, -half),
            center + DVec2::new(half, half),
            center + DVec2::new(-half, half),
        ])
    }

    #[test]
    fn test_segments_close_the_ring() {
        let sq = square(DVec2::ZERO, 1.0);
        let segs: Vec<_> = sq.segments().collect();
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[3].end(), sq.vertex(0));
    }

    #[test]
    fn test_polygon_vs_segment() {
        let sq = square(DVec2::ZERO, 1.0);
        assert!(sq.intersects_segment(&Segment::new(-5.0, 0.0, 5.0, 0.0)));
        assert!(!sq.intersects_segment(&Segment::new(-5.0, 3.0, 5.0, 3.0)));
    }

    #[test]
    fn test_polygon_vs_polygon() {
        let a = square(DVec2::ZERO, 1.0);
        let b = square(DVec2::new(1.5, 0.5), 1.0);
        let far = square(DVec2::new(10.0, 0.0), 1.0);
        assert!(a.intersects_polygon(&b));
        assert!(!a.intersects_polygon(&far));
    }

    #[test]
    fn test_polygon_vs_circle() {
        let sq = square(DVec2::ZERO, 1.0);
        assert!(sq.intersects_circle(&Circle::new(DVec2::new(2.0, 0.0), 1.5)));
        assert!(!sq.intersects_circle(&Circle::new(DVec2::new(5.0, 0.0), 1.5)));
        assert!(Shape::Circle(Circle::new(DVec2::new(2.0, 0.0), 1.5))
            .intersects(&Shape::Polygon(sq)));
    }

    #[test]
    fn test_transform_into_reuses_buffer() {
        let sq = square(DVec2::ZERO, 1.0);
        let mut out = sq.clone();
        sq.transform_into(&Matrix::translate(10.0, 0.0), &mut out);
        assert_eq!(out.vertex(0), DVec2::new(9.0, -1.0));
        assert_eq!(out, sq.transformed(&Matrix::translate(10.0, 0.0)));
    }

    #[test]
    fn test_circle_radius_cache() {
        let mut c = Circle::new(DVec2::ZERO, 3.0);
        assert_eq!(c.squared_radius(), 9.0);
        c.set_radius(4.0);
        assert_eq!(c.squared_radius(), 16.0);
    }

    #[test]
    fn test_circles_touching() {
        let a = Circle::new(DVec2::ZERO, 1.0);
        let b = Circle::new(DVec2::new(2.0, 0.0), 1.0);
        assert!(a.intersects_circle(&b));
    }

    proptest! {
        #[test]
        fn prop_circle_intersection_is_symmetric(
            x1 in -100.0f64..100.0, y1 in -100.0f64..100.0, r1 in 0.0f64..50.0,
            x2 in -100.0f64..100.0, y2 in -100.0f64..100.0, r2 in 0.0f64..50.0,
        ) {
            let a = Circle::new(DVec2::new(x1, y1), r1);
            let b = Circle::new(DVec2::new(x2, y2), r2);
            prop_assert_eq!(a.intersects_circle(&b), b.intersects_circle(&a));
        }
    }
}
