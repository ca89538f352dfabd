//! Draw surface abstraction and the scoped transform stack
//!
//! Renderables never set absolute transforms on the surface. They push a
//! local transform onto the frame and the frame composes it with the parent;
//! `with_transform` pops on return, and the scheduler unwinds whatever is
//! left on the stack when the frame ends.

use glam::DVec2;

use crate::math::Matrix;

/// RGBA colour, components in `[0, 1]`
pub type Color = [f32; 4];

/// Backend that accepts drawing primitives
///
/// Coordinates are in the space set by the last `set_transform` call.
pub trait RenderSurface {
    fn clear(&mut self, color: Color);

    /// Replace the current transform (absolute)
    fn set_transform(&mut self, transform: &Matrix);

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color);

    /// Fill a convex polygon
    fn fill_polygon(&mut self, points: &[DVec2], color: Color);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color);

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Color) {
        self.fill_polygon(
            &[
                origin,
                origin + DVec2::new(size.x, 0.0),
                origin + size,
                origin + DVec2::new(0.0, size.y),
            ],
            color,
        );
    }

    fn stroke_rect(&mut self, origin: DVec2, size: DVec2, width: f64, color: Color) {
        let corners = [
            origin,
            origin + DVec2::new(size.x, 0.0),
            origin + size,
            origin + DVec2::new(0.0, size.y),
        ];
        for i in 0..4 {
            self.stroke_line(corners[i], corners[(i + 1) % 4], width, color);
        }
    }
}

/// One frame's view of the surface plus its transform stack
pub struct Frame<'a> {
    surface: &'a mut dyn RenderSurface,
    stack: Vec<Matrix>,
}

impl<'a> Frame<'a> {
    /// Start a frame with the identity transform
    pub fn new(surface: &'a mut dyn RenderSurface) -> Self {
        let identity = Matrix::identity(3);
        surface.set_transform(&identity);
        Self {
            surface,
            stack: vec![identity],
        }
    }

    /// Current composed transform
    #[inline]
    pub fn transform(&self) -> &Matrix {
        // The identity at the bottom is never popped
        &self.stack[self.stack.len() - 1]
    }

    /// Number of transforms pushed above the identity
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Compose `local` with the current transform and make it current
    pub fn push(&mut self, local: &Matrix) {
        let composed = local.multiply(self.transform());
        self.surface.set_transform(&composed);
        self.stack.push(composed);
    }

    /// Push an absolute transform, ignoring the parent (HUD drawing)
    pub fn push_absolute(&mut self, transform: Matrix) {
        self.surface.set_transform(&transform);
        self.stack.push(transform);
    }

    /// Pop one transform; `false` if only the identity is left
    pub fn pop(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        let top = &self.stack[self.stack.len() - 1];
        self.surface.set_transform(top);
        true
    }

    /// Pop back down to `depth`, returning how many transforms were removed
    pub fn unwind_to(&mut self, depth: usize) -> usize {
        let mut popped = 0;
        while self.depth() > depth && self.pop() {
            popped += 1;
        }
        popped
    }

    /// Run `draw` under `local`, restoring the previous transform afterwards
    pub fn with_transform<R>(&mut self, local: &Matrix, draw: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.depth();
        self.push(local);
        let result = draw(self);
        self.unwind_to(depth);
        result
    }

    /// Run `draw` in screen space (identity), restoring afterwards
    pub fn screen_space<R>(&mut self, draw: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.depth();
        self.push_absolute(Matrix::identity(3));
        let result = draw(self);
        self.unwind_to(depth);
        result
    }

    pub fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color) {
        self.surface.stroke_line(from, to, width, color);
    }

    pub fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        self.surface.fill_polygon(points, color);
    }

    pub fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.surface.fill_circle(center, radius, color);
    }

    pub fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Color) {
        self.surface.fill_rect(origin, size, color);
    }

    pub fn stroke_rect(&mut self, origin: DVec2, size: DVec2, width: f64, color: Color) {
        self.surface.stroke_rect(origin, size, width, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the last transform and every line endpoint after transforming
    #[derive(Default)]
    struct Recorder {
        transform: Option<Matrix>,
        lines: Vec<(DVec2, DVec2)>,
        transform_sets: usize,
    }

    impl RenderSurface for Recorder {
        fn clear(&mut self, _color: Color) {}

        fn set_transform(&mut self, transform: &Matrix) {
            self.transform = Some(transform.clone());
            self.transform_sets += 1;
        }

        fn stroke_line(&mut self, from: DVec2, to: DVec2, _width: f64, _color: Color) {
            let t = self.transform.clone().unwrap_or_else(|| Matrix::identity(3));
            self.lines.push((t.transform_point(from), t.transform_point(to)));
        }

        fn fill_polygon(&mut self, _points: &[DVec2], _color: Color) {}

        fn fill_circle(&mut self, _center: DVec2, _radius: f64, _color: Color) {}
    }

    const WHITE: Color = [1.0; 4];

    #[test]
    fn test_with_transform_restores_parent() {
        let mut rec = Recorder::default();
        {
            let mut frame = Frame::new(&mut rec);
            frame.with_transform(&Matrix::translate(10.0, 0.0), |f| {
                assert_eq!(f.depth(), 1);
                f.with_transform(&Matrix::translate(0.0, 5.0), |f| {
                    f.stroke_line(DVec2::ZERO, DVec2::X, 1.0, WHITE);
                });
                f.stroke_line(DVec2::ZERO, DVec2::X, 1.0, WHITE);
            });
            assert_eq!(frame.depth(), 0);
            frame.stroke_line(DVec2::ZERO, DVec2::X, 1.0, WHITE);
        }
        assert_eq!(rec.lines[0].0, DVec2::new(10.0, 5.0));
        assert_eq!(rec.lines[1].0, DVec2::new(10.0, 0.0));
        assert_eq!(rec.lines[2].0, DVec2::ZERO);
    }

    #[test]
    fn test_unwind_pops_leftovers() {
        let mut rec = Recorder::default();
        let mut frame = Frame::new(&mut rec);
        frame.push(&Matrix::scale(2.0, 2.0));
        frame.push(&Matrix::translate(1.0, 1.0));
        assert_eq!(frame.unwind_to(0), 2);
        assert!(!frame.pop());
        assert_eq!(frame.transform(), &Matrix::identity(3));
    }

    #[test]
    fn test_screen_space_ignores_parent() {
        let mut rec = Recorder::default();
        {
            let mut frame = Frame::new(&mut rec);
            frame.push(&Matrix::scale(3.0, 3.0));
            frame.screen_space(|f| f.stroke_line(DVec2::ONE, DVec2::ONE, 1.0, WHITE));
            assert_eq!(frame.depth(), 1);
        }
        assert_eq!(rec.lines[0].0, DVec2::ONE);
    }
}
