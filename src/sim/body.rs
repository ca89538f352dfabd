//! Bodies: a shape plus pose, motion and draw style
//!
//! Shapes are stored in body-local space and placed in the world by the
//! pose transform `rotate(direction) · translate(position)`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, Shape};
use crate::math::Matrix;
use crate::renderer::colors;
use crate::scheduler::{Color, Frame, Renderable, Steppable};
use crate::world::WorldContext;

/// Where a body is and which way it faces
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec2,
    /// Heading in radians, y axis pointing down
    pub direction: f64,
}

impl Pose {
    pub fn new(position: DVec2, direction: f64) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Local-to-world transform
    pub fn transform(&self) -> Matrix {
        Matrix::rotate(self.direction)
            .multiply(&Matrix::translate(self.position.x, self.position.y))
    }
}

/// Per-tick velocities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub velocity: DVec2,
    pub angular_velocity: f64,
}

impl Motion {
    pub fn halt(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyStyle {
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    pub line_width: f64,
}

impl BodyStyle {
    pub const fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            outline: None,
            line_width: 1.0,
        }
    }

    pub const fn outlined(color: Color, line_width: f64) -> Self {
        Self {
            fill: None,
            outline: Some(color),
            line_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub shape: Shape,
    pub pose: Pose,
    pub style: BodyStyle,
}

impl Body {
    pub fn new(shape: Shape, pose: Pose, style: BodyStyle) -> Self {
        Self { shape, pose, style }
    }

    /// Draw the local shape under the pose transform
    pub fn draw(&self, frame: &mut Frame<'_>) {
        let style = self.style;
        frame.with_transform(&self.pose.transform(), |f| match &self.shape {
            Shape::Circle(c) => {
                if let Some(fill) = style.fill {
                    f.fill_circle(c.center, c.radius(), fill);
                }
            }
            Shape::Polygon(p) => {
                if let Some(fill) = style.fill {
                    let points: Vec<DVec2> = p.vertices().collect();
                    f.fill_polygon(&points, fill);
                }
                if let Some(outline) = style.outline {
                    for s in p.segments() {
                        f.stroke_line(s.start(), s.end(), style.line_width, outline);
                    }
                }
            }
        });
    }
}

/// Static circular body the craft can orbit, land on or crash into
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    body: Body,
    bounds: Circle,
    goal: bool,
}

impl Planet {
    pub fn new(center: DVec2, radius: f64, goal: bool) -> Self {
        let color = if goal {
            colors::GOAL_PLANET
        } else {
            colors::PLANET
        };
        Self {
            body: Body::new(
                Shape::Circle(Circle::new(DVec2::ZERO, radius)),
                Pose::new(center, 0.0),
                BodyStyle::filled(color),
            ),
            bounds: Circle::new(center, radius),
            goal,
        }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.bounds.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.bounds.radius()
    }

    /// World-space collision circle
    #[inline]
    pub fn bounds(&self) -> &Circle {
        &self.bounds
    }

    /// Landing here wins the game
    #[inline]
    pub fn is_goal(&self) -> bool {
        self.goal
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

impl Steppable for Planet {}

impl Renderable for Planet {
    fn render(&mut self, _world: &WorldContext, frame: &mut Frame<'_>) {
        self.body.draw(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    #[test]
    fn test_pose_rotates_then_translates() {
        let pose = Pose::new(DVec2::new(100.0, 50.0), std::f64::consts::FRAC_PI_2);
        let p = pose.transform().transform_point(DVec2::new(10.0, 0.0));
        // Heading +π/2 is straight up on a y-down screen
        assert!((p - DVec2::new(100.0, 40.0)).length() < 1e-9);
    }

    #[test]
    fn test_planet_bounds_in_world_space() {
        let planet = Planet::new(DVec2::new(500.0, 600.0), 50.0, true);
        assert_eq!(planet.center(), DVec2::new(500.0, 600.0));
        assert_eq!(planet.bounds().squared_radius(), 2_500.0);
        assert!(planet.is_goal());
        assert_eq!(planet.body().pose.position, planet.center());
    }

    #[test]
    fn test_motion_halt() {
        let mut m = Motion {
            velocity: DVec2::ONE,
            angular_velocity: 0.2,
        };
        m.halt();
        assert_eq!(m, Motion::default());
    }

    #[test]
    fn test_body_holds_either_shape() {
        let square = Polygon::new(&[DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y]);
        let body = Body::new(
            Shape::Polygon(square),
            Pose::default(),
            BodyStyle::outlined(colors::HULL, 2.0),
        );
        assert!(matches!(body.shape, Shape::Polygon(_)));
        assert_eq!(body.style.outline, Some(colors::HULL));
    }
}
