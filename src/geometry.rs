//! Fundamental geometric types for plane frame modelling.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Position in the plane of the frame measured in inches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Distance along the horizontal axis.
    pub x: f64,
    /// Distance along the vertical axis.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Point> for Vector2<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Nodal displacement: two translations in inches and one rotation in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Horizontal translation.
    pub u: f64,
    /// Vertical translation.
    pub v: f64,
    /// In-plane rotation.
    pub rotation: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(u: f64, v: f64, rotation: f64) -> Self {
        Self { u, v, rotation }
    }

    /// Magnitude of the translational part, ignoring rotation.
    #[must_use]
    pub fn translation(self) -> f64 {
        self.u.hypot(self.v)
    }

    /// Convert the displacement into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.u, self.v, self.rotation)
    }
}

impl From<Vector3<f64>> for Displacement {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use framecheck::point;
///
/// let corner = point(138.0, 27.0);
/// assert_eq!(corner.y, 27.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}
