//! The grid's anchoring transform.

use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Positions, orients, and scales the grid in world space.
///
/// Points map from grid-local to world space as scale, then rotation, then
/// translation; the inverse map undoes them in reverse order.
///
/// # Example
///
/// ```
/// use nav_grid::GridTransform;
/// use nalgebra::{Point3, Vector3};
///
/// let transform = GridTransform::from_translation(Vector3::new(10.0, 0.0, 0.0));
/// let world = transform.transform_point(&Point3::new(1.0, 2.0, 3.0));
/// assert_eq!(world, Point3::new(11.0, 2.0, 3.0));
///
/// let local = transform.inverse_transform_point(&world);
/// assert_eq!(local, Point3::new(1.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridTransform {
    /// World-space position of the grid origin corner.
    pub translation: Vector3<f64>,
    /// World-space orientation of the grid.
    pub rotation: UnitQuaternion<f64>,
    /// Per-axis scale. Components must be non-zero for the inverse map.
    pub scale: Vector3<f64>,
}

impl GridTransform {
    /// The identity transform: no translation, no rotation, unit scale.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// An identity transform displaced by `translation`.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Maps a grid-local point into world space.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let scaled = Point3::from(point.coords.component_mul(&self.scale));
        self.rotation * scaled + self.translation
    }

    /// Maps a world-space point into grid-local space.
    #[must_use]
    pub fn inverse_transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let unrotated = self.rotation.inverse() * (point - self.translation);
        Point3::from(unrotated.coords.component_div(&self.scale))
    }

    /// Applies only the scale to a vector, leaving orientation aside.
    ///
    /// Probe regions pair this with the rotation passed separately, so the
    /// oriented box is described once rather than twice.
    #[must_use]
    pub fn scale_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        vector.component_mul(&self.scale)
    }

    /// Whether the rotation deviates from identity beyond `epsilon` radians.
    #[must_use]
    pub fn is_rotated(&self, epsilon: f64) -> bool {
        self.rotation.angle() > epsilon
    }
}

impl Default for GridTransform {
    fn default() -> Self {
        Self::identity()
    }
}
