// Modules
mod transformable;

// Re-exports
pub use transformable::{GeoTarget, GeoTransformable};

// Imports
use crate::{GeoCoordinate, Projection};
use serde::{Deserialize, Serialize};

/// A 2D affine transformation.
///
/// Applies to a point as:
///
/// ```text
/// x' = a * x + b * y + e
/// y' = c * x + d * y + f
/// ```
///
/// The builders ([Self::translate], [Self::scale], [Self::rotate]) compose in application order: each one
/// is appended after the existing state. Composition treats the coefficients as the column-major
/// `[a c e; b d f]` matrix, so a rotation built with [Self::rotate] must be [Self::flip]ped before it rotates
/// points in the sense of [Self::transform_point]. [Self::rotation_wrt_point] does both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename = "affine_matrix")]
pub struct AffineMatrix {
    #[serde(rename = "a")]
    /// Linear part, x from x.
    pub a: f64,
    #[serde(rename = "b")]
    /// Linear part, x from y.
    pub b: f64,
    #[serde(rename = "c")]
    /// Linear part, y from x.
    pub c: f64,
    #[serde(rename = "d")]
    /// Linear part, y from y.
    pub d: f64,
    #[serde(rename = "e")]
    /// Translation in x.
    pub e: f64,
    #[serde(rename = "f")]
    /// Translation in y.
    pub f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// A new matrix from its six coefficients.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// A rotation by `angle` (radians, counter-clockwise when y points up) around `center`.
    pub fn rotation_wrt_point(angle: f64, center: na::Point2<f64>) -> Self {
        Self::IDENTITY.rotate(angle, center).flip()
    }

    /// Transform a point.
    pub fn transform_point(&self, point: na::Point2<f64>) -> na::Point2<f64> {
        na::point![
            self.a * point[0] + self.b * point[1] + self.e,
            self.c * point[0] + self.d * point[1] + self.f
        ]
    }

    /// Transform a geographic coordinate by projecting it, transforming the projected point and
    /// unprojecting the result.
    pub fn transform_coordinate(
        &self,
        coord: GeoCoordinate,
        projection: &dyn Projection,
    ) -> GeoCoordinate {
        projection.unproject(self.transform_point(projection.project(coord)))
    }

    /// The inverse of [Self::transform_point].
    ///
    /// Singular matrices are not checked for, the result then contains infinite or NaN components.
    pub fn untransform_point(&self, point: na::Point2<f64>) -> na::Point2<f64> {
        let det = self.a * self.d - self.b * self.c;
        let x = point[0] - self.e;
        let y = point[1] - self.f;

        na::point![
            (self.d * x - self.b * y) / det,
            (self.a * y - self.c * x) / det
        ]
    }

    /// The translation part of the transform.
    pub fn translation_part(&self) -> na::Vector2<f64> {
        na::vector![self.e, self.f]
    }

    /// The scale part of the transform (the diagonal of the linear part).
    pub fn scale_part(&self) -> na::Vector2<f64> {
        na::vector![self.a, self.d]
    }

    /// Append a translation.
    pub fn translate(self, offset: na::Vector2<f64>) -> Self {
        self.append(Self::new(1.0, 0.0, 0.0, 1.0, offset[0], offset[1]))
    }

    /// Append the same translation on both axes.
    pub fn translate_uniform(self, offset: f64) -> Self {
        self.translate(na::Vector2::repeat(offset))
    }

    /// Append a scale around `origin`.
    pub fn scale(self, scale: na::Vector2<f64>, origin: na::Point2<f64>) -> Self {
        self.append(Self::new(scale[0], 0.0, 0.0, scale[1], origin[0], origin[1]))
            .append(Self::new(1.0, 0.0, 0.0, 1.0, -origin[0], -origin[1]))
    }

    /// Append the same scale on both axes around `origin`.
    pub fn scale_uniform(self, scale: f64, origin: na::Point2<f64>) -> Self {
        self.scale(na::Vector2::repeat(scale), origin)
    }

    /// Append a rotation around `origin`, in composition convention. See [Self::flip].
    pub fn rotate(self, angle: f64, origin: na::Point2<f64>) -> Self {
        let (sin, cos) = angle.sin_cos();

        self.append(Self::new(cos, sin, -sin, cos, origin[0], origin[1]))
            .append(Self::new(1.0, 0.0, 0.0, 1.0, -origin[0], -origin[1]))
    }

    /// Negate the off-diagonal coefficients, inverting the rotation sense of the linear part.
    pub fn flip(mut self) -> Self {
        self.b = -self.b;
        self.c = -self.c;
        self
    }

    /// Compose `other` after `self`.
    pub fn append(self, other: Self) -> Self {
        Self::from_composition_matrix(
            self.to_composition_matrix() * other.to_composition_matrix(),
        )
    }

    fn to_composition_matrix(self) -> na::Matrix3<f64> {
        na::matrix![
            self.a, self.c, self.e;
            self.b, self.d, self.f;
            0.0, 0.0, 1.0;
        ]
    }

    fn from_composition_matrix(m: na::Matrix3<f64>) -> Self {
        Self::new(
            m[(0, 0)],
            m[(1, 0)],
            m[(0, 1)],
            m[(1, 1)],
            m[(0, 2)],
            m[(1, 2)],
        )
    }
}
