// Imports
use super::AffineMatrix;
use crate::{GeoCoordinate, LatLngs, Projection};

/// A mutable view on the geometry of a transformable target.
///
/// Targets are either a single coordinate or (possibly nested) rings. Writing through the view
/// keeps the representation of the target intact.
#[derive(Debug)]
pub enum GeoTarget<'a> {
    /// A single coordinate, e.g. a marker position.
    Coordinate(&'a mut GeoCoordinate),
    /// Rings of coordinates, e.g. a polyline or polygon.
    Rings(&'a mut LatLngs),
}

impl GeoTarget<'_> {
    /// Apply the matrix to every coordinate of the target, in projected space.
    pub fn apply_matrix(self, matrix: &AffineMatrix, projection: &dyn Projection) {
        match self {
            Self::Coordinate(coord) => {
                *coord = matrix.transform_coordinate(*coord, projection);
            }
            Self::Rings(lat_lngs) => {
                lat_lngs.for_each_mut(&mut |coord| {
                    *coord = matrix.transform_coordinate(*coord, projection);
                });
            }
        }
    }
}

/// Trait for geographic types that can be (geometrically) transformed.
///
/// All operations happen in the space of the given projection. Offsets and scale factors are
/// therefore in projected units.
pub trait GeoTransformable {
    /// The geometry of the type.
    fn geo_target(&mut self) -> GeoTarget<'_>;

    /// Apply an arbitrary affine matrix.
    fn apply_matrix(&mut self, matrix: &AffineMatrix, projection: &dyn Projection) {
        self.geo_target().apply_matrix(matrix, projection);
    }

    /// Translate (as in moves) by the given offset.
    fn translate(&mut self, offset: na::Vector2<f64>, projection: &dyn Projection) {
        self.apply_matrix(&AffineMatrix::IDENTITY.translate(offset), projection);
    }

    /// Rotate by the given angle (in radians) around the center.
    fn rotate(&mut self, angle: f64, center: GeoCoordinate, projection: &dyn Projection) {
        let matrix = AffineMatrix::rotation_wrt_point(angle, projection.project(center));
        self.apply_matrix(&matrix, projection);
    }

    /// Scale by the given scale-factor around the origin.
    fn scale(
        &mut self,
        scale: na::Vector2<f64>,
        origin: GeoCoordinate,
        projection: &dyn Projection,
    ) {
        let matrix = AffineMatrix::IDENTITY.scale(scale, projection.project(origin));
        self.apply_matrix(&matrix, projection);
    }
}

impl GeoTransformable for GeoCoordinate {
    fn geo_target(&mut self) -> GeoTarget<'_> {
        GeoTarget::Coordinate(self)
    }
}

impl GeoTransformable for LatLngs {
    fn geo_target(&mut self) -> GeoTarget<'_> {
        GeoTarget::Rings(self)
    }
}
