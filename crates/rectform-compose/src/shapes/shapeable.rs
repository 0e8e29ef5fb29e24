// Imports
use crate::ext::Point2Ext;
use crate::transform::GeoTransformable;
use crate::{GeoCoordinate, LatLngBounds, LatLngs, Projection};

/// Types that behave as a multi-point geographic shape.
pub trait Shapeable: GeoTransformable {
    /// The coordinates of the shape.
    fn lat_lngs(&self) -> &LatLngs;
    /// Replace the coordinates of the shape.
    fn set_lat_lngs(&mut self, lat_lngs: LatLngs);
    /// Whether the outline is a closed ring.
    fn is_closed(&self) -> bool {
        false
    }
    /// The bounds of the shape. None if it has no coordinates.
    fn bounds(&self) -> Option<LatLngBounds> {
        self.lat_lngs().bounds()
    }
    /// Reshape into the closed ring of the bounds.
    fn set_bounds(&mut self, bounds: LatLngBounds) {
        self.set_lat_lngs(LatLngs::Ring(bounds.to_ring()));
    }
    /// generate the path of its outline in the space the coordinates are mapped into.
    fn outline_path_with(&self, to_point: &dyn Fn(GeoCoordinate) -> na::Point2<f64>) -> kurbo::BezPath {
        let mut path = kurbo::BezPath::new();
        append_outline(&mut path, self.lat_lngs(), self.is_closed(), to_point);
        path
    }
    /// generate the path of its outline in projected space.
    fn outline_path(&self, projection: &dyn Projection) -> kurbo::BezPath {
        self.outline_path_with(&|coord| projection.project(coord))
    }
}

fn append_outline(
    path: &mut kurbo::BezPath,
    lat_lngs: &LatLngs,
    closed: bool,
    to_point: &dyn Fn(GeoCoordinate) -> na::Point2<f64>,
) {
    match lat_lngs {
        LatLngs::Ring(ring) => {
            let mut iter = ring.iter();
            if let Some(first) = iter.next() {
                path.move_to(to_point(*first).to_kurbo_point());
                for coord in iter {
                    path.line_to(to_point(*coord).to_kurbo_point());
                }
                if closed {
                    path.close_path();
                }
            }
        }
        LatLngs::Nested(rings) => {
            for ring in rings {
                append_outline(path, ring, closed, to_point);
            }
        }
    }
}
