// Imports
use super::Shapeable;
use crate::transform::{GeoTarget, GeoTransformable};
use crate::{GeoCoordinate, LatLngs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "polyline")]
/// A polyline, or a polygon when closed.
pub struct Polyline {
    #[serde(rename = "lat_lngs")]
    /// The coordinates.
    pub lat_lngs: LatLngs,
    #[serde(rename = "closed")]
    /// Whether the last coordinate connects back to the first.
    pub closed: bool,
}

impl GeoTransformable for Polyline {
    fn geo_target(&mut self) -> GeoTarget<'_> {
        GeoTarget::Rings(&mut self.lat_lngs)
    }
}

impl Shapeable for Polyline {
    fn lat_lngs(&self) -> &LatLngs {
        &self.lat_lngs
    }

    fn set_lat_lngs(&mut self, lat_lngs: LatLngs) {
        self.lat_lngs = lat_lngs;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Polyline {
    /// An open line through the coordinates.
    pub fn new(coords: Vec<GeoCoordinate>) -> Self {
        Self {
            lat_lngs: LatLngs::Ring(coords),
            closed: false,
        }
    }

    /// A polygon with the coordinates as its ring.
    pub fn new_polygon(ring: Vec<GeoCoordinate>) -> Self {
        Self {
            lat_lngs: LatLngs::Ring(ring),
            closed: true,
        }
    }
}
