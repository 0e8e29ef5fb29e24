// Imports
use super::Shapeable;
use crate::transform::{GeoTarget, GeoTransformable};
use crate::{GeoCoordinate, LatLngBounds, LatLngs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "rectangle")]
/// A (possibly rotated) geographic rectangle.
///
/// Stored as a closed ring of five coordinates, the first being equal to the last.
pub struct Rectangle {
    #[serde(rename = "lat_lngs")]
    lat_lngs: LatLngs,
}

impl GeoTransformable for Rectangle {
    fn geo_target(&mut self) -> GeoTarget<'_> {
        GeoTarget::Rings(&mut self.lat_lngs)
    }
}

impl Shapeable for Rectangle {
    fn lat_lngs(&self) -> &LatLngs {
        &self.lat_lngs
    }

    fn set_lat_lngs(&mut self, lat_lngs: LatLngs) {
        self.lat_lngs = match lat_lngs {
            LatLngs::Ring(ring) => LatLngs::Ring(close_ring(ring)),
            nested => nested,
        };
    }

    fn is_closed(&self) -> bool {
        true
    }
}

impl Rectangle {
    /// The axis-aligned rectangle covering the bounds.
    pub fn from_bounds(bounds: LatLngBounds) -> Self {
        Self {
            lat_lngs: LatLngs::Ring(bounds.to_ring()),
        }
    }

    /// A rectangle from its ring. Closed if the last coordinate differs from the first.
    pub fn from_ring(ring: Vec<GeoCoordinate>) -> Self {
        Self {
            lat_lngs: LatLngs::Ring(close_ring(ring)),
        }
    }

    /// The coordinates of the ring, the first repeated at the end.
    pub fn ring(&self) -> Vec<GeoCoordinate> {
        self.lat_lngs.coordinates()
    }
}

fn close_ring(mut ring: Vec<GeoCoordinate>) -> Vec<GeoCoordinate> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
        if first != *last {
            ring.push(first);
        }
    }
    ring
}
