// Imports
use crate::GeoCoordinate;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// The destination reached when travelling `distance_km` along a great circle from `start`,
/// with an initial bearing of `bearing` degrees clockwise from north.
pub fn destination_point(start: GeoCoordinate, bearing: f64, distance_km: f64) -> GeoCoordinate {
    let bearing = bearing.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;
    let phi1 = start.lat.to_radians();
    let lambda1 = start.lng.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * bearing.cos()).asin();
    let lambda2 = lambda1
        + (bearing.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    GeoCoordinate::new(phi2.to_degrees(), lambda2.to_degrees())
}

/// The east-west length in kilometers of a longitude span of `dlambda` degrees on the parallel
/// at `latitude`.
pub fn dlambda_km(latitude: f64, dlambda: f64) -> f64 {
    2.0 * PI * EARTH_RADIUS_KM * latitude.abs().to_radians().cos() * (dlambda / 360.0)
}

/// The north-south length in kilometers of a latitude span of `dphi` degrees.
pub fn dphi_km(dphi: f64) -> f64 {
    2.0 * PI * EARTH_RADIUS_KM * (dphi / 360.0)
}

/// A regular grid of `ni` x `nj` cells, each `dlambda` degrees wide and `dphi` degrees high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "grid_characteristics")]
pub struct GridCharacteristics {
    #[serde(rename = "ni")]
    /// Number of cells east-west.
    pub ni: u32,
    #[serde(rename = "nj")]
    /// Number of cells north-south.
    pub nj: u32,
    #[serde(rename = "dphi")]
    /// Cell height in degrees latitude.
    pub dphi: f64,
    #[serde(rename = "dlambda")]
    /// Cell width in degrees longitude.
    pub dlambda: f64,
}

impl GridCharacteristics {
    /// New grid characteristics.
    pub fn new(ni: u32, nj: u32, dphi: f64, dlambda: f64) -> Self {
        Self {
            ni,
            nj,
            dphi,
            dlambda,
        }
    }

    /// Whether the grid has a non-zero extent.
    pub fn is_empty(&self) -> bool {
        self.ni == 0 || self.nj == 0 || self.dphi == 0.0 || self.dlambda == 0.0
    }

    /// The closed ring `[sw, nw, ne, se, sw]` of the real-world grid extent with its south-west
    /// corner at `south_west`.
    ///
    /// The width is measured along the southern and northern parallels separately, so the
    /// footprint narrows towards the poles. None if the grid is empty.
    pub fn footprint(&self, south_west: GeoCoordinate) -> Option<Vec<GeoCoordinate>> {
        if self.is_empty() {
            return None;
        }

        let ni = f64::from(self.ni);
        let width_south = ni * dlambda_km(south_west.lat, self.dlambda);
        let height = f64::from(self.nj) * dphi_km(self.dphi);
        let north_west = destination_point(south_west, 0.0, height);
        let width_north = ni * dlambda_km(north_west.lat, self.dlambda);
        let north_east = destination_point(north_west, 90.0, width_north);
        let south_east = destination_point(south_west, 90.0, width_south);

        Some(vec![south_west, north_west, north_east, south_east, south_west])
    }
}
