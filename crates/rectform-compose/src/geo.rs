// Imports
use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
///
/// Not Euclidean: it must go through a [crate::Projection] before any affine math is applied to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "geo_coordinate")]
pub struct GeoCoordinate {
    #[serde(rename = "lat")]
    /// Latitude, positive north.
    pub lat: f64,
    #[serde(rename = "lng")]
    /// Longitude, positive east.
    pub lng: f64,
}

impl From<(f64, f64)> for GeoCoordinate {
    /// From a `(lat, lng)` tuple.
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl AbsDiffEq for GeoCoordinate {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lng.abs_diff_eq(&other.lng, epsilon)
    }
}

impl RelativeEq for GeoCoordinate {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lng.relative_eq(&other.lng, epsilon, max_relative)
    }
}

impl GeoCoordinate {
    /// A new coordinate from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An axis-aligned geographic extent.
///
/// Always normalized: the south-west corner is never north or east of the north-east corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename = "lat_lng_bounds")]
pub struct LatLngBounds {
    #[serde(rename = "south_west")]
    south_west: GeoCoordinate,
    #[serde(rename = "north_east")]
    north_east: GeoCoordinate,
}

impl LatLngBounds {
    /// Bounds spanned by two arbitrary corners.
    pub fn new(first: GeoCoordinate, second: GeoCoordinate) -> Self {
        Self {
            south_west: GeoCoordinate::new(first.lat.min(second.lat), first.lng.min(second.lng)),
            north_east: GeoCoordinate::new(first.lat.max(second.lat), first.lng.max(second.lng)),
        }
    }

    /// The bounds containing all coordinates. None if the iterator is empty.
    pub fn from_coordinates(coords: impl IntoIterator<Item = GeoCoordinate>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for coord in iter {
            bounds.extend(coord);
        }
        Some(bounds)
    }

    /// Grow to include the coordinate.
    pub fn extend(&mut self, coord: GeoCoordinate) {
        self.south_west.lat = self.south_west.lat.min(coord.lat);
        self.south_west.lng = self.south_west.lng.min(coord.lng);
        self.north_east.lat = self.north_east.lat.max(coord.lat);
        self.north_east.lng = self.north_east.lng.max(coord.lng);
    }

    /// The southern latitude.
    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    /// The northern latitude.
    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    /// The western longitude.
    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    /// The eastern longitude.
    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    /// The south-west corner.
    pub fn south_west(&self) -> GeoCoordinate {
        self.south_west
    }

    /// The north-east corner.
    pub fn north_east(&self) -> GeoCoordinate {
        self.north_east
    }

    /// The north-west corner.
    pub fn north_west(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.north(), self.west())
    }

    /// The south-east corner.
    pub fn south_east(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.south(), self.east())
    }

    /// The center in degrees, not in projected space.
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(
            (self.south() + self.north()) * 0.5,
            (self.west() + self.east()) * 0.5,
        )
    }

    /// The closed ring `[sw, nw, ne, se, sw]`.
    pub fn to_ring(&self) -> Vec<GeoCoordinate> {
        vec![
            self.south_west(),
            self.north_west(),
            self.north_east(),
            self.south_east(),
            self.south_west(),
        ]
    }
}

/// The coordinates of a multi-point shape.
///
/// Either a single ring, or nested rings for e.g. polygons with holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "lat_lngs")]
pub enum LatLngs {
    #[serde(rename = "ring")]
    /// A flat ring or line of coordinates.
    Ring(Vec<GeoCoordinate>),
    #[serde(rename = "nested")]
    /// Nested rings.
    Nested(Vec<LatLngs>),
}

impl Default for LatLngs {
    fn default() -> Self {
        Self::Ring(Vec::new())
    }
}

impl From<Vec<GeoCoordinate>> for LatLngs {
    fn from(ring: Vec<GeoCoordinate>) -> Self {
        Self::Ring(ring)
    }
}

impl LatLngs {
    /// All coordinates in depth-first order.
    pub fn coordinates(&self) -> Vec<GeoCoordinate> {
        let mut coords = Vec::new();
        self.collect_into(&mut coords);
        coords
    }

    fn collect_into(&self, coords: &mut Vec<GeoCoordinate>) {
        match self {
            Self::Ring(ring) => coords.extend_from_slice(ring),
            Self::Nested(rings) => rings.iter().for_each(|r| r.collect_into(coords)),
        }
    }

    /// Visit every coordinate mutably, depth-first.
    pub fn for_each_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut GeoCoordinate),
    {
        match self {
            Self::Ring(ring) => ring.iter_mut().for_each(|c| f(c)),
            Self::Nested(rings) => rings.iter_mut().for_each(|r| r.for_each_mut(f)),
        }
    }

    /// Whether there are no coordinates at any depth.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Ring(ring) => ring.is_empty(),
            Self::Nested(rings) => rings.iter().all(|r| r.is_empty()),
        }
    }

    /// The bounds of all coordinates.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_coordinates(self.coordinates())
    }
}
