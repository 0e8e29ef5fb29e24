// Imports
use crate::config::{GuideLineStyle, HandleClass, HandleStyle};
use crate::TransformConfig;
use rectform_compose::geodesy::GridCharacteristics;
use rectform_compose::shapes::{Polyline, Shapeable};
use rectform_compose::{
    AffineMatrix, GeoCoordinate, GeoTarget, GeoTransformable, LatLngBounds, Projection,
};

/// Identifies a control handle.
///
/// The compass direction of a scale handle names the bound(s) it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleId {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
    Rotate,
}

/// What a handle does, which also picks its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    Scale,
    /// The south-west scale handle, sitting on the anchor.
    ScaleOrigin,
    Rotate,
}

impl HandleId {
    /// The handles in the order they are laid out, bottom to top.
    pub const LAYOUT_ORDER: [Self; 9] = [
        Self::Nw,
        Self::Ne,
        Self::Sw,
        Self::Se,
        Self::W,
        Self::N,
        Self::E,
        Self::S,
        Self::Rotate,
    ];

    pub fn role(self) -> HandleRole {
        match self {
            Self::Sw => HandleRole::ScaleOrigin,
            Self::Rotate => HandleRole::Rotate,
            _ => HandleRole::Scale,
        }
    }

    /// The css resize cursor for the handle direction.
    pub fn cursor(self) -> Option<&'static str> {
        match self {
            Self::Ne | Self::Sw => Some("nesw-resize"),
            Self::Nw | Self::Se => Some("nwse-resize"),
            Self::N => Some("n-resize"),
            Self::S => Some("s-resize"),
            Self::E => Some("e-resize"),
            Self::W => Some("w-resize"),
            Self::Rotate => None,
        }
    }

    /// The position of the handle around an axis-aligned extent.
    ///
    /// The rotate handle sits west of the south-west corner, half the extent's width away.
    pub fn layout_position(self, extent: LatLngBounds) -> GeoCoordinate {
        let center = extent.center();

        match self {
            Self::Nw => extent.north_west(),
            Self::Ne => extent.north_east(),
            Self::Sw => extent.south_west(),
            Self::Se => extent.south_east(),
            Self::N => GeoCoordinate::new(extent.north(), center.lng),
            Self::S => GeoCoordinate::new(extent.south(), center.lng),
            Self::E => GeoCoordinate::new(center.lat, extent.east()),
            Self::W => GeoCoordinate::new(center.lat, extent.west()),
            Self::Rotate => GeoCoordinate::new(
                extent.south(),
                extent.west() - (center.lng - extent.west()),
            ),
        }
    }

    /// Moves the bound(s) the handle controls to the pointer.
    ///
    /// A bound is never moved past the opposite one, so the bounds can't invert.
    pub fn resize_bounds(self, bounds: LatLngBounds, pointer: GeoCoordinate) -> LatLngBounds {
        let mut sw = bounds.south_west();
        let mut ne = bounds.north_east();
        let (south, north, west, east) = (
            bounds.south(),
            bounds.north(),
            bounds.west(),
            bounds.east(),
        );

        match self {
            Self::S => sw.lat = pointer.lat.min(north),
            Self::N => ne.lat = pointer.lat.max(south),
            Self::E => ne.lng = pointer.lng.max(west),
            Self::W => sw.lng = pointer.lng.min(east),
            Self::Nw => {
                sw.lng = pointer.lng.min(east);
                ne.lat = pointer.lat.max(south);
            }
            Self::Ne => {
                ne.lng = pointer.lng.max(west);
                ne.lat = pointer.lat.max(south);
            }
            Self::Se => {
                ne.lng = pointer.lng.max(west);
                sw.lat = pointer.lat.min(north);
            }
            Self::Sw => {
                sw.lng = pointer.lng.min(east);
                sw.lat = pointer.lat.min(north);
            }
            Self::Rotate => {}
        }

        LatLngBounds::new(sw, ne)
    }
}

/// A control handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    pub id: HandleId,
    pub lat_lng: GeoCoordinate,
    pub style: HandleStyle,
    pub class: HandleClass,
    /// The hover cursor. None when the style disables it.
    pub cursor: Option<&'static str>,
}

impl GeoTransformable for Handle {
    fn geo_target(&mut self) -> GeoTarget<'_> {
        GeoTarget::Coordinate(&mut self.lat_lng)
    }
}

impl Handle {
    fn new(id: HandleId, lat_lng: GeoCoordinate, config: &TransformConfig) -> Self {
        let style = config.handle_style(id.role()).clone();
        let cursor = if style.set_cursor { id.cursor() } else { None };

        Self {
            id,
            lat_lng,
            style,
            class: config.handle_class,
            cursor,
        }
    }

    /// Whether the layer point hits the handle, displayed at `handle_layer_point`.
    pub fn hits(
        &self,
        layer_point: na::Point2<f64>,
        handle_layer_point: na::Point2<f64>,
        tolerance: f64,
    ) -> bool {
        na::distance(&layer_point, &handle_layer_point) <= self.style.hit_radius(tolerance)
    }
}

/// The dashed line connecting the rotate handle with the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideLine {
    pub line: Polyline,
    pub style: GuideLineStyle,
}

/// The handles displayed around the rectangle.
///
/// Entirely derived from the rectangle, its angle and the anchor. Rebuilt whenever one of them
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlOverlay {
    pub rotate_line: GuideLine,
    /// In [HandleId::LAYOUT_ORDER].
    pub handles: Vec<Handle>,
    /// The real-world extent of the configured grid, if any.
    pub grid_footprint: Option<Polyline>,
}

impl ControlOverlay {
    /// Builds the overlay for a shape rotated by `angle` about the anchor.
    ///
    /// The handles are laid out around the extent of the unrotated shape, then the overlay is
    /// rotated as a whole, so they stay aligned with the shape's own edges. None if the shape has
    /// no coordinates.
    pub fn build(
        shape: &impl Shapeable,
        angle: f64,
        anchor: GeoCoordinate,
        config: &TransformConfig,
        grid: Option<&GridCharacteristics>,
        projection: &dyn Projection,
    ) -> Option<Self> {
        let mut unrotated = shape.lat_lngs().clone();
        if angle != 0.0 {
            unrotated.rotate(-angle, anchor, projection);
        }
        let extent = unrotated.bounds()?;

        let mut overlay = Self::layout(extent, config, grid);
        if angle != 0.0 {
            overlay.apply_matrix(
                &AffineMatrix::rotation_wrt_point(angle, projection.project(anchor)),
                projection,
            );
        }

        Some(overlay)
    }

    /// The axis-aligned overlay around the extent.
    pub fn layout(
        extent: LatLngBounds,
        config: &TransformConfig,
        grid: Option<&GridCharacteristics>,
    ) -> Self {
        let handles = HandleId::LAYOUT_ORDER
            .iter()
            .map(|&id| Handle::new(id, id.layout_position(extent), config))
            .collect();
        let rotate_line = GuideLine {
            line: Polyline::new(vec![
                HandleId::Rotate.layout_position(extent),
                extent.south_west(),
            ]),
            style: config.rotate_line.clone(),
        };
        let grid_footprint = grid
            .and_then(|grid| grid.footprint(extent.south_west()))
            .map(Polyline::new_polygon);

        Self {
            rotate_line,
            handles,
            grid_footprint,
        }
    }

    /// Applies the matrix to all parts of the overlay as a rigid group.
    pub fn apply_matrix(&mut self, matrix: &AffineMatrix, projection: &dyn Projection) {
        for handle in self.handles.iter_mut() {
            handle.apply_matrix(matrix, projection);
        }
        self.rotate_line.line.apply_matrix(matrix, projection);
        if let Some(footprint) = self.grid_footprint.as_mut() {
            footprint.apply_matrix(matrix, projection);
        }
    }

    pub fn handle(&self, id: HandleId) -> Option<&Handle> {
        self.handles.iter().find(|handle| handle.id == id)
    }

    /// The topmost handle hit by the layer point.
    pub fn handle_at(
        &self,
        layer_point: na::Point2<f64>,
        tolerance: f64,
        to_layer_point: &dyn Fn(GeoCoordinate) -> na::Point2<f64>,
    ) -> Option<HandleId> {
        self.handles
            .iter()
            .rev()
            .find(|handle| handle.hits(layer_point, to_layer_point(handle.lat_lng), tolerance))
            .map(|handle| handle.id)
    }
}
