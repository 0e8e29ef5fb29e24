// Imports
use crate::ControlOverlay;
use rectform_compose::GeoCoordinate;

/// The map surface the rectangle is displayed on.
///
/// The handler asks it for layer positions, to suspend its own panning while a gesture is active
/// and to display the control overlay.
pub trait MapSurface {
    /// The position of the coordinate on the map's layer, in pixels with y pointing down.
    fn latlng_to_layer_point(&self, latlng: GeoCoordinate) -> na::Point2<f64>;

    /// Enable or disable the generic map panning.
    fn set_dragging_enabled(&mut self, enabled: bool);

    /// Display the overlay, replacing the previously displayed one.
    fn show_overlay(&mut self, overlay: &ControlOverlay);

    /// Remove the displayed overlay.
    fn hide_overlay(&mut self);
}
