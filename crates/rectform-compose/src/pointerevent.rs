// Imports
use crate::GeoCoordinate;

/// Where the pointer is, in both spaces the host knows about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerElement {
    /// The geographic position of the pointer.
    pub latlng: GeoCoordinate,
    /// The position on the map's layer, in pixels with y pointing down.
    pub layer_point: na::Point2<f64>,
}

impl PointerElement {
    /// A new pointer element.
    pub fn new(latlng: GeoCoordinate, layer_point: na::Point2<f64>) -> Self {
        Self {
            latlng,
            layer_point,
        }
    }
}

/// A pointer event, as delivered by the map surface.
///
/// Events of one gesture are expected strictly in temporal order: one `Down`, any number of `Move`,
/// then `Up`.
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    /// The pointer was pressed.
    Down {
        /// The element for the down event.
        element: PointerElement,
    },
    /// The pointer moved while pressed.
    Move {
        /// The element for the move event.
        element: PointerElement,
    },
    /// The pointer was released.
    Up {
        /// The element for the up event.
        element: PointerElement,
    },
    /// The pointer vanished unexpectedly.
    ///
    /// Should finish all current gestures and reset all state.
    Cancel,
}

/// The progress of a gesture after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureProgress {
    /// No gesture is active.
    Idle,
    /// A gesture is ongoing.
    InProgress,
    /// The gesture has just finished.
    Finished,
}
