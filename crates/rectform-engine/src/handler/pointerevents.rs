// Imports
use super::{GestureState, GestureTarget, RectangleTransform};
use crate::{HandleId, MapSurface, TransformEventKind, WidgetFlags};
use kurbo::Shape;
use rectform_compose::ext::{Point2Ext, Vector2Ext};
use rectform_compose::shapes::Shapeable;
use rectform_compose::{
    EventResult, GeoCoordinate, GeoTransformable, GestureProgress, PointerElement, Projection,
};
use tracing::trace;

impl<T, P> RectangleTransform<T, P>
where
    T: Shapeable,
    P: Projection,
{
    /// What a pointer down at the layer point would start a gesture on.
    ///
    /// Handles are above the rectangle, the topmost one wins.
    pub fn gesture_target_at(
        &self,
        layer_point: na::Point2<f64>,
        map: &dyn MapSurface,
    ) -> Option<GestureTarget> {
        let to_layer_point = |coord: GeoCoordinate| map.latlng_to_layer_point(coord);

        if let Some(handle) = self.overlay.as_ref().and_then(|overlay| {
            overlay.handle_at(layer_point, self.config.hit_tolerance, &to_layer_point)
        }) {
            return Some(GestureTarget::Handle(handle));
        }

        self.target
            .outline_path_with(&to_layer_point)
            .contains(layer_point.to_kurbo_point())
            .then_some(GestureTarget::Body)
    }

    pub(super) fn handle_pointer_event_down(
        &mut self,
        element: PointerElement,
        map: &mut dyn MapSurface,
    ) -> (EventResult<GestureProgress>, WidgetFlags) {
        self.finish_stale_gesture(map);

        match self.gesture_target_at(element.layer_point, map) {
            Some(target) => self.begin_gesture(target, element, map),
            None => (
                EventResult::ignored(GestureProgress::Idle),
                WidgetFlags::default(),
            ),
        }
    }

    pub(super) fn handle_pointer_event_move(
        &mut self,
        element: PointerElement,
        map: &mut dyn MapSurface,
    ) -> (EventResult<GestureProgress>, WidgetFlags) {
        let Some(anchor) = self.anchor else {
            return (
                EventResult::ignored(GestureProgress::Idle),
                WidgetFlags::default(),
            );
        };

        let kind = match self.state {
            GestureState::Idle => {
                return (
                    EventResult::ignored(GestureProgress::Idle),
                    WidgetFlags::default(),
                )
            }
            GestureState::Translating { last } => {
                self.translate_step(last, element.latlng, anchor);
                self.state = GestureState::Translating {
                    last: element.latlng,
                };
                TransformEventKind::Translate
            }
            GestureState::Rotating { previous } => {
                let origin = map.latlng_to_layer_point(anchor);
                self.rotate_step(previous, element.layer_point, origin, anchor);
                self.state = GestureState::Rotating {
                    previous: element.layer_point,
                };
                TransformEventKind::Rotate
            }
            GestureState::Scaling { handle } => {
                self.scale_step(handle, element.latlng, anchor);
                TransformEventKind::Scale
            }
        };

        self.update_overlay(map);
        self.fire(kind);

        (
            EventResult::consumed(GestureProgress::InProgress),
            WidgetFlags::modified(),
        )
    }

    pub(super) fn handle_pointer_event_up(
        &mut self,
        _element: PointerElement,
        map: &mut dyn MapSurface,
    ) -> (EventResult<GestureProgress>, WidgetFlags) {
        self.handle_pointer_event_cancel(map)
    }

    pub(super) fn handle_pointer_event_cancel(
        &mut self,
        map: &mut dyn MapSurface,
    ) -> (EventResult<GestureProgress>, WidgetFlags) {
        let event_result = if self.finish_gesture(map) {
            EventResult::consumed(GestureProgress::Finished)
        } else {
            EventResult::ignored(GestureProgress::Idle)
        };

        (event_result, WidgetFlags::default())
    }

    /// Moves the rectangle and the anchor by the projected pointer offset.
    fn translate_step(
        &mut self,
        last: GeoCoordinate,
        current: GeoCoordinate,
        anchor: GeoCoordinate,
    ) {
        let offset = self.projection.project(current) - self.projection.project(last);

        self.target.translate(offset, &self.projection);
        let mut anchor = anchor;
        anchor.translate(offset, &self.projection);
        self.anchor = Some(anchor);

        trace!(?offset, "translate step");
    }

    /// Rotates the rectangle about the anchor by the angle the pointer swept around it on the
    /// layer.
    ///
    /// Layer y points down while projected y points north, hence the negated sweep.
    fn rotate_step(
        &mut self,
        previous: na::Point2<f64>,
        current: na::Point2<f64>,
        origin: na::Point2<f64>,
        anchor: GeoCoordinate,
    ) {
        let delta = (previous - origin).angle_ahead(&(current - origin));

        self.angle -= delta;
        self.target.rotate(-delta, anchor, &self.projection);

        trace!(delta, angle = self.angle, "rotate step");
    }

    /// Resizes the rectangle along its own axes.
    ///
    /// The bounds are resized in the unrotated frame, then the rotation is reapplied about the old
    /// anchor. The anchor moves to where the new south-west corner ends up.
    fn scale_step(&mut self, handle: HandleId, pointer: GeoCoordinate, anchor: GeoCoordinate) {
        let angle = self.angle;
        let mut pointer = pointer;
        let mut unrotated = self.target.lat_lngs().clone();
        if angle != 0.0 {
            unrotated.rotate(-angle, anchor, &self.projection);
            pointer.rotate(-angle, anchor, &self.projection);
        }
        let Some(bounds) = unrotated.bounds() else {
            return;
        };

        let resized = handle.resize_bounds(bounds, pointer);
        self.target.set_bounds(resized);
        let mut new_anchor = resized.south_west();
        if angle != 0.0 {
            self.target.rotate(angle, anchor, &self.projection);
            new_anchor.rotate(angle, anchor, &self.projection);
        }
        self.anchor = Some(new_anchor);

        trace!(
            ?handle,
            south_west = ?resized.south_west(),
            north_east = ?resized.north_east(),
            "scale step"
        );
    }
}
