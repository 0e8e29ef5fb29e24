// Modules
mod pointerevents;

// Imports
use crate::events::Listeners;
use crate::{
    ControlOverlay, HandleId, ListenerKey, MapSurface, TransformConfig, TransformError,
    TransformEvent, TransformEventKind, WidgetFlags,
};
use rectform_compose::geodesy::GridCharacteristics;
use rectform_compose::shapes::{Rectangle, Shapeable};
use rectform_compose::{
    EventResult, GeoCoordinate, GeoTransformable, GestureProgress, PointerElement, PointerEvent,
    Projection, SphericalMercator,
};
use tracing::{debug, warn};

/// What a gesture is started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTarget {
    /// The rectangle itself, starting a translation.
    Body,
    /// A handle, starting a rotation or a scale.
    Handle(HandleId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    Idle,
    Translating { last: GeoCoordinate },
    Rotating { previous: na::Point2<f64> },
    Scaling { handle: HandleId },
}

impl Default for GestureState {
    fn default() -> Self {
        Self::Idle
    }
}

impl GestureState {
    fn end_event(&self) -> Option<TransformEventKind> {
        match self {
            Self::Idle => None,
            Self::Translating { .. } => Some(TransformEventKind::TranslateEnd),
            Self::Rotating { .. } => Some(TransformEventKind::RotateEnd),
            Self::Scaling { .. } => Some(TransformEventKind::ScaleEnd),
        }
    }
}

/// Translates, rotates and scales a rectangle through pointer gestures on a control overlay.
///
/// The rectangle is kept as the authoritative geometry, together with the anchor and the
/// cumulative angle. The anchor is the south-west corner of the unrotated rectangle and the pivot
/// of all rotations. The overlay is derived from the three and rebuilt after every change.
#[derive(Debug)]
pub struct RectangleTransform<T = Rectangle, P = SphericalMercator>
where
    T: Shapeable,
    P: Projection,
{
    config: TransformConfig,
    projection: P,
    target: T,
    anchor: Option<GeoCoordinate>,
    angle: f64,
    grid: Option<GridCharacteristics>,
    state: GestureState,
    overlay: Option<ControlOverlay>,
    enabled: bool,
    listeners: Listeners<T>,
}

impl<T> RectangleTransform<T, SphericalMercator>
where
    T: Shapeable,
{
    /// A new, disabled handler transforming in spherical mercator space.
    pub fn new(target: T, config: TransformConfig) -> Self {
        Self::with_projection(target, SphericalMercator, config)
    }
}

impl<T, P> RectangleTransform<T, P>
where
    T: Shapeable,
    P: Projection,
{
    /// A new, disabled handler transforming in the space of the given projection.
    pub fn with_projection(target: T, projection: P, config: TransformConfig) -> Self {
        let grid = config.grid;

        Self {
            config,
            projection,
            target,
            anchor: None,
            angle: 0.0,
            grid,
            state: GestureState::default(),
            overlay: None,
            enabled: false,
            listeners: Listeners::default(),
        }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// The pivot of rotations. None until the handler was enabled for the first time.
    pub fn anchor(&self) -> Option<GeoCoordinate> {
        self.anchor
    }

    /// The cumulative rotation in radians, counter-clockwise in projected space.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The currently displayed overlay.
    pub fn overlay(&self) -> Option<&ControlOverlay> {
        self.overlay.as_ref()
    }

    pub fn grid_characteristics(&self) -> Option<&GridCharacteristics> {
        self.grid.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_gesture_active(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Shows the overlay and starts accepting pointer events.
    ///
    /// The first time, the anchor is placed on the south-west corner and the configured angle is
    /// applied to the rectangle.
    pub fn enable(&mut self, map: &mut dyn MapSurface) -> Result<WidgetFlags, TransformError> {
        let mut widget_flags = WidgetFlags::default();
        if self.enabled {
            return Ok(widget_flags);
        }

        if self.anchor.is_none() {
            let anchor = self.place_anchor()?;
            let angle = self.config.angle;
            if angle != 0.0 {
                self.target.rotate(angle, anchor, &self.projection);
                self.angle = angle;
                widget_flags.merge(WidgetFlags::modified());
            }
        }

        self.enabled = true;
        self.update_overlay(map);
        widget_flags.redraw = true;
        debug!(angle = self.angle, anchor = ?self.anchor, "enabled rectangle transform");

        Ok(widget_flags)
    }

    /// Hides the overlay, finishing the active gesture if there is one.
    pub fn disable(&mut self, map: &mut dyn MapSurface) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();
        if !self.enabled {
            return widget_flags;
        }

        self.finish_gesture(map);
        map.hide_overlay();
        self.overlay = None;
        self.enabled = false;
        widget_flags.redraw = true;
        debug!("disabled rectangle transform");

        widget_flags
    }

    /// Replaces the config, re-enabling the handler if it was enabled.
    ///
    /// The angle of the new config is not applied, the rectangle keeps its current rotation.
    pub fn set_config(
        &mut self,
        config: TransformConfig,
        map: &mut dyn MapSurface,
    ) -> Result<WidgetFlags, TransformError> {
        let was_enabled = self.enabled;
        let mut widget_flags = self.disable(map);

        self.grid = config.grid;
        self.config = config;
        if was_enabled {
            widget_flags |= self.enable(map)?;
        }

        Ok(widget_flags)
    }

    /// Rotates the rectangle about the anchor to the given angle.
    ///
    /// Places the anchor if the handler was never enabled, in which case the angle of the config
    /// is not applied anymore on enabling.
    pub fn set_angle(
        &mut self,
        angle: f64,
        map: &mut dyn MapSurface,
    ) -> Result<WidgetFlags, TransformError> {
        let anchor = self.place_anchor()?;
        let delta = angle - self.angle;
        if delta != 0.0 {
            self.target.rotate(delta, anchor, &self.projection);
        }
        self.angle = angle;

        if self.enabled {
            self.update_overlay(map);
        }

        Ok(WidgetFlags::modified())
    }

    /// Sets the grid whose footprint is shown in the overlay. None removes it.
    pub fn set_grid_characteristics(
        &mut self,
        grid: Option<GridCharacteristics>,
        map: &mut dyn MapSurface,
    ) {
        self.grid = grid;
        if self.enabled {
            self.update_overlay(map);
        }
    }

    /// Registers a listener for the lifecycle events of the given kind.
    pub fn on<F>(&mut self, kind: TransformEventKind, listener: F) -> ListenerKey
    where
        F: FnMut(&TransformEvent, &T) + 'static,
    {
        self.listeners.insert(kind, Box::new(listener))
    }

    /// Removes a listener. Returns false if it was already removed.
    pub fn off(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key)
    }

    /// Feeds a pointer event into the gesture state machine.
    ///
    /// Ignored while disabled.
    pub fn handle_event(
        &mut self,
        event: PointerEvent,
        map: &mut dyn MapSurface,
    ) -> (EventResult<GestureProgress>, WidgetFlags) {
        if !self.enabled {
            return (
                EventResult::ignored(GestureProgress::Idle),
                WidgetFlags::default(),
            );
        }

        match event {
            PointerEvent::Down { element } => self.handle_pointer_event_down(element, map),
            PointerEvent::Move { element } => self.handle_pointer_event_move(element, map),
            PointerEvent::Up { element } => self.handle_pointer_event_up(element, map),
            PointerEvent::Cancel => self.handle_pointer_event_cancel(map),
        }
    }

    /// Starts a gesture on the target, for hosts doing their own hit testing.
    ///
    /// Suspends the map panning until the gesture is finished.
    pub fn begin_gesture(
        &mut self,
        target: GestureTarget,
        element: PointerElement,
        map: &mut dyn MapSurface,
    ) -> (EventResult<GestureProgress>, WidgetFlags) {
        if !self.enabled {
            return (
                EventResult::ignored(GestureProgress::Idle),
                WidgetFlags::default(),
            );
        }
        self.finish_stale_gesture(map);

        let kind = match target {
            GestureTarget::Body => {
                self.state = GestureState::Translating {
                    last: element.latlng,
                };
                TransformEventKind::TranslateStart
            }
            GestureTarget::Handle(HandleId::Rotate) => {
                self.state = GestureState::Rotating {
                    previous: element.layer_point,
                };
                TransformEventKind::RotateStart
            }
            GestureTarget::Handle(handle) => {
                self.state = GestureState::Scaling { handle };
                TransformEventKind::ScaleStart
            }
        };

        map.set_dragging_enabled(false);
        debug!(?target, event = kind.name(), "started gesture");
        self.fire(kind);

        (
            EventResult::consumed(GestureProgress::InProgress),
            WidgetFlags::default(),
        )
    }

    fn place_anchor(&mut self) -> Result<GeoCoordinate, TransformError> {
        if let Some(anchor) = self.anchor {
            return Ok(anchor);
        }

        let anchor = self
            .target
            .bounds()
            .ok_or(TransformError::EmptyGeometry)?
            .south_west();
        self.anchor = Some(anchor);

        Ok(anchor)
    }

    /// Finishes the gesture whose pointer up got lost.
    fn finish_stale_gesture(&mut self, map: &mut dyn MapSurface) {
        if self.is_gesture_active() {
            warn!(
                state = ?self.state,
                "new gesture while the previous one is still active, finishing it"
            );
            self.finish_gesture(map);
        }
    }

    /// Returns false if no gesture was active.
    fn finish_gesture(&mut self, map: &mut dyn MapSurface) -> bool {
        let Some(kind) = self.state.end_event() else {
            return false;
        };

        self.state = GestureState::Idle;
        map.set_dragging_enabled(true);
        debug!(event = kind.name(), "finished gesture");
        self.fire(kind);

        true
    }

    fn update_overlay(&mut self, map: &mut dyn MapSurface) {
        self.overlay = self.anchor.and_then(|anchor| {
            ControlOverlay::build(
                &self.target,
                self.angle,
                anchor,
                &self.config,
                self.grid.as_ref(),
                &self.projection,
            )
        });

        match self.overlay.as_ref() {
            Some(overlay) => map.show_overlay(overlay),
            None => map.hide_overlay(),
        }
    }

    fn fire(&mut self, kind: TransformEventKind) {
        let event = TransformEvent {
            kind,
            rotation: self.angle,
            anchor: self.anchor,
        };
        self.listeners.dispatch(&event, &self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rectform_compose::eventresult::EventPropagation;
    use rectform_compose::{AffineMatrix, LatLngBounds, LonLat};
    use std::cell::RefCell;
    use std::f64::consts::FRAC_PI_2;
    use std::rc::Rc;

    const ALL_KINDS: [TransformEventKind; 9] = [
        TransformEventKind::TranslateStart,
        TransformEventKind::Translate,
        TransformEventKind::TranslateEnd,
        TransformEventKind::RotateStart,
        TransformEventKind::Rotate,
        TransformEventKind::RotateEnd,
        TransformEventKind::ScaleStart,
        TransformEventKind::Scale,
        TransformEventKind::ScaleEnd,
    ];

    /// Layer pixels are a hundred per degree, y pointing south.
    #[derive(Debug)]
    struct TestMap {
        dragging: bool,
        dragging_changes: Vec<bool>,
        overlay: Option<ControlOverlay>,
    }

    impl Default for TestMap {
        fn default() -> Self {
            Self {
                dragging: true,
                dragging_changes: Vec::new(),
                overlay: None,
            }
        }
    }

    impl MapSurface for TestMap {
        fn latlng_to_layer_point(&self, latlng: GeoCoordinate) -> na::Point2<f64> {
            na::point![latlng.lng * 100.0, -latlng.lat * 100.0]
        }

        fn set_dragging_enabled(&mut self, enabled: bool) {
            self.dragging = enabled;
            self.dragging_changes.push(enabled);
        }

        fn show_overlay(&mut self, overlay: &ControlOverlay) {
            self.overlay = Some(overlay.clone());
        }

        fn hide_overlay(&mut self) {
            self.overlay = None;
        }
    }

    /// Layer pixels are kilometres in spherical mercator space, y pointing south.
    #[derive(Debug, Default)]
    struct MercatorTestMap {
        inner: TestMap,
    }

    impl MercatorTestMap {
        fn element(&self, latlng: GeoCoordinate) -> PointerElement {
            PointerElement::new(latlng, self.latlng_to_layer_point(latlng))
        }
    }

    impl MapSurface for MercatorTestMap {
        fn latlng_to_layer_point(&self, latlng: GeoCoordinate) -> na::Point2<f64> {
            let projected = SphericalMercator.project(latlng);
            na::point![projected[0] * 1e-3, -projected[1] * 1e-3]
        }

        fn set_dragging_enabled(&mut self, enabled: bool) {
            self.inner.set_dragging_enabled(enabled);
        }

        fn show_overlay(&mut self, overlay: &ControlOverlay) {
            self.inner.show_overlay(overlay);
        }

        fn hide_overlay(&mut self) {
            self.inner.hide_overlay();
        }
    }

    fn element(lat: f64, lng: f64) -> PointerElement {
        PointerElement::new(
            GeoCoordinate::new(lat, lng),
            na::point![lng * 100.0, -lat * 100.0],
        )
    }

    fn down(lat: f64, lng: f64) -> PointerEvent {
        PointerEvent::Down {
            element: element(lat, lng),
        }
    }

    fn drag_to(lat: f64, lng: f64) -> PointerEvent {
        PointerEvent::Move {
            element: element(lat, lng),
        }
    }

    fn up(lat: f64, lng: f64) -> PointerEvent {
        PointerEvent::Up {
            element: element(lat, lng),
        }
    }

    fn unit_square() -> Rectangle {
        Rectangle::from_ring(vec![
            GeoCoordinate::new(0.0, 0.0),
            GeoCoordinate::new(0.0, 1.0),
            GeoCoordinate::new(1.0, 1.0),
            GeoCoordinate::new(1.0, 0.0),
        ])
    }

    fn enabled_handler(
        config: TransformConfig,
        map: &mut TestMap,
    ) -> RectangleTransform<Rectangle, LonLat> {
        let mut handler = RectangleTransform::with_projection(unit_square(), LonLat, config);
        let _ = handler.enable(map).unwrap();
        handler
    }

    fn record_events<P: Projection>(
        handler: &mut RectangleTransform<Rectangle, P>,
    ) -> Rc<RefCell<Vec<TransformEventKind>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        for kind in ALL_KINDS {
            let events = Rc::clone(&events);
            handler.on(kind, move |e, _| events.borrow_mut().push(e.kind));
        }
        events
    }

    fn bounds<P: Projection>(handler: &RectangleTransform<Rectangle, P>) -> LatLngBounds {
        handler.target().bounds().unwrap()
    }

    #[test]
    fn enable_and_disable() {
        let mut map = TestMap::default();
        let mut handler = RectangleTransform::with_projection(
            unit_square(),
            LonLat,
            TransformConfig::default(),
        );
        assert!(handler.anchor().is_none());

        let widget_flags = handler.enable(&mut map).unwrap();
        assert!(widget_flags.redraw);
        assert!(!widget_flags.geometry_modified);
        assert!(handler.is_enabled());
        assert_relative_eq!(handler.anchor().unwrap(), GeoCoordinate::new(0.0, 0.0));
        assert_relative_eq!(handler.angle(), 0.0);
        assert_eq!(handler.overlay().unwrap().handles.len(), 9);
        assert_eq!(map.overlay.as_ref(), handler.overlay());

        let _ = handler.disable(&mut map);
        assert!(!handler.is_enabled());
        assert!(handler.overlay().is_none());
        assert!(map.overlay.is_none());

        let (event_result, _) = handler.handle_event(down(0.5, 0.5), &mut map);
        assert!(!event_result.handled);
        assert!(!handler.is_gesture_active());
    }

    #[test]
    fn enable_without_coordinates() {
        let mut map = TestMap::default();
        let mut handler =
            RectangleTransform::new(Rectangle::from_ring(vec![]), TransformConfig::default());

        assert!(matches!(
            handler.enable(&mut map),
            Err(TransformError::EmptyGeometry)
        ));
        assert!(!handler.is_enabled());
        assert!(map.overlay.is_none());
    }

    #[test]
    fn configured_angle_applied_once() {
        let mut map = TestMap::default();
        let mut handler =
            enabled_handler(TransformConfig::default().with_angle(FRAC_PI_2), &mut map);

        assert_relative_eq!(handler.angle(), FRAC_PI_2);
        let rotated = bounds(&handler);
        assert_relative_eq!(rotated.south_west(), GeoCoordinate::new(0.0, -1.0), epsilon = 1e-12);
        assert_relative_eq!(rotated.north_east(), GeoCoordinate::new(1.0, 0.0), epsilon = 1e-12);

        let _ = handler.disable(&mut map);
        let _ = handler.enable(&mut map).unwrap();
        assert_relative_eq!(handler.angle(), FRAC_PI_2);
        assert_relative_eq!(
            bounds(&handler).south_west(),
            rotated.south_west(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            bounds(&handler).north_east(),
            rotated.north_east(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn translate_gesture() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let events = record_events(&mut handler);

        let (event_result, _) = handler.handle_event(down(0.5, 0.5), &mut map);
        assert!(event_result.handled);
        assert_eq!(event_result.propagate, EventPropagation::Stop);
        assert_eq!(event_result.progress, GestureProgress::InProgress);
        assert!(!map.dragging);

        let (_, widget_flags) = handler.handle_event(drag_to(0.5, 1.5), &mut map);
        assert!(widget_flags.geometry_modified);
        assert_relative_eq!(handler.anchor().unwrap(), GeoCoordinate::new(0.0, 1.0));
        assert_relative_eq!(bounds(&handler).south_west(), GeoCoordinate::new(0.0, 1.0));
        assert_relative_eq!(bounds(&handler).north_east(), GeoCoordinate::new(1.0, 2.0));
        assert_relative_eq!(handler.angle(), 0.0);
        assert_relative_eq!(
            map.overlay.as_ref().unwrap().handle(HandleId::Sw).unwrap().lat_lng,
            GeoCoordinate::new(0.0, 1.0)
        );

        let (event_result, _) = handler.handle_event(up(0.5, 1.5), &mut map);
        assert_eq!(event_result.progress, GestureProgress::Finished);
        assert!(map.dragging);
        assert_eq!(map.dragging_changes, vec![false, true]);
        assert_eq!(
            *events.borrow(),
            vec![
                TransformEventKind::TranslateStart,
                TransformEventKind::Translate,
                TransformEventKind::TranslateEnd
            ]
        );
    }

    #[test]
    fn translate_in_mercator_keeps_latitudes() {
        let mut map = TestMap::default();
        let mut handler = RectangleTransform::new(unit_square(), TransformConfig::default());
        let _ = handler.enable(&mut map).unwrap();

        let _ = handler.handle_event(down(0.5, 0.5), &mut map);
        let _ = handler.handle_event(drag_to(0.5, 1.5), &mut map);

        let moved = bounds(&handler);
        assert_relative_eq!(moved.south_west(), GeoCoordinate::new(0.0, 1.0), epsilon = 1e-9);
        assert_relative_eq!(moved.north_east(), GeoCoordinate::new(1.0, 2.0), epsilon = 1e-9);
    }

    #[test]
    fn rotate_and_rotated_resize_in_mercator() {
        let mut map = MercatorTestMap::default();
        let mut handler = RectangleTransform::new(
            Rectangle::from_bounds(LatLngBounds::new(
                GeoCoordinate::new(50.0, 10.0),
                GeoCoordinate::new(51.0, 11.0),
            )),
            TransformConfig::default(),
        );
        let _ = handler.enable(&mut map).unwrap();
        let anchor = handler.anchor().unwrap();
        let rotations = Rc::new(RefCell::new(Vec::new()));
        let r = Rc::clone(&rotations);
        handler.on(TransformEventKind::Rotate, move |e, _| r.borrow_mut().push(e.rotation));

        // the rotate handle starts due west of the anchor, the first step crosses the layer's
        // negative x-axis
        let rotate_handle = handler
            .overlay()
            .unwrap()
            .handle(HandleId::Rotate)
            .unwrap()
            .lat_lng;
        let swept_to = |angle: f64| {
            let mut pointer = rotate_handle;
            pointer.rotate(angle, anchor, &SphericalMercator);
            pointer
        };
        let _ = handler.handle_event(
            PointerEvent::Down {
                element: map.element(rotate_handle),
            },
            &mut map,
        );
        let steps: Vec<f64> = (-3..=6).map(|step| step as f64 * 0.1).collect();
        for angle in steps.iter() {
            let element = map.element(swept_to(*angle));
            let _ = handler.handle_event(PointerEvent::Move { element }, &mut map);
        }
        let element = map.element(swept_to(0.6));
        let _ = handler.handle_event(PointerEvent::Up { element }, &mut map);

        assert_eq!(rotations.borrow().len(), steps.len());
        for (rotation, angle) in rotations.borrow().iter().zip(steps.iter()) {
            assert_relative_eq!(*rotation, *angle, epsilon = 1e-9);
        }
        assert_relative_eq!(handler.angle(), 0.6, epsilon = 1e-9);
        assert_relative_eq!(handler.anchor().unwrap(), anchor, epsilon = 1e-9);
        assert_relative_eq!(
            handler.overlay().unwrap().handle(HandleId::Rotate).unwrap().lat_lng,
            swept_to(0.6),
            epsilon = 1e-9
        );

        // drag the west edge half a degree further out, in the rectangle's own frame
        let mut pointer = GeoCoordinate::new(50.5, 9.5);
        pointer.rotate(0.6, anchor, &SphericalMercator);
        let west_handle = handler.overlay().unwrap().handle(HandleId::W).unwrap().lat_lng;
        let _ = handler.begin_gesture(
            GestureTarget::Handle(HandleId::W),
            map.element(west_handle),
            &mut map,
        );
        let element = map.element(pointer);
        let _ = handler.handle_event(PointerEvent::Move { element }, &mut map);
        let _ = handler.handle_event(PointerEvent::Up { element }, &mut map);

        let ring = handler.target().ring();
        let corners: Vec<na::Point2<f64>> = ring[..4]
            .iter()
            .map(|coord| SphericalMercator.project(*coord))
            .collect();
        for i in 0..4 {
            let a = corners[(i + 1) % 4] - corners[i];
            let b = corners[(i + 3) % 4] - corners[i];
            assert_relative_eq!(a.dot(&b) / (a.norm() * b.norm()), 0.0, epsilon = 1e-9);
        }

        let new_anchor = handler.anchor().unwrap();
        assert_relative_eq!(new_anchor, ring[0], epsilon = 1e-9);
        let mut expected_anchor = GeoCoordinate::new(50.0, 9.5);
        expected_anchor.rotate(0.6, anchor, &SphericalMercator);
        assert_relative_eq!(new_anchor, expected_anchor, epsilon = 1e-9);

        let south_west = SphericalMercator.project(GeoCoordinate::new(50.0, 9.5));
        let north_east = SphericalMercator.project(GeoCoordinate::new(51.0, 11.0));
        assert_relative_eq!(
            (corners[1] - corners[0]).norm(),
            north_east[1] - south_west[1],
            max_relative = 1e-9
        );
        assert_relative_eq!(
            (corners[3] - corners[0]).norm(),
            north_east[0] - south_west[0],
            max_relative = 1e-9
        );
        assert_relative_eq!(handler.angle(), 0.6, epsilon = 1e-9);
    }

    #[test]
    fn rotate_gesture() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let events = record_events(&mut handler);

        // the rotate handle sits at (0, -0.5), a quarter turn later it is south of the anchor
        let _ = handler.handle_event(down(0.0, -0.5), &mut map);
        let _ = handler.handle_event(drag_to(-0.5, 0.0), &mut map);

        assert_relative_eq!(handler.angle(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(handler.anchor().unwrap(), GeoCoordinate::new(0.0, 0.0));
        assert_relative_eq!(bounds(&handler).south_west(), GeoCoordinate::new(0.0, -1.0), epsilon = 1e-12);
        assert_relative_eq!(bounds(&handler).north_east(), GeoCoordinate::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(
            handler.overlay().unwrap().handle(HandleId::Rotate).unwrap().lat_lng,
            GeoCoordinate::new(-0.5, 0.0),
            epsilon = 1e-12
        );

        let _ = handler.handle_event(up(-0.5, 0.0), &mut map);
        assert_eq!(
            *events.borrow(),
            vec![
                TransformEventKind::RotateStart,
                TransformEventKind::Rotate,
                TransformEventKind::RotateEnd
            ]
        );
    }

    #[test]
    fn set_angle_round_trip() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let original = handler.target().ring();

        let widget_flags = handler.set_angle(FRAC_PI_2, &mut map).unwrap();
        assert!(widget_flags.geometry_modified);
        assert_relative_eq!(handler.angle(), FRAC_PI_2);

        let _ = handler.set_angle(0.0, &mut map).unwrap();
        assert_relative_eq!(handler.angle(), 0.0);
        for (back, orig) in handler.target().ring().iter().zip(original.iter()) {
            assert_relative_eq!(*back, *orig, epsilon = 1e-12);
        }
    }

    #[test]
    fn resize_south_east_handle() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let events = record_events(&mut handler);

        let _ = handler.handle_event(down(0.0, 1.0), &mut map);
        let _ = handler.handle_event(drag_to(-0.5, 2.0), &mut map);

        assert_relative_eq!(bounds(&handler).south_west(), GeoCoordinate::new(-0.5, 0.0));
        assert_relative_eq!(bounds(&handler).north_east(), GeoCoordinate::new(1.0, 2.0));
        assert_relative_eq!(handler.anchor().unwrap(), GeoCoordinate::new(-0.5, 0.0));
        assert_relative_eq!(handler.angle(), 0.0);
        assert_relative_eq!(
            handler.overlay().unwrap().handle(HandleId::Se).unwrap().lat_lng,
            GeoCoordinate::new(-0.5, 2.0)
        );

        let _ = handler.handle_event(up(-0.5, 2.0), &mut map);
        assert_eq!(
            *events.borrow(),
            vec![
                TransformEventKind::ScaleStart,
                TransformEventKind::Scale,
                TransformEventKind::ScaleEnd
            ]
        );
    }

    #[test]
    fn scale_handles_never_invert() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default().with_angle(0.3), &mut map);

        for id in HandleId::LAYOUT_ORDER {
            if id == HandleId::Rotate {
                continue;
            }
            let _ = handler.begin_gesture(GestureTarget::Handle(id), element(0.0, 0.0), &mut map);
            for (lat, lng) in [(40.0, 40.0), (-40.0, -40.0), (40.0, -40.0), (-40.0, 40.0)] {
                let _ = handler.handle_event(drag_to(lat, lng), &mut map);

                let anchor = handler.anchor().unwrap();
                let mut unrotated = handler.target().lat_lngs().clone();
                unrotated.rotate(-handler.angle(), anchor, &LonLat);
                let extent = unrotated.bounds().unwrap();
                assert!(extent.south() <= extent.north() + 1e-9);
                assert!(extent.west() <= extent.east() + 1e-9);
            }
            let _ = handler.handle_event(up(0.0, 0.0), &mut map);
        }
    }

    #[test]
    fn overlay_stays_orthogonal_after_rotated_resize() {
        let angle = 0.7;
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default().with_angle(angle), &mut map);
        let old_anchor = handler.anchor().unwrap();

        let mut pointer = GeoCoordinate::new(0.5, -0.5);
        pointer.rotate(angle, old_anchor, &LonLat);
        let _ = handler.begin_gesture(
            GestureTarget::Handle(HandleId::W),
            element(0.5, 0.0),
            &mut map,
        );
        let _ = handler.handle_event(drag_to(pointer.lat, pointer.lng), &mut map);
        let _ = handler.handle_event(up(pointer.lat, pointer.lng), &mut map);

        let anchor = handler.anchor().unwrap();
        let mut unrotated = handler.target().lat_lngs().clone();
        unrotated.rotate(-angle, anchor, &LonLat);
        let extent = unrotated.bounds().unwrap();
        assert_relative_eq!(anchor, extent.south_west(), epsilon = 1e-9);
        assert_relative_eq!(extent.east() - extent.west(), 1.5, epsilon = 1e-9);
        assert_relative_eq!(extent.north() - extent.south(), 1.0, epsilon = 1e-9);

        let mut overlay = handler.overlay().unwrap().clone();
        overlay.apply_matrix(
            &AffineMatrix::rotation_wrt_point(-angle, LonLat.project(anchor)),
            &LonLat,
        );
        for handle in overlay.handles.iter() {
            assert_relative_eq!(
                handle.lat_lng,
                handle.id.layout_position(extent),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn lost_pointer_up_finishes_stale_gesture() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let events = record_events(&mut handler);

        let _ = handler.handle_event(down(0.5, 0.5), &mut map);
        let _ = handler.handle_event(down(0.5, 0.5), &mut map);

        assert!(handler.is_gesture_active());
        assert_eq!(
            *events.borrow(),
            vec![
                TransformEventKind::TranslateStart,
                TransformEventKind::TranslateEnd,
                TransformEventKind::TranslateStart
            ]
        );
        assert_eq!(map.dragging_changes, vec![false, true, false]);
    }

    #[test]
    fn cancel_finishes_gesture() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let events = record_events(&mut handler);

        let (event_result, _) = handler.handle_event(PointerEvent::Cancel, &mut map);
        assert!(!event_result.handled);

        let _ = handler.handle_event(down(0.0, -0.5), &mut map);
        let (event_result, _) = handler.handle_event(PointerEvent::Cancel, &mut map);
        assert_eq!(event_result.progress, GestureProgress::Finished);
        assert!(!handler.is_gesture_active());
        assert!(map.dragging);
        assert_eq!(
            *events.borrow(),
            vec![TransformEventKind::RotateStart, TransformEventKind::RotateEnd]
        );
    }

    #[test]
    fn disable_finishes_gesture() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let events = record_events(&mut handler);

        let _ = handler.handle_event(down(1.0, 1.0), &mut map);
        let _ = handler.disable(&mut map);

        assert!(!handler.is_gesture_active());
        assert!(map.dragging);
        assert_eq!(
            *events.borrow(),
            vec![TransformEventKind::ScaleStart, TransformEventKind::ScaleEnd]
        );
    }

    #[test]
    fn pointer_outside_is_ignored() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let events = record_events(&mut handler);

        let (event_result, _) = handler.handle_event(down(3.0, 3.0), &mut map);
        assert!(!event_result.handled);
        assert_eq!(event_result.propagate, EventPropagation::Proceed);
        let (event_result, widget_flags) = handler.handle_event(drag_to(3.5, 3.0), &mut map);
        assert!(!event_result.handled);
        assert!(!widget_flags.geometry_modified);
        let (event_result, _) = handler.handle_event(up(3.5, 3.0), &mut map);
        assert!(!event_result.handled);

        assert!(events.borrow().is_empty());
        assert!(map.dragging_changes.is_empty());
    }

    #[test]
    fn listeners_receive_rotation_and_anchor() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        let received = Rc::new(RefCell::new(Vec::new()));

        let r = Rc::clone(&received);
        let key = handler.on(TransformEventKind::Translate, move |e, target: &Rectangle| {
            r.borrow_mut().push((e.rotation, e.anchor, target.ring()[0]));
        });

        let _ = handler.handle_event(down(0.5, 0.5), &mut map);
        let _ = handler.handle_event(drag_to(1.5, 0.5), &mut map);
        assert_eq!(
            *received.borrow(),
            vec![(
                0.0,
                Some(GeoCoordinate::new(1.0, 0.0)),
                GeoCoordinate::new(1.0, 0.0)
            )]
        );

        assert!(handler.off(key));
        let _ = handler.handle_event(drag_to(2.5, 0.5), &mut map);
        assert_eq!(received.borrow().len(), 1);
    }

    #[test]
    fn grid_footprint_follows_the_anchor() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);
        assert!(map.overlay.as_ref().unwrap().grid_footprint.is_none());

        handler.set_grid_characteristics(
            Some(GridCharacteristics::new(4, 4, 0.25, 0.25)),
            &mut map,
        );
        let footprint = map
            .overlay
            .as_ref()
            .unwrap()
            .grid_footprint
            .as_ref()
            .unwrap()
            .lat_lngs
            .coordinates();
        assert_relative_eq!(footprint[0], GeoCoordinate::new(0.0, 0.0));
        assert_relative_eq!(footprint[1], GeoCoordinate::new(1.0, 0.0), epsilon = 1e-9);

        handler.set_grid_characteristics(None, &mut map);
        assert!(map.overlay.as_ref().unwrap().grid_footprint.is_none());
    }

    #[test]
    fn set_config_rebuilds_the_overlay() {
        let mut map = TestMap::default();
        let mut handler = enabled_handler(TransformConfig::default(), &mut map);

        let mut config = TransformConfig::default().with_angle(1.0);
        config.scale_handle.radius = 8.0;
        let _ = handler.set_config(config, &mut map).unwrap();

        assert!(handler.is_enabled());
        assert_relative_eq!(handler.angle(), 0.0);
        assert_relative_eq!(
            map.overlay.as_ref().unwrap().handle(HandleId::N).unwrap().style.radius,
            8.0
        );
    }
}
