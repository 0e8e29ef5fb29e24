// Imports
use rectform_compose::GeoCoordinate;
use slotmap::SlotMap;

slotmap::new_key_type! {
    pub struct ListenerKey;
}

/// The lifecycle events of the transform gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformEventKind {
    TranslateStart,
    Translate,
    TranslateEnd,
    RotateStart,
    Rotate,
    RotateEnd,
    ScaleStart,
    Scale,
    ScaleEnd,
}

impl TransformEventKind {
    /// The event name, as observers of the map layer know it.
    pub fn name(self) -> &'static str {
        match self {
            Self::TranslateStart => "translatestart",
            Self::Translate => "translate",
            Self::TranslateEnd => "translateend",
            Self::RotateStart => "rotatestart",
            Self::Rotate => "rotate",
            Self::RotateEnd => "rotateend",
            Self::ScaleStart => "scalestart",
            Self::Scale => "scale",
            Self::ScaleEnd => "scaleend",
        }
    }
}

/// A lifecycle event, dispatched together with a reference to the transformed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformEvent {
    pub kind: TransformEventKind,
    /// The cumulative rotation in radians.
    pub rotation: f64,
    /// The anchor. None until the handler was enabled for the first time.
    pub anchor: Option<GeoCoordinate>,
}

/// A listener callback.
pub type Listener<T> = Box<dyn FnMut(&TransformEvent, &T)>;

/// The registered lifecycle listeners.
pub struct Listeners<T> {
    listeners: SlotMap<ListenerKey, (TransformEventKind, Listener<T>)>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            listeners: SlotMap::with_key(),
        }
    }
}

impl<T> std::fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field(
                "listeners",
                &self
                    .listeners
                    .iter()
                    .map(|(key, (kind, _))| (key, kind))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T> Listeners<T> {
    pub fn insert(&mut self, kind: TransformEventKind, listener: Listener<T>) -> ListenerKey {
        self.listeners.insert((kind, listener))
    }

    /// Removes the listener. Returns false if it was already removed.
    pub fn remove(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    /// Calls every listener registered for the kind of the event.
    pub fn dispatch(&mut self, event: &TransformEvent, target: &T) {
        for (_, (kind, listener)) in self.listeners.iter_mut() {
            if *kind == event.kind {
                listener(event, target);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
