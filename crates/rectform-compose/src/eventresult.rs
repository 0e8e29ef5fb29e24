// Imports
use std::fmt::Debug;

/// The outcome of feeding a pointer event into a gesture state machine.
#[derive(Debug, Clone)]
pub struct EventResult<T>
where
    T: Debug,
{
    /// Whether the event was consumed by the state machine.
    pub handled: bool,
    /// Whether the host should continue dispatching the event, e.g. to map panning.
    pub propagate: EventPropagation,
    /// The gesture progress after the event.
    pub progress: T,
}

impl<T> EventResult<T>
where
    T: Debug,
{
    /// The event was consumed, nothing else should see it.
    pub fn consumed(progress: T) -> Self {
        Self {
            handled: true,
            propagate: EventPropagation::Stop,
            progress,
        }
    }

    /// The event was not meant for the state machine.
    pub fn ignored(progress: T) -> Self {
        Self {
            handled: false,
            propagate: EventPropagation::Proceed,
            progress,
        }
    }
}

/// Whether the event should be propagated further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventPropagation {
    /// Proceed with the propagation.
    Proceed,
    /// Stop the propagation.
    Stop,
}
