#![warn(missing_debug_implementations)]
#![allow(clippy::single_match)]
#![allow(clippy::derivable_impls)]

//! The rectform-engine crate lets a user translate, scale and rotate a geographic rectangle with
//! pointer-drag gestures on a set of control handles.
//!
//! The main entry point is the [RectangleTransform] handler.

// Modules
pub mod config;
pub mod error;
pub mod events;
pub mod handler;
pub mod map;
pub mod overlay;
pub mod widgetflags;

// Re-exports
pub use config::TransformConfig;
pub use error::TransformError;
pub use events::{ListenerKey, TransformEvent, TransformEventKind};
pub use handler::{GestureTarget, RectangleTransform};
pub use map::MapSurface;
pub use overlay::{ControlOverlay, Handle, HandleId, HandleRole};
pub use widgetflags::WidgetFlags;

// Renames
extern crate nalgebra as na;
