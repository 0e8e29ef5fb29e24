// Modules
mod polyline;
mod rectangle;
mod shapeable;

// Re-exports
pub use polyline::Polyline;
pub use rectangle::Rectangle;
pub use shapeable::Shapeable;
