// Imports
use std::f64::consts::{PI, TAU};

/// Extension trait for [`na::Vector2<f64>`].
pub trait Vector2Ext
where
    Self: Sized,
{
    /// calculates the angle other is "ahead" of self, measured from the x axis towards the y axis.
    /// Wrapped into (-pi, pi].
    fn angle_ahead(&self, other: &Self) -> f64;
}

impl Vector2Ext for na::Vector2<f64> {
    fn angle_ahead(&self, other: &Self) -> f64 {
        let angle = other[1].atan2(other[0]) - self[1].atan2(self[0]);

        if angle > PI {
            angle - TAU
        } else if angle <= -PI {
            angle + TAU
        } else {
            angle
        }
    }
}

/// Extension trait for [`na::Point2<f64>`].
pub trait Point2Ext
where
    Self: Sized,
{
    /// Converts to kurbo::Point
    fn to_kurbo_point(&self) -> kurbo::Point;
}

impl Point2Ext for na::Point2<f64> {
    fn to_kurbo_point(&self) -> kurbo::Point {
        kurbo::Point {
            x: self[0],
            y: self[1],
        }
    }
}
