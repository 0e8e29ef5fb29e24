// Imports
use crate::overlay::HandleRole;
use crate::TransformError;
use anyhow::Context;
use rectform_compose::geodesy::GridCharacteristics;
use rectform_compose::Color;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

const HANDLE_STROKE_COLOR: Color = Color {
    r: 32.0 / 255.0,
    g: 32.0 / 255.0,
    b: 32.0 / 255.0,
};

const ROTATE_HANDLE_FILL_COLOR: Color = Color {
    r: 221.0 / 255.0,
    g: 221.0 / 255.0,
    b: 221.0 / 255.0,
};

/// The visual style of a control handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "handle_style")]
pub struct HandleStyle {
    #[serde(rename = "radius")]
    /// The radius in layer pixels.
    pub radius: f64,
    #[serde(rename = "fill_color")]
    pub fill_color: Color,
    #[serde(rename = "color")]
    /// The stroke color.
    pub color: Color,
    #[serde(rename = "fill_opacity")]
    pub fill_opacity: f64,
    #[serde(rename = "weight")]
    /// The stroke width in layer pixels.
    pub weight: f64,
    #[serde(rename = "opacity")]
    /// The stroke opacity.
    pub opacity: f64,
    #[serde(rename = "set_cursor")]
    /// Whether the handle shows a resize cursor on hover.
    pub set_cursor: bool,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self::scale_default()
    }
}

impl HandleStyle {
    /// The default style of the edge and corner handles.
    pub fn scale_default() -> Self {
        Self {
            radius: 5.0,
            fill_color: Color::WHITE,
            color: HANDLE_STROKE_COLOR,
            fill_opacity: 1.0,
            weight: 2.0,
            opacity: 0.7,
            set_cursor: true,
        }
    }

    /// The default style of the south-west handle, which sits on the anchor.
    pub fn scale_origin_default() -> Self {
        Self {
            radius: 10.0,
            ..Self::scale_default()
        }
    }

    /// The default style of the rotate handle.
    pub fn rotate_default() -> Self {
        Self {
            radius: 7.0,
            fill_color: ROTATE_HANDLE_FILL_COLOR,
            color: HANDLE_STROKE_COLOR,
            fill_opacity: 1.0,
            weight: 2.0,
            opacity: 0.7,
            set_cursor: false,
        }
    }

    /// The radius within which a layer point hits the handle, including half the stroke width.
    pub fn hit_radius(&self, tolerance: f64) -> f64 {
        self.radius + self.weight * 0.5 + tolerance
    }
}

/// A handle style with every field optional, for overriding one handle category partially.
#[derive(Debug, Default, Deserialize)]
struct HandleStylePatch {
    radius: Option<f64>,
    fill_color: Option<Color>,
    color: Option<Color>,
    fill_opacity: Option<f64>,
    weight: Option<f64>,
    opacity: Option<f64>,
    set_cursor: Option<bool>,
}

impl HandleStylePatch {
    fn merge_over(self, defaults: HandleStyle) -> HandleStyle {
        HandleStyle {
            radius: self.radius.unwrap_or(defaults.radius),
            fill_color: self.fill_color.unwrap_or(defaults.fill_color),
            color: self.color.unwrap_or(defaults.color),
            fill_opacity: self.fill_opacity.unwrap_or(defaults.fill_opacity),
            weight: self.weight.unwrap_or(defaults.weight),
            opacity: self.opacity.unwrap_or(defaults.opacity),
            set_cursor: self.set_cursor.unwrap_or(defaults.set_cursor),
        }
    }
}

fn deserialize_scale_handle<'de, D>(deserializer: D) -> Result<HandleStyle, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(HandleStylePatch::deserialize(deserializer)?.merge_over(HandleStyle::scale_default()))
}

fn deserialize_scale_origin_handle<'de, D>(deserializer: D) -> Result<HandleStyle, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(HandleStylePatch::deserialize(deserializer)?
        .merge_over(HandleStyle::scale_origin_default()))
}

fn deserialize_rotate_handle<'de, D>(deserializer: D) -> Result<HandleStyle, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(HandleStylePatch::deserialize(deserializer)?.merge_over(HandleStyle::rotate_default()))
}

/// The style of the line connecting the rotate handle with the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "guide_line_style")]
pub struct GuideLineStyle {
    #[serde(rename = "stroke")]
    pub stroke: bool,
    #[serde(rename = "color")]
    pub color: Color,
    #[serde(rename = "weight")]
    pub weight: f64,
    #[serde(rename = "opacity")]
    pub opacity: f64,
    #[serde(rename = "dash_array")]
    /// Alternating dash and gap lengths in layer pixels.
    pub dash_array: Vec<f64>,
    #[serde(rename = "fill")]
    pub fill: bool,
}

impl Default for GuideLineStyle {
    fn default() -> Self {
        Self {
            stroke: true,
            color: Color::BLACK,
            weight: 1.0,
            opacity: 1.0,
            dash_array: vec![3.0, 3.0],
            fill: false,
        }
    }
}

/// The visual class the host renders handles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename = "handle_class")]
pub enum HandleClass {
    #[serde(rename = "circle_marker")]
    /// A circle with a radius in layer pixels.
    CircleMarker,
    #[serde(rename = "marker")]
    /// An icon marker.
    Marker,
}

impl Default for HandleClass {
    fn default() -> Self {
        Self::CircleMarker
    }
}

/// The configuration of a [crate::RectangleTransform].
///
/// Missing fields of a deserialized config fall back to their defaults. Partial handle styles
/// are merged over the defaults of their handle category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "transform_config")]
pub struct TransformConfig {
    #[serde(rename = "angle")]
    /// The initial rotation in radians, applied once when the handler is first enabled.
    pub angle: f64,
    #[serde(rename = "scale_handle", deserialize_with = "deserialize_scale_handle")]
    pub scale_handle: HandleStyle,
    #[serde(
        rename = "scale_origin_handle",
        deserialize_with = "deserialize_scale_origin_handle"
    )]
    pub scale_origin_handle: HandleStyle,
    #[serde(rename = "rotate_handle", deserialize_with = "deserialize_rotate_handle")]
    pub rotate_handle: HandleStyle,
    #[serde(rename = "rotate_line")]
    pub rotate_line: GuideLineStyle,
    #[serde(rename = "handle_class")]
    pub handle_class: HandleClass,
    #[serde(rename = "grid")]
    /// When set, the overlay also shows the real-world footprint of the grid.
    pub grid: Option<GridCharacteristics>,
    #[serde(rename = "hit_tolerance")]
    /// Extra slack in layer pixels when hit-testing handles.
    pub hit_tolerance: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            angle: 0.0,
            scale_handle: HandleStyle::scale_default(),
            scale_origin_handle: HandleStyle::scale_origin_default(),
            rotate_handle: HandleStyle::rotate_default(),
            rotate_line: GuideLineStyle::default(),
            handle_class: HandleClass::default(),
            grid: None,
            hit_tolerance: 2.0,
        }
    }
}

impl TransformConfig {
    /// With the initial angle in radians.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// With the initial angle given as a compass bearing, in degrees clockwise.
    pub fn with_bearing_degrees(mut self, bearing: f64) -> Self {
        self.angle = -bearing.to_radians();
        self
    }

    /// With a grid footprint shown in the overlay.
    pub fn with_grid(mut self, grid: GridCharacteristics) -> Self {
        self.grid = Some(grid);
        self
    }

    /// The style for handles of the given role.
    pub fn handle_style(&self, role: HandleRole) -> &HandleStyle {
        match role {
            HandleRole::Scale => &self.scale_handle,
            HandleRole::ScaleOrigin => &self.scale_origin_handle,
            HandleRole::Rotate => &self.rotate_handle,
        }
    }

    /// Parse from a (possibly partial) json document.
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a json file.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading transform config from `{}` failed", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("parsing transform config `{}` failed", path.display()))
    }
}
