// Imports
use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A rgb color. Opacity is a property of the style the color is used in.
///
/// Serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red, ranging [0.0, 1.0].
    pub r: f64,
    /// Green, ranging [0.0, 1.0].
    pub g: f64,
    /// Blue, ranging [0.0, 1.0].
    pub b: f64,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    /// Black color.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// White color.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// A new color from rgb values.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Parse from a `#rrggbb` or `#rgb` hex string, the leading `#` being optional.
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let srgb = palette::Srgb::<u8>::from_str(hex)
            .with_context(|| format!("parsing hex color `{hex}` failed"))?
            .into_format::<f64>();

        Ok(Self::new(srgb.red, srgb.green, srgb.blue))
    }

    /// The `#rrggbb` hex string.
    pub fn to_hex(&self) -> String {
        let srgb = palette::Srgb::new(self.r, self.g, self.b).into_format::<u8>();

        format!("#{:02x}{:02x}{:02x}", srgb.red, srgb.green, srgb.blue)
    }

    /// Approximate equality.
    pub fn approx_eq(self, other: Self) -> bool {
        approx::relative_eq!(self.r, other.r)
            && approx::relative_eq!(self.g, other.g)
            && approx::relative_eq!(self.b, other.b)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(|e| serde::de::Error::custom(format!("{e:#}")))
    }
}
