/// Flags returned to the host that displays the rectangle.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WidgetFlags {
    /// The rectangle layer needs redrawing.
    pub redraw: bool,
    /// The rectangle geometry was modified.
    pub geometry_modified: bool,
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self {
            redraw: false,
            geometry_modified: false,
        }
    }
}

impl WidgetFlags {
    /// Flags for a modified geometry.
    pub fn modified() -> Self {
        Self {
            redraw: true,
            geometry_modified: true,
        }
    }

    /// Merge with another WidgetFlags struct.
    pub fn merge(&mut self, other: Self) {
        self.redraw |= other.redraw;
        self.geometry_modified |= other.geometry_modified;
    }
}

impl std::ops::BitOr for WidgetFlags {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self::Output {
        self.merge(rhs);
        self
    }
}

impl std::ops::BitOrAssign for WidgetFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.merge(rhs);
    }
}
