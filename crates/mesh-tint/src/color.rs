//! Part categories and the colors they are rendered with.

use std::fmt;

use tracing::debug;

use crate::Mesh;

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "supports";

/// Color for categories that are not in the palette.
const FALLBACK_COLOR: [f64; 4] = [0.5, 0.5, 0.5, 1.0];

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Convert unit-range float components to bytes.
    ///
    /// Components are scaled by 255 and truncated, so 0.5 maps to 127.
    pub fn from_unit(components: [f64; 4]) -> Self {
        Rgba(components.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8))
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r(),
            self.g(),
            self.b(),
            self.a()
        )
    }
}

/// Semantic label for a printed part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Supports,
    Connectors,
    Lockpins,
    Other,
    /// Any label not in the palette.
    Unrecognized,
}

impl Category {
    /// Parse a category label. Matching is exact; unknown labels map to
    /// [`Category::Unrecognized`].
    pub fn parse(label: &str) -> Self {
        match label {
            "supports" => Category::Supports,
            "connectors" => Category::Connectors,
            "lockpins" => Category::Lockpins,
            "other" => Category::Other,
            _ => Category::Unrecognized,
        }
    }

    /// Palette color as unit-range RGBA.
    pub fn unit_color(self) -> [f64; 4] {
        match self {
            Category::Supports => [0.969, 0.714, 0.0, 1.0],   // #f7b600
            Category::Connectors => [0.0, 0.337, 0.702, 1.0], // #0056b3
            Category::Lockpins => [0.769, 0.118, 0.227, 1.0], // #c41e3a
            Category::Other => [0.290, 0.620, 0.290, 1.0],    // #4a9e4a
            Category::Unrecognized => FALLBACK_COLOR,
        }
    }

    /// Palette color as bytes.
    pub fn color(self) -> Rgba {
        Rgba::from_unit(self.unit_color())
    }
}

/// Resolve a category label to its color. Unknown labels get neutral gray.
pub fn resolve_color(category: &str) -> Rgba {
    Category::parse(category).color()
}

/// Tint every face of `mesh` with the color of `category`.
///
/// Any previous face colors are replaced.
pub fn apply_color(mesh: &mut Mesh, category: &str) {
    let color = resolve_color(category);
    debug!(
        "Tinting {} faces as {:?} ({})",
        mesh.face_count(),
        category,
        color
    );
    mesh.face_colors = Some(vec![color; mesh.face_count()]);
}
