//! Colormap selection for choropleth rendering.
//!
//! This module turns a scheme request (category, optional palette name,
//! optional gradient stops) into a renderable color mapping plus the
//! normalization range used to scale data values into [0, 1].

pub mod palettes;
pub mod scale;
pub mod selector;

pub use palettes::{named_palette, palette_names};
pub use scale::{parse_color, ColorMapping, ColorScale};
pub use selector::{select, SchemeCategory, SchemeRequest, INTERACTIVE_FALLBACK};
