//! Color scales and the value-to-color mapping.
//!
//! A [`ColorScale`] maps a normalized position in [0, 1] to an RGBA color,
//! either through a continuous gradient or a discrete qualitative list.
//! A [`ColorMapping`] pairs a scale with the normalization range used to
//! bring raw data values into that domain.

use std::fmt;

use crate::error::{MapshadeError, Result};

/// Parse a CSS color string (named, hex, rgb(), ...) into RGBA bytes
pub fn parse_color(s: &str) -> Result<[u8; 4]> {
    s.parse::<colorgrad::Color>()
        .map(|c| c.to_rgba8())
        .map_err(|e| MapshadeError::InvalidColor {
            message: format!("'{}': {}", s, e),
        })
}

/// A function from a normalized position in [0, 1] to an RGBA color
pub enum ColorScale {
    /// Continuous gradient
    Continuous(colorgrad::Gradient),
    /// Discrete color list (qualitative palettes)
    Discrete(Vec<[u8; 4]>),
}

impl ColorScale {
    /// Look up the color at a normalized position (clamped to [0, 1])
    pub fn color_at(&self, t: f64) -> [u8; 4] {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            ColorScale::Continuous(gradient) => gradient.at(t).to_rgba8(),
            ColorScale::Discrete(colors) => {
                let index = ((t * colors.len() as f64) as usize).min(colors.len() - 1);
                colors[index]
            }
        }
    }

    /// Whether this scale is a discrete color list
    pub fn is_discrete(&self) -> bool {
        matches!(self, ColorScale::Discrete(_))
    }
}

impl fmt::Debug for ColorScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorScale::Continuous(_) => write!(f, "ColorScale::Continuous"),
            ColorScale::Discrete(colors) => {
                write!(f, "ColorScale::Discrete({} colors)", colors.len())
            }
        }
    }
}

/// A renderable color mapping: a scale plus the normalization range used to
/// scale input values into [0, 1] before lookup.
///
/// Constructed once per session and discarded after the plot is produced.
#[derive(Debug)]
pub struct ColorMapping {
    scale: ColorScale,
    name: String,
    vmin: f64,
    vmax: f64,
}

impl ColorMapping {
    /// Create a mapping over the given normalization range
    pub fn new(name: impl Into<String>, scale: ColorScale, vmin: f64, vmax: f64) -> Self {
        Self {
            scale,
            name: name.into(),
            vmin,
            vmax,
        }
    }

    /// Name of the palette or gradient backing this mapping
    pub fn palette_name(&self) -> &str {
        &self.name
    }

    /// The (min, max) normalization range
    pub fn range(&self) -> (f64, f64) {
        (self.vmin, self.vmax)
    }

    /// The underlying color scale
    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    /// Scale a raw value into [0, 1]. A degenerate range maps everything
    /// to the midpoint.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.vmax > self.vmin {
            ((value - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }

    /// Map a raw value to a color
    pub fn color_for(&self, value: f64) -> [u8; 4] {
        self.color_for_binned(value, None)
    }

    /// Map a raw value to a color, optionally quantized into `classes` bins
    pub fn color_for_binned(&self, value: f64, classes: Option<usize>) -> [u8; 4] {
        self.color_at_binned(self.normalize(value), classes)
    }

    /// Look up a normalized position directly (used by the colorbar)
    pub fn color_at_binned(&self, t: f64, classes: Option<usize>) -> [u8; 4] {
        let t = match classes {
            Some(n) if n > 1 => quantize(t, n),
            _ => t,
        };
        self.scale.color_at(t)
    }
}

/// Snap a normalized position to the midpoint spread of `n` bins
fn quantize(t: f64, n: usize) -> f64 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let index = ((t * n as f64) as usize).min(n - 1);
    index as f64 / (n - 1) as f64
}
