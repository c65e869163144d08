//! Scheme resolution: turn a [`SchemeRequest`] into a [`ColorMapping`].
//!
//! This is a pure lookup/construction step with no side effects. The
//! interactive prompting that produces a request belongs to the session
//! layer; by the time `select` runs, every name and stop is already a value.

use std::fmt;
use std::str::FromStr;

use super::palettes::named_palette;
use super::scale::{ColorMapping, ColorScale};
use crate::error::{MapshadeError, Result};

/// Fallback palette when an `interactive` name misses the registry
pub const INTERACTIVE_FALLBACK: &str = "Blues";

/// Recognized scheme categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeCategory {
    /// Data that progresses from low to high (default palette: Blues)
    Sequential,
    /// Data with a central point (default palette: RdBu)
    Divergent,
    /// Categorical data (default palette: Set3)
    Qualitative,
    /// A continuous gradient between exactly two color stops
    DualGradient,
    /// A palette name resolved against the registry, with a fixed fallback
    Interactive,
    /// An arbitrary ordered list of color stops
    Custom,
}

impl SchemeCategory {
    /// The fixed default palette for categories that have one
    pub fn default_palette(&self) -> Option<&'static str> {
        match self {
            SchemeCategory::Sequential => Some("Blues"),
            SchemeCategory::Divergent => Some("RdBu"),
            SchemeCategory::Qualitative => Some("Set3"),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeCategory::Sequential => "sequential",
            SchemeCategory::Divergent => "divergent",
            SchemeCategory::Qualitative => "qualitative",
            SchemeCategory::DualGradient => "dual_gradient",
            SchemeCategory::Interactive => "interactive",
            SchemeCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for SchemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeCategory {
    type Err = MapshadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(SchemeCategory::Sequential),
            "divergent" | "diverging" => Ok(SchemeCategory::Divergent),
            "qualitative" => Ok(SchemeCategory::Qualitative),
            "dual_gradient" | "dual-gradient" | "dual" => Ok(SchemeCategory::DualGradient),
            "interactive" => Ok(SchemeCategory::Interactive),
            "custom" => Ok(SchemeCategory::Custom),
            other => Err(MapshadeError::InvalidScheme {
                message: format!(
                    "Unrecognized category '{}'. Choose 'sequential', 'divergent', \
                     'qualitative', 'dual_gradient', 'interactive' or 'custom'",
                    other
                ),
            }),
        }
    }
}

/// A fully resolved request for a color scheme
#[derive(Debug, Clone)]
pub struct SchemeRequest {
    /// Scheme category
    pub category: SchemeCategory,
    /// Named palette, when the category uses one
    pub named_palette: Option<String>,
    /// Ordered gradient color stops (CSS color strings)
    pub color_stops: Vec<String>,
    /// Explicit normalization bounds, overriding the data range
    pub value_range: Option<(f64, f64)>,
}

impl SchemeRequest {
    /// A request with only a category set
    pub fn for_category(category: SchemeCategory) -> Self {
        Self {
            category,
            named_palette: None,
            color_stops: Vec::new(),
            value_range: None,
        }
    }
}

/// Resolve a scheme request into a color mapping normalized over
/// `data_range` (unless the request carries explicit bounds).
///
/// Resolution policy, in priority order:
/// 1. `dual_gradient`: a two-stop gradient, exactly two stops required.
/// 2. Any non-empty stop list: a multi-stop gradient through the stops.
/// 3. `interactive`: registry lookup with a fixed "Blues" fallback.
/// 4. Otherwise the named palette, or the category default.
pub fn select(request: &SchemeRequest, data_range: (f64, f64)) -> Result<ColorMapping> {
    let (vmin, vmax) = request.value_range.unwrap_or(data_range);

    if request.category == SchemeCategory::DualGradient {
        if request.color_stops.len() != 2 {
            return Err(MapshadeError::InvalidGradient {
                count: request.color_stops.len(),
            });
        }
        let scale = gradient_through(&request.color_stops)?;
        return Ok(ColorMapping::new(
            gradient_name(&request.color_stops),
            scale,
            vmin,
            vmax,
        ));
    }

    if !request.color_stops.is_empty() {
        let scale = gradient_through(&request.color_stops)?;
        return Ok(ColorMapping::new(
            gradient_name(&request.color_stops),
            scale,
            vmin,
            vmax,
        ));
    }

    if request.category == SchemeCategory::Interactive {
        let requested = request.named_palette.as_deref().unwrap_or("").trim();
        let (name, scale) = named_palette(requested)
            .or_else(|| named_palette(INTERACTIVE_FALLBACK))
            .expect("fallback palette is registered");
        return Ok(ColorMapping::new(name, scale, vmin, vmax));
    }

    let palette = match request.named_palette.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => request.category.default_palette().ok_or_else(|| {
            MapshadeError::InvalidScheme {
                message: format!(
                    "'{}' scheme requires at least one color stop",
                    request.category
                ),
            }
        })?,
    };

    let (name, scale) = named_palette(palette).ok_or_else(|| MapshadeError::InvalidScheme {
        message: format!("Unknown palette '{}'", palette),
    })?;

    Ok(ColorMapping::new(name, scale, vmin, vmax))
}

/// Build a continuous gradient through the given stops, in order. A single
/// stop yields a solid-color gradient.
fn gradient_through(stops: &[String]) -> Result<ColorScale> {
    let mut html: Vec<&str> = stops.iter().map(|s| s.as_str()).collect();
    if html.len() == 1 {
        html.push(html[0]);
    }
    let gradient = colorgrad::CustomGradient::new()
        .html_colors(&html)
        .build()
        .map_err(|e| MapshadeError::InvalidColor {
            message: e.to_string(),
        })?;
    Ok(ColorScale::Continuous(gradient))
}

fn gradient_name(stops: &[String]) -> String {
    format!("custom({})", stops.join(", "))
}
