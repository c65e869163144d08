//! Choropleth rasterization.
//!
//! Renders a loaded [`ShapeTable`] to an RGBA image: polygon fills colored
//! by a [`ColorMapping`], edge strokes, and an optional colorbar legend.
//! Features with no usable value are filled in the configured missing color,
//! the same way missing grid cells render as a sentinel color elsewhere.

use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;
use tracing::{debug, info};

use crate::colormaps::{parse_color, ColorMapping};
use crate::config::RenderConfig;
use crate::error::{MapshadeError, Result};
use crate::shapefiles::{Bounds, ShapeTable};

/// Outer margin around the plot area, in pixels
const MARGIN: u32 = 20;

/// Colorbar strip width and its gap from the plot area, in pixels
const COLORBAR_WIDTH: u32 = 24;
const COLORBAR_GAP: u32 = 16;

/// Fraction of the data bounds added as padding on each side
const BOUNDS_PADDING: f64 = 0.02;

/// Resolved rendering options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub edge_color: [u8; 4],
    pub line_width: f32,
    pub legend: bool,
    pub classes: Option<usize>,
    pub background: [u8; 4],
    pub missing_color: [u8; 4],
}

impl RenderOptions {
    /// Resolve options from the render configuration
    pub fn from_config(render: &RenderConfig, classes: Option<usize>) -> Result<Self> {
        Ok(Self {
            width: render.width_px(),
            height: render.height_px(),
            edge_color: parse_color(&render.edge_color)?,
            line_width: render.line_width,
            legend: render.legend,
            classes,
            background: parse_color(&render.background)?,
            missing_color: parse_color(&render.missing_color)?,
        })
    }
}

/// Affine map from geographic coordinates to pixel coordinates,
/// aspect-preserving, with the y axis flipped for screen space.
struct Transform {
    scale: f64,
    min_x: f64,
    max_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Transform {
    fn new(bounds: &Bounds, plot_w: f64, plot_h: f64) -> Self {
        let pad_x = if bounds.width() > 0.0 {
            bounds.width() * BOUNDS_PADDING
        } else {
            1.0
        };
        let pad_y = if bounds.height() > 0.0 {
            bounds.height() * BOUNDS_PADDING
        } else {
            1.0
        };

        let min_x = bounds.min_x - pad_x;
        let max_x = bounds.max_x + pad_x;
        let min_y = bounds.min_y - pad_y;
        let max_y = bounds.max_y + pad_y;

        let scale = (plot_w / (max_x - min_x)).min(plot_h / (max_y - min_y));

        // Center the map inside the plot area
        let offset_x = MARGIN as f64 + (plot_w - (max_x - min_x) * scale) / 2.0;
        let offset_y = MARGIN as f64 + (plot_h - (max_y - min_y) * scale) / 2.0;

        Self {
            scale,
            min_x,
            max_y,
            offset_x,
            offset_y,
        }
    }

    fn to_px(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.offset_x + (x - self.min_x) * self.scale,
            self.offset_y + (self.max_y - y) * self.scale,
        )
    }

    fn to_geo(&self, px: f64, py: f64) -> (f64, f64) {
        (
            self.min_x + (px - self.offset_x) / self.scale,
            self.max_y - (py - self.offset_y) / self.scale,
        )
    }
}

/// Render a choropleth map of `values` over the table's features.
///
/// `values` must hold one entry per feature, in feature order.
pub fn render_choropleth(
    table: &ShapeTable,
    values: &[Option<f64>],
    mapping: &ColorMapping,
    opts: &RenderOptions,
) -> Result<RgbaImage> {
    if values.len() != table.features.len() {
        return Err(MapshadeError::Render {
            message: format!(
                "{} values for {} features",
                values.len(),
                table.features.len()
            ),
        });
    }
    if opts.width < 4 * MARGIN || opts.height < 4 * MARGIN {
        return Err(MapshadeError::Render {
            message: format!("image too small: {}x{}", opts.width, opts.height),
        });
    }

    let legend_extra = if opts.legend {
        COLORBAR_WIDTH + COLORBAR_GAP
    } else {
        0
    };
    let plot_w = (opts.width - 2 * MARGIN - legend_extra) as f64;
    let plot_h = (opts.height - 2 * MARGIN) as f64;
    let transform = Transform::new(&table.bounds(), plot_w, plot_h);

    // One fill color per feature, computed up front
    let fills: Vec<[u8; 4]> = values
        .iter()
        .map(|v| match v {
            Some(value) if value.is_finite() => mapping.color_for_binned(*value, opts.classes),
            _ => opts.missing_color,
        })
        .collect();

    let mut img: RgbaImage =
        ImageBuffer::from_pixel(opts.width, opts.height, Rgba(opts.background));

    // Fill pass: sample each plot-area pixel at its center and take the
    // first feature that contains it (bbox prefilter inside `contains`).
    let plot_x1 = MARGIN + plot_w as u32;
    let plot_y1 = MARGIN + plot_h as u32;
    for py in MARGIN..plot_y1 {
        for px in MARGIN..plot_x1 {
            let (gx, gy) = transform.to_geo(px as f64 + 0.5, py as f64 + 0.5);
            for (feature, fill) in table.features.iter().zip(&fills) {
                if feature.contains(gx, gy) {
                    img.put_pixel(px, py, Rgba(*fill));
                    break;
                }
            }
        }
    }

    // Edge pass
    if opts.line_width > 0.0 {
        let brush = ((opts.line_width - 1.0) / 2.0).round().max(0.0) as i32;
        for feature in &table.features {
            for ring in &feature.rings {
                for pair in ring.windows(2) {
                    let (x0, y0) = transform.to_px(pair[0].0, pair[0].1);
                    let (x1, y1) = transform.to_px(pair[1].0, pair[1].1);
                    draw_line(
                        &mut img,
                        (x0.round() as i32, y0.round() as i32),
                        (x1.round() as i32, y1.round() as i32),
                        opts.edge_color,
                        brush,
                    );
                }
            }
        }
    }

    if opts.legend {
        draw_colorbar(&mut img, mapping, opts);
    }

    debug!(
        width = opts.width,
        height = opts.height,
        features = table.features.len(),
        palette = mapping.palette_name(),
        "Rendered choropleth"
    );

    Ok(img)
}

/// Vertical colorbar at the right margin, top = vmax
fn draw_colorbar(img: &mut RgbaImage, mapping: &ColorMapping, opts: &RenderOptions) {
    let x0 = opts.width - MARGIN - COLORBAR_WIDTH;
    let x1 = opts.width - MARGIN;
    let y0 = MARGIN;
    let y1 = opts.height - MARGIN;
    let span = (y1 - y0 - 1).max(1) as f64;

    for py in y0..y1 {
        let t = 1.0 - (py - y0) as f64 / span;
        let color = mapping.color_at_binned(t, opts.classes);
        for px in x0..x1 {
            img.put_pixel(px, py, Rgba(color));
        }
    }

    // 1px border
    for px in x0..x1 {
        img.put_pixel(px, y0, Rgba(opts.edge_color));
        img.put_pixel(px, y1 - 1, Rgba(opts.edge_color));
    }
    for py in y0..y1 {
        img.put_pixel(x0, py, Rgba(opts.edge_color));
        img.put_pixel(x1 - 1, py, Rgba(opts.edge_color));
    }
}

/// Bresenham line with a square brush of the given radius
fn draw_line(
    img: &mut RgbaImage,
    (mut x0, mut y0): (i32, i32),
    (x1, y1): (i32, i32),
    color: [u8; 4],
    brush: i32,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(img, x0, y0, color, brush);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn stamp(img: &mut RgbaImage, x: i32, y: i32, color: [u8; 4], brush: i32) {
    for oy in -brush..=brush {
        for ox in -brush..=brush {
            let (px, py) = (x + ox, y + oy);
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, Rgba(color));
            }
        }
    }
}

/// Write the rendered image to disk (format chosen by extension, PNG by
/// convention)
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save(path).map_err(|e| MapshadeError::Render {
        message: format!("Failed to write {}: {}", path.display(), e),
    })?;
    info!("Wrote image to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::{select, SchemeCategory, SchemeRequest};
    use crate::shapefiles::{Feature, Record, ShapeTable};

    fn square(x0: f64, y0: f64, size: f64) -> Feature {
        Feature::new(vec![vec![
            (x0, y0),
            (x0, y0 + size),
            (x0 + size, y0 + size),
            (x0 + size, y0),
            (x0, y0),
        ]])
    }

    fn two_square_table() -> ShapeTable {
        ShapeTable::new(
            "squares.shp".to_string(),
            vec![square(0.0, 0.0, 10.0), square(10.0, 0.0, 10.0)],
            vec![Record::new(), Record::new()],
        )
    }

    fn grayscale_mapping() -> crate::colormaps::ColorMapping {
        let request = SchemeRequest {
            category: SchemeCategory::DualGradient,
            named_palette: None,
            color_stops: vec!["black".to_string(), "white".to_string()],
            value_range: None,
        };
        select(&request, (0.0, 1.0)).unwrap()
    }

    fn options() -> RenderOptions {
        RenderOptions {
            width: 400,
            height: 300,
            edge_color: [255, 0, 0, 255],
            line_width: 0.0,
            legend: false,
            classes: None,
            background: [250, 250, 250, 255],
            missing_color: [217, 217, 217, 255],
        }
    }

    fn px_at(img: &RgbaImage, table: &ShapeTable, opts: &RenderOptions, x: f64, y: f64) -> [u8; 4] {
        let legend_extra = if opts.legend {
            COLORBAR_WIDTH + COLORBAR_GAP
        } else {
            0
        };
        let plot_w = (opts.width - 2 * MARGIN - legend_extra) as f64;
        let plot_h = (opts.height - 2 * MARGIN) as f64;
        let transform = Transform::new(&table.bounds(), plot_w, plot_h);
        let (px, py) = transform.to_px(x, y);
        img.get_pixel(px as u32, py as u32).0
    }

    #[test]
    fn test_output_dimensions() {
        let table = two_square_table();
        let opts = options();
        let img =
            render_choropleth(&table, &[Some(0.0), Some(1.0)], &grayscale_mapping(), &opts)
                .unwrap();
        assert_eq!((img.width(), img.height()), (400, 300));
    }

    #[test]
    fn test_fill_colors_follow_values() {
        let table = two_square_table();
        let opts = options();
        let img =
            render_choropleth(&table, &[Some(0.0), Some(1.0)], &grayscale_mapping(), &opts)
                .unwrap();

        // Centers of each square
        assert_eq!(px_at(&img, &table, &opts, 5.0, 5.0), [0, 0, 0, 255]);
        assert_eq!(px_at(&img, &table, &opts, 15.0, 5.0), [255, 255, 255, 255]);
        // A corner pixel stays background
        assert_eq!(img.get_pixel(0, 0).0, [250, 250, 250, 255]);
    }

    #[test]
    fn test_missing_value_uses_missing_color() {
        let table = two_square_table();
        let opts = options();
        let img = render_choropleth(&table, &[None, Some(1.0)], &grayscale_mapping(), &opts)
            .unwrap();
        assert_eq!(px_at(&img, &table, &opts, 5.0, 5.0), [217, 217, 217, 255]);
    }

    #[test]
    fn test_edges_are_stroked() {
        let table = two_square_table();
        let mut opts = options();
        opts.line_width = 3.0;
        let img =
            render_choropleth(&table, &[Some(0.0), Some(1.0)], &grayscale_mapping(), &opts)
                .unwrap();
        // The shared boundary between the squares is an edge
        assert_eq!(px_at(&img, &table, &opts, 10.0, 5.0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_colorbar_strip() {
        let table = two_square_table();
        let mut opts = options();
        opts.legend = true;
        let img =
            render_choropleth(&table, &[Some(0.0), Some(1.0)], &grayscale_mapping(), &opts)
                .unwrap();

        // Inside the strip, just below the top border: near-white (t ~ 1)
        let x = opts.width - MARGIN - COLORBAR_WIDTH / 2;
        let top = img.get_pixel(x, MARGIN + 2).0;
        assert!(top[0] > 240 && top[1] > 240 && top[2] > 240);
        // Just above the bottom border: near-black (t ~ 0)
        let bottom = img.get_pixel(x, opts.height - MARGIN - 3).0;
        assert!(bottom[0] < 15 && bottom[1] < 15 && bottom[2] < 15);
    }

    #[test]
    fn test_value_count_mismatch() {
        let table = two_square_table();
        let result = render_choropleth(&table, &[Some(0.0)], &grayscale_mapping(), &options());
        assert!(matches!(result, Err(MapshadeError::Render { .. })));
    }

    #[test]
    fn test_save_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let table = two_square_table();
        let img =
            render_choropleth(&table, &[Some(0.0), Some(1.0)], &grayscale_mapping(), &options())
                .unwrap();
        save_image(&img, &path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 300));
    }
}
