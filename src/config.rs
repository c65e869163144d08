//! Configuration management for mapshade.
//!
//! This module handles the layered configuration system with the following
//! precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)
//!
//! Any session answer supplied here (directory, column, scheme, ...) skips
//! the corresponding interactive prompt.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::colormaps::parse_color;
use crate::error::{MapshadeError, Result};

/// Command-line arguments for mapshade
#[derive(Parser, Debug)]
#[command(name = "mapshade")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing shapefiles (prompted for when omitted)
    pub directory: Option<PathBuf>,

    /// Shapefile to use: a 1-based index or a file name
    #[arg(short, long, env = "MAPSHADE_FILE")]
    pub file: Option<String>,

    /// Attribute column to visualize
    #[arg(short, long, env = "MAPSHADE_COLUMN")]
    pub column: Option<String>,

    /// Scheme category (sequential, divergent, qualitative, dual_gradient, interactive, custom)
    #[arg(short, long, env = "MAPSHADE_SCHEME")]
    pub scheme: Option<String>,

    /// Named palette (e.g. Blues, RdBu, Set3)
    #[arg(short, long, env = "MAPSHADE_PALETTE")]
    pub palette: Option<String>,

    /// Comma-separated gradient color stops (e.g. "white,#2171b5")
    #[arg(long, env = "MAPSHADE_STOPS")]
    pub stops: Option<String>,

    /// Number of discrete legend classes (continuous when omitted)
    #[arg(long, env = "MAPSHADE_CLASSES")]
    pub classes: Option<usize>,

    /// Lower normalization bound (defaults to the column minimum)
    #[arg(long, env = "MAPSHADE_VMIN")]
    pub vmin: Option<f64>,

    /// Upper normalization bound (defaults to the column maximum)
    #[arg(long, env = "MAPSHADE_VMAX")]
    pub vmax: Option<f64>,

    /// Output image path (PNG); answers the save prompt when given
    #[arg(short, long, env = "MAPSHADE_OUT")]
    pub out: Option<PathBuf>,

    /// Output resolution in dots per inch
    #[arg(long, env = "MAPSHADE_DPI")]
    pub dpi: Option<u32>,

    /// Figure width in inches
    #[arg(long, env = "MAPSHADE_FIG_WIDTH")]
    pub fig_width: Option<f64>,

    /// Figure height in inches
    #[arg(long, env = "MAPSHADE_FIG_HEIGHT")]
    pub fig_height: Option<f64>,

    /// Polygon edge color
    #[arg(long, env = "MAPSHADE_EDGE_COLOR")]
    pub edge_color: Option<String>,

    /// Polygon edge stroke width in pixels
    #[arg(long, env = "MAPSHADE_LINE_WIDTH")]
    pub line_width: Option<f32>,

    /// Hide the colorbar legend
    #[arg(long, default_value_t = false)]
    pub no_legend: bool,

    /// Path to JSON configuration file
    #[arg(long, env = "MAPSHADE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MAPSHADE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Figure width in inches
    #[serde(default = "default_fig_width")]
    pub fig_width: f64,

    /// Figure height in inches
    #[serde(default = "default_fig_height")]
    pub fig_height: f64,

    /// Output resolution in dots per inch
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Polygon edge color (any CSS color string)
    #[serde(default = "default_edge_color")]
    pub edge_color: String,

    /// Polygon edge stroke width in pixels
    #[serde(default = "default_line_width")]
    pub line_width: f32,

    /// Whether to draw the colorbar legend
    #[serde(default = "default_legend")]
    pub legend: bool,

    /// Background color
    #[serde(default = "default_background")]
    pub background: String,

    /// Fill color for features with no usable value
    #[serde(default = "default_missing_color")]
    pub missing_color: String,
}

impl RenderConfig {
    /// Pixel width of the output image (inches x dpi)
    pub fn width_px(&self) -> u32 {
        (self.fig_width * self.dpi as f64).round() as u32
    }

    /// Pixel height of the output image (inches x dpi)
    pub fn height_px(&self) -> u32 {
        (self.fig_height * self.dpi as f64).round() as u32
    }
}

/// Pre-supplied answers to the interactive prompts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Directory containing shapefiles
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Shapefile to use (1-based index or file name)
    #[serde(default)]
    pub file: Option<String>,

    /// Attribute column to visualize
    #[serde(default)]
    pub column: Option<String>,

    /// Scheme category
    #[serde(default)]
    pub scheme: Option<String>,

    /// Named palette
    #[serde(default)]
    pub palette: Option<String>,

    /// Gradient color stops
    #[serde(default)]
    pub stops: Option<Vec<String>>,

    /// Discrete legend class count
    #[serde(default)]
    pub classes: Option<usize>,

    /// Lower normalization bound
    #[serde(default)]
    pub vmin: Option<f64>,

    /// Upper normalization bound
    #[serde(default)]
    pub vmax: Option<f64>,

    /// Output image path; implies a "yes" to the save prompt
    #[serde(default)]
    pub out: Option<PathBuf>,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rendering configuration
    #[serde(default)]
    pub render: RenderConfig,

    /// Pre-supplied prompt answers
    #[serde(default)]
    pub answers: AnswerConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build a configuration from already-parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if args.directory.is_some() {
            config.answers.directory = args.directory;
        }
        if args.file.is_some() {
            config.answers.file = args.file;
        }
        if args.column.is_some() {
            config.answers.column = args.column;
        }
        if args.scheme.is_some() {
            config.answers.scheme = args.scheme;
        }
        if args.palette.is_some() {
            config.answers.palette = args.palette;
        }
        if let Some(stops) = &args.stops {
            config.answers.stops = Some(split_stops(stops));
        }
        if args.classes.is_some() {
            config.answers.classes = args.classes;
        }
        if args.vmin.is_some() {
            config.answers.vmin = args.vmin;
        }
        if args.vmax.is_some() {
            config.answers.vmax = args.vmax;
        }
        if args.out.is_some() {
            config.answers.out = args.out;
        }
        if let Some(dpi) = args.dpi {
            config.render.dpi = dpi;
        }
        if let Some(w) = args.fig_width {
            config.render.fig_width = w;
        }
        if let Some(h) = args.fig_height {
            config.render.fig_height = h;
        }
        if let Some(c) = args.edge_color {
            config.render.edge_color = c;
        }
        if let Some(w) = args.line_width {
            config.render.line_width = w;
        }
        if args.no_legend {
            config.render.legend = false;
        }
        config.log_level = args.log_level;

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| MapshadeError::Config {
                message: format!("Failed to parse {}: {}", path.display(), e),
            })?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.render = other.render;
        if other.answers.directory.is_some() {
            self.answers.directory = other.answers.directory;
        }
        if other.answers.file.is_some() {
            self.answers.file = other.answers.file;
        }
        if other.answers.column.is_some() {
            self.answers.column = other.answers.column;
        }
        if other.answers.scheme.is_some() {
            self.answers.scheme = other.answers.scheme;
        }
        if other.answers.palette.is_some() {
            self.answers.palette = other.answers.palette;
        }
        if other.answers.stops.is_some() {
            self.answers.stops = other.answers.stops;
        }
        if other.answers.classes.is_some() {
            self.answers.classes = other.answers.classes;
        }
        if other.answers.vmin.is_some() {
            self.answers.vmin = other.answers.vmin;
        }
        if other.answers.vmax.is_some() {
            self.answers.vmax = other.answers.vmax;
        }
        if other.answers.out.is_some() {
            self.answers.out = other.answers.out;
        }
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.render.dpi == 0 {
            return Err(MapshadeError::Config {
                message: "dpi cannot be 0".to_string(),
            });
        }

        if self.render.fig_width <= 0.0 || self.render.fig_height <= 0.0 {
            return Err(MapshadeError::Config {
                message: format!(
                    "Figure size must be positive, got {} x {} inches",
                    self.render.fig_width, self.render.fig_height
                ),
            });
        }

        if self.render.line_width < 0.0 {
            return Err(MapshadeError::Config {
                message: "line_width cannot be negative".to_string(),
            });
        }

        // All configured colors must parse up front
        for color in [
            &self.render.edge_color,
            &self.render.background,
            &self.render.missing_color,
        ] {
            parse_color(color)?;
        }

        if let Some(classes) = self.answers.classes {
            if classes < 2 {
                return Err(MapshadeError::Config {
                    message: format!("classes must be at least 2, got {}", classes),
                });
            }
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(MapshadeError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Split a comma/semicolon separated list of color stops
pub fn split_stops(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            answers: AnswerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fig_width: default_fig_width(),
            fig_height: default_fig_height(),
            dpi: default_dpi(),
            edge_color: default_edge_color(),
            line_width: default_line_width(),
            legend: default_legend(),
            background: default_background(),
            missing_color: default_missing_color(),
        }
    }
}

// Default value functions for serde
fn default_fig_width() -> f64 {
    10.0
}

fn default_fig_height() -> f64 {
    6.0
}

fn default_dpi() -> u32 {
    100
}

fn default_edge_color() -> String {
    "black".to_string()
}

fn default_line_width() -> f32 {
    1.0
}

fn default_legend() -> bool {
    true
}

fn default_background() -> String {
    "white".to_string()
}

fn default_missing_color() -> String {
    "#d9d9d9".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.fig_width, 10.0);
        assert_eq!(config.render.fig_height, 6.0);
        assert_eq!(config.render.dpi, 100);
        assert_eq!(config.render.edge_color, "black");
        assert!(config.render.legend);
        assert_eq!(config.log_level, "info");
        assert!(config.answers.directory.is_none());
    }

    #[test]
    fn test_pixel_dimensions() {
        let config = Config::default();
        assert_eq!(config.render.width_px(), 1000);
        assert_eq!(config.render.height_px(), 600);

        let mut config = Config::default();
        config.render.dpi = 150;
        assert_eq!(config.render.width_px(), 1500);
        assert_eq!(config.render.height_px(), 900);
    }

    #[test]
    fn test_split_stops() {
        assert_eq!(split_stops("white,#2171b5"), vec!["white", "#2171b5"]);
        assert_eq!(split_stops(" red ; blue "), vec!["red", "blue"]);
        assert!(split_stops("").is_empty());
    }

    #[test]
    fn test_config_validation() {
        // Valid config should pass
        let config = Config::default();
        assert!(config.validate().is_ok());

        // Zero dpi
        let mut config = Config::default();
        config.render.dpi = 0;
        assert!(config.validate().is_err());

        // Negative figure size
        let mut config = Config::default();
        config.render.fig_width = -1.0;
        assert!(config.validate().is_err());

        // Unparseable edge color
        let mut config = Config::default();
        config.render.edge_color = "not-a-color".to_string();
        assert!(config.validate().is_err());

        // Degenerate class count
        let mut config = Config::default();
        config.answers.classes = Some(1);
        assert!(config.validate().is_err());

        // Invalid log level
        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.render.dpi = 300;
        config2.answers.column = Some("population".to_string());

        config1.merge(config2);

        assert_eq!(config1.render.dpi, 300);
        assert_eq!(config1.answers.column.as_deref(), Some("population"));
    }
}
