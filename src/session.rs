//! The interactive rendering session.
//!
//! One [`Session`] is one unit of work: discover shapefiles, load the
//! selected one, resolve a color scheme, render, and optionally save. The
//! session owns the prompt streams and all intermediate state; nothing
//! outlives it. Every error is terminal.
//!
//! Prompting lives here, not in the colormap selector: by the time
//! [`select`](crate::colormaps::select) runs, every answer is a plain value.
//! Any answer pre-supplied through [`Config`] skips its prompt.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::colormaps::{
    palette_names, select, SchemeCategory, SchemeRequest, INTERACTIVE_FALLBACK,
};
use crate::config::{split_stops, Config};
use crate::error::{MapshadeError, Result};
use crate::logging::log_timed_operation;
use crate::render::{render_choropleth, save_image, RenderOptions};
use crate::shapefiles::{finite_range, list_shapefiles, load_table};

/// What a completed session produced
#[derive(Debug)]
pub struct SessionSummary {
    /// Name of the rendered shapefile
    pub shapefile: String,
    /// Attribute column that was visualized
    pub column: String,
    /// Palette or gradient name that was used
    pub palette: String,
    /// Normalization range applied to the column
    pub value_range: (f64, f64),
    /// Pixel dimensions of the rendered image
    pub image_size: (u32, u32),
    /// Where the image was saved, if the user chose to save it
    pub saved_to: Option<PathBuf>,
}

/// Session context: prompt streams plus configuration, created at session
/// start and discarded at session end.
pub struct Session<R, W> {
    input: R,
    output: W,
    config: Config,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, config: Config) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    /// Run the session end to end
    pub fn run(&mut self) -> Result<SessionSummary> {
        let directory = self.resolve_directory()?;
        let shapefiles = list_shapefiles(&directory)?;

        self.writeln("Available shapefiles:")?;
        for (i, name) in shapefiles.iter().enumerate() {
            self.writeln(&format!("{}. {}", i + 1, name))?;
        }

        // Selection is validated before any load is attempted
        let selected = self.resolve_file(&shapefiles)?;
        let path = directory.join(&selected);
        let table = log_timed_operation("table_load", || load_table(&path))?;
        self.writeln(&format!("Loaded {} successfully!", selected))?;

        self.writeln("Columns available in the shapefile:")?;
        self.writeln(&format!("  {}", table.columns().join(", ")))?;
        let column = self.resolve_column()?;
        let values = table.numeric_column(&column)?;
        let data_range = finite_range(&values);

        let request = self.resolve_scheme(data_range)?;
        let mapping = select(&request, data_range)?;
        self.writeln(&format!(
            "Using palette {} over range ({}, {})",
            mapping.palette_name(),
            mapping.range().0,
            mapping.range().1
        ))?;

        let classes = self.resolve_classes()?;
        let opts = RenderOptions::from_config(&self.config.render, classes)?;
        let image = log_timed_operation("render", || {
            render_choropleth(&table, &values, &mapping, &opts)
        })?;
        self.writeln(&format!(
            "Rendered {} x {} map of '{}'",
            opts.width, opts.height, column
        ))?;

        let saved_to = self.resolve_save_path()?;
        if let Some(path) = &saved_to {
            save_image(&image, path)?;
            self.writeln(&format!("Saved map to {}", path.display()))?;
        }
        // `image` is dropped here regardless of whether it was saved

        Ok(SessionSummary {
            shapefile: table.name.clone(),
            column,
            palette: mapping.palette_name().to_string(),
            value_range: mapping.range(),
            image_size: (opts.width, opts.height),
            saved_to,
        })
    }

    fn resolve_directory(&mut self) -> Result<PathBuf> {
        match self.config.answers.directory.clone() {
            Some(dir) => Ok(dir),
            None => {
                let answer =
                    self.prompt("Enter the directory where your shapefiles are located: ")?;
                Ok(PathBuf::from(answer))
            }
        }
    }

    fn resolve_file(&mut self, shapefiles: &[String]) -> Result<String> {
        let input = match self.config.answers.file.clone() {
            Some(file) => file,
            None => {
                self.prompt("Enter the number corresponding to the shapefile you want to use: ")?
            }
        };

        // A configured answer may name the file directly
        if let Some(found) = shapefiles.iter().find(|name| **name == input) {
            return Ok(found.clone());
        }

        let invalid = || MapshadeError::InvalidSelection {
            input: input.clone(),
            count: shapefiles.len(),
        };
        let index: usize = input.parse().map_err(|_| invalid())?;
        if index == 0 || index > shapefiles.len() {
            return Err(invalid());
        }
        Ok(shapefiles[index - 1].clone())
    }

    fn resolve_column(&mut self) -> Result<String> {
        match self.config.answers.column.clone() {
            Some(column) => Ok(column),
            None => self.prompt("Enter the column name to visualize: "),
        }
    }

    fn resolve_scheme(&mut self, data_range: (f64, f64)) -> Result<SchemeRequest> {
        let category = match self.config.answers.scheme.clone() {
            Some(scheme) => scheme.parse::<SchemeCategory>()?,
            None => {
                self.writeln("")?;
                self.writeln("Choose a colormap type from the following options:")?;
                self.writeln(
                    "  sequential    : data that progresses (e.g. population density)",
                )?;
                self.writeln("  divergent     : data with a central point (e.g. temperatures)")?;
                self.writeln("  qualitative   : categorical data (e.g. land use types)")?;
                self.writeln("  dual_gradient : a gradient between two colors of your choice")?;
                self.writeln("  interactive   : pick any registered palette by name")?;
                self.writeln("  custom        : a gradient through any list of colors")?;
                self.writeln("")?;
                self.prompt("Choose a colormap type: ")?.parse()?
            }
        };

        let mut request = SchemeRequest::for_category(category);

        match category {
            SchemeCategory::DualGradient | SchemeCategory::Custom => {
                request.color_stops = match self.config.answers.stops.clone() {
                    Some(stops) => stops,
                    None => {
                        let answer = self
                            .prompt("Enter gradient color stops separated by commas: ")?;
                        split_stops(&answer)
                    }
                };
            }
            SchemeCategory::Interactive => {
                request.named_palette = match self.config.answers.palette.clone() {
                    Some(palette) => Some(palette),
                    None => {
                        self.writeln("Available palettes:")?;
                        self.writeln(&format!("  {}", palette_names().join(", ")))?;
                        let answer = self.prompt(&format!(
                            "Choose a palette (press Enter for {}): ",
                            INTERACTIVE_FALLBACK
                        ))?;
                        Some(answer)
                    }
                };
            }
            _ => {
                request.named_palette = match self.config.answers.palette.clone() {
                    Some(palette) => Some(palette),
                    None => {
                        let answer = self.prompt(&format!(
                            "Choose a palette for {} (or press Enter for default): ",
                            category
                        ))?;
                        if answer.is_empty() {
                            None
                        } else {
                            Some(answer)
                        }
                    }
                };
            }
        }

        request.value_range = self.resolve_value_range(data_range)?;
        Ok(request)
    }

    fn resolve_value_range(&mut self, data_range: (f64, f64)) -> Result<Option<(f64, f64)>> {
        let vmin = match self.config.answers.vmin {
            Some(v) => Some(v),
            None => {
                let answer =
                    self.prompt("Lower bound for the value range (press Enter for data min): ")?;
                parse_optional_f64(&answer, "lower bound")?
            }
        };
        let vmax = match self.config.answers.vmax {
            Some(v) => Some(v),
            None => {
                let answer =
                    self.prompt("Upper bound for the value range (press Enter for data max): ")?;
                parse_optional_f64(&answer, "upper bound")?
            }
        };

        if vmin.is_none() && vmax.is_none() {
            return Ok(None);
        }
        Ok(Some((
            vmin.unwrap_or(data_range.0),
            vmax.unwrap_or(data_range.1),
        )))
    }

    fn resolve_classes(&mut self) -> Result<Option<usize>> {
        if let Some(classes) = self.config.answers.classes {
            return Ok(Some(classes));
        }
        let answer = self.prompt("Number of legend classes (press Enter for continuous): ")?;
        if answer.is_empty() {
            return Ok(None);
        }
        let classes: usize = answer.parse().map_err(|_| MapshadeError::Config {
            message: format!("Invalid class count: '{}'", answer),
        })?;
        if classes < 2 {
            return Err(MapshadeError::Config {
                message: format!("classes must be at least 2, got {}", classes),
            });
        }
        Ok(Some(classes))
    }

    fn resolve_save_path(&mut self) -> Result<Option<PathBuf>> {
        if let Some(out) = self.config.answers.out.clone() {
            return Ok(Some(out));
        }
        let answer = self.prompt("Save the map to a PNG file? (y/n): ")?;
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            return Ok(None);
        }
        let filename = self.prompt("Output filename (press Enter for map.png): ")?;
        let filename = if filename.is_empty() {
            "map.png".to_string()
        } else {
            filename
        };
        Ok(Some(PathBuf::from(filename)))
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn writeln(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}

fn parse_optional_f64(input: &str, what: &str) -> Result<Option<f64>> {
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<f64>()
        .map(Some)
        .map_err(|_| MapshadeError::Config {
            message: format!("Invalid {}: '{}'", what, input),
        })
}
