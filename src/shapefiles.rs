//! Shapefile discovery and loading.
//!
//! This module handles finding `.shp` files in a directory and reading the
//! selected one (geometry plus its dBASE attribute table) into an in-memory
//! [`ShapeTable`] that the renderer can consume.

use shapefile::dbase::FieldValue;
use shapefile::Shape;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{MapshadeError, Result};
use crate::logging::log_table_stats;

/// Axis-aligned bounding box in geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// An inverted box that any point extends
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn extend(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn merge(&mut self, other: &Bounds) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One areal feature: its rings (outer and holes, treated uniformly by the
/// even-odd rule) and a precomputed bounding box.
#[derive(Debug, Clone)]
pub struct Feature {
    pub rings: Vec<Vec<(f64, f64)>>,
    pub bbox: Bounds,
}

impl Feature {
    pub fn new(rings: Vec<Vec<(f64, f64)>>) -> Self {
        let mut bbox = Bounds::empty();
        for ring in &rings {
            for &(x, y) in ring {
                bbox.extend(x, y);
            }
        }
        Self { rings, bbox }
    }

    /// Even-odd point-in-polygon test over all rings, so holes subtract
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if !self.bbox.contains(x, y) {
            return false;
        }
        let mut inside = false;
        for ring in &self.rings {
            if ring.len() < 3 {
                continue;
            }
            let mut j = ring.len() - 1;
            for i in 0..ring.len() {
                let (xi, yi) = ring[i];
                let (xj, yj) = ring[j];
                if (yi > y) != (yj > y) {
                    let x_cross = (xj - xi) * (y - yi) / (yj - yi) + xi;
                    if x < x_cross {
                        inside = !inside;
                    }
                }
                j = i;
            }
        }
        inside
    }
}

/// An attribute record, keyed by column name
pub type Record = BTreeMap<String, FieldValue>;

/// A loaded shapefile: features plus their attribute records
#[derive(Debug)]
pub struct ShapeTable {
    /// File name this table was loaded from
    pub name: String,
    /// Areal features, in file order
    pub features: Vec<Feature>,
    /// One attribute record per feature
    pub records: Vec<Record>,
    columns: Vec<String>,
}

impl ShapeTable {
    /// Assemble a table from features and their records. Column names come
    /// from the first record.
    pub fn new(name: String, features: Vec<Feature>, records: Vec<Record>) -> Self {
        let columns = records
            .first()
            .map(|record| record.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            name,
            features,
            records,
            columns,
        }
    }

    /// Attribute column names, alphabetically
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Geographic bounding box over all features
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for feature in &self.features {
            bounds.merge(&feature.bbox);
        }
        bounds
    }

    /// Extract a column as per-feature numeric values. Non-numeric and
    /// missing cells become `None`.
    pub fn numeric_column(&self, column: &str) -> Result<Vec<Option<f64>>> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(MapshadeError::ColumnNotFound {
                column: column.to_string(),
                available: self.columns.clone(),
            });
        }
        Ok(self
            .records
            .iter()
            .map(|record| record.get(column).and_then(field_as_f64))
            .collect())
    }
}

/// List shapefiles in a directory, sorted by name.
///
/// Matches `.shp` case-insensitively, so `.SHP` files are found too.
pub fn list_shapefiles(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(MapshadeError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_shapefile = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("shp"));
        if is_shapefile {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }

    if names.is_empty() {
        return Err(MapshadeError::NoShapefilesFound {
            path: dir.to_path_buf(),
        });
    }

    names.sort();
    debug!("Found {} shapefiles in {}", names.len(), dir.display());
    Ok(names)
}

/// Load a shapefile (geometry + dBASE attributes) into memory
pub fn load_table(path: &Path) -> Result<ShapeTable> {
    let load_error = |message: String| MapshadeError::TableLoad {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = shapefile::Reader::from_path(path).map_err(|e| load_error(e.to_string()))?;
    info!("Opened shapefile: {}", path.display());

    let mut features = Vec::new();
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for pair in reader.iter_shapes_and_records() {
        let (shape, record) = pair.map_err(|e| load_error(e.to_string()))?;
        match shape_rings(shape) {
            Some(rings) => {
                features.push(Feature::new(rings));
                records.push(record.into_iter().collect::<Record>());
            }
            None => {
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} non-areal shapes in {}", skipped, path.display());
    }
    if features.is_empty() {
        return Err(load_error("no polygon features".to_string()));
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string();

    let table = ShapeTable::new(name, features, records);
    log_table_stats(
        &path.display().to_string(),
        table.features.len(),
        table.columns().len(),
        skipped,
    );

    Ok(table)
}

/// Extract the rings of an areal shape; `None` for points, polylines, etc.
fn shape_rings(shape: Shape) -> Option<Vec<Vec<(f64, f64)>>> {
    match shape {
        Shape::Polygon(polygon) => Some(
            polygon
                .rings()
                .iter()
                .map(|ring| ring.points().iter().map(|p| (p.x, p.y)).collect())
                .collect(),
        ),
        Shape::PolygonZ(polygon) => Some(
            polygon
                .rings()
                .iter()
                .map(|ring| ring.points().iter().map(|p| (p.x, p.y)).collect())
                .collect(),
        ),
        Shape::PolygonM(polygon) => Some(
            polygon
                .rings()
                .iter()
                .map(|ring| ring.points().iter().map(|p| (p.x, p.y)).collect())
                .collect(),
        ),
        _ => None,
    }
}

/// Interpret an attribute value as a number where possible
fn field_as_f64(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Numeric(v) => *v,
        FieldValue::Float(v) => v.map(f64::from),
        FieldValue::Integer(v) => Some(f64::from(*v)),
        FieldValue::Double(v) => Some(*v),
        FieldValue::Currency(v) => Some(*v),
        FieldValue::Character(Some(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// The (min, max) over the finite values of a column; (0, 0) when empty
pub fn finite_range(values: &[Option<f64>]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values.iter().flatten() {
        if value.is_finite() {
            min = min.min(*value);
            max = max.max(*value);
        }
    }
    if min > max {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}
