//! Test data generation utilities.
//!
//! This module writes small shapefiles with known geometry and attributes
//! so sessions can run end to end against real files.

use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing, Writer};
use std::path::Path;

type Result<T> = std::result::Result<T, shapefile::Error>;

/// Three side-by-side 10x10 "county" squares with `population` and `name`
/// attributes. Populations are 100, 250 and 400, so the expected
/// normalization range is (100, 400).
pub fn create_counties_shapefile(path: &Path) -> Result<()> {
    let table = TableWriterBuilder::new()
        .add_numeric_field(FieldName::try_from("population").unwrap(), 12, 2)
        .add_character_field(FieldName::try_from("name").unwrap(), 20);
    let mut writer = Writer::from_path(path, table)?;

    let counties = [
        ("Alpha", 100.0, 0.0),
        ("Beta", 250.0, 10.0),
        ("Gamma", 400.0, 20.0),
    ];

    for (name, population, x0) in counties {
        // Outer rings are clockwise, per the shapefile spec
        let ring = PolygonRing::Outer(vec![
            Point::new(x0, 0.0),
            Point::new(x0, 10.0),
            Point::new(x0 + 10.0, 10.0),
            Point::new(x0 + 10.0, 0.0),
            Point::new(x0, 0.0),
        ]);
        let polygon = Polygon::new(ring);

        let mut record = Record::default();
        record.insert(
            "population".to_string(),
            FieldValue::Numeric(Some(population)),
        );
        record.insert(
            "name".to_string(),
            FieldValue::Character(Some(name.to_string())),
        );

        writer.write_shape_and_record(&polygon, &record)?;
    }

    Ok(())
}
