//! Debug utility: dump a shapefile's shape counts, bounds and attribute
//! schema without starting a session.
//!
//! Usage: inspect_shapefile <path/to/file.shp>

use anyhow::{bail, Context, Result};
use std::path::Path;

use mapshade::shapefiles::load_table;

fn main() -> Result<()> {
    let arg = std::env::args().nth(1);
    let Some(arg) = arg else {
        bail!("usage: inspect_shapefile <path/to/file.shp>");
    };
    let path = Path::new(&arg);

    println!("Inspecting shapefile: {}", path.display());

    let table = load_table(path).with_context(|| format!("loading {}", path.display()))?;

    println!("\n=== FILE INFORMATION ===");
    println!("\nFeatures: {}", table.features.len());

    let bounds = table.bounds();
    println!(
        "Bounds: x [{}, {}], y [{}, {}]",
        bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
    );

    println!("\nColumns:");
    for column in table.columns() {
        let values = table
            .numeric_column(column)
            .expect("column listed by the table");
        let numeric = values.iter().filter(|v| v.is_some()).count();
        if numeric > 0 {
            let (min, max) = mapshade::shapefiles::finite_range(&values);
            println!(
                "  {} ({} of {} numeric, range [{}, {}])",
                column,
                numeric,
                values.len(),
                min,
                max
            );
        } else {
            println!("  {} (non-numeric)", column);
        }
    }

    let ring_count: usize = table.features.iter().map(|f| f.rings.len()).sum();
    println!("\nRings: {} across all features", ring_count);

    Ok(())
}
