//! Integration tests for mapshade
//!
//! These tests run whole sessions over real fixture shapefiles, driving the
//! prompts through scripted input.

mod common;

use common::test_data;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use mapshade::{Config, MapshadeError, Result, Session, SessionSummary};

/// Run a session over scripted prompt answers (one per line)
fn run_scripted(input: &str, config: Config) -> Result<SessionSummary> {
    let mut session = Session::new(
        Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
        config,
    );
    session.run()
}

/// A tempdir containing the counties fixture
fn counties_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    test_data::create_counties_shapefile(&dir.path().join("counties.shp")).unwrap();
    dir
}

fn dir_arg(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

#[test]
fn sequential_default_session_uses_blues_over_column_range() {
    let dir = counties_dir();

    // directory, file index, column, scheme, palette (blank = default),
    // vmin, vmax, classes, save?
    let input = format!(
        "{}\n1\npopulation\nsequential\n\n\n\n\nn\n",
        dir_arg(dir.path())
    );
    let summary = run_scripted(&input, Config::default()).unwrap();

    assert_eq!(summary.shapefile, "counties.shp");
    assert_eq!(summary.column, "population");
    assert_eq!(summary.palette, "Blues");
    assert_eq!(summary.value_range, (100.0, 400.0));
    assert_eq!(summary.image_size, (1000, 600));
    assert_eq!(summary.saved_to, None);
}

#[test]
fn out_of_range_index_fails_before_any_load() {
    // The only ".shp" here is garbage: if a load were attempted it would
    // fail with TableLoad, not InvalidSelection.
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.shp"), b"not a shapefile").unwrap();

    let input = format!("{}\n9\n", dir_arg(dir.path()));
    let result = run_scripted(&input, Config::default());

    match result {
        Err(MapshadeError::InvalidSelection { input, count }) => {
            assert_eq!(input, "9");
            assert_eq!(count, 1);
        }
        other => panic!("expected InvalidSelection, got {:?}", other.map(|s| s.shapefile)),
    }
}

#[test]
fn non_numeric_selection_fails() {
    let dir = counties_dir();
    let input = format!("{}\nfirst\n", dir_arg(dir.path()));
    let result = run_scripted(&input, Config::default());
    assert!(matches!(
        result,
        Err(MapshadeError::InvalidSelection { .. })
    ));
}

#[test]
fn missing_column_fails_after_load() {
    let dir = counties_dir();
    let input = format!("{}\n1\ndensity\n", dir_arg(dir.path()));
    let result = run_scripted(&input, Config::default());

    match result {
        Err(MapshadeError::ColumnNotFound { column, available }) => {
            assert_eq!(column, "density");
            assert!(available.contains(&"population".to_string()));
        }
        other => panic!("expected ColumnNotFound, got {:?}", other.map(|s| s.column)),
    }
}

#[test]
fn missing_directory_fails() {
    let result = run_scripted("/definitely/not/a/dir\n", Config::default());
    assert!(matches!(
        result,
        Err(MapshadeError::DirectoryNotFound { .. })
    ));
}

#[test]
fn directory_without_shapefiles_fails() {
    let dir = tempfile::tempdir().unwrap();
    File::create(dir.path().join("notes.txt")).unwrap();
    let result = run_scripted(&format!("{}\n", dir_arg(dir.path())), Config::default());
    assert!(matches!(
        result,
        Err(MapshadeError::NoShapefilesFound { .. })
    ));
}

#[test]
fn configured_answers_skip_prompts_and_save_png() {
    let dir = counties_dir();
    let out = dir.path().join("map.png");

    let mut config = Config::default();
    config.answers.directory = Some(dir.path().to_path_buf());
    config.answers.file = Some("counties.shp".to_string());
    config.answers.column = Some("population".to_string());
    config.answers.scheme = Some("divergent".to_string());
    config.answers.out = Some(out.clone());
    config.render.dpi = 50;

    // Remaining prompts (palette, bounds, classes) answered by EOF = blank
    let summary = run_scripted("", config).unwrap();

    assert_eq!(summary.palette, "RdBu");
    assert_eq!(summary.image_size, (500, 300));
    assert_eq!(summary.saved_to, Some(out.clone()));

    let decoded = image::open(&out).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (500, 300));
}

#[test]
fn interactive_save_prompt_writes_png() {
    let dir = counties_dir();
    let out = dir.path().join("choropleth.png");

    let mut config = Config::default();
    config.render.dpi = 50;
    let input = format!(
        "{}\n1\npopulation\nsequential\n\n\n\n\ny\n{}\n",
        dir_arg(dir.path()),
        out.to_str().unwrap()
    );
    let summary = run_scripted(&input, config).unwrap();

    assert_eq!(summary.saved_to, Some(out.clone()));
    assert!(out.exists());
}

#[test]
fn dual_gradient_session() {
    let dir = counties_dir();

    let mut config = Config::default();
    config.answers.directory = Some(dir.path().to_path_buf());
    config.answers.file = Some("counties.shp".to_string());
    config.answers.column = Some("population".to_string());
    config.answers.scheme = Some("dual_gradient".to_string());
    config.answers.stops = Some(vec!["white".to_string(), "#2171b5".to_string()]);
    config.render.dpi = 50;

    // vmin, vmax, classes blank; decline the save prompt
    let summary = run_scripted("\n\n\nn\n", config).unwrap();
    assert_eq!(summary.palette, "custom(white, #2171b5)");
    assert_eq!(summary.value_range, (100.0, 400.0));
}

#[test]
fn dual_gradient_with_one_stop_fails() {
    let dir = counties_dir();

    let mut config = Config::default();
    config.answers.directory = Some(dir.path().to_path_buf());
    config.answers.file = Some("1".to_string());
    config.answers.column = Some("population".to_string());
    config.answers.scheme = Some("dual_gradient".to_string());
    config.answers.stops = Some(vec!["white".to_string()]);

    let result = run_scripted("", config);
    assert!(matches!(
        result,
        Err(MapshadeError::InvalidGradient { count: 1 })
    ));
}

#[test]
fn bogus_scheme_fails() {
    let dir = counties_dir();

    let mut config = Config::default();
    config.answers.directory = Some(dir.path().to_path_buf());
    config.answers.file = Some("1".to_string());
    config.answers.column = Some("population".to_string());
    config.answers.scheme = Some("bogus".to_string());

    let result = run_scripted("", config);
    assert!(matches!(result, Err(MapshadeError::InvalidScheme { .. })));
}

#[test]
fn interactive_scheme_falls_back_to_blues() {
    let dir = counties_dir();

    let mut config = Config::default();
    config.answers.directory = Some(dir.path().to_path_buf());
    config.answers.file = Some("1".to_string());
    config.answers.column = Some("population".to_string());
    config.answers.scheme = Some("interactive".to_string());
    config.answers.palette = Some("definitely-not-registered".to_string());
    config.render.dpi = 50;

    let summary = run_scripted("\n\n\nn\n", config).unwrap();
    assert_eq!(summary.palette, "Blues");
}

#[test]
fn explicit_bounds_and_classes_session() {
    let dir = counties_dir();

    let mut config = Config::default();
    config.answers.directory = Some(dir.path().to_path_buf());
    config.answers.file = Some("1".to_string());
    config.answers.column = Some("population".to_string());
    config.answers.scheme = Some("sequential".to_string());
    config.answers.palette = Some("YlGnBu".to_string());
    config.answers.vmin = Some(0.0);
    config.answers.vmax = Some(500.0);
    config.answers.classes = Some(5);
    config.render.dpi = 50;

    let summary = run_scripted("n\n", config).unwrap();
    assert_eq!(summary.palette, "YlGnBu");
    assert_eq!(summary.value_range, (0.0, 500.0));
}

#[test]
fn qualitative_default_is_set3() {
    let dir = counties_dir();

    let mut config = Config::default();
    config.answers.directory = Some(dir.path().to_path_buf());
    config.answers.file = Some("1".to_string());
    config.answers.column = Some("population".to_string());
    config.answers.scheme = Some("qualitative".to_string());
    config.render.dpi = 50;

    // palette, vmin, vmax, classes blank; decline the save prompt
    let summary = run_scripted("\n\n\n\nn\n", config).unwrap();
    assert_eq!(summary.palette, "Set3");
}
