//! mapshade - render choropleth maps from shapefiles, interactively
//!
//! This is the main entry point for the mapshade application.

use std::io::Write;
use tracing::{error, info};

use mapshade::{Config, Session};

fn main() {
    // Load configuration first so tracing starts at the configured level
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    mapshade::init_tracing(&config.log_level);
    info!("Starting mapshade v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), config);

    match session.run() {
        Ok(summary) => {
            info!(
                shapefile = %summary.shapefile,
                column = %summary.column,
                palette = %summary.palette,
                vmin = summary.value_range.0,
                vmax = summary.value_range.1,
                width = summary.image_size.0,
                height = summary.image_size.1,
                saved = ?summary.saved_to,
                "Session completed"
            );
        }
        Err(e) => {
            // All session errors are terminal; report and exit non-zero
            error!("Session failed: {}", e);
            let _ = writeln!(std::io::stderr(), "Error: {}", e);
            std::process::exit(1);
        }
    }
}
