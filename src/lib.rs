//! # mapshade
//!
//! An interactive terminal tool for rendering choropleth maps from
//! shapefiles.
//!
//! mapshade loads a shapefile (geometry plus its dBASE attribute table)
//! into memory, asks for an attribute column and a color scheme, and
//! rasterizes a choropleth map that can be saved as a PNG.
//!
//! ## Key pieces
//!
//! - **Shapefile layer**: discovers `.shp` files and loads the selected one
//!   into an in-memory [`shapefiles::ShapeTable`]
//! - **Colormap selection**: resolves a scheme request (category, palette
//!   name, color stops) into a [`colormaps::ColorMapping`] with its
//!   normalization range
//! - **Renderer**: per-pixel polygon rasterization with edge strokes and an
//!   optional colorbar legend
//! - **Session**: one synchronous interactive pass tying the steps together;
//!   every error is terminal for the session

pub mod colormaps;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod session;
pub mod shapefiles;

pub use config::Config;
pub use error::{MapshadeError, Result};
pub use logging::{init_tracing, log_error, log_timed_operation};
pub use session::{Session, SessionSummary};
