//! Recolor engines.
//!
//! Two engines tint a mask icon to a requested color without going through the
//! native renderer:
//!
//! - [`raster`]: rewrites the RGB channels of every visible PNG pixel
//! - [`vector`]: rewrites `fill`/`stroke` attributes of an SVG document

pub mod raster;
pub mod vector;

pub use raster::recolor_raster;
pub use vector::recolor_vector;

use std::str::FromStr;

use palette::Srgb;

use crate::error::{ResolveError, Result};
use crate::icon::{ContentType, Icon};

/// Parses a `#rrggbb` (or `#rgb`) color into its components.
pub fn parse_hex_color(hex: &str) -> Result<Srgb<u8>> {
    Srgb::<u8>::from_str(hex.trim())
        .map_err(|e| ResolveError::InvalidInput(format!("invalid color '{hex}': {e}")))
}

/// Recolors an icon with the engine matching its content type.
///
/// Returns a new icon; the input is untouched.
pub fn recolor(icon: &Icon, hex_color: &str) -> Result<Icon> {
    let data = match icon.content_type {
        ContentType::Png => recolor_raster(&icon.data, hex_color)?,
        ContentType::Svg => recolor_vector(&icon.data, hex_color)?,
    };
    Ok(icon.with_data(data))
}
