//! Alpha-preserving PNG recolor.

use std::io::Cursor;

use image::{ColorType, ImageBuffer, ImageFormat, Pixel, Primitive, Rgba};

use super::parse_hex_color;
use crate::error::Result;

/// Recolors a PNG to a single color.
///
/// Every pixel with a nonzero alpha gets its RGB channels replaced by
/// `hex_color`; alpha is left as-is. Fully transparent pixels are not touched
/// at all, so their RGB survives and no fringe appears when the image is later
/// scaled. Dimensions and alpha are preserved exactly.
///
/// 16-bit sources are recolored and written back at 16 bits per channel;
/// everything else goes through 8-bit RGBA.
pub fn recolor_raster(png: &[u8], hex_color: &str) -> Result<Vec<u8>> {
    let color = parse_hex_color(hex_color)?;
    let rgb = [color.red, color.green, color.blue];
    let decoded = image::load_from_memory_with_format(png, ImageFormat::Png)?;

    let mut out = Cursor::new(Vec::with_capacity(png.len()));
    if is_sixteen_bit(decoded.color()) {
        let mut img = decoded.to_rgba16();
        tint_visible_pixels(&mut img, rgb.map(|c| u16::from(c) * 257));
        img.write_to(&mut out, ImageFormat::Png)?;
    } else {
        let mut img = decoded.to_rgba8();
        tint_visible_pixels(&mut img, rgb);
        img.write_to(&mut out, ImageFormat::Png)?;
    }
    Ok(out.into_inner())
}

fn is_sixteen_bit(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16
    )
}

fn tint_visible_pixels<T: Primitive>(img: &mut ImageBuffer<Rgba<T>, Vec<T>>, rgb: [T; 3])
where
    Rgba<T>: Pixel<Subpixel = T>,
{
    for pixel in img.pixels_mut() {
        let [_, _, _, a] = pixel.0;
        if a == T::DEFAULT_MIN_VALUE {
            continue;
        }
        pixel.0 = [rgb[0], rgb[1], rgb[2], a];
    }
}
