//! Postprocessing of fetched icons.
//!
//! Only the native renderer can flip, scale or normalize a raster, so those
//! cases are sent back through it as a `data:` URI. Vector masks are recolored
//! in place. Everything else is returned as fetched.
//!
//! Output of the native renderer already has the descriptor's transforms
//! applied, so it is only ever recolored ([`plan_native`]).

use crate::backend::NativeRenderer;
use crate::descriptor::{DEFAULT_COLOR, IconDescriptor};
use crate::error::Result;
use crate::icon::{ColorMode, ContentType, Icon};
use crate::recolor::{recolor_raster, recolor_vector};

const TARGET: &str = "icon_resolver::postprocess";

/// What to do with a fetched icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Send the icon back through the native renderer.
    Rerender,
    /// Recolor the SVG in place.
    RecolorVector(String),
    /// Recolor the PNG in place (only when no renderer is configured).
    RecolorRaster(String),
    /// Return the icon unchanged.
    Keep,
}

/// Decides how to postprocess an icon. Pure; see [`Postprocessor::postprocess`].
pub fn plan(icon: &Icon, descriptor: &IconDescriptor, renderer_available: bool) -> Step {
    let is_png = icon.content_type == ContentType::Png;
    let wants_tint = icon.color_mode == ColorMode::Mask && !descriptor.preserve_color;
    let color = || descriptor.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string());

    if descriptor.has_transform() {
        return Step::Rerender;
    }

    if is_png {
        if renderer_available {
            return Step::Rerender;
        }
        return if wants_tint { Step::RecolorRaster(color()) } else { Step::Keep };
    }

    if wants_tint {
        Step::RecolorVector(color())
    } else {
        Step::Keep
    }
}

/// Decides how to finish an icon produced by the native renderer.
///
/// The renderer has already applied flips, scale and the color to rasters,
/// so nothing is re-rendered; an SVG mask is still tinted.
pub fn plan_native(icon: &Icon, descriptor: &IconDescriptor) -> Step {
    let wants_tint = icon.color_mode == ColorMode::Mask && !descriptor.preserve_color;
    if icon.content_type == ContentType::Svg && wants_tint {
        Step::RecolorVector(descriptor.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()))
    } else {
        Step::Keep
    }
}

/// Applies the postprocessing decision to fetched icons.
#[derive(Debug, Clone)]
pub struct Postprocessor {
    renderer: NativeRenderer,
}

impl Postprocessor {
    pub fn new(renderer: NativeRenderer) -> Self {
        Self { renderer }
    }

    /// Postprocesses a fetched icon for a descriptor.
    ///
    /// - PNG, or any flip/scale: re-rendered by the native renderer with the
    ///   icon as a `data:` URI specifier and `intrinsicColor` set from its
    ///   color mode
    /// - SVG mask without `preserveColor`: fills and strokes set to the
    ///   requested color (black by default)
    /// - otherwise unchanged
    ///
    /// Without a configured renderer a PNG that only needs tinting is recolored
    /// locally; flips and scales fail with the configuration error.
    pub async fn postprocess(&self, icon: Icon, descriptor: &IconDescriptor) -> Result<Icon> {
        let step = plan(&icon, descriptor, self.renderer.is_configured());
        tracing::debug!(target: TARGET, ?step, content_type = %icon.content_type, "postprocessing");
        self.apply(step, icon, descriptor).await
    }

    /// Postprocesses an icon returned by the native renderer. See [`plan_native`].
    pub async fn postprocess_native(&self, icon: Icon, descriptor: &IconDescriptor) -> Result<Icon> {
        let step = plan_native(&icon, descriptor);
        tracing::debug!(target: TARGET, ?step, content_type = %icon.content_type, "postprocessing native output");
        self.apply(step, icon, descriptor).await
    }

    async fn apply(&self, step: Step, icon: Icon, descriptor: &IconDescriptor) -> Result<Icon> {
        match step {
            Step::Rerender => {
                let mut rerender = descriptor.clone();
                rerender.specifier = icon.to_data_uri();
                rerender.intrinsic_color = icon.color_mode.is_intrinsic();
                self.renderer.render_native(&rerender).await
            }
            Step::RecolorVector(color) => Ok(icon.with_data(recolor_vector(&icon.data, &color)?)),
            Step::RecolorRaster(color) => Ok(icon.with_data(recolor_raster(&icon.data, &color)?)),
            Step::Keep => Ok(icon),
        }
    }
}
