//! Icon sources.
//!
//! Each source kind is one variant of the closed [`Backend`] enum, so the
//! dispatcher can register them in an ordered list and every match over the
//! kinds stays exhaustive.

pub mod http;
pub mod iconify;
pub mod native;

pub use http::{FetchMethod, HttpBackend, IntrinsicPredicate};
pub use iconify::{DEFAULT_ICONIFY_BASE_URL, IconifyBackend};
pub use native::{COLOR_MODE_HEADER, NativeRenderer};

use crate::descriptor::IconDescriptor;
use crate::error::Result;
use crate::icon::Icon;

/// A registered icon source.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Generic HTTP(S) fetch; the specifier is the URL.
    Http(HttpBackend),
    /// Iconify API fetch for `iconify:set:name`.
    Iconify(IconifyBackend),
    /// Local native renderer helper.
    Native(NativeRenderer),
}

impl Backend {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Iconify(_) => "iconify",
            Self::Native(_) => "native",
        }
    }

    /// Returns true for the native renderer, whose output needs no postprocessing.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// Fetches the icon for a descriptor from this source.
    pub async fn fetch(&self, descriptor: &IconDescriptor) -> Result<Icon> {
        match self {
            Self::Http(backend) => backend.fetch(descriptor).await,
            Self::Iconify(backend) => backend.fetch_iconify(descriptor).await,
            Self::Native(renderer) => renderer.render_native(descriptor).await,
        }
    }
}
