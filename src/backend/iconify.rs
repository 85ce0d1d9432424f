//! Iconify icon sets.

use url::Url;

use super::http::HttpBackend;
use crate::descriptor::IconDescriptor;
use crate::error::{ResolveError, Result};
use crate::icon::Icon;

/// Public Iconify API.
pub const DEFAULT_ICONIFY_BASE_URL: &str = "https://api.iconify.design";

const CURRENT_COLOR: &[u8] = b"currentColor";

/// Fetches `iconify:{set}:{name}` icons as SVG from the Iconify API.
///
/// Icons that paint with `currentColor` are masks; anything else ships its
/// own palette and is intrinsic.
#[derive(Debug, Clone)]
pub struct IconifyBackend {
    http: HttpBackend,
    base_url: Url,
}

impl IconifyBackend {
    /// Creates a backend against `base_url` (see [`DEFAULT_ICONIFY_BASE_URL`]).
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let http = HttpBackend::new(client)
            .with_intrinsic_predicate(|_, body| !uses_current_color(body));
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Builds the SVG URL for a `prefix:set:name` specifier.
    pub fn icon_url(&self, descriptor: &IconDescriptor) -> Result<Url> {
        let parts: Vec<&str> = descriptor.specifier.split(':').collect();
        let [_, set, name] = parts.as_slice() else {
            return Err(invalid_specifier(&descriptor.specifier));
        };
        if set.is_empty() || name.is_empty() {
            return Err(invalid_specifier(&descriptor.specifier));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ResolveError::InvalidInput(format!("cannot use {} as a base URL", self.base_url)))?
            .pop_if_empty()
            .push(set)
            .push(&format!("{name}.svg"));
        Ok(url)
    }

    /// Fetches the icon named by the descriptor.
    pub async fn fetch_iconify(&self, descriptor: &IconDescriptor) -> Result<Icon> {
        let url = self.icon_url(descriptor)?;
        self.http.fetch_url(url.as_str(), descriptor).await
    }
}

fn invalid_specifier(specifier: &str) -> ResolveError {
    ResolveError::InvalidInput(format!(
        "iconify specifier must look like 'iconify:set:name', got '{specifier}'"
    ))
}

fn uses_current_color(body: &[u8]) -> bool {
    body.windows(CURRENT_COLOR.len()).any(|w| w == CURRENT_COLOR)
}
