//! Native renderer delegate.
//!
//! The native renderer is a local helper process that draws symbols, text
//! glyphs, bundled assets and data URIs, and applies geometric transforms.
//! It is reached with `POST {base}/icon`, the descriptor as JSON body; the
//! response body is the image and `X-Icon-Color-Mode` reports its color mode.

use url::Url;

use super::http::{FetchMethod, HttpBackend};
use crate::descriptor::IconDescriptor;
use crate::error::{ResolveError, Result};
use crate::icon::{ColorMode, Icon};

/// Response header carrying the rendered icon's color mode.
pub const COLOR_MODE_HEADER: &str = "x-icon-color-mode";

/// Client for the native renderer helper.
#[derive(Debug, Clone)]
pub struct NativeRenderer {
    http: HttpBackend,
    endpoint: Option<Url>,
}

impl NativeRenderer {
    /// Creates a renderer client. With `base_url == None` every call fails
    /// with a configuration error.
    pub fn new(client: reqwest::Client, base_url: Option<&str>) -> Result<Self> {
        let http = HttpBackend::new(client)
            .with_method(FetchMethod::PostJson)
            .with_intrinsic_predicate(|headers, _| {
                let value = headers.get(COLOR_MODE_HEADER).and_then(|v| v.to_str().ok());
                ColorMode::from_header(value).is_intrinsic()
            });

        let endpoint = base_url.map(endpoint_url).transpose()?;
        Ok(Self { http, endpoint })
    }

    /// Returns true if the renderer address is configured.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Returns the `/icon` endpoint, if configured.
    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    /// Renders the descriptor through the helper process.
    pub async fn render_native(&self, descriptor: &IconDescriptor) -> Result<Icon> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or_else(ResolveError::renderer_not_configured)?;
        self.http.fetch_url(endpoint.as_str(), descriptor).await
    }
}

fn endpoint_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| ResolveError::InvalidInput(format!("cannot use {base} as renderer address")))?
        .pop_if_empty()
        .push("icon");
    Ok(url)
}
