//! Generic HTTP(S) icon fetch.

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use url::Url;

use crate::descriptor::IconDescriptor;
use crate::error::{ResolveError, Result};
use crate::icon::{ColorMode, ContentType, Icon};

const TARGET: &str = "icon_resolver::backend::http";

/// Decides from the raw response whether the fetched icon is intrinsic.
///
/// Receives the response headers and body; returning `true` selects
/// [`ColorMode::Intrinsic`], `false` selects [`ColorMode::Mask`].
pub type IntrinsicPredicate = Arc<dyn Fn(&HeaderMap, &[u8]) -> bool + Send + Sync>;

/// How the request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMethod {
    /// Plain GET of the target URL.
    #[default]
    Get,
    /// POST with the descriptor serialized as the JSON body.
    PostJson,
}

/// Fetches icons over HTTP(S).
///
/// Used directly for `http:`/`https:` specifiers (the specifier is the URL)
/// and as the transport of the Iconify backend and the native renderer.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    method: FetchMethod,
    is_intrinsic: IntrinsicPredicate,
}

impl HttpBackend {
    /// Creates a GET backend whose icons are always masks.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            method: FetchMethod::Get,
            is_intrinsic: Arc::new(|_, _| false),
        }
    }

    /// Sets the request method.
    pub fn with_method(mut self, method: FetchMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the predicate that detects intrinsic colors.
    pub fn with_intrinsic_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&HeaderMap, &[u8]) -> bool + Send + Sync + 'static,
    {
        self.is_intrinsic = Arc::new(predicate);
        self
    }

    pub fn method(&self) -> FetchMethod {
        self.method
    }

    /// Fetches the icon whose URL is the descriptor's specifier.
    pub async fn fetch(&self, descriptor: &IconDescriptor) -> Result<Icon> {
        self.fetch_url(&descriptor.specifier, descriptor).await
    }

    /// Fetches an icon from `url`.
    ///
    /// A 404 maps to [`ResolveError::NotFound`]; any other non-200 status, a
    /// transport failure, or a missing/unsupported `Content-Type` maps to a
    /// 503 [`ResolveError::Upstream`].
    pub async fn fetch_url(&self, url: &str, descriptor: &IconDescriptor) -> Result<Icon> {
        let url = Url::parse(url)?;

        let request = match self.method {
            FetchMethod::Get => self.client.get(url.clone()),
            FetchMethod::PostJson => self.client.post(url.clone()).json(descriptor),
        };

        tracing::debug!(target: TARGET, method = ?self.method, %url, "fetching icon");
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(format!("upstream has no icon at {url}")));
        }
        if status != StatusCode::OK {
            tracing::warn!(target: TARGET, %url, %status, "upstream request failed");
            return Err(ResolveError::unavailable(format!(
                "upstream returned {}",
                status.as_u16()
            )));
        }

        let raw_content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ResolveError::unavailable("missing content type"))?;
        let content_type = ContentType::from_header(&raw_content_type).ok_or_else(|| {
            tracing::warn!(target: TARGET, %url, content_type = %raw_content_type, "unsupported content type");
            ResolveError::unavailable(format!("unsupported content type {raw_content_type}"))
        })?;

        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let color_mode = if (self.is_intrinsic)(&headers, &body) {
            ColorMode::Intrinsic
        } else {
            ColorMode::Mask
        };

        tracing::debug!(
            target: TARGET,
            %url,
            %content_type,
            ?color_mode,
            size = body.len(),
            "fetched icon"
        );
        Ok(Icon::new(body, content_type, color_mode))
    }
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}
