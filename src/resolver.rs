//! The resolution pipeline.

use std::sync::Arc;

use crate::backend::{HttpBackend, IconifyBackend, NativeRenderer};
use crate::cache::IconCache;
use crate::config::ResolverConfig;
use crate::descriptor::{IconDescriptor, canonicalize, normalize};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::icon::Icon;
use crate::key::derive_key;
use crate::postprocess::Postprocessor;

const TARGET: &str = "icon_resolver::resolver";

/// Resolves descriptors to icons, caching the results.
///
/// Construct one at startup and share it (it is `Send + Sync`); it owns the
/// cache, so there is no hidden global state.
///
/// ```text
/// descriptor ─► canonicalize ─► derive_key ─► cache hit? ──yes──► icon
///                                                 │no
///                                                 ▼
///                                    dispatch ─► postprocess ─► cache.put ─► icon
/// ```
///
/// Dispatch and postprocessing see the [`normalize`]d descriptor, which keeps
/// an explicit identity scale that the cache key leaves out.
///
/// Concurrent misses for the same key may both fetch; the last one to finish
/// populates the cache. Failed or cancelled resolutions store nothing.
#[derive(Debug)]
pub struct IconResolver {
    dispatcher: Dispatcher,
    postprocessor: Postprocessor,
    cache: Arc<IconCache>,
}

impl IconResolver {
    /// Builds the standard pipeline from a configuration.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = config.build_client()?;
        let native = NativeRenderer::new(client.clone(), config.native_renderer_url.as_deref())?;
        let iconify = IconifyBackend::new(client.clone(), &config.iconify_base_url)?;
        let http = HttpBackend::new(client);

        tracing::debug!(
            target: TARGET,
            renderer = ?config.native_renderer_url,
            capacity = config.cache_capacity_bytes,
            "icon resolver configured"
        );

        Ok(Self::from_parts(
            Dispatcher::with_defaults(http, iconify, native.clone()),
            Postprocessor::new(native),
            Arc::new(IconCache::new(config.cache_capacity_bytes)),
        ))
    }

    /// Assembles a resolver from already built parts.
    pub fn from_parts(dispatcher: Dispatcher, postprocessor: Postprocessor, cache: Arc<IconCache>) -> Self {
        Self {
            dispatcher,
            postprocessor,
            cache,
        }
    }

    pub fn cache(&self) -> &IconCache {
        &self.cache
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the cache key a descriptor resolves under.
    pub fn cache_key(descriptor: &IconDescriptor) -> String {
        derive_key(&canonicalize(descriptor))
    }

    /// Resolves a descriptor.
    ///
    /// Errors from routing, fetching or postprocessing are returned unchanged
    /// and leave the cache untouched.
    pub async fn resolve(&self, descriptor: &IconDescriptor) -> Result<Icon> {
        let key = Self::cache_key(descriptor);

        if let Some(icon) = self.cache.get(&key) {
            return Ok(icon);
        }

        let normalized = normalize(descriptor);
        let route = self.dispatcher.route(&normalized)?;
        let fetched = route.fetch().await?;

        let icon = if route.backend.is_native() {
            self.postprocessor.postprocess_native(fetched, &normalized).await?
        } else {
            self.postprocessor.postprocess(fetched, &normalized).await?
        };

        tracing::debug!(
            target: TARGET,
            key = %key,
            backend = route.backend.name(),
            size = icon.len(),
            "resolved icon"
        );
        self.cache.put(key, icon.clone());
        Ok(icon)
    }

    /// Resolves a specifier taken from a (decoded) path segment, with flags and
    /// color from the raw query string.
    pub async fn resolve_path(&self, segment: &str, query: Option<&str>) -> Result<Icon> {
        let descriptor = IconDescriptor::from_path(segment, query)?;
        self.resolve(&descriptor).await
    }
}
