//! Specifier routing.
//!
//! A specifier of the form `prefix:rest` is routed to the backend registered
//! for `prefix`. Anything else (or an unknown prefix) may still be short free
//! text or an emoji, which the native renderer draws as a `text:` icon.

use std::sync::LazyLock;

use regex::Regex;

use crate::backend::{Backend, HttpBackend, IconifyBackend, NativeRenderer};
use crate::descriptor::IconDescriptor;
use crate::error::{ResolveError, Result};
use crate::icon::Icon;

const TARGET: &str = "icon_resolver::dispatch";

static PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]{2,10}):(.+)$").expect("valid prefix pattern"));

/// At most two words followed by one to three non-space glyphs.
static SHORT_TEXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\w+\s+){0,2}\S{1,3}$").expect("valid text pattern"));

static EMOJI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Extended_Pictographic}").expect("valid emoji pattern"));

/// Prefixes routed to the native renderer by [`Dispatcher::with_defaults`].
pub const NATIVE_PREFIXES: [&str; 5] = ["bundle", "symbol", "text", "svg", "data"];

/// The backend chosen for a descriptor, with the descriptor it will receive.
#[derive(Debug)]
pub struct Route<'a> {
    /// Prefix that selected the backend, or `None` for the text/emoji fallback.
    pub prefix: Option<String>,
    pub backend: &'a Backend,
    pub descriptor: IconDescriptor,
}

impl Route<'_> {
    /// Fetches the icon from the selected backend.
    pub async fn fetch(&self) -> Result<Icon> {
        self.backend.fetch(&self.descriptor).await
    }
}

/// Ordered prefix → backend registry with a text/emoji fallback.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: Vec<(String, Backend)>,
    fallback: Option<Backend>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard registry:
    ///
    /// | prefix | backend |
    /// |--------|---------|
    /// | `http`, `https` | generic HTTP fetch |
    /// | `iconify` | Iconify |
    /// | `bundle`, `symbol`, `text`, `svg`, `data` | native renderer |
    ///
    /// The native renderer also serves the text/emoji fallback.
    pub fn with_defaults(http: HttpBackend, iconify: IconifyBackend, native: NativeRenderer) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register("http", Backend::Http(http.clone()));
        dispatcher.register("https", Backend::Http(http));
        dispatcher.register("iconify", Backend::Iconify(iconify));
        for prefix in NATIVE_PREFIXES {
            dispatcher.register(prefix, Backend::Native(native.clone()));
        }
        dispatcher.set_fallback(native);
        dispatcher
    }

    /// Appends a backend for `prefix`. Earlier registrations win on duplicates.
    pub fn register(&mut self, prefix: impl Into<String>, backend: Backend) {
        self.registry.push((prefix.into(), backend));
    }

    /// Sets the renderer used for bare text and emoji specifiers.
    pub fn set_fallback(&mut self, renderer: NativeRenderer) {
        self.fallback = Some(Backend::Native(renderer));
    }

    /// Returns the registered prefixes in registration order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.registry.iter().map(|(prefix, _)| prefix.as_str())
    }

    /// Chooses the backend for a descriptor without performing any I/O.
    pub fn route(&self, descriptor: &IconDescriptor) -> Result<Route<'_>> {
        let specifier = descriptor.specifier.as_str();

        if let Some(captures) = PREFIX_PATTERN.captures(specifier) {
            let prefix = &captures[1];
            if let Some((_, backend)) = self.registry.iter().find(|(p, _)| p == prefix) {
                tracing::debug!(target: TARGET, prefix, backend = backend.name(), "routed by prefix");
                return Ok(Route {
                    prefix: Some(prefix.to_string()),
                    backend,
                    descriptor: descriptor.clone(),
                });
            }
            tracing::debug!(target: TARGET, prefix, "no backend registered for prefix");
        }

        if let Some(backend) = &self.fallback {
            if looks_like_text(specifier) {
                tracing::debug!(target: TARGET, specifier, "routed as text");
                let mut text = descriptor.clone();
                text.specifier = format!("text:{specifier}");
                return Ok(Route {
                    prefix: None,
                    backend,
                    descriptor: text,
                });
            }
        }

        Err(ResolveError::NotFound(format!("no icon for specifier '{specifier}'")))
    }

    /// Resolves a descriptor to the raw icon of its backend.
    pub async fn resolve(&self, descriptor: &IconDescriptor) -> Result<Icon> {
        self.route(descriptor)?.fetch().await
    }
}

/// Returns true for short free text or anything containing an emoji.
pub fn looks_like_text(specifier: &str) -> bool {
    SHORT_TEXT_PATTERN.is_match(specifier) || is_emoji(specifier)
}

fn is_emoji(specifier: &str) -> bool {
    if EMOJI_PATTERN.is_match(specifier) {
        return true;
    }

    #[cfg(feature = "twemoji")]
    {
        use twemoji_assets::svg::SvgTwemojiAsset;
        if SvgTwemojiAsset::from_emoji(specifier).is_some() {
            return true;
        }
    }

    false
}
