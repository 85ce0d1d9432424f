//! icon-resolver: turns icon descriptors into PNG/SVG bytes.
//!
//! A descriptor is a textual specifier (`https://…`, `iconify:mdi:home`,
//! `symbol:star`, `text:AB`, a bare emoji, …) plus rendering flags. The
//! [`IconResolver`] canonicalizes it, looks it up in a byte-bounded cache, and
//! on a miss routes it to a backend, postprocesses the result (re-rendering or
//! recoloring) and caches it.
//!
//! # Example
//!
//! ```no_run
//! use icon_resolver::{IconDescriptor, IconResolver, ResolverConfig};
//!
//! # async fn run() -> icon_resolver::Result<()> {
//! let config = ResolverConfig::new().with_native_renderer_url("http://127.0.0.1:7070");
//! let resolver = IconResolver::new(&config)?;
//!
//! let descriptor = IconDescriptor::new("iconify:mdi:home").with_color("white");
//! let icon = resolver.resolve(&descriptor).await?;
//! println!("{} bytes of {}", icon.len(), icon.content_type.header_value());
//! # Ok(())
//! # }
//! ```
//!
//! # Recoloring without the pipeline
//!
//! The recolor engines are plain functions:
//!
//! ```
//! use icon_resolver::recolor_vector;
//!
//! let svg = br##"<svg><path fill="#f00"/><path fill="none"/></svg>"##;
//! let out = recolor_vector(svg, "#0000ff").unwrap();
//! assert_eq!(
//!     std::str::from_utf8(&out).unwrap(),
//!     r##"<svg fill="#0000ff"><path fill="#0000ff"/><path fill="none"/></svg>"##
//! );
//! ```

pub mod backend;
mod cache;
mod config;
mod descriptor;
pub mod dispatch;
mod error;
mod icon;
mod key;
pub mod postprocess;
pub mod recolor;
mod resolver;

pub use backend::{Backend, HttpBackend, IconifyBackend, NativeRenderer};
pub use cache::{CacheStats, IconCache};
pub use config::{DEFAULT_CACHE_CAPACITY_BYTES, ResolverConfig};
pub use descriptor::{
    DEFAULT_COLOR, IconDescriptor, MAX_SCALE, MIN_SCALE, canonical_color, canonicalize, normalize,
};
pub use dispatch::Dispatcher;
pub use error::{ResolveError, Result};
pub use icon::{ColorMode, ContentType, Icon};
pub use key::{KEY_LENGTH, derive_key};
pub use postprocess::Postprocessor;
pub use recolor::{recolor_raster, recolor_vector};
pub use resolver::IconResolver;
