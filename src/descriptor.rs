//! Icon descriptors and their canonical form.
//!
//! An [`IconDescriptor`] is what callers hand to the resolver: a specifier
//! plus rendering flags. [`normalize`] produces the form the pipeline resolves
//! and [`canonicalize`] the form that gets hashed into a cache key; they differ
//! only in whether an identity scale is kept.
//!
//! # Example
//!
//! ```
//! use icon_resolver::IconDescriptor;
//!
//! let descriptor = IconDescriptor::new("symbol:star")
//!     .with_color("ABC")
//!     .with_scale(15.0)
//!     .canonicalize();
//!
//! assert_eq!(descriptor.color.as_deref(), Some("#aabbcc"));
//! assert_eq!(descriptor.scale, Some(9.9));
//! ```

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::{ResolveError, Result};

/// Lower bound for `scale`.
pub const MIN_SCALE: f32 = 0.1;
/// Upper bound for `scale`.
pub const MAX_SCALE: f32 = 9.9;

/// Color used when a mask icon is recolored without an explicit color.
pub const DEFAULT_COLOR: &str = "#000000";

fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================================================
// IconDescriptor
// ============================================================================

/// A request for an icon: the source specifier plus rendering flags.
///
/// Serializes to the JSON shape sent to the native renderer:
///
/// ```json
/// { "specifier": "symbol:star", "flipHorizontal": true, "color": "#ff0000" }
/// ```
///
/// Fields equal to their default are omitted, which keeps the serialized
/// canonical form stable for hashing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct IconDescriptor {
    /// Source identifier, either `prefix:rest` or a bare short string/emoji.
    pub specifier: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub flip_horizontal: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub flip_vertical: bool,

    /// Keep the source colors even for mask icons.
    #[serde(default, skip_serializing_if = "is_false")]
    pub preserve_color: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub preserve_aspect: bool,

    /// Tells the native renderer that the source already carries its final colors.
    #[serde(default, skip_serializing_if = "is_false")]
    pub intrinsic_color: bool,

    /// Scale factor, clamped to `[0.1, 9.9]` by canonicalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,

    /// Target color as `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl IconDescriptor {
    /// Creates a descriptor with default flags.
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_flip_horizontal(mut self, flip: bool) -> Self {
        self.flip_horizontal = flip;
        self
    }

    pub fn with_flip_vertical(mut self, flip: bool) -> Self {
        self.flip_vertical = flip;
        self
    }

    pub fn with_preserve_color(mut self, preserve: bool) -> Self {
        self.preserve_color = preserve;
        self
    }

    pub fn with_preserve_aspect(mut self, preserve: bool) -> Self {
        self.preserve_aspect = preserve;
        self
    }

    /// Returns the canonical form of this descriptor. See [`canonicalize`].
    pub fn canonicalize(&self) -> Self {
        canonicalize(self)
    }

    /// Returns true if the descriptor asks for a geometric transform.
    pub fn has_transform(&self) -> bool {
        self.flip_horizontal || self.flip_vertical || self.scale.is_some()
    }

    /// Parses a descriptor from a JSON payload and canonicalizes it.
    pub fn from_json(json: &str) -> Result<Self> {
        let descriptor: Self = serde_json::from_str(json)?;
        Ok(descriptor.canonicalize())
    }

    /// Serializes the descriptor to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    // ------------------------------------------------------------------------
    // Query string form
    // ------------------------------------------------------------------------

    /// Encodes the descriptor as a deterministic query string.
    ///
    /// Parameter names are sorted alphabetically, booleans are written as
    /// `1`/`0`, optional values are only written when set, and `cacheKey` is
    /// appended last when given.
    pub fn to_query_string(&self, cache_key: Option<&str>) -> String {
        let flag = |b: bool| String::from(if b { "1" } else { "0" });

        let mut params: Vec<(&str, String)> = vec![
            ("flipHorizontal", flag(self.flip_horizontal)),
            ("flipVertical", flag(self.flip_vertical)),
            ("intrinsicColor", flag(self.intrinsic_color)),
            ("preserveAspect", flag(self.preserve_aspect)),
            ("preserveColor", flag(self.preserve_color)),
            ("specifier", self.specifier.clone()),
        ];
        if let Some(color) = &self.color {
            params.push(("color", color.clone()));
        }
        if let Some(scale) = self.scale {
            params.push(("scale", scale.to_string()));
        }
        params.sort_by(|a, b| a.0.cmp(b.0));

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &params {
            serializer.append_pair(name, value);
        }
        if let Some(key) = cache_key {
            serializer.append_pair("cacheKey", key);
        }
        serializer.finish()
    }

    /// Builds a normalized descriptor (see [`normalize`]) from a decoded path
    /// segment and a raw query string.
    ///
    /// Recognised parameters are `color`, `scale`, the boolean flags and
    /// `specifier` (which overrides nothing and is rejected when it disagrees
    /// with the path). `cacheKey` is accepted and ignored. Duplicated or
    /// unknown parameters and malformed values are rejected.
    pub fn from_path(segment: &str, query: Option<&str>) -> Result<Self> {
        if segment.trim().is_empty() {
            return Err(ResolveError::InvalidInput("empty specifier".to_string()));
        }

        let mut descriptor = Self::new(segment);
        let mut seen: Vec<String> = Vec::new();

        let pairs = query
            .map(|q| q.trim_start_matches('?'))
            .filter(|q| !q.is_empty())
            .map(|q| form_urlencoded::parse(q.as_bytes()).collect::<Vec<_>>())
            .unwrap_or_default();

        for (name, value) in pairs {
            if seen.iter().any(|s| *s == name) {
                return Err(ResolveError::InvalidInput(format!(
                    "duplicated query parameter '{name}'"
                )));
            }
            seen.push(name.to_string());

            match &*name {
                "color" => descriptor.color = Some(value.into_owned()),
                "scale" => {
                    let scale = value.trim().parse::<f32>().map_err(|_| {
                        ResolveError::InvalidInput(format!("invalid scale '{value}'"))
                    })?;
                    descriptor.scale = Some(scale);
                }
                "flipHorizontal" => descriptor.flip_horizontal = parse_flag(&name, &value)?,
                "flipVertical" => descriptor.flip_vertical = parse_flag(&name, &value)?,
                "preserveColor" => descriptor.preserve_color = parse_flag(&name, &value)?,
                "preserveAspect" => descriptor.preserve_aspect = parse_flag(&name, &value)?,
                "intrinsicColor" => descriptor.intrinsic_color = parse_flag(&name, &value)?,
                "specifier" => {
                    if value != segment {
                        return Err(ResolveError::InvalidInput(
                            "specifier parameter disagrees with path".to_string(),
                        ));
                    }
                }
                "cacheKey" => {}
                other => {
                    return Err(ResolveError::InvalidInput(format!(
                        "unknown query parameter '{other}'"
                    )));
                }
            }
        }

        Ok(normalize(&descriptor))
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(ResolveError::InvalidInput(format!(
            "invalid boolean '{value}' for '{name}'"
        ))),
    }
}

// ============================================================================
// Canonicalization
// ============================================================================

/// Returns the form of a descriptor the pipeline resolves.
///
/// Same as [`canonicalize`] except that an explicit scale of 1 is kept: it
/// still asks for a pass through the native renderer even though it hashes
/// like no scale at all.
pub fn normalize(descriptor: &IconDescriptor) -> IconDescriptor {
    let mut normalized = descriptor.clone();
    normalized.color = descriptor.color.as_deref().and_then(canonical_color);
    normalized.scale = descriptor
        .scale
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(MIN_SCALE, MAX_SCALE));
    normalized
}

/// Returns the canonical form of a descriptor.
///
/// - `color` is normalized with [`canonical_color`] (unset when invalid)
/// - `scale` is clamped to `[0.1, 9.9]`; a scale of exactly 1 or a non-finite
///   scale is dropped
/// - boolean flags are kept as-is; false values are omitted when serialized
///
/// Pure and idempotent. This is the form cache keys are derived from.
pub fn canonicalize(descriptor: &IconDescriptor) -> IconDescriptor {
    let mut canonical = normalize(descriptor);
    canonical.scale = canonical.scale.filter(|s| *s != 1.0);
    canonical
}

/// Normalizes a color token to `#rrggbb`.
///
/// Accepts `black`, `white`, and 3 or 6 digit hex with or without a leading
/// `#`, in any case. Returns `None` for anything else.
pub fn canonical_color(input: &str) -> Option<String> {
    let lowered = input.trim().to_ascii_lowercase();
    let hex = match lowered.as_str() {
        "black" => "000000",
        "white" => "ffffff",
        other => other.strip_prefix('#').unwrap_or(other),
    };

    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        6 => Some(format!("#{hex}")),
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            Some(format!("#{expanded}"))
        }
        _ => None,
    }
}
