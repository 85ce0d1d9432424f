//! Resolved icon types.
//!
//! An [`Icon`] is the immutable result of a resolution: encoded image bytes,
//! their content type, and whether the colors are final or meant to be tinted.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

/// The two image encodings the resolver deals in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/svg+xml")]
    Svg,
}

impl ContentType {
    /// Returns the bare MIME type.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Returns the value to send in an HTTP `Content-Type` response header.
    pub fn header_value(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml; charset=utf-8",
        }
    }

    /// Parses a `Content-Type` header value, ignoring parameters and case.
    ///
    /// Returns `None` for anything other than PNG or SVG.
    pub fn from_header(value: &str) -> Option<Self> {
        let mime = value.split(';').next()?.trim().to_ascii_lowercase();
        match mime.as_str() {
            "image/png" => Some(Self::Png),
            "image/svg+xml" => Some(Self::Svg),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// How the colors of an icon are to be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// The source already encodes its final colors and must not be recolored.
    Intrinsic,
    /// A single-color silhouette that is tinted to the requested color.
    #[default]
    Mask,
}

impl ColorMode {
    /// Interprets an `X-Icon-Color-Mode` header value.
    ///
    /// Only the literal `intrinsic` selects [`ColorMode::Intrinsic`].
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("intrinsic") => Self::Intrinsic,
            _ => Self::Mask,
        }
    }

    pub fn is_intrinsic(&self) -> bool {
        matches!(self, Self::Intrinsic)
    }
}

/// A resolved icon.
///
/// The bytes are reference counted and read-only; recoloring produces a new
/// `Icon` rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    /// Encoded image data.
    pub data: Bytes,
    /// Encoding of `data`.
    pub content_type: ContentType,
    /// Whether the colors are final or a mask.
    pub color_mode: ColorMode,
}

impl Icon {
    /// Creates a new icon.
    pub fn new(data: impl Into<Bytes>, content_type: ContentType, color_mode: ColorMode) -> Self {
        Self {
            data: data.into(),
            content_type,
            color_mode,
        }
    }

    /// Returns the size of the encoded data in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the icon carries no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a copy of this icon with new data, keeping the content type.
    pub fn with_data(&self, data: impl Into<Bytes>) -> Self {
        Self::new(data, self.content_type, self.color_mode)
    }

    /// Encodes the icon as a `data:` URI (`data:{mime};base64,{bytes}`).
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type.mime(), STANDARD.encode(&self.data))
    }

    /// Decodes a base64 `data:` URI produced by [`Icon::to_data_uri`].
    ///
    /// The resulting icon uses [`ColorMode::Mask`]; the color mode is not part
    /// of the URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| ResolveError::InvalidInput("not a data URI".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ResolveError::InvalidInput("data URI has no payload".to_string()))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| ResolveError::InvalidInput("data URI is not base64".to_string()))?;
        let content_type = ContentType::from_header(mime)
            .ok_or_else(|| ResolveError::Format(format!("unsupported content type {mime}")))?;
        let data = STANDARD
            .decode(payload)
            .map_err(|e| ResolveError::InvalidInput(format!("bad base64 payload: {e}")))?;
        Ok(Self::new(data, content_type, ColorMode::Mask))
    }
}
