//! SVG attribute recolor.
//!
//! The document is streamed with `quick-xml`, which visits elements
//! depth-first in document order. Only `fill` and `stroke` attributes are
//! rewritten; everything else (text, comments, declarations, other
//! attributes) passes through unchanged.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ResolveError, Result};

const PAINT_ATTRIBUTES: [&[u8]; 2] = [b"fill", b"stroke"];

/// Recolors an SVG document.
///
/// - a `fill` or `stroke` whose value is not `none` is set to `hex_color`
/// - elements without those attributes are left alone
/// - the root `<svg>` always ends up with an explicit fill: it is added when
///   missing and kept when `none`
///
/// Fails with [`ResolveError::Format`] on malformed XML or when the root
/// element is not `<svg>`.
pub fn recolor_vector(svg: &[u8], hex_color: &str) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(svg);
    let mut writer = Writer::new(Vec::with_capacity(svg.len() + 32));
    let mut seen_root = false;

    loop {
        let event = reader.read_event()?;
        let event = match event {
            Event::Eof => break,
            Event::Start(e) => {
                let is_root = !seen_root;
                seen_root = true;
                Event::Start(rewrite_element(&e, hex_color, is_root)?)
            }
            Event::Empty(e) => {
                let is_root = !seen_root;
                seen_root = true;
                Event::Empty(rewrite_element(&e, hex_color, is_root)?)
            }
            other => other,
        };
        writer
            .write_event(event)
            .map_err(|e| ResolveError::Format(format!("failed to write SVG: {e}")))?;
    }

    if !seen_root {
        return Err(ResolveError::Format("SVG document has no root element".to_string()));
    }

    Ok(writer.into_inner())
}

fn rewrite_element(
    element: &BytesStart<'_>,
    hex_color: &str,
    is_root: bool,
) -> Result<BytesStart<'static>> {
    if is_root && local_name(element.name().as_ref()) != b"svg" {
        return Err(ResolveError::Format("root element is not <svg>".to_string()));
    }

    let mut attributes: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
    let mut has_fill = false;

    for attr in element.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref().to_vec();
        let is_paint = PAINT_ATTRIBUTES.contains(&key.as_slice());
        has_fill |= key == b"fill";

        let raw: &[u8] = &attr.value;
        let value = if is_paint && raw.trim_ascii() != b"none" {
            hex_color.as_bytes().to_vec()
        } else {
            raw.to_vec()
        };
        attributes.push((key, value));
    }

    if is_root && !has_fill {
        attributes.push((b"fill".to_vec(), hex_color.as_bytes().to_vec()));
    }

    let mut out = element.to_owned();
    out.clear_attributes();
    for (key, value) in &attributes {
        out.push_attribute((key.as_slice(), value.as_slice()));
    }
    Ok(out.into_owned())
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|b| *b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recolor_str(svg: &str, color: &str) -> String {
        String::from_utf8(recolor_vector(svg.as_bytes(), color).unwrap()).unwrap()
    }

    #[test]
    fn replaces_fill_and_stroke() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg"><path fill="#f00" stroke="red" d="M0 0"/></svg>"##;
        let out = recolor_str(svg, "#0000ff");
        assert!(out.contains(r##"<path fill="#0000ff" stroke="#0000ff" d="M0 0"/>"##));
    }

    #[test]
    fn preserves_none() {
        let svg = r##"<svg fill="none"><circle fill="none" stroke="#000000"/></svg>"##;
        let out = recolor_str(svg, "#ff0000");
        assert!(out.starts_with(r#"<svg fill="none">"#));
        assert!(out.contains(r##"<circle fill="none" stroke="#ff0000"/>"##));
    }

    #[test]
    fn leaves_nodes_without_paint_alone() {
        let svg = r##"<svg fill="#111"><g><rect width="4" height="4"/></g></svg>"##;
        let out = recolor_str(svg, "#00ff00");
        assert!(out.contains(r#"<rect width="4" height="4"/>"#));
        assert!(out.starts_with(r##"<svg fill="#00ff00">"##));
    }

    #[test]
    fn root_gets_explicit_fill() {
        let svg = r#"<svg viewBox="0 0 24 24"><path d="M1 1"/></svg>"#;
        let out = recolor_str(svg, "#abcdef");
        assert!(out.starts_with(r##"<svg viewBox="0 0 24 24" fill="#abcdef">"##));
        assert!(out.contains(r#"<path d="M1 1"/>"#));
    }

    #[test]
    fn keeps_prolog_and_text() {
        let svg = r##"<?xml version="1.0"?><!-- icon --><svg><title>Star &amp; more</title></svg>"##;
        let out = recolor_str(svg, "#000000");
        assert!(out.starts_with(r#"<?xml version="1.0"?><!-- icon -->"#));
        assert!(out.contains("<title>Star &amp; more</title>"));
    }

    #[test]
    fn rejects_non_svg_root() {
        let err = recolor_vector(b"<html><body/></html>", "#000000").unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)));
    }

    #[test]
    fn rejects_malformed_xml() {
        let err = recolor_vector(b"<svg><path></svg>", "#000000").unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)));

        let err = recolor_vector(b"not xml at all", "#000000").unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)));
    }
}
