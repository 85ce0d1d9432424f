//! Integration tests for the HTTP, Iconify and native renderer backends.

use icon_resolver::backend::FetchMethod;
use icon_resolver::{
    ColorMode, ContentType, HttpBackend, IconDescriptor, IconifyBackend, NativeRenderer,
    ResolveError,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MASK_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><path fill="currentColor" d="M0 0h1v1z"/></svg>"#;
const COLORED_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg"><path fill="#ff8800" d="M0 0h1v1z"/></svg>"##;

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn svg_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "image/svg+xml")
}

// ============================================================================
// Generic HTTP
// ============================================================================

#[tokio::test]
async fn http_fetch_defaults_to_mask() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icons/star.svg"))
        .respond_with(svg_response(COLORED_SVG))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = IconDescriptor::new(format!("{}/icons/star.svg", server.uri()));
    let icon = HttpBackend::new(client()).fetch(&descriptor).await.unwrap();

    assert_eq!(icon.content_type, ContentType::Svg);
    assert_eq!(icon.color_mode, ColorMode::Mask);
    assert_eq!(&icon.data[..], COLORED_SVG.as_bytes());
}

#[tokio::test]
async fn http_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let descriptor = IconDescriptor::new(format!("{}/missing.png", server.uri()));
    let err = HttpBackend::new(client()).fetch(&descriptor).await.unwrap_err();

    assert!(matches!(err, ResolveError::NotFound(_)));
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn http_other_failures_are_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/created"))
        .respond_with(ResponseTemplate::new(201).set_body_raw(b"x".to_vec(), "image/png"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(client());
    for route in ["boom", "created"] {
        let descriptor = IconDescriptor::new(format!("{}/{route}", server.uri()));
        let err = backend.fetch(&descriptor).await.unwrap_err();
        assert!(matches!(err, ResolveError::Upstream { status: 503, .. }), "{route}: {err}");
    }
}

#[tokio::test]
async fn http_requires_image_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/binary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<svg/>".to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"<html/>".to_vec(), "text/html"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(client());
    for route in ["binary", "html"] {
        let descriptor = IconDescriptor::new(format!("{}/{route}", server.uri()));
        let err = backend.fetch(&descriptor).await.unwrap_err();
        assert_eq!(err.status(), 503, "{route}");
        assert!(err.to_string().contains("unsupported content type"), "{route}: {err}");
    }
}

#[tokio::test]
async fn http_missing_content_type_is_unavailable() {
    let server = MockServer::start().await;
    // No body and no mime: the response carries no Content-Type header at all.
    Mock::given(method("GET"))
        .and(path("/untyped"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let descriptor = IconDescriptor::new(format!("{}/untyped", server.uri()));
    let err = HttpBackend::new(client()).fetch(&descriptor).await.unwrap_err();
    assert_eq!(err, ResolveError::unavailable("missing content type"));
}

#[tokio::test]
async fn http_connection_failure_is_unavailable() {
    // Nothing listens on port 9 of localhost in the test environment.
    let descriptor = IconDescriptor::new("http://127.0.0.1:9/icon.png");
    let err = HttpBackend::new(client()).fetch(&descriptor).await.unwrap_err();
    assert_eq!(err.status(), 503);
}

#[tokio::test]
async fn http_predicate_can_detect_intrinsic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(svg_response(COLORED_SVG).insert_header("x-colorful", "yes"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(client())
        .with_intrinsic_predicate(|headers, _body| headers.contains_key("x-colorful"));
    let icon = backend
        .fetch(&IconDescriptor::new(format!("{}/a.svg", server.uri())))
        .await
        .unwrap();

    assert_eq!(icon.color_mode, ColorMode::Intrinsic);
}

#[tokio::test]
async fn http_post_sends_descriptor_json() {
    let server = MockServer::start().await;
    let descriptor = IconDescriptor::new("symbol:star")
        .with_flip_horizontal(true)
        .with_color("#ff0000");

    Mock::given(method("POST"))
        .and(path("/render"))
        .and(body_json(serde_json::json!({
            "specifier": "symbol:star",
            "flipHorizontal": true,
            "color": "#ff0000"
        })))
        .respond_with(svg_response(MASK_SVG))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(client()).with_method(FetchMethod::PostJson);
    let icon = backend
        .fetch_url(&format!("{}/render", server.uri()), &descriptor)
        .await
        .unwrap();
    assert_eq!(icon.content_type, ContentType::Svg);
}

#[tokio::test]
async fn http_rejects_invalid_url() {
    let err = HttpBackend::new(client())
        .fetch(&IconDescriptor::new("http:not a url"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::InvalidInput(_)));
}

// ============================================================================
// Iconify
// ============================================================================

#[tokio::test]
async fn iconify_current_color_is_mask() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mdi/home.svg"))
        .respond_with(svg_response(MASK_SVG))
        .expect(1)
        .mount(&server)
        .await;

    let backend = IconifyBackend::new(client(), &server.uri()).unwrap();
    let icon = backend
        .fetch_iconify(&IconDescriptor::new("iconify:mdi:home"))
        .await
        .unwrap();

    assert_eq!(icon.color_mode, ColorMode::Mask);
}

#[tokio::test]
async fn iconify_fixed_palette_is_intrinsic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logos/rust.svg"))
        .respond_with(svg_response(COLORED_SVG))
        .mount(&server)
        .await;

    let backend = IconifyBackend::new(client(), &server.uri()).unwrap();
    let icon = backend
        .fetch_iconify(&IconDescriptor::new("iconify:logos:rust"))
        .await
        .unwrap();

    assert_eq!(icon.color_mode, ColorMode::Intrinsic);
}

#[tokio::test]
async fn iconify_missing_icon_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let backend = IconifyBackend::new(client(), &server.uri()).unwrap();
    let err = backend
        .fetch_iconify(&IconDescriptor::new("iconify:mdi:nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(_)));
}

// ============================================================================
// Native renderer
// ============================================================================

#[tokio::test]
async fn native_renderer_reads_color_mode_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/icon"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "specifier": "text:AB" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Icon-Color-Mode", "intrinsic")
                .set_body_raw(b"\x89PNG".to_vec(), "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let renderer = NativeRenderer::new(client(), Some(&server.uri())).unwrap();
    let icon = renderer
        .render_native(&IconDescriptor::new("text:AB"))
        .await
        .unwrap();

    assert_eq!(icon.content_type, ContentType::Png);
    assert_eq!(icon.color_mode, ColorMode::Intrinsic);
}

#[tokio::test]
async fn native_renderer_defaults_to_mask() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/icon"))
        .respond_with(svg_response(MASK_SVG).insert_header("X-Icon-Color-Mode", "tinted"))
        .mount(&server)
        .await;

    let renderer = NativeRenderer::new(client(), Some(&server.uri())).unwrap();
    let icon = renderer
        .render_native(&IconDescriptor::new("symbol:star"))
        .await
        .unwrap();

    assert_eq!(icon.color_mode, ColorMode::Mask);
}
