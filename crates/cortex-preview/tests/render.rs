use std::sync::Arc;

use cortex_core::models::artifact::{Artifact, ArtifactType};
use cortex_preview::detect::ComponentLookup;
use cortex_preview::{PreviewAssets, PreviewRenderer};

fn renderer() -> PreviewRenderer {
    PreviewRenderer::new(PreviewAssets::default()).unwrap()
}

fn react(code: &str) -> Artifact {
    Artifact {
        kind: ArtifactType::React,
        code: code.to_string(),
        title: "Widget".to_string(),
        description: "A widget".to_string(),
    }
}

#[test]
fn html_is_used_verbatim() {
    let artifact = Artifact::fallback("<!DOCTYPE html><h1>Hello & welcome</h1>");
    let document = renderer().render(&artifact).unwrap();
    assert_eq!(document.kind, ArtifactType::Html);
    assert_eq!(document.html, artifact.code);
    assert_eq!(document.component, None);
}

#[test]
fn react_host_loads_assets_in_order() {
    let document = renderer().render(&react("function Widget() { return <p>hi</p>; }")).unwrap();
    let html = &document.html;

    let positions: Vec<usize> = [
        "react.production.min.js",
        "react-dom.production.min.js",
        "@babel/standalone",
        "cdn.tailwindcss.com",
        "addEventListener('error'",
        "<div id=\"root\"></div>",
        "<script type=\"text/babel\">",
        "function Widget()",
        "Object.keys(window)",
    ]
    .iter()
    .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
    .collect();

    assert!(positions.windows(2).all(|w| w[0] < w[1]), "out of order: {positions:?}");
}

#[test]
fn react_code_is_injected_unescaped() {
    let code = r#"function App() { return <div style={{color: "red"}}>a && b</div>; }"#;
    let document = renderer().render(&react(code)).unwrap();
    assert!(document.html.contains(code));
}

#[test]
fn footer_reproduces_detection_policy() {
    let html = renderer().render(&react("function Widget() {}")).unwrap().html;
    assert!(html.contains("if (typeof exports !== 'undefined' && exports.default)"));
    assert!(html.contains("key[0] === key[0].toUpperCase() && typeof window[key] === 'function'"));
    assert!(html.contains("Error: No component found"));
    assert!(html.contains("message: 'No React component found in generated code'"));
    assert!(html.contains("'Unhandled Promise: ' + e.reason"));
}

#[test]
fn rendering_is_deterministic() {
    let renderer = renderer();
    let artifact = react("function Widget() { return null; }");
    assert_eq!(renderer.render(&artifact).unwrap(), renderer.render(&artifact).unwrap());

    let html = Artifact::fallback("<p>same</p>");
    assert_eq!(renderer.render(&html).unwrap(), renderer.render(&html).unwrap());
}

#[test]
fn widget_is_detected() {
    let document = renderer().render(&react("function Widget(){ return <b>w</b>; }")).unwrap();
    assert_eq!(
        document.component,
        Some(ComponentLookup::Global {
            name: "Widget".to_string(),
            others: vec![],
        })
    );
}

#[test]
fn custom_assets_are_used() {
    let assets = PreviewAssets {
        react: "/vendor/react.js".to_string(),
        react_dom: "/vendor/react-dom.js".to_string(),
        babel: "/vendor/babel.js".to_string(),
        tailwind: "/vendor/tailwind.js".to_string(),
    };
    let renderer = PreviewRenderer::new(assets).unwrap();
    let html = renderer.render(&react("function A(){}")).unwrap().html;
    assert!(html.contains(r#"<script crossorigin src="/vendor/react.js"></script>"#));
    assert!(!html.contains("unpkg.com"));
}

#[test]
fn host_page_sandboxes_and_escapes_document() {
    let renderer = Arc::new(renderer());
    let document = renderer
        .render(&Artifact::fallback(r#"<p class="x">"quoted" & <b>bold</b></p>"#))
        .unwrap();
    let page = renderer
        .render_host_page(&document, "/sessions/abc/errors")
        .unwrap();

    assert!(page.contains(r#"sandbox="allow-scripts""#));
    assert!(!page.contains("allow-same-origin"));
    assert!(page.contains("&lt;p class=&quot;x&quot;&gt;"));
    assert!(page.contains("&amp;"));
    assert!(!page.contains("<b>bold</b>"));
    assert!(page.contains(r#"var errorsUrl = "/sessions/abc/errors";"#));
    assert!(page.contains("event.data.type !== 'CONSOLE_ERROR'"));
}
