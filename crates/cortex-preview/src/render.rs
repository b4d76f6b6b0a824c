use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tracing::{debug, warn};

use cortex_core::models::artifact::{Artifact, ArtifactType};

use crate::detect::{ComponentLookup, scan_components};
use crate::error::PreviewError;

const REACT_HOST: &str = "react_host.tera";
const HOST_PAGE: &str = "host_page.html";

/// Script and stylesheet URLs loaded by the React host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewAssets {
    pub react: String,
    pub react_dom: String,
    pub babel: String,
    pub tailwind: String,
}

impl Default for PreviewAssets {
    fn default() -> Self {
        Self {
            react: "https://unpkg.com/react@18/umd/react.production.min.js".to_string(),
            react_dom: "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js".to_string(),
            babel: "https://unpkg.com/@babel/standalone/babel.min.js".to_string(),
            tailwind: "https://cdn.tailwindcss.com".to_string(),
        }
    }
}

/// A document ready to be assigned to a sandboxed iframe's `srcdoc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewDocument {
    pub kind: ArtifactType,
    pub title: String,
    pub html: String,
    /// Static guess at the mounted component (React only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentLookup>,
}

/// Builds preview documents from artifacts. Output depends only on the
/// artifact and the configured assets.
pub struct PreviewRenderer {
    tera: Tera,
    assets: PreviewAssets,
}

impl PreviewRenderer {
    pub fn new(assets: PreviewAssets) -> Result<Self, PreviewError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (REACT_HOST, include_str!("../templates/react_host.tera")),
            (HOST_PAGE, include_str!("../templates/host_page.html")),
        ])
        .map_err(|e| PreviewError::TemplateParse(e.to_string()))?;
        Ok(Self { tera, assets })
    }

    pub fn assets(&self) -> &PreviewAssets {
        &self.assets
    }

    /// Build the iframe document for an artifact.
    ///
    /// HTML artifacts are used verbatim. React artifacts are wrapped in a
    /// host document that loads React, ReactDOM, Babel and Tailwind, installs
    /// the error listeners, evaluates the code and mounts the detected
    /// component.
    pub fn render(&self, artifact: &Artifact) -> Result<PreviewDocument, PreviewError> {
        let (html, component) = match artifact.kind {
            ArtifactType::Html => (artifact.code.clone(), None),
            ArtifactType::React => {
                let lookup = scan_components(&artifact.code);
                if lookup.is_ambiguous() {
                    warn!(?lookup, "several capitalized globals, preview picks by key order");
                } else if lookup == ComponentLookup::NotFound {
                    warn!(title = %artifact.title, "no component candidate in React source");
                }

                let mut context = Context::new();
                context.insert("assets", &self.assets);
                context.insert("code", &artifact.code);
                (self.tera.render(REACT_HOST, &context)?, Some(lookup))
            }
        };

        debug!(kind = %artifact.kind, bytes = html.len(), "preview document built");

        Ok(PreviewDocument {
            kind: artifact.kind,
            title: artifact.title.clone(),
            html,
            component,
        })
    }

    /// Wrap a document in a host page: a script-only sandboxed iframe plus a
    /// bridge that forwards the iframe's CONSOLE_ERROR messages to
    /// `errors_url`.
    pub fn render_host_page(
        &self,
        document: &PreviewDocument,
        errors_url: &str,
    ) -> Result<String, PreviewError> {
        let mut context = Context::new();
        context.insert("title", &document.title);
        context.insert("srcdoc", &document.html);
        context.insert("errors_url", errors_url);
        Ok(self.tera.render(HOST_PAGE, &context)?)
    }
}
