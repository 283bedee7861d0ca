//! Template execution and tag injection.
//!
//! Injection is deliberate regex-anchored text surgery rather than HTML
//! parsing: templates are ordinarily well-formed, and a missing anchor
//! construct triggers a documented fallback instead of an error.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tagweld_core::tag::HtmlTag;
use thiserror::Error;
use tracing::debug;

use crate::{extract::AssetBundle, tags::TagGroups};

static HTML_OPEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html[^>]*>").expect("valid html pattern"));

static HEAD_CLOSE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("valid head pattern"));

static BODY_CLOSE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("valid body pattern"));

static MANIFEST_ATTR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\smanifest\s*=").expect("valid manifest pattern"));

/// Boxed error raised by a template function; carried unmodified.
pub type TemplateError = Box<dyn std::error::Error + Send + Sync>;

/// Black-box template: parameters in, HTML text out.
pub type TemplateFn =
    Arc<dyn Fn(&TemplateParameters) -> std::result::Result<String, TemplateError> + Send + Sync>;

/// Parameters handed to the template function.
#[derive(Debug, Clone)]
pub struct TemplateParameters {
    /// The extracted asset bundle, as rewritten by earlier listeners.
    pub assets: AssetBundle,

    /// Head tags, for templates that place tags themselves.
    pub head_tags: Vec<HtmlTag>,

    /// Body tags, for templates that place tags themselves.
    pub body_tags: Vec<HtmlTag>,

    /// Output name of the document being assembled.
    pub output_name: String,
}

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template function failed; its error is carried as raised.
    #[error("template execution failed: {0}")]
    Template(TemplateError),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Invoke the template function with the assembled parameters.
///
/// Template authoring errors are not this system's concern; whatever the
/// template raises is propagated unmodified.
pub fn render_template(template: &TemplateFn, parameters: &TemplateParameters) -> Result<String> {
    template(parameters).map_err(RenderError::Template)
}

/// Splice serialized head and body tags into rendered HTML.
///
/// Body tags land immediately before the first closing body construct, or
/// at the end of the document when none exists. Head tags land immediately
/// before the first closing head construct; when none exists a head element
/// is synthesized, after the opening `<html>` construct if present, else at
/// the very start of the document.
#[must_use]
pub fn inject_tags(html: &str, groups: &TagGroups, xhtml: bool) -> String {
    let mut html = html.to_string();

    let body: String = groups.body_tags.iter().map(|tag| tag.render(xhtml)).collect();
    let head: String = groups.head_tags.iter().map(|tag| tag.render(xhtml)).collect();

    if !body.is_empty() {
        match BODY_CLOSE_PATTERN.find(&html).map(|found| found.start()) {
            Some(position) => html.insert_str(position, &body),
            None => {
                debug!("no closing body construct, appending body tags to document end");
                html.push_str(&body);
            }
        }
    }

    if !head.is_empty() {
        if !HEAD_CLOSE_PATTERN.is_match(&html) {
            match HTML_OPEN_PATTERN.find(&html).map(|found| found.end()) {
                Some(position) => html.insert_str(position, "<head></head>"),
                None => {
                    debug!("no html or head construct, synthesizing document head");
                    html.insert_str(0, "<head></head>");
                }
            }
        }
        if let Some(position) = HEAD_CLOSE_PATTERN.find(&html).map(|found| found.start()) {
            html.insert_str(position, &head);
        }
    }

    html
}

/// Add a `manifest` attribute to the document's opening `<html>` construct.
///
/// Leaves the document untouched when no manifest exists, when there is no
/// `<html>` construct, or when the first one already declares a manifest.
/// Only the first construct is considered.
#[must_use]
pub fn inject_manifest(html: &str, manifest: Option<&str>) -> String {
    let Some(manifest) = manifest else {
        return html.to_string();
    };
    let Some(found) = HTML_OPEN_PATTERN.find(html) else {
        return html.to_string();
    };
    if MANIFEST_ATTR_PATTERN.is_match(found.as_str()) {
        return html.to_string();
    }

    let mut out = html.to_string();
    out.insert_str(found.end() - 1, &format!(" manifest=\"{manifest}\""));
    out
}
