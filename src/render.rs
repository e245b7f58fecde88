//! Turning the assembled RAML into HTML.
//!
//! The document builder only depends on the [`Renderer`] trait. [`HtmlRenderer`]
//! is the default implementation: it parses the RAML source as YAML, so a
//! malformed document fails with a parse error, and lays the resource tree out
//! as a single self-contained HTML page.

use crate::error::{Error, Result};
use log::debug;
use serde_yaml::{Mapping, Value};
use std::fmt::Write;

/// Renders an assembled RAML document.
pub trait Renderer: Send + Sync {
    /// Converts `source` into the served representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if `source` is not a well-formed document.
    fn render(&self, source: &str) -> Result<String>;
}

/// Default renderer producing a browsable HTML page.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

const METHODS: [&str; 7] = ["get", "post", "put", "patch", "delete", "options", "head"];

impl Renderer for HtmlRenderer {
    fn render(&self, source: &str) -> Result<String> {
        let root: Value = if source.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(source).map_err(|e| Error::Render(e.to_string()))?
        };
        let root = match root {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => return Err(Error::Render("document root is not a mapping".to_string())),
        };

        let title = scalar(root.get("title")).unwrap_or_else(|| "API Documentation".to_string());
        debug!("Rendering HTML documentation for '{}'", title);

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape(&title));
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(html, "<h1>{}</h1>", escape(&title));

        if let Some(base_uri) = scalar(root.get("baseUri")) {
            let _ = writeln!(html, "<p class=\"base-uri\"><code>{}</code></p>", escape(&base_uri));
        }

        if let Some(Value::Sequence(sections)) = root.get("documentation") {
            for section in sections {
                let heading = scalar(section.get("title")).unwrap_or_default();
                let content = scalar(section.get("content")).unwrap_or_default();
                let _ = writeln!(
                    html,
                    "<section class=\"documentation\">\n<h2>{}</h2>\n<pre>{}</pre>\n</section>",
                    escape(&heading),
                    escape(&content)
                );
            }
        }

        render_resources(&mut html, &root, "", 2);
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

fn render_resources(html: &mut String, node: &Mapping, prefix: &str, level: usize) {
    for (key, value) in node {
        let Some(segment) = key.as_str().filter(|k| k.starts_with('/')) else {
            continue;
        };
        let path = format!("{}{}", prefix, segment);
        let resource = value.as_mapping().cloned().unwrap_or_default();
        let level = level.min(6);

        html.push_str("<section class=\"resource\">\n");
        let _ = writeln!(html, "<h{}>{}</h{}>", level, escape(&path), level);
        if let Some(name) = scalar(resource.get("displayName")) {
            let _ = writeln!(html, "<p class=\"display-name\">{}</p>", escape(&name));
        }
        if let Some(description) = scalar(resource.get("description")) {
            let _ = writeln!(html, "<p>{}</p>", escape(&description));
        }

        for method in METHODS {
            if let Some(doc) = resource.get(method) {
                render_method(html, method, &path, doc);
            }
        }

        render_resources(html, &resource, &path, level + 1);
        html.push_str("</section>\n");
    }
}

fn render_method(html: &mut String, method: &str, path: &str, doc: &Value) {
    let _ = writeln!(
        html,
        "<div class=\"method\">\n<h4><span class=\"verb\">{}</span> {}</h4>",
        method.to_ascii_uppercase(),
        escape(path)
    );
    if let Some(description) = scalar(doc.get("description")) {
        let _ = writeln!(html, "<p>{}</p>", escape(&description));
    }
    if let Some(Value::Sequence(schemes)) = doc.get("securedBy") {
        let names: Vec<String> = schemes.iter().filter_map(|s| scalar(Some(s))).collect();
        let _ = writeln!(
            html,
            "<p class=\"secured-by\">Secured by: {}</p>",
            escape(&names.join(", "))
        );
    }
    if let Some(Value::Mapping(responses)) = doc.get("responses") {
        html.push_str("<dl class=\"responses\">\n");
        for (code, response) in responses {
            let code = scalar(Some(code)).unwrap_or_default();
            let _ = writeln!(html, "<dt>{}</dt>", escape(&code));
            if let Some(description) = scalar(response.get("description")) {
                let _ = writeln!(html, "<dd>{}</dd>", escape(&description));
            }
            if let Some(Value::Mapping(bodies)) = response.get("body") {
                for (content_type, body) in bodies {
                    let content_type = scalar(Some(content_type)).unwrap_or_default();
                    let _ = writeln!(html, "<dd><code>{}</code>", escape(&content_type));
                    if let Some(example) = scalar(body.get("example")) {
                        let _ = write!(html, "<pre>{}</pre>", escape(&example));
                    }
                    html.push_str("</dd>\n");
                }
            }
        }
        html.push_str("</dl>\n");
    }
    html.push_str("</div>\n");
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
