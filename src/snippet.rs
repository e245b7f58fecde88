//! Per-endpoint RAML snippets.
//!
//! A snippet documents one method of one resource. It is emitted at the
//! indentation of the enclosing resource and can be spliced directly into
//! the outline document.

use crate::annotation::{Annotations, ResponseSpec};
use crate::error::{Error, Result};
use crate::loader::FragmentLoader;
use crate::routes::HttpMethod;
use log::debug;

/// Offset of example payload lines from the snippet indent.
const EXAMPLE_INDENT: &str = "          ";

/// Renders the annotation for a single endpoint.
pub struct SnippetRenderer<'a> {
    annotations: &'a Annotations,
    loader: &'a FragmentLoader,
    example_extensions: &'a [String],
}

impl<'a> SnippetRenderer<'a> {
    /// Creates a renderer.
    ///
    /// Example references are embedded only when the file name ends in one of
    /// `example_extensions` (given without the leading dot).
    pub fn new(
        annotations: &'a Annotations,
        loader: &'a FragmentLoader,
        example_extensions: &'a [String],
    ) -> Self {
        Self {
            annotations,
            loader,
            example_extensions,
        }
    }

    /// Renders the snippet for `method` on `path` at `indent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDocumentation`] when nothing is registered for the
    /// endpoint, and propagates loader errors for referenced example files.
    pub fn render(&self, method: HttpMethod, path: &str, indent: &str) -> Result<String> {
        let doc = self
            .annotations
            .lookup(method, path)
            .ok_or_else(|| Error::NoDocumentation {
                method: method.to_string(),
                path: path.to_string(),
            })?;

        let mut raml = String::new();
        let mut indent = indent.to_string();

        if !doc.hide {
            raml.push_str(&format!("{}{}:\n", indent, method));
            indent.push_str("  ");
        }

        if let Some(description) = &doc.description {
            raml.push_str(&format!("{}description: {}\n", indent, description));
        }
        if let Some(schemes) = &doc.secured_by {
            raml.push_str(&format!("{}securedBy: [{}]\n", indent, schemes.join(",")));
        }

        let Some(responses) = &doc.responses else {
            return Ok(raml);
        };

        raml.push_str(&format!("{}responses:\n", indent));
        // BTreeMap iteration is ascending by code
        for (code, spec) in responses {
            raml.push_str(&format!("{}  {}:\n", indent, code));

            match spec {
                ResponseSpec::Description(text) if !text.is_empty() => {
                    raml.push_str(&format!("{}    description: {}\n", indent, text));
                }
                ResponseSpec::Bodies(bodies) if !bodies.is_empty() => {
                    raml.push_str(&format!("{}    body:\n", indent));
                    for (content_type, body) in bodies {
                        raml.push_str(&format!("{}      {}:\n", indent, content_type));
                        if let Some(description) = &body.description {
                            raml.push_str(&format!(
                                "{}        description: {}\n",
                                indent, description
                            ));
                        }
                        if let Some(example) = &body.example {
                            self.push_example(&mut raml, &indent, example)?;
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(raml)
    }

    fn push_example(&self, raml: &mut String, indent: &str, example: &str) -> Result<()> {
        if !self.is_example_file(example) {
            debug!("Skipping example reference {}", example);
            return Ok(());
        }

        let data = self.loader.load(example)?;
        raml.push_str(&format!("{}        example: |\n", indent));
        for line in data.lines() {
            raml.push_str(indent);
            raml.push_str(EXAMPLE_INDENT);
            raml.push_str(line);
            raml.push('\n');
        }
        Ok(())
    }

    fn is_example_file(&self, name: &str) -> bool {
        self.example_extensions.iter().any(|ext| {
            name.strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.') && stem.len() > 1)
        })
    }
}
