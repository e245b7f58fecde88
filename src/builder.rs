//! Document assembly and the documentation service lifecycle.
//!
//! A build pass runs strictly in order: load the preamble sections, lay out
//! the resource tree, then hand the finished RAML to the renderer. Only a
//! fully successful pass replaces the served document.

use crate::annotation::Annotations;
use crate::assembler::{CategoryMap, RouteTreeAssembler};
use crate::cache::RenderedDocs;
use crate::config::DocsConfig;
use crate::error::Result;
use crate::loader::FragmentLoader;
use crate::render::Renderer;
use crate::routes::{RouteSource, ServiceMap};
use crate::snippet::SnippetRenderer;
use log::{debug, error, info, warn};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Indent of markdown content inside a `documentation` entry.
const CONTENT_INDENT: &str = "\n     ";

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"(?m)^#{1,6}[ \t]+(.*?)[ \t]*$").expect("valid regex"))
}

/// Stitches the configured sections together.
///
/// Markdown sections (`.md`) become entries of a single `documentation` list;
/// anything else is taken to be a RAML snippet and appended verbatim.
pub fn load_preamble(loader: &FragmentLoader, sections: &[String]) -> Result<String> {
    let mut raml = String::new();
    let mut documentation_started = false;

    for section in sections {
        let text = loader.load(section)?;

        if section.ends_with(".md") {
            if !documentation_started {
                raml.push_str("documentation:\n");
                documentation_started = true;
            }
            raml.push_str(&markdown_section(section, &text));
        } else {
            raml.push_str(&text);
        }
    }

    Ok(raml)
}

/// Formats one markdown file as a `documentation` entry.
///
/// The title is the first heading in the file (the section name if there is
/// none). The file's first line is dropped from the content.
pub fn markdown_section(section: &str, text: &str) -> String {
    let title = heading_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(section);
    let body = text
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or("")
        .trim_end_matches('\n');

    format!(
        " - title: {}\n   content: |{}{}\n",
        title,
        CONTENT_INDENT,
        body.replace('\n', CONTENT_INDENT)
    )
}

/// Builds, renders and serves the API documentation.
///
/// The host wires it up explicitly: [`DocsService::initialize`] once the
/// annotations are registered, [`DocsService::rebuild`] when the router is
/// ready (or reconfigured), and [`DocsService::serve`] per request.
pub struct DocsService {
    config: DocsConfig,
    annotations: Annotations,
    loader: FragmentLoader,
    categories: CategoryMap,
    renderer: Box<dyn Renderer>,
    rendered: Arc<RenderedDocs>,
    building: AtomicBool,
}

impl DocsService {
    pub fn initialize(
        config: DocsConfig,
        annotations: Annotations,
        renderer: impl Renderer + 'static,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            "Documentation service ready: {} annotations, {} sections",
            annotations.len(),
            config.sections.len()
        );

        Ok(Self {
            loader: config.loader(),
            categories: config.category_map(),
            config,
            annotations,
            renderer: Box::new(renderer),
            rendered: Arc::new(RenderedDocs::new()),
            building: AtomicBool::new(false),
        })
    }

    /// Assembles the RAML source for the given routes.
    pub fn build_document(&self, services: &ServiceMap) -> Result<String> {
        let mut raml = load_preamble(&self.loader, &self.config.sections)?;

        let snippets =
            SnippetRenderer::new(&self.annotations, &self.loader, &self.config.example_extensions);
        let outline = RouteTreeAssembler::new(&snippets, &self.categories)
            .ignoring(&self.config.ignore)
            .assemble(services, &mut raml)?;
        debug!("Assembled {} resources into {} bytes", outline.len(), raml.len());

        Ok(raml)
    }

    /// Runs a full build pass over a route snapshot.
    ///
    /// Returns `Ok(false)` without doing anything if another pass is already
    /// running. On failure the previously rendered document stays in place.
    pub fn rebuild<S: RouteSource + ?Sized>(&self, source: &S) -> Result<bool> {
        if self.building.swap(true, Ordering::AcqRel) {
            info!("Documentation build already in progress, ignoring trigger");
            return Ok(false);
        }

        let result = self.run_build(source);
        self.building.store(false, Ordering::Release);
        result.map(|_| true)
    }

    fn run_build<S: RouteSource + ?Sized>(&self, source: &S) -> Result<()> {
        let services = ServiceMap::discover(source, &self.config.ignore);

        let raml = self.build_document(&services).map_err(|e| {
            error!("Failed to build REST API documentation: {}", e);
            e
        })?;

        match self.renderer.render(&raml) {
            Ok(html) => {
                self.rendered.replace(html);
                info!("REST API documentation rebuilt ({} endpoints)", services.len());
                if let Some(path) = &self.config.persist_source {
                    if let Err(e) = fs::write(path, &raml) {
                        warn!("Failed to persist documentation source {}: {}", path.display(), e);
                    }
                }
                Ok(())
            }
            Err(e) => {
                let diagnostic = self.diagnostic_path();
                match fs::write(&diagnostic, &raml) {
                    Ok(()) => error!(
                        "Failed to render REST API documentation, source saved to {}: {}",
                        diagnostic.display(),
                        e
                    ),
                    Err(write_err) => error!(
                        "Failed to render REST API documentation: {} (could not save source: {})",
                        e, write_err
                    ),
                }
                Err(e)
            }
        }
    }

    /// Location of the source kept after a failed render.
    pub fn diagnostic_path(&self) -> PathBuf {
        self.config
            .diagnostics_dir()
            .join(format!("route-docs-{}.raml", std::process::id()))
    }

    /// The current rendered document; empty until a build succeeds.
    pub fn serve(&self) -> Arc<String> {
        self.rendered.load()
    }

    /// Shared handle to the rendered document, for the HTTP layer.
    pub fn rendered(&self) -> Arc<RenderedDocs> {
        Arc::clone(&self.rendered)
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }
}
