//! Route Docs - API documentation assembled from a running server's routes.
//!
//! The library reconciles the flat list of routes a web server has registered
//! with hand-written annotations and documentation fragments, and produces a
//! single RAML document that is rendered to HTML and served from memory.
//!
//! # Architecture
//!
//! 1. [`path`] - Canonicalizes `:param` path segments to `{param}`
//! 2. [`routes`] - Route snapshots and the [`routes::ServiceMap`] built from them
//! 3. [`annotation`] - Registration and lookup of per-endpoint documentation
//! 4. [`loader`] - Locates documentation fragments and fills in template variables
//! 5. [`snippet`] - Renders the RAML for a single endpoint
//! 6. [`assembler`] - Nests the discovered paths into a resource outline
//! 7. [`builder`] - Runs a build pass and owns the served document
//! 8. [`render`] - Turns the RAML into HTML
//! 9. [`server`] - Serves the rendered document over HTTP
//!
//! # Example Usage
//!
//! ```no_run
//! use route_docs::{
//!     annotation::{AnnotationRecord, AnnotationRegistry, ResponseSpec},
//!     builder::DocsService,
//!     config::DocsConfig,
//!     render::HtmlRenderer,
//!     routes::{HttpMethod, Route},
//! };
//!
//! // Registration phase
//! let mut registry = AnnotationRegistry::new();
//! registry.get(
//!     "/i/:identity",
//!     AnnotationRecord::described("Get an identity.")
//!         .response("200", ResponseSpec::description("Success")),
//! );
//!
//! // Build once the router is ready
//! let service = DocsService::initialize(DocsConfig::default(), registry.freeze(), HtmlRenderer)?;
//! let routes = vec![Route::new("/i/:identity", vec![HttpMethod::Get])];
//! service.rebuild(&routes)?;
//!
//! // Serve the cached HTML
//! println!("{}", service.serve());
//! # Ok::<(), route_docs::error::Error>(())
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod annotation;
pub mod assembler;
pub mod builder;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod path;
pub mod render;
pub mod routes;
pub mod server;
pub mod snippet;
