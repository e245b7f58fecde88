use crate::annotation::AnnotationRegistry;
use crate::builder::DocsService;
use crate::config::DocsConfig;
use crate::render::HtmlRenderer;
use crate::routes::RouteTable;
use crate::server;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Route Docs - Build browsable API documentation from a server's route table
#[derive(Parser, Debug)]
#[command(name = "route-docs")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Route table (YAML or JSON) listing the server's registered routes
    #[arg(short = 'r', long = "routes", value_name = "FILE")]
    pub routes_path: PathBuf,

    /// Documentation settings (YAML or JSON); built-in defaults when omitted
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Annotation files, applied in order (later entries win)
    #[arg(short = 'a', long = "annotations", value_name = "FILE")]
    pub annotation_paths: Vec<PathBuf>,

    /// Write the rendered HTML here (stdout when neither this nor --serve is given)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Also write the assembled RAML source here
    #[arg(long = "source-output", value_name = "FILE")]
    pub source_output: Option<PathBuf>,

    /// Serve the documentation at GET /docs after building
    #[arg(short = 's', long = "serve")]
    pub serve: bool,

    /// Listen address for --serve (overrides the config file)
    #[arg(short = 'b', long = "bind", value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.routes_path.is_file() {
        anyhow::bail!("Route table does not exist: {}", args.routes_path.display());
    }
    for path in &args.annotation_paths {
        if !path.is_file() {
            anyhow::bail!("Annotation file does not exist: {}", path.display());
        }
    }

    info!("Route table: {}", args.routes_path.display());
    match &args.config_path {
        Some(config) => info!("Config: {}", config.display()),
        None => info!("Config: built-in defaults"),
    }
    info!("Annotation files: {}", args.annotation_paths.len());

    Ok(args)
}

/// Loads the documentation settings, applying command-line overrides.
pub fn load_config(args: &CliArgs) -> Result<DocsConfig> {
    let mut config = match &args.config_path {
        Some(path) => DocsConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DocsConfig::default(),
    };

    if let Some(source_output) = &args.source_output {
        config.persist_source = Some(source_output.clone());
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    Ok(config)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    // Step 1: Settings
    let config = load_config(&args)?;
    let bind = config.bind;

    // Step 2: Annotations (registration phase, then frozen)
    let mut registry = AnnotationRegistry::new();
    for path in &args.annotation_paths {
        registry
            .load_file(path)
            .with_context(|| format!("Failed to load annotations: {}", path.display()))?;
    }
    let annotations = registry.freeze();
    info!("Loaded {} endpoint annotations", annotations.len());

    // Step 3: Route snapshot
    let routes = RouteTable::from_file(&args.routes_path)
        .with_context(|| format!("Failed to load route table: {}", args.routes_path.display()))?;
    info!("Loaded {} route registrations", routes.routes.len());

    // Step 4: Build
    let service = DocsService::initialize(config, annotations, HtmlRenderer)?;
    let built = service.rebuild(&routes);

    if args.serve {
        if let Err(e) = &built {
            warn!("Serving without documentation: {}", e);
        }
        let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
        runtime
            .block_on(server::serve(bind, service.rendered()))
            .with_context(|| format!("Documentation server on {} failed", bind))?;
        return Ok(());
    }

    built.context("Failed to build API documentation")?;
    let html = service.serve();

    // Step 5: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&html, output_path)?;
        info!("Successfully wrote API documentation to {}", output_path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
