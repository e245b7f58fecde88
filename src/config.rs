//! Documentation build settings.
//!
//! Settings are read from a YAML or JSON file; anything left out falls back to
//! the defaults below.
//!
//! ```yaml
//! paths: [docs, vendor/docs]
//! sections: [base.raml, authentication.md]
//! vars:
//!   brand: Acme
//!   baseUri: https://api.example.com
//! categories:
//!   /i: Identity Services
//! ignore: [/, /docs]
//! ```

use crate::assembler::CategoryMap;
use crate::error::{Error, Result};
use crate::loader::FragmentLoader;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DocsConfig {
    /// Directories searched, in order, for sections and example files
    pub paths: Vec<PathBuf>,
    /// Fragments stitched together, in order, ahead of the resource tree
    pub sections: Vec<String>,
    /// `{{var}}` substitutions, applied in the order given
    pub vars: IndexMap<String, String>,
    /// Display names for structural paths
    pub categories: BTreeMap<String, String>,
    /// Paths left out of the documentation
    pub ignore: Vec<String>,
    /// Extensions (without the dot) of example files that get embedded
    pub example_extensions: Vec<String>,
    /// Where to keep a copy of every successfully rendered source
    pub persist_source: Option<PathBuf>,
    /// Where to write the source of a failed render; the system temp
    /// directory when unset
    pub diagnostics_dir: Option<PathBuf>,
    /// Address the documentation server listens on
    pub bind: SocketAddr,
}

impl Default for DocsConfig {
    fn default() -> Self {
        let vars = [("brand", "BRAND"), ("baseUri", "https://localhost")];
        let categories = [
            ("/.well-known", "Service Discovery"),
            ("/i", "Identity Services"),
            ("/identifier", "Identifier Services"),
            ("/session", "Session Management"),
        ];
        let ignore = [
            "/",
            "/about",
            "/contact",
            "/docs",
            "/help",
            "/i/:identity/dashboard",
            "/i/:identity/settings",
            "/join",
            "/legal",
        ];

        Self {
            paths: vec![PathBuf::from("docs")],
            sections: vec![
                "base.raml".to_string(),
                "authentication.md".to_string(),
                "limits.md".to_string(),
            ],
            vars: vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            categories: categories
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ignore: ignore.iter().map(|p| p.to_string()).collect(),
            example_extensions: vec!["jsonld".to_string()],
            persist_source: None,
            diagnostics_dir: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl DocsConfig {
    /// Loads settings, choosing JSON for `.json` files and YAML otherwise.
    ///
    /// Relative search paths are resolved against the directory holding the
    /// file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading documentation config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let mut config: DocsConfig = if path.extension().and_then(|s| s.to_str()) == Some("json")
        {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        if let Some(base) = path.parent() {
            config.paths = config
                .paths
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.paths.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one documentation path is required".to_string(),
            ));
        }
        if self.sections.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::InvalidConfig("section names must not be empty".to_string()));
        }
        if self.example_extensions.iter().any(|e| e.starts_with('.')) {
            return Err(Error::InvalidConfig(
                "example extensions are given without the leading dot".to_string(),
            ));
        }
        Ok(())
    }

    pub fn loader(&self) -> FragmentLoader {
        FragmentLoader::new(self.paths.clone(), self.vars.clone())
    }

    pub fn category_map(&self) -> CategoryMap {
        CategoryMap::new(&self.categories)
    }

    pub fn diagnostics_dir(&self) -> PathBuf {
        self.diagnostics_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
