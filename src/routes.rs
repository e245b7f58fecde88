//! Route discovery input.
//!
//! The host web server is an external collaborator: it only has to hand over a
//! snapshot of registered `(method, path)` pairs through [`RouteSource`]. This
//! module groups that snapshot into a [`ServiceMap`] keyed by canonical path.
//!
//! # Example
//!
//! ```
//! use route_docs::routes::{HttpMethod, Route, ServiceMap};
//!
//! let routes = vec![
//!     Route::new("/i/:identity", vec![HttpMethod::Get]),
//!     Route::new("/i/:identity", vec![HttpMethod::Get]),
//!     Route::new("*", vec![HttpMethod::Get]),
//! ];
//! let map = ServiceMap::discover(&routes, &[]);
//! assert_eq!(map.len(), 1);
//! assert_eq!(map.get("/i/{identity}").unwrap().len(), 1);
//! ```

use crate::error::{Error, Result};
use crate::path::normalize;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Path under which routers register their catch-all handler.
pub const WILDCARD_PATH: &str = "*";

/// HTTP methods that can be documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP OPTIONS method, usually only a CORS preflight handler
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Lowercase name, as used for RAML method keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" => Ok(HttpMethod::Delete),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            other => Err(Error::InvalidConfig(format!("unknown HTTP method: {}", other))),
        }
    }
}

/// A single registration in the host router.
///
/// One registration may answer several methods (e.g. a handler mounted with
/// `all`), which is why `methods` is a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Raw path as registered, possibly with `:name` parameters
    pub path: String,
    /// Methods this registration responds to, in registration order
    #[serde(alias = "method", deserialize_with = "one_or_many")]
    pub methods: Vec<HttpMethod>,
}

impl Route {
    pub fn new(path: impl Into<String>, methods: Vec<HttpMethod>) -> Self {
        Self {
            path: path.into(),
            methods,
        }
    }

    fn method_set(&self) -> BTreeSet<HttpMethod> {
        self.methods.iter().copied().collect()
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<HttpMethod>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(HttpMethod),
        Many(Vec<HttpMethod>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(method) => vec![method],
        OneOrMany::Many(methods) => methods,
    })
}

/// Source of the registered routes of a running server.
pub trait RouteSource {
    /// Returns a snapshot of every registration, in registration order.
    fn routes(&self) -> Vec<Route>;
}

impl RouteSource for Vec<Route> {
    fn routes(&self) -> Vec<Route> {
        self.clone()
    }
}

impl RouteSource for [Route] {
    fn routes(&self) -> Vec<Route> {
        self.to_vec()
    }
}

/// A route snapshot stored on disk, as a YAML or JSON list.
///
/// ```yaml
/// - path: /i/:identity
///   method: get
/// - path: /session
///   methods: [get, post]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    pub routes: Vec<Route>,
}

impl RouteTable {
    /// Loads a route table, choosing JSON for `.json` files and YAML otherwise.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading route table from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }
}

impl RouteSource for RouteTable {
    fn routes(&self) -> Vec<Route> {
        self.routes.clone()
    }
}

/// Discovered routes grouped by canonical path.
///
/// Keys keep first-seen order; the assembler sorts them itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceMap {
    entries: IndexMap<String, Vec<Route>>,
}

impl ServiceMap {
    /// Groups a route snapshot by canonical path.
    ///
    /// The wildcard handler and every (normalized) ignore-list entry are
    /// dropped, and a registration whose method set equals one already kept
    /// for the same canonical path is collapsed into it.
    pub fn discover<S: RouteSource + ?Sized>(source: &S, ignore: &[String]) -> Self {
        let mut entries: IndexMap<String, Vec<Route>> = IndexMap::new();

        for route in source.routes() {
            let key = normalize(&route.path);
            let bucket = entries.entry(key).or_default();
            let methods = route.method_set();
            if bucket.iter().any(|existing| existing.method_set() == methods) {
                debug!("Collapsing duplicate registration for {}", route.path);
                continue;
            }
            bucket.push(route);
        }

        entries.shift_remove(WILDCARD_PATH);
        for ignored in ignore {
            if entries.shift_remove(&normalize(ignored)).is_some() {
                debug!("Ignoring documented path {}", ignored);
            }
        }

        debug!("Discovered {} endpoint paths", entries.len());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&[Route]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
