//! Hand-written endpoint documentation.
//!
//! Annotations are collected into an [`AnnotationRegistry`] during start-up and
//! then frozen into read-only [`Annotations`] that the renderer consults.
//!
//! # Example
//!
//! ```
//! use route_docs::annotation::{AnnotationRecord, AnnotationRegistry};
//! use route_docs::routes::HttpMethod;
//!
//! let mut registry = AnnotationRegistry::new();
//! registry.get("/i/:identity", AnnotationRecord::described("Get an identity."));
//! let annotations = registry.freeze();
//!
//! assert!(annotations.lookup(HttpMethod::Get, "/i/{identity}").is_some());
//! ```

use crate::error::Result;
use crate::path::normalize;
use crate::routes::HttpMethod;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Documentation for one (method, path) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Security schemes guarding the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secured_by: Option<Vec<String>>,
    /// Omit the method header line; fields are emitted at the caller's indent
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide: bool,
    /// Response documentation keyed by status code
    #[serde(
        default,
        deserialize_with = "status_codes",
        skip_serializing_if = "Option::is_none"
    )]
    pub responses: Option<BTreeMap<String, ResponseSpec>>,
}

impl AnnotationRecord {
    /// A record carrying only a description.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn secured_by(mut self, schemes: &[&str]) -> Self {
        self.secured_by = Some(schemes.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn response(mut self, code: impl Into<String>, spec: ResponseSpec) -> Self {
        self.responses
            .get_or_insert_with(BTreeMap::new)
            .insert(code.into(), spec);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }
}

/// Documentation for one response status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseSpec {
    /// Plain description of the response
    Description(String),
    /// Bodies keyed by content type, in declaration order
    Bodies(IndexMap<String, BodySpec>),
    /// Explicitly empty; nothing is emitted under the code
    Empty,
}

impl ResponseSpec {
    pub fn description(text: impl Into<String>) -> Self {
        ResponseSpec::Description(text.into())
    }

    /// A single-body response with an example file reference.
    pub fn example(content_type: impl Into<String>, file: impl Into<String>) -> Self {
        let mut bodies = IndexMap::new();
        bodies.insert(
            content_type.into(),
            BodySpec {
                description: None,
                example: Some(file.into()),
            },
        );
        ResponseSpec::Bodies(bodies)
    }
}

/// One response body for a content type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name of an example payload file, resolved through the fragment loader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

// YAML reads `200:` as an integer key, JSON as a string key.
fn status_codes<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<BTreeMap<String, ResponseSpec>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize, PartialEq, Eq, Hash)]
    #[serde(untagged)]
    enum Code {
        Number(u64),
        Text(String),
    }

    let raw: Option<IndexMap<Code, ResponseSpec>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|codes| {
        codes
            .into_iter()
            .map(|(code, spec)| {
                let code = match code {
                    Code::Number(n) => n.to_string(),
                    Code::Text(s) => s,
                };
                (code, spec)
            })
            .collect()
    }))
}

type MethodTable = HashMap<HttpMethod, HashMap<String, AnnotationRecord>>;

/// Registration-phase store of annotations.
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    docs: MethodTable,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `(method, normalize(raw_path))`.
    ///
    /// A later registration for the same key replaces the earlier one.
    pub fn register(
        &mut self,
        method: HttpMethod,
        raw_path: &str,
        record: AnnotationRecord,
    ) -> &mut Self {
        let path = normalize(raw_path);
        debug!("Registering documentation for {} {}", method, path);
        self.docs.entry(method).or_default().insert(path, record);
        self
    }

    pub fn get(&mut self, raw_path: &str, record: AnnotationRecord) -> &mut Self {
        self.register(HttpMethod::Get, raw_path, record)
    }

    pub fn post(&mut self, raw_path: &str, record: AnnotationRecord) -> &mut Self {
        self.register(HttpMethod::Post, raw_path, record)
    }

    pub fn put(&mut self, raw_path: &str, record: AnnotationRecord) -> &mut Self {
        self.register(HttpMethod::Put, raw_path, record)
    }

    pub fn patch(&mut self, raw_path: &str, record: AnnotationRecord) -> &mut Self {
        self.register(HttpMethod::Patch, raw_path, record)
    }

    pub fn delete(&mut self, raw_path: &str, record: AnnotationRecord) -> &mut Self {
        self.register(HttpMethod::Delete, raw_path, record)
    }

    pub fn options(&mut self, raw_path: &str, record: AnnotationRecord) -> &mut Self {
        self.register(HttpMethod::Options, raw_path, record)
    }

    /// Registers every record of an annotation file.
    ///
    /// The file maps method names to raw paths to records:
    ///
    /// ```yaml
    /// get:
    ///   /i/:identity:
    ///     description: Get an identity.
    ///     responses:
    ///       200: Success
    /// ```
    pub fn load_file(&mut self, path: &Path) -> Result<&mut Self> {
        debug!("Loading annotations from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let file: IndexMap<HttpMethod, IndexMap<String, AnnotationRecord>> =
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                serde_json::from_str(&content)?
            } else {
                serde_yaml::from_str(&content)?
            };

        for (method, records) in file {
            for (raw_path, record) in records {
                self.register(method, &raw_path, record);
            }
        }
        Ok(self)
    }

    /// Ends the registration phase.
    pub fn freeze(self) -> Annotations {
        Annotations { docs: self.docs }
    }
}

/// Read-only annotations, keyed by method and canonical path.
#[derive(Debug, Default)]
pub struct Annotations {
    docs: MethodTable,
}

impl Annotations {
    pub fn lookup(&self, method: HttpMethod, canonical_path: &str) -> Option<&AnnotationRecord> {
        self.docs.get(&method)?.get(canonical_path)
    }

    pub fn len(&self) -> usize {
        self.docs.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
