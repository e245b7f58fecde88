//! Hierarchical resource outline.
//!
//! RAML nests resources by path: `/i` contains `/{identity}`, which contains
//! `/keys`, and so on. The router only reports flat paths, and intermediate
//! segments are often never registered themselves, so the assembler works out
//! the nesting and inserts bare structural nodes where a level is missing.
//!
//! Assembly runs in two phases:
//!
//! 1. [`plan_outline`] walks the sorted endpoint keys and decides, for every
//!    node, its parent, its indent depth and its heading text.
//! 2. [`RouteTreeAssembler::assemble`] writes those nodes out, adding
//!    category labels and one snippet (or stub) per documented method.

use crate::error::Result;
use crate::path::{ancestors_between, normalize, segment_count};
use crate::routes::{HttpMethod, ServiceMap};
use crate::snippet::SnippetRenderer;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Section titles for structural paths, keyed by canonical path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    labels: BTreeMap<String, String>,
}

impl CategoryMap {
    /// Builds a category map, normalizing every key.
    pub fn new<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|(k, v)| (normalize(k.as_ref()), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }
}

/// One resource heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    /// Full canonical path of the node
    pub key: String,
    /// Indent depth, in two-space steps
    pub depth: usize,
    /// Text written before the colon, relative to the parent
    pub heading: String,
    /// Inserted for a level that no route or category names
    pub synthetic: bool,
}

impl OutlineNode {
    fn new(key: &str, parent: Option<&str>, synthetic: bool) -> Self {
        let parent = parent.unwrap_or("");
        Self {
            key: key.to_string(),
            depth: segment_count(parent),
            heading: key[parent.len()..].to_string(),
            synthetic,
        }
    }

    pub fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

/// Sorted union of discovered paths and category paths.
pub fn endpoint_keys(services: &ServiceMap, categories: &CategoryMap) -> Vec<String> {
    services
        .keys()
        .chain(categories.keys())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `candidate` is a prefix of `key` ending at a segment boundary.
fn is_ancestor(candidate: &str, key: &str) -> bool {
    key.strip_prefix(candidate)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Lays out `keys` (already sorted) as an outline.
///
/// The parent of a key is the nearest already-emitted node, scanning back in
/// emission order, whose path is a segment-aligned prefix of the key. Levels
/// between that parent (or the root, if none matched) and the key are
/// synthesized as structural nodes directly before the key.
///
/// Paths in `ignored` are never emitted, neither as keys nor as synthesized
/// levels. A descendant of an ignored level hangs off the nearest emitted
/// ancestor with a multi-segment heading.
pub fn plan_outline(keys: &[String], ignored: &BTreeSet<String>) -> Vec<OutlineNode> {
    let mut emitted: Vec<OutlineNode> = Vec::with_capacity(keys.len());

    for key in keys.iter().filter(|k| !ignored.contains(*k)) {
        let mut parent = emitted
            .iter()
            .rev()
            .map(|node| node.key.clone())
            .find(|candidate| is_ancestor(candidate, key));

        let missing_levels = ancestors_between(key, parent.as_deref())
            .into_iter()
            .filter(|missing| !ignored.contains(missing));
        for missing in missing_levels {
            debug!("Synthesizing parent resource {} for {}", missing, key);
            emitted.push(OutlineNode::new(&missing, parent.as_deref(), true));
            parent = Some(missing);
        }

        emitted.push(OutlineNode::new(key, parent.as_deref(), false));
    }

    emitted
}

/// What was written for one method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MethodOutcome {
    Rendered,
    Stubbed,
    Skipped,
}

/// Writes the resource outline for a set of discovered routes.
pub struct RouteTreeAssembler<'a> {
    snippets: &'a SnippetRenderer<'a>,
    categories: &'a CategoryMap,
    ignored: BTreeSet<String>,
}

impl<'a> RouteTreeAssembler<'a> {
    pub fn new(snippets: &'a SnippetRenderer<'a>, categories: &'a CategoryMap) -> Self {
        Self {
            snippets,
            categories,
            ignored: BTreeSet::new(),
        }
    }

    /// Keeps `paths` (raw or canonical) out of the outline.
    pub fn ignoring(mut self, paths: &[String]) -> Self {
        self.ignored = paths.iter().map(|p| normalize(p)).collect();
        self
    }

    /// Appends the outline for `services` to `raml`.
    ///
    /// Endpoints without an annotation get an `undocumented` stub (OPTIONS
    /// handlers are skipped silently). Any other snippet failure aborts the
    /// assembly.
    pub fn assemble(&self, services: &ServiceMap, raml: &mut String) -> Result<Vec<OutlineNode>> {
        let keys = endpoint_keys(services, self.categories);
        let outline = plan_outline(&keys, &self.ignored);
        debug!(
            "Assembling {} resources ({} synthesized)",
            outline.len(),
            outline.iter().filter(|n| n.synthetic).count()
        );

        for node in &outline {
            let indent = node.indent();
            raml.push_str(&format!("{}{}:\n", indent, node.heading));

            if node.synthetic {
                continue;
            }

            if let Some(label) = self.categories.get(&node.key) {
                raml.push_str(&format!("{}  displayName: {}\n", indent, label));
            }

            let Some(routes) = services.get(&node.key) else {
                continue;
            };

            let method_indent = format!("{}  ", indent);
            for route in routes {
                for &method in &route.methods {
                    let outcome = self.push_method(raml, method, &node.key, &method_indent)?;
                    debug!("{} {}: {:?}", method, node.key, outcome);
                }
            }
        }

        Ok(outline)
    }

    fn push_method(
        &self,
        raml: &mut String,
        method: HttpMethod,
        key: &str,
        indent: &str,
    ) -> Result<MethodOutcome> {
        match self.snippets.render(method, key, indent) {
            Ok(snippet) => {
                raml.push_str(&snippet);
                Ok(MethodOutcome::Rendered)
            }
            Err(e) if e.is_no_documentation() => {
                if method == HttpMethod::Options {
                    return Ok(MethodOutcome::Skipped);
                }
                warn!("No REST API documentation exists for {} {}", method, key);
                raml.push_str(&format!(
                    "{}{}:\n{}  description: undocumented\n",
                    indent, method, indent
                ));
                Ok(MethodOutcome::Stubbed)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationRecord, AnnotationRegistry, ResponseSpec};
    use crate::error::Error;
    use crate::loader::FragmentLoader;
    use crate::routes::Route;
    use pretty_assertions::assert_eq;

    fn keys(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn summary(outline: &[OutlineNode]) -> Vec<(String, usize, String, bool)> {
        outline
            .iter()
            .map(|n| (n.key.clone(), n.depth, n.heading.clone(), n.synthetic))
            .collect()
    }

    fn node(
        key: &str,
        depth: usize,
        heading: &str,
        synthetic: bool,
    ) -> (String, usize, String, bool) {
        (key.to_string(), depth, heading.to_string(), synthetic)
    }

    fn plan(paths: &[&str]) -> Vec<OutlineNode> {
        plan_outline(&keys(paths), &BTreeSet::new())
    }

    #[test]
    fn test_plan_nests_registered_children() {
        let outline = plan(&["/i", "/i/{identity}", "/i/{identity}/keys"]);
        assert_eq!(
            summary(&outline),
            vec![
                node("/i", 0, "/i", false),
                node("/i/{identity}", 1, "/{identity}", false),
                node("/i/{identity}/keys", 2, "/keys", false),
            ]
        );
    }

    #[test]
    fn test_plan_synthesizes_missing_root_ancestors() {
        let outline = plan(&["/a/b/c"]);
        assert_eq!(
            summary(&outline),
            vec![
                node("/a", 0, "/a", true),
                node("/a/b", 1, "/b", true),
                node("/a/b/c", 2, "/c", false),
            ]
        );
    }

    #[test]
    fn test_plan_fills_gap_below_matched_parent() {
        let outline = plan(&["/i", "/i/{identity}/keys/{key}"]);
        assert_eq!(
            summary(&outline),
            vec![
                node("/i", 0, "/i", false),
                node("/i/{identity}", 1, "/{identity}", true),
                node("/i/{identity}/keys", 2, "/keys", true),
                node("/i/{identity}/keys/{key}", 3, "/{key}", false),
            ]
        );
    }

    #[test]
    fn test_plan_reuses_synthesized_parents() {
        let outline = plan(&["/a/b/c", "/a/b/d"]);
        assert_eq!(
            summary(&outline),
            vec![
                node("/a", 0, "/a", true),
                node("/a/b", 1, "/b", true),
                node("/a/b/c", 2, "/c", false),
                node("/a/b/d", 2, "/d", false),
            ]
        );
    }

    #[test]
    fn test_plan_rejects_partial_segment_prefix() {
        let outline = plan(&["/id", "/ident", "/ident/x"]);
        assert_eq!(
            summary(&outline),
            vec![
                node("/id", 0, "/id", false),
                node("/ident", 0, "/ident", false),
                node("/ident/x", 1, "/x", false),
            ]
        );
    }

    #[test]
    fn test_plan_one_heading_per_key_and_parents_first() {
        let input = keys(&[
            "/.well-known/identity",
            "/i",
            "/i/{identity}/keys",
            "/i/{identity}/keys/{key}",
            "/identifier/{id}",
            "/session/login",
            "/session/logout",
        ]);
        let outline = plan_outline(&input, &BTreeSet::new());

        let unique: BTreeSet<&str> = outline.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(unique.len(), outline.len());
        for key in &input {
            assert!(unique.contains(key.as_str()));
        }

        for (pos, n) in outline.iter().enumerate() {
            for descendant in outline.iter().filter(|d| is_ancestor(&n.key, &d.key)) {
                let dpos = outline.iter().position(|x| x.key == descendant.key).unwrap();
                assert!(pos < dpos, "{} must precede {}", n.key, descendant.key);
            }
        }
    }

    fn assemble_with(
        registry: AnnotationRegistry,
        routes: Vec<Route>,
        categories: CategoryMap,
    ) -> Result<String> {
        let annotations = registry.freeze();
        let loader = FragmentLoader::default();
        let exts = vec!["jsonld".to_string()];
        let snippets = SnippetRenderer::new(&annotations, &loader, &exts);
        let services = ServiceMap::discover(&routes, &[]);

        let mut raml = String::new();
        RouteTreeAssembler::new(&snippets, &categories).assemble(&services, &mut raml)?;
        Ok(raml)
    }

    #[test]
    fn test_assemble_categories_snippets_and_stubs() {
        let mut registry = AnnotationRegistry::new();
        registry.get(
            "/i/:identity",
            AnnotationRecord::described("Get an identity.")
                .response("200", ResponseSpec::description("Success")),
        );

        let routes = vec![
            Route::new("/i/:identity", vec![HttpMethod::Get, HttpMethod::Post]),
            Route::new("/i/:identity", vec![HttpMethod::Options]),
            Route::new("/session/login", vec![HttpMethod::Post]),
        ];
        let categories = CategoryMap::new([
            ("/i", "Identity Services"),
            ("/session", "Session Management"),
        ]);

        let raml = assemble_with(registry, routes, categories).unwrap();
        let expected = concat!(
            "/i:\n",
            "  displayName: Identity Services\n",
            "  /{identity}:\n",
            "    get:\n",
            "      description: Get an identity.\n",
            "      responses:\n",
            "        200:\n",
            "          description: Success\n",
            "    post:\n",
            "      description: undocumented\n",
            "/session:\n",
            "  displayName: Session Management\n",
            "  /login:\n",
            "    post:\n",
            "      description: undocumented\n",
        );
        assert_eq!(raml, expected);
    }

    #[test]
    fn test_assemble_category_with_routes_lists_methods() {
        let routes = vec![Route::new("/session", vec![HttpMethod::Get])];
        let categories = CategoryMap::new([("/session", "Session Management")]);

        let raml = assemble_with(AnnotationRegistry::new(), routes, categories).unwrap();
        assert_eq!(
            raml,
            "/session:\n  displayName: Session Management\n  get:\n    description: undocumented\n"
        );
    }

    #[test]
    fn test_assemble_synthesized_nodes_are_bare() {
        let routes = vec![Route::new("/a/b/:c", vec![HttpMethod::Delete])];
        let raml =
            assemble_with(AnnotationRegistry::new(), routes, CategoryMap::default()).unwrap();
        assert_eq!(
            raml,
            "/a:\n  /b:\n    /{c}:\n      delete:\n        description: undocumented\n"
        );
    }

    #[test]
    fn test_assemble_propagates_example_failures() {
        let mut registry = AnnotationRegistry::new();
        registry.get(
            "/x",
            AnnotationRecord::default()
                .response("200", ResponseSpec::example("application/ld+json", "x.jsonld")),
        );
        let routes = vec![Route::new("/x", vec![HttpMethod::Get])];

        let err = assemble_with(registry, routes, CategoryMap::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_plan_skips_ignored_levels() {
        let ignored: BTreeSet<String> = ["/i/{identity}/dashboard".to_string()].into();
        let outline = plan_outline(
            &keys(&[
                "/i/{identity}",
                "/i/{identity}/dashboard",
                "/i/{identity}/dashboard/widgets",
            ]),
            &ignored,
        );
        assert_eq!(
            summary(&outline),
            vec![
                node("/i", 0, "/i", true),
                node("/i/{identity}", 1, "/{identity}", false),
                node("/i/{identity}/dashboard/widgets", 2, "/dashboard/widgets", false),
            ]
        );
    }

    #[test]
    fn test_plan_never_synthesizes_ignored_ancestor() {
        let ignored: BTreeSet<String> = ["/a/b".to_string()].into();
        let outline = plan_outline(&keys(&["/a/b/c/d"]), &ignored);
        assert_eq!(
            summary(&outline),
            vec![
                node("/a", 0, "/a", true),
                node("/a/b/c", 1, "/b/c", true),
                node("/a/b/c/d", 2, "/d", false),
            ]
        );
    }

    #[test]
    fn test_assemble_ignoring_raw_paths() {
        let routes = vec![
            Route::new("/i/:identity", vec![HttpMethod::Get]),
            Route::new("/i/:identity/dashboard", vec![HttpMethod::Get]),
            Route::new("/i/:identity/dashboard/widgets", vec![HttpMethod::Get]),
        ];
        let annotations = AnnotationRegistry::new().freeze();
        let loader = FragmentLoader::default();
        let exts = vec!["jsonld".to_string()];
        let snippets = SnippetRenderer::new(&annotations, &loader, &exts);
        let categories = CategoryMap::default();
        let services = ServiceMap::discover(&routes, &[]);

        let mut raml = String::new();
        let outline = RouteTreeAssembler::new(&snippets, &categories)
            .ignoring(&["/i/:identity/dashboard".to_string()])
            .assemble(&services, &mut raml)
            .unwrap();

        assert!(outline.iter().all(|n| n.key != "/i/{identity}/dashboard"));
        assert!(!raml.lines().any(|l| l.trim() == "/dashboard:"));
        assert!(raml.contains("    /dashboard/widgets:\n      get:\n"));
    }

    #[test]
    fn test_undocumented_methods_stub_except_options() {
        let mut registry = AnnotationRegistry::new();
        registry.get("/x", AnnotationRecord::described("Documented."));
        let annotations = registry.freeze();
        let loader = FragmentLoader::default();
        let exts = vec!["jsonld".to_string()];
        let snippets = SnippetRenderer::new(&annotations, &loader, &exts);
        let categories = CategoryMap::default();
        let assembler = RouteTreeAssembler::new(&snippets, &categories);

        let mut raml = String::new();
        let options = assembler
            .push_method(&mut raml, HttpMethod::Options, "/x", "  ")
            .unwrap();
        assert_eq!(options, MethodOutcome::Skipped);
        assert_eq!(raml, "");

        let post = assembler
            .push_method(&mut raml, HttpMethod::Post, "/x", "  ")
            .unwrap();
        assert_eq!(post, MethodOutcome::Stubbed);
        assert_eq!(raml, "  post:\n    description: undocumented\n");

        raml.clear();
        let get = assembler
            .push_method(&mut raml, HttpMethod::Get, "/x", "  ")
            .unwrap();
        assert_eq!(get, MethodOutcome::Rendered);
        assert!(raml.starts_with("  get:\n"));
    }

    #[test]
    fn test_category_keys_are_normalized() {
        let categories = CategoryMap::new([("/i/:identity", "Identity")]);
        assert_eq!(categories.get("/i/{identity}"), Some("Identity"));
    }
}
