use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Loads documentation fragments from an ordered list of directories.
///
/// The first directory holding a readable file with the requested name wins.
/// `{{var}}` placeholders in the loaded text are replaced with the configured
/// template variables.
///
/// # Example
///
/// ```no_run
/// use indexmap::IndexMap;
/// use route_docs::loader::FragmentLoader;
/// use std::path::PathBuf;
///
/// let mut vars = IndexMap::new();
/// vars.insert("brand".to_string(), "Example".to_string());
/// let loader = FragmentLoader::new(vec![PathBuf::from("docs")], vars);
/// let text = loader.load("authentication.md").unwrap();
/// println!("{}", text);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FragmentLoader {
    search_paths: Vec<PathBuf>,
    vars: IndexMap<String, String>,
}

impl FragmentLoader {
    pub fn new(search_paths: Vec<PathBuf>, vars: IndexMap<String, String>) -> Self {
        Self { search_paths, vars }
    }

    /// Loads `section` from the first search path holding a readable copy.
    ///
    /// Candidates the process may not open are passed over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no search path holds a readable file, or
    /// [`Error::NotReadable`] if the chosen file fails while being read.
    pub fn load(&self, section: &str) -> Result<String> {
        let candidates: Vec<PathBuf> = self
            .search_paths
            .iter()
            .map(|dir| dir.join(section))
            .collect();

        for file in candidates.iter().filter(|c| c.is_file()) {
            match fs::read_to_string(file) {
                Ok(text) => {
                    debug!("Loaded documentation fragment {}", file.display());
                    return Ok(self.substitute(text));
                }
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                    debug!("Skipping unreadable fragment {}", file.display());
                }
                Err(source) => {
                    return Err(Error::NotReadable {
                        file: file.clone(),
                        source,
                    })
                }
            }
        }

        Err(Error::NotFound {
            section: section.to_string(),
            candidates,
        })
    }

    /// Replaces every `{{key}}` occurrence, one variable at a time, in
    /// configuration order.
    fn substitute(&self, mut text: String) -> String {
        for (key, value) in &self.vars {
            let placeholder = format!("{{{{{}}}}}", key);
            if text.contains(&placeholder) {
                text = text.replace(&placeholder, value);
            }
        }
        text
    }
}
