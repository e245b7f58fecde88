use arc_swap::ArcSwap;
use std::sync::Arc;

/// The most recently rendered documentation.
///
/// Readers get a snapshot without locking; a successful build replaces the
/// whole document at once. Until the first successful build the document is
/// empty.
#[derive(Debug)]
pub struct RenderedDocs {
    current: ArcSwap<String>,
}

impl RenderedDocs {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(String::new()),
        }
    }

    /// Snapshot of the current document.
    pub fn load(&self) -> Arc<String> {
        self.current.load_full()
    }

    /// Publishes a newly rendered document.
    pub fn replace(&self, rendered: String) {
        self.current.store(Arc::new(rendered));
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}

impl Default for RenderedDocs {
    fn default() -> Self {
        Self::new()
    }
}
