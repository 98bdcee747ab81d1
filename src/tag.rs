//! Level tag registry.
//!
//! Tags are the one-letter names shown inside the bracketed level section of
//! a record. The mapping is mutable at runtime: a rename is visible to every
//! logger sharing the registry. By default all loggers share the process-wide
//! registry; callers needing isolation construct their own and hand the
//! logger an `Arc` to it.

use crate::level::Level;
use std::sync::{Arc, OnceLock, RwLock};

/// Mutable mapping from [`Level`] to its display tag.
#[derive(Debug)]
pub struct TagRegistry {
    tags: RwLock<[String; 8]>,
}

impl TagRegistry {
    /// Creates a registry with the default one-letter tags.
    #[must_use]
    pub fn new() -> Self {
        let tags = Level::all().map(|lv| lv.default_tag().to_string());
        Self {
            tags: RwLock::new(tags),
        }
    }

    /// Returns the process-wide registry shared by all loggers by default.
    pub fn global() -> &'static Arc<Self> {
        static GLOBAL: OnceLock<Arc<TagRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Self::new()))
    }

    /// Returns the current tag for `level`.
    #[must_use]
    pub fn get(&self, level: Level) -> String {
        let tags = self
            .tags
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tags[level.index()].clone()
    }

    /// Replaces the tag for `level`.
    pub fn rename(&self, level: Level, name: &str) {
        let mut tags = self
            .tags
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tags[level.index()] = name.to_string();
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}
