use alloc::sync::Arc;

use vc_object::{ClassDef, DirectiveSet};

use crate::cache::{Cache, MemoryCache};

/// Cached, inheritance-resolved directive lookups.
///
/// Keys are `Class`, `Class::property` and `Class::method()`. With a
/// persistent tier the resolved sets survive the process.
pub struct DirectiveReader {
    cache: Arc<dyn Cache<DirectiveSet>>,
}

impl Default for DirectiveReader {
    #[inline]
    fn default() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }
}

impl DirectiveReader {
    #[inline]
    pub fn new(cache: Arc<dyn Cache<DirectiveSet>>) -> Self {
        Self { cache }
    }

    fn cached(&self, key: &str, resolve: impl FnOnce() -> DirectiveSet) -> DirectiveSet {
        if let Some(set) = self.cache.get(key) {
            return set;
        }
        let set = resolve();
        self.cache.set(key, set.clone());
        set
    }

    pub fn class_directives(&self, class: &ClassDef) -> DirectiveSet {
        self.cached(class.name(), || class.class_directives())
    }

    pub fn property_directives(&self, class: &ClassDef, property: &str) -> DirectiveSet {
        let key = alloc::format!("{}::{property}", class.name());
        self.cached(&key, || class.property_directives(property))
    }

    pub fn method_directives(&self, class: &ClassDef, method: &str) -> DirectiveSet {
        let key = alloc::format!("{}::{method}()", class.name());
        self.cached(&key, || class.method_directives(method))
    }
}
