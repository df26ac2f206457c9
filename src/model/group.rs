//! Groups and per-request group lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// A group of the internal identity store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Absolute group path, e.g. `/scim/Members1`
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayed_name: Option<String>,
}

impl Group {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: absolute_path(&path.into()),
            displayed_name: None,
        }
    }

    pub fn with_displayed_name(mut self, displayed_name: impl Into<String>) -> Self {
        self.displayed_name = Some(displayed_name.into());
        self
    }

    /// Last path segment; `/` for the root group.
    pub fn name(&self) -> &str {
        match self.path.rsplit_once('/') {
            Some((_, "")) | None => "/",
            Some((_, name)) => name,
        }
    }

    /// Path of the parent group, `None` for the root group.
    pub fn parent_path(&self) -> Option<String> {
        if self.path == "/" {
            return None;
        }
        match self.path.rsplit_once('/') {
            Some(("", _)) => Some("/".to_string()),
            Some((parent, _)) => Some(parent.to_string()),
            None => None,
        }
    }

    /// Whether this group is `ancestor` itself or lies below it.
    pub fn is_within(&self, ancestor: &str) -> bool {
        let ancestor = absolute_path(ancestor);
        ancestor == "/"
            || self.path == ancestor
            || self
                .path
                .strip_prefix(&ancestor)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Normalize a group path to its absolute form.
///
/// A bare name is rooted (`g2` becomes `/g2`) and a trailing slash is dropped.
pub fn absolute_path(path: &str) -> String {
    let trimmed = path.trim();
    let rooted = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };
    if rooted.len() > 1 {
        rooted.trim_end_matches('/').to_string()
    } else {
        rooted
    }
}

/// Source of group objects, typically backed by the identity store.
pub trait GroupResolver: Send + Sync {
    /// Resolve a group by absolute path.
    fn resolve(&self, path: &str) -> Option<Group>;
}

impl GroupResolver for HashMap<String, Group> {
    fn resolve(&self, path: &str) -> Option<Group> {
        self.get(path).cloned()
    }
}

/// Caching lookup from absolute group path to [`Group`].
///
/// Built once per top-level evaluation and dropped with it, so cached
/// entries never outlive a request.
pub struct GroupProvider {
    resolver: Option<Arc<dyn GroupResolver>>,
    cache: RwLock<HashMap<String, Option<Group>>>,
}

impl GroupProvider {
    /// Create a provider resolving cache misses through `resolver`.
    pub fn new(resolver: Arc<dyn GroupResolver>) -> Self {
        Self {
            resolver: Some(resolver),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a provider holding exactly the given groups.
    pub fn from_groups(groups: impl IntoIterator<Item = Group>) -> Self {
        let cache = groups
            .into_iter()
            .map(|group| (group.path.clone(), Some(group)))
            .collect();
        Self {
            resolver: None,
            cache: RwLock::new(cache),
        }
    }

    /// Provider that resolves nothing.
    pub fn empty() -> Self {
        Self::from_groups(Vec::new())
    }

    /// Look up a group; the path is normalized first.
    pub fn get(&self, path: &str) -> Option<Group> {
        let path = absolute_path(path);
        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = cache.get(&path) {
                return cached.clone();
            }
        }

        let resolved = self.resolver.as_ref().and_then(|r| r.resolve(&path));
        if self.resolver.is_some() {
            let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
            cache.insert(path, resolved.clone());
        }
        resolved
    }
}

impl fmt::Debug for GroupProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.cache.read().map(|c| c.len()).unwrap_or_default();
        f.debug_struct("GroupProvider")
            .field("has_resolver", &self.resolver.is_some())
            .field("cached", &cached)
            .finish()
    }
}
