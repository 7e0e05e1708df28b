use classglob_resource::Resource;
use indexmap::IndexSet;
use serde::Serialize;

/// A root whose scan failed during aggregated discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRoot {
    pub root: String,
    pub reason: String,
}

/// De-duplicated, insertion-ordered discovery result
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    resources: IndexSet<Resource>,
    skipped: Vec<SkippedRoot>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; returns `false` when an equal handle is already present.
    pub fn insert(&mut self, resource: Resource) -> bool {
        self.resources.insert(resource)
    }

    pub fn contains(&self, resource: &Resource) -> bool {
        self.resources.contains(resource)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn first(&self) -> Option<&Resource> {
        self.resources.first()
    }

    /// Roots that failed and were left out during aggregated discovery
    pub fn skipped(&self) -> &[SkippedRoot] {
        &self.skipped
    }

    pub(crate) fn record_skipped(&mut self, root: String, reason: String) {
        self.skipped.push(SkippedRoot { root, reason });
    }

    /// Merge another set, keeping this set's order first
    pub fn merge(&mut self, other: ResourceSet) {
        self.resources.extend(other.resources);
        self.skipped.extend(other.skipped);
    }

    /// Filenames of every resource, for quick assertions and logging
    pub fn filenames(&self) -> Vec<String> {
        self.resources.iter().filter_map(Resource::filename).collect()
    }

    pub fn into_vec(self) -> Vec<Resource> {
        self.resources.into_iter().collect()
    }
}

impl Extend<Resource> for ResourceSet {
    fn extend<I: IntoIterator<Item = Resource>>(&mut self, iter: I) {
        self.resources.extend(iter);
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
            skipped: Vec::new(),
        }
    }
}

impl IntoIterator for ResourceSet {
    type Item = Resource;
    type IntoIter = indexmap::set::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceSet {
    type Item = &'a Resource;
    type IntoIter = indexmap::set::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
