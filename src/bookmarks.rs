use std::collections::BTreeMap;

use crate::viewer::ViewError;

/// Session bookmarks: unique name to 0-based page index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bookmarks {
    entries: BTreeMap<String, usize>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: &str, page: usize) -> Result<Self, ViewError> {
        let name = normalize(name)?;
        if self.entries.contains_key(name) {
            return Err(ViewError::DuplicateBookmark(name.to_string()));
        }
        let mut next = self.clone();
        next.entries.insert(name.to_string(), page);
        Ok(next)
    }

    pub fn remove(&self, name: &str) -> Result<Self, ViewError> {
        let name = normalize(name)?;
        if !self.entries.contains_key(name) {
            return Err(ViewError::UnknownBookmark(name.to_string()));
        }
        let mut next = self.clone();
        next.entries.remove(name);
        Ok(next)
    }

    pub fn get(&self, name: &str) -> Result<usize, ViewError> {
        let name = normalize(name)?;
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| ViewError::UnknownBookmark(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, page)| (name.as_str(), *page))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(name: &str) -> Result<&str, ViewError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ViewError::EmptyBookmarkName)
    } else {
        Ok(trimmed)
    }
}
