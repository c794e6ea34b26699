//! In-memory collection of named build orders.
//!
//! Order matters: it is the order of the list in the settings tab and the
//! order [`cycle`] walks through.

use crate::build_order::BuildOrder;
use log::warn;

/// Errors from editing the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("unknown build order: {0:?}")]
    Unknown(String),
    #[error("a build order named {0:?} already exists")]
    Duplicate(String),
    #[error("build order name must not be empty")]
    EmptyName,
}

/// Ordered mapping of build-order name to text.
#[derive(Debug, Clone, Default)]
pub struct BuildOrderStore {
    entries: Vec<BuildOrder>,
}

impl BuildOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed entries.  Later duplicates of a name are
    /// dropped (with a warning) so names stay unique.
    pub fn from_entries(entries: impl IntoIterator<Item = BuildOrder>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            if store.position(&entry.name).is_some() {
                warn!("ignoring duplicate build order {:?}", entry.name);
                continue;
            }
            store.entries.push(entry);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All build orders in list order.
    pub fn entries(&self) -> &[BuildOrder] {
        &self.entries
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&BuildOrder> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn get_index(&self, index: usize) -> Option<&BuildOrder> {
        self.entries.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Append an empty build order named `Build order N` and return its name.
    ///
    /// `N` starts at `len + 1` and is bumped until the name is free.
    pub fn add(&mut self) -> String {
        let mut n = self.entries.len() + 1;
        let name = loop {
            let candidate = format!("Build order {}", n);
            if self.position(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };
        self.entries.push(BuildOrder::new(name.clone(), ""));
        name
    }

    /// Remove `name`.  The last remaining build order is never removed;
    /// returns `false` in that case or when `name` is unknown.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        match self.position(name) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        if new.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        let idx = self
            .position(old)
            .ok_or_else(|| StoreError::Unknown(old.to_string()))?;
        if old == new {
            return Ok(());
        }
        if self.position(new).is_some() {
            return Err(StoreError::Duplicate(new.to_string()));
        }
        self.entries[idx].name = new.to_string();
        Ok(())
    }

    pub fn set_text(&mut self, name: &str, text: impl Into<String>) -> Result<(), StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| StoreError::Unknown(name.to_string()))?;
        entry.text = text.into();
        Ok(())
    }
}

/// Name following `current` in `names`, wrapping to the first after the last.
///
/// An unknown `current` yields the first name; an empty list yields `None`.
pub fn cycle(names: &[String], current: &str) -> Option<String> {
    let next = match names.iter().position(|n| n == current) {
        Some(idx) => (idx + 1) % names.len(),
        None => 0,
    };
    names.get(next).cloned()
}
