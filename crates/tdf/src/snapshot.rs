//! Snapshot files: the items, labels and projects a filter runs over.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use todo_filter::{Item, Label, Project, Store};
use tracing::debug;

use crate::commands::Result;

/// A JSON snapshot of a to-do list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Items to filter.
    #[serde(default)]
    pub items: Vec<Item>,

    /// Labels, used to resolve `@name`.
    #[serde(default)]
    pub labels: Vec<Label>,

    /// Projects, used to resolve `#name`.
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Snapshot {
    /// Reads a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        debug!(
            path = %path.display(),
            items = snapshot.items.len(),
            labels = snapshot.labels.len(),
            projects = snapshot.projects.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Splits the snapshot into items and the name lookup store.
    pub fn into_parts(self) -> (Vec<Item>, Store) {
        (self.items, Store::new(self.labels, self.projects))
    }
}
