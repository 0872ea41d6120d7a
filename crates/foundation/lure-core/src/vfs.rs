//! Virtual filesystem
//!
//! A static, read-only map from absolute folder path to its ordered children.
//! A child is a folder iff `parent/child` is itself a key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Home folder of the decoy user and root of the browsable tree
pub const HOME: &str = "/home/guest";

/// Read-only decoy tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFilesystem {
    root: String,
    folders: BTreeMap<String, Vec<String>>,
}

impl VirtualFilesystem {
    /// The stock `/home/guest` workstation tree
    pub fn workstation() -> Self {
        Self::new(HOME)
            .with_folder(
                HOME,
                &["Desktop", "Documents", "Downloads", "notes.log", "secrets.txt"],
            )
            .with_folder("/home/guest/Documents", &["report.txt", "keys.backup"])
            .with_folder("/home/guest/Downloads", &["setup.bin", "readme.md"])
    }

    /// Empty tree rooted at `root`
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            folders: BTreeMap::new(),
        }
    }

    /// Add a folder and its children, in display order
    pub fn with_folder(mut self, path: &str, children: &[&str]) -> Self {
        self.folders.insert(
            path.to_string(),
            children.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Root of the tree (the decoy user's home)
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Whether `path` is a known folder
    pub fn exists(&self, path: &str) -> bool {
        self.folders.contains_key(path)
    }

    /// Children of `path`; unknown folders list as empty
    pub fn list(&self, path: &str) -> &[String] {
        self.folders.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Children of `path` tagged as folder or file
    pub fn entries(&self, path: &str) -> Vec<FolderEntry> {
        self.list(path)
            .iter()
            .map(|name| FolderEntry {
                is_dir: self.exists(&join(path, name)),
                name: name.clone(),
            })
            .collect()
    }

    /// Whether `name` inside `path` is a folder
    pub fn is_dir(&self, path: &str, name: &str) -> bool {
        self.exists(&join(path, name))
    }
}

impl Default for VirtualFilesystem {
    fn default() -> Self {
        Self::workstation()
    }
}

/// One row in a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    pub name: String,
    pub is_dir: bool,
}

/// `parent/name` without doubling the separator at `/`
pub fn join(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_listing_order() {
        let fs = VirtualFilesystem::workstation();
        assert_eq!(
            fs.list(HOME),
            ["Desktop", "Documents", "Downloads", "notes.log", "secrets.txt"]
        );
    }

    #[test]
    fn test_unknown_folder_is_empty() {
        let fs = VirtualFilesystem::workstation();
        assert!(fs.list("/home/guest/Desktop").is_empty());
        assert!(!fs.exists("/home/guest/Desktop"));
    }

    #[test]
    fn test_entries_mark_folders() {
        let fs = VirtualFilesystem::workstation();
        let entries = fs.entries(HOME);
        let documents = entries.iter().find(|e| e.name == "Documents").unwrap();
        let secrets = entries.iter().find(|e| e.name == "secrets.txt").unwrap();

        assert!(documents.is_dir);
        assert!(!secrets.is_dir);
        // Desktop is listed but has no folder entry of its own
        assert!(!fs.is_dir(HOME, "Desktop"));
    }
}
