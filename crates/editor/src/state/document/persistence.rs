//! Autosave/load functionality
//!
//! A document file carries settings and layers only; history is session
//! state and pixel data stays in the host's image cache.

use serde::{Deserialize, Serialize};
use shared::{DocumentSettings, Layer};

use super::Document;

/// Serialized form of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    pub settings: DocumentSettings,
    pub layers: Vec<Layer>,
}

impl Document {
    /// Get autosave file path
    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "sheetlab", "sheetlab")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Serializable snapshot of settings and layers
    pub fn to_file(&self) -> DocumentFile {
        DocumentFile {
            settings: self.settings.clone(),
            layers: self.layers.clone(),
        }
    }

    /// Export the document as pretty JSON
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_file()).unwrap_or_default()
    }

    /// Save the document to the autosave file
    pub fn autosave(&self) {
        if let Some(path) = Self::autosave_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = std::fs::write(&path, self.export_json());
        }
    }

    /// Load the autosaved document, if any
    pub fn load_autosave() -> Option<DocumentFile> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Check if an autosave file exists
    pub fn has_autosave() -> bool {
        Self::autosave_path().map(|p| p.exists()).unwrap_or(false)
    }
}
