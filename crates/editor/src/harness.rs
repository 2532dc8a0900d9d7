//! Headless editor harness for programmatic document manipulation.
//!
//! Wraps the registry with convenience constructors and counters so
//! integration tests and the agent command interface can drive the engine
//! without any rendering context.

use shared::{DocumentId, DocumentSettings, FillDirective, LayerId, PixelRef};

use crate::error::EngineResult;
use crate::layout::FillReport;
use crate::state::{Document, DocumentFile, DocumentRegistry, EditorSettings};

/// Headless harness — the registry plus the editor settings
pub struct EditorHarness {
    pub registry: DocumentRegistry,
    pub settings: EditorSettings,
}

impl EditorHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self {
            registry: DocumentRegistry::default(),
            settings: EditorSettings::default(),
        }
    }

    /// Create a harness with the given settings (e.g. loaded from disk)
    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            registry: DocumentRegistry::default(),
            settings,
        }
    }

    // ── Document lifecycle ────────────────────────────────────

    /// Create a document with explicit sheet dimensions
    pub fn new_document(&mut self, width: f64, height: f64, dpi: f64) -> DocumentId {
        self.registry
            .create_document(DocumentSettings::new("Untitled", width, height, dpi))
    }

    /// Create a document from the editor's configured defaults
    pub fn new_default_document(&mut self) -> DocumentId {
        let d = &self.settings.document;
        let mut settings = DocumentSettings::new("Untitled", d.width, d.height, d.dpi);
        settings.background = d.background.clone();
        self.registry.create_document(settings)
    }

    /// Load a document from its JSON form (replaces nothing; opens a new tab)
    pub fn load_document_json(&mut self, json: &str) -> Result<DocumentId, String> {
        let file: DocumentFile =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        Ok(self.registry.open_document(file))
    }

    /// Export the active document as JSON
    pub fn export_document_json(&self) -> String {
        self.registry
            .active_document()
            .map(|d| d.export_json())
            .unwrap_or_default()
    }

    // ── Layer manipulation ────────────────────────────────────

    /// Add a synthetic layer and return its id
    pub fn add_layer(&mut self, name: &str, width: f64, height: f64) -> EngineResult<LayerId> {
        self.registry.add_layer(name, None::<PixelRef>, width, height)
    }

    /// Run a fill on the active document
    pub fn fill(&mut self, directive: &FillDirective) -> EngineResult<FillReport> {
        self.registry.fill(None, directive)
    }

    /// Duplicate the selection with the default offset
    pub fn duplicate(&mut self) -> EngineResult<Vec<LayerId>> {
        self.registry.duplicate_selected(None)
    }

    /// Delete the selected layers
    pub fn delete_selected(&mut self) -> EngineResult<Vec<LayerId>> {
        self.registry.delete_selected()
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        self.registry.undo().unwrap_or(false)
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        self.registry.redo().unwrap_or(false)
    }

    // ── Selection ─────────────────────────────────────────────

    /// Select a single layer
    pub fn select(&mut self, layer_id: &str) -> EngineResult<()> {
        self.registry.select_layer(layer_id)
    }

    /// Clear selection
    pub fn clear_selection(&mut self) {
        let _ = self.registry.clear_selection();
    }

    // ── Inspection ────────────────────────────────────────────

    /// The active document, if any
    pub fn active_document(&self) -> Option<&Document> {
        self.registry.active_document()
    }

    /// Number of open documents
    pub fn document_count(&self) -> usize {
        self.registry.document_count()
    }

    /// Number of layers in the active document
    pub fn layer_count(&self) -> usize {
        self.active_document().map(|d| d.layers.len()).unwrap_or(0)
    }

    /// Number of visible layers in the active document
    pub fn visible_layer_count(&self) -> usize {
        self.active_document()
            .map(|d| d.layers.iter().filter(|l| l.visible).count())
            .unwrap_or(0)
    }

    /// Selected layer ids of the active document
    pub fn selected(&self) -> Vec<LayerId> {
        self.active_document()
            .map(|d| d.selection.all().to_vec())
            .unwrap_or_default()
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}
