//! Document state management
//!
//! This module provides a single open document: its settings, ordered layer
//! list, selection, and undo/redo history.

mod display;
mod history;
mod layer_ops;
mod persistence;

pub use display::{layer_display_name, layer_size_label, short_id};
pub use history::{HistoryStack, Snapshot, MAX_HISTORY};
pub use persistence::DocumentFile;

use shared::{DocumentId, DocumentSettings, Layer, LayerId};

use super::selection::SelectionState;
use crate::error::{EngineError, EngineResult};

/// One open document: a sheet with layers, selection, and undo/redo history
pub struct Document {
    pub id: DocumentId,
    pub settings: DocumentSettings,
    /// Layers in paint order, back to front
    pub layers: Vec<Layer>,
    pub selection: SelectionState,
    pub(crate) history: HistoryStack,
    /// Set by every recorded mutation, cleared by the host after persisting
    pub dirty: bool,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl Document {
    pub(crate) fn new(settings: DocumentSettings) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            settings,
            layers: Vec::new(),
            selection: SelectionState::default(),
            history: HistoryStack::default(),
            dirty: false,
            version: 0,
        }
    }

    /// Current document version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get a layer by id
    pub fn get_layer(&self, layer_id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    /// Get mutable layer by id
    pub fn get_layer_mut(&mut self, layer_id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == layer_id)
    }

    /// Stacking position of a layer, back to front
    pub fn layer_index(&self, layer_id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == layer_id)
    }

    /// The selected layers, in selection order
    pub fn selected_layers(&self) -> Vec<&Layer> {
        self.selection
            .all()
            .iter()
            .filter_map(|id| self.get_layer(id))
            .collect()
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of retained history snapshots
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ── Selection (membership-checked against the layer list) ──

    /// Select a single layer
    pub fn select_layer(&mut self, layer_id: &str) -> EngineResult<()> {
        if self.get_layer(layer_id).is_none() {
            return Err(EngineError::LayerNotFound(layer_id.to_string()));
        }
        self.selection.select(layer_id.to_string());
        self.version += 1;
        Ok(())
    }

    /// Replace the selection; ids not in the layer list are dropped silently
    pub fn select_layers(&mut self, ids: Vec<LayerId>) {
        let present: Vec<LayerId> = ids
            .into_iter()
            .filter(|id| self.get_layer(id).is_some())
            .collect();
        self.selection.select_many(present);
        self.version += 1;
    }

    /// Toggle a layer in and out of the selection
    pub fn toggle_layer(&mut self, layer_id: &str) -> EngineResult<()> {
        if self.get_layer(layer_id).is_none() {
            return Err(EngineError::LayerNotFound(layer_id.to_string()));
        }
        self.selection.toggle(layer_id.to_string());
        self.version += 1;
        Ok(())
    }

    /// Select every layer in stacking order
    pub fn select_all(&mut self) {
        let ids: Vec<LayerId> = self.layers.iter().map(|l| l.id.clone()).collect();
        self.selection.select_many(ids);
        self.version += 1;
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.version += 1;
    }

    // ── History protocol ──

    /// Undo the last recorded mutation. Returns false at the oldest state.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone mutation. Returns false at the newest state.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    /// Record the pre-mutation state once, before the first mutation ever
    /// applied to this document, so undo can reach the freshly-created state.
    pub(crate) fn begin(&mut self) {
        if self.history.is_empty() {
            self.history.record(&self.layers, self.selection.all());
        }
    }

    /// Record the post-mutation state and mark the document changed
    pub(crate) fn commit(&mut self) {
        self.history.record(&self.layers, self.selection.all());
        self.dirty = true;
        self.version += 1;
    }

    /// Replay a snapshot through the recording path; the one-shot suppression
    /// flag armed by undo/redo swallows the record.
    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.layers = snapshot.layers;
        self.selection.select_many(snapshot.selection);
        self.commit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PixelRef;

    fn test_document() -> Document {
        Document::new(DocumentSettings::new("Test", 1000.0, 1000.0, 300.0))
    }

    fn add(doc: &mut Document, name: &str) -> LayerId {
        doc.add_layer(name, None::<PixelRef>, 200.0, 200.0)
    }

    #[test]
    fn test_new_document_is_pristine() {
        let doc = test_document();
        assert!(doc.layers.is_empty());
        assert!(!doc.selection.has_selection());
        assert_eq!(doc.history_len(), 0);
        assert!(!doc.dirty);
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_select_missing_layer_fails() {
        let mut doc = test_document();
        let err = doc.select_layer("nope").unwrap_err();
        assert_eq!(err, EngineError::LayerNotFound("nope".to_string()));
    }

    #[test]
    fn test_select_layers_drops_missing_silently() {
        let mut doc = test_document();
        let id = add(&mut doc, "a");
        doc.select_layers(vec![id.clone(), "ghost".to_string()]);
        assert_eq!(doc.selection.all(), &[id]);
    }

    #[test]
    fn test_select_all_follows_stacking_order() {
        let mut doc = test_document();
        let a = add(&mut doc, "a");
        let b = add(&mut doc, "b");
        doc.select_all();
        assert_eq!(doc.selection.all(), &[a, b]);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut doc = test_document();
        add(&mut doc, "a");
        add(&mut doc, "b");
        assert_eq!(doc.layers.len(), 2);

        assert!(doc.undo());
        assert_eq!(doc.layers.len(), 1);
        assert!(doc.undo());
        assert_eq!(doc.layers.len(), 0);
        assert!(!doc.undo());

        assert!(doc.redo());
        assert!(doc.redo());
        assert_eq!(doc.layers.len(), 2);
        assert!(!doc.redo());
    }

    #[test]
    fn test_undo_restores_selection() {
        let mut doc = test_document();
        let a = add(&mut doc, "a");
        add(&mut doc, "b"); // add selects the new layer
        doc.undo();
        assert_eq!(doc.selection.all(), &[a]);
    }

    #[test]
    fn test_mutation_after_undo_discards_redo() {
        let mut doc = test_document();
        add(&mut doc, "a");
        add(&mut doc, "b");
        doc.undo();
        add(&mut doc, "c");
        assert!(!doc.can_redo());
        assert_eq!(doc.layers.len(), 2);
    }

    #[test]
    fn test_version_bumps_on_mutation() {
        let mut doc = test_document();
        let v0 = doc.version();
        add(&mut doc, "a");
        assert!(doc.version() > v0);
    }
}
