//! Open-document registry
//!
//! Owns the set of open documents and the active-document pointer. Every
//! layer mutation is exposed only against the active document; callers
//! needing a different target switch with `set_active_document` first.

use shared::{
    DocumentId, DocumentSettings, FillDirective, LayerId, LayerPatch, MovePosition, PixelRef,
    ResizeSpec,
};

use super::document::{Document, DocumentFile};
use crate::error::{EngineError, EngineResult};
use crate::layout::FillReport;

/// The open documents (in creation order) and the active-document pointer
#[derive(Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
}

impl DocumentRegistry {
    /// Create a new document and make it active
    pub fn create_document(&mut self, settings: DocumentSettings) -> DocumentId {
        let doc = Document::new(settings);
        let id = doc.id.clone();
        tracing::info!(document = %id, name = %doc.settings.name, "document created");
        self.documents.push(doc);
        self.active_id = Some(id.clone());
        id
    }

    /// Open a previously serialized document and make it active
    pub fn open_document(&mut self, file: DocumentFile) -> DocumentId {
        let id = self.create_document(file.settings);
        if let Some(doc) = self.get_document_mut(&id) {
            doc.layers = file.layers;
            for layer in &mut doc.layers {
                layer.sanitize();
            }
        }
        id
    }

    /// Close a document. If it was active, the most-recently-created
    /// remaining document becomes active.
    pub fn close_document(&mut self, id: &str) -> EngineResult<()> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| EngineError::DocumentNotFound(id.to_string()))?;
        self.documents.remove(index);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.documents.last().map(|d| d.id.clone());
        }
        tracing::info!(document = %id, "document closed");
        Ok(())
    }

    /// Switch the active document
    pub fn set_active_document(&mut self, id: &str) -> EngineResult<()> {
        if !self.documents.iter().any(|d| d.id == id) {
            return Err(EngineError::DocumentNotFound(id.to_string()));
        }
        self.active_id = Some(id.to_string());
        Ok(())
    }

    /// All open documents, in creation order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of open documents
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Get a document by id
    pub fn get_document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Get mutable document by id
    pub fn get_document_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Id of the active document, if any
    pub fn active_id(&self) -> Option<&DocumentId> {
        self.active_id.as_ref()
    }

    /// The active document, if any
    pub fn active_document(&self) -> Option<&Document> {
        let id = self.active_id.as_deref()?;
        self.get_document(id)
    }

    fn active_mut(&mut self) -> EngineResult<&mut Document> {
        let id = self
            .active_id
            .clone()
            .ok_or(EngineError::NoActiveDocument)?;
        self.documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(EngineError::NoActiveDocument)
    }

    // ── Mutations routed to the active document ──

    /// Add a decoded image as a layer on the active document
    pub fn add_layer(
        &mut self,
        name: &str,
        source: Option<PixelRef>,
        width: f64,
        height: f64,
    ) -> EngineResult<LayerId> {
        Ok(self.active_mut()?.add_layer(name, source, width, height))
    }

    /// Remove a single layer from the active document
    pub fn remove_layer(&mut self, layer_id: &str) -> EngineResult<()> {
        self.active_mut()?.remove_layer(layer_id)
    }

    /// Remove the selected layers from the active document
    pub fn delete_selected(&mut self) -> EngineResult<Vec<LayerId>> {
        Ok(self.active_mut()?.delete_selected())
    }

    /// Patch a layer on the active document
    pub fn update_layer(&mut self, layer_id: &str, patch: &LayerPatch) -> EngineResult<()> {
        self.active_mut()?.update_layer(layer_id, patch)
    }

    /// Patch several layers atomically on the active document
    pub fn update_many(&mut self, updates: &[(LayerId, LayerPatch)]) -> EngineResult<()> {
        self.active_mut()?.update_many(updates)
    }

    /// Duplicate the selected layers on the active document
    pub fn duplicate_selected(&mut self, offset: Option<(f64, f64)>) -> EngineResult<Vec<LayerId>> {
        Ok(self.active_mut()?.duplicate_selected(offset))
    }

    /// Resize the selected layers on the active document
    pub fn resize_selected(&mut self, spec: &ResizeSpec) -> EngineResult<()> {
        self.active_mut()?.resize_selected(spec)
    }

    /// Move the selected layers on the active document
    pub fn move_selected(&mut self, position: MovePosition) -> EngineResult<()> {
        self.active_mut()?.move_selected(position);
        Ok(())
    }

    /// Remove every layer from the active document
    pub fn clear_layers(&mut self) -> EngineResult<()> {
        self.active_mut()?.clear_layers();
        Ok(())
    }

    /// Run an automatic fill on the active document
    pub fn fill(
        &mut self,
        base: Option<&LayerId>,
        directive: &FillDirective,
    ) -> EngineResult<FillReport> {
        self.active_mut()?.fill(base, directive)
    }

    /// Undo on the active document; false when nothing to undo
    pub fn undo(&mut self) -> EngineResult<bool> {
        Ok(self.active_mut()?.undo())
    }

    /// Redo on the active document; false when nothing to redo
    pub fn redo(&mut self) -> EngineResult<bool> {
        Ok(self.active_mut()?.redo())
    }

    /// Select a single layer on the active document
    pub fn select_layer(&mut self, layer_id: &str) -> EngineResult<()> {
        self.active_mut()?.select_layer(layer_id)
    }

    /// Replace the active document's selection
    pub fn select_layers(&mut self, ids: Vec<LayerId>) -> EngineResult<()> {
        self.active_mut()?.select_layers(ids);
        Ok(())
    }

    /// Toggle a layer in the active document's selection
    pub fn toggle_layer(&mut self, layer_id: &str) -> EngineResult<()> {
        self.active_mut()?.toggle_layer(layer_id)
    }

    /// Select every layer of the active document
    pub fn select_all(&mut self) -> EngineResult<()> {
        self.active_mut()?.select_all();
        Ok(())
    }

    /// Clear the active document's selection
    pub fn clear_selection(&mut self) -> EngineResult<()> {
        self.active_mut()?.clear_selection();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(name: &str) -> DocumentSettings {
        DocumentSettings::new(name, 1000.0, 1000.0, 300.0)
    }

    #[test]
    fn test_create_makes_active() {
        let mut reg = DocumentRegistry::default();
        let id = reg.create_document(settings("a"));
        assert_eq!(reg.active_id(), Some(&id));
        assert_eq!(reg.document_count(), 1);
    }

    #[test]
    fn test_mutation_without_document_fails() {
        let mut reg = DocumentRegistry::default();
        let err = reg.add_layer("img", None, 100.0, 100.0).unwrap_err();
        assert_eq!(err, EngineError::NoActiveDocument);
        assert_eq!(reg.undo().unwrap_err(), EngineError::NoActiveDocument);
    }

    #[test]
    fn test_set_active_unknown_fails() {
        let mut reg = DocumentRegistry::default();
        reg.create_document(settings("a"));
        assert_eq!(
            reg.set_active_document("ghost").unwrap_err(),
            EngineError::DocumentNotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_close_unknown_fails() {
        let mut reg = DocumentRegistry::default();
        assert!(matches!(
            reg.close_document("ghost"),
            Err(EngineError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_close_active_falls_back_to_most_recent() {
        let mut reg = DocumentRegistry::default();
        let a = reg.create_document(settings("a"));
        let b = reg.create_document(settings("b"));
        let c = reg.create_document(settings("c"));
        reg.set_active_document(&c).unwrap();
        reg.close_document(&c).unwrap();
        // most-recently-created remaining document
        assert_eq!(reg.active_id(), Some(&b));
        reg.close_document(&b).unwrap();
        assert_eq!(reg.active_id(), Some(&a));
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut reg = DocumentRegistry::default();
        let a = reg.create_document(settings("a"));
        let b = reg.create_document(settings("b"));
        reg.close_document(&a).unwrap();
        assert_eq!(reg.active_id(), Some(&b));
    }

    #[test]
    fn test_close_last_document_clears_active() {
        let mut reg = DocumentRegistry::default();
        let a = reg.create_document(settings("a"));
        reg.close_document(&a).unwrap();
        assert!(reg.active_id().is_none());
        assert_eq!(
            reg.add_layer("img", None, 100.0, 100.0).unwrap_err(),
            EngineError::NoActiveDocument
        );
    }

    #[test]
    fn test_mutations_route_to_active() {
        let mut reg = DocumentRegistry::default();
        let a = reg.create_document(settings("a"));
        let b = reg.create_document(settings("b"));
        reg.add_layer("on-b", None, 100.0, 100.0).unwrap();
        reg.set_active_document(&a).unwrap();
        reg.add_layer("on-a", None, 100.0, 100.0).unwrap();

        assert_eq!(reg.get_document(&a).unwrap().layers.len(), 1);
        assert_eq!(reg.get_document(&b).unwrap().layers.len(), 1);
        assert_eq!(reg.get_document(&a).unwrap().layers[0].name, "on-a");
    }

    #[test]
    fn test_open_document_sanitizes_layers() {
        let mut reg = DocumentRegistry::default();
        let mut file_doc = Document::new(settings("src"));
        file_doc.add_layer("a", None, 100.0, 100.0);
        let mut file = file_doc.to_file();
        file.layers[0].x = f64::NAN;
        let id = reg.open_document(file);
        assert_eq!(reg.get_document(&id).unwrap().layers[0].x, 0.0);
    }
}
