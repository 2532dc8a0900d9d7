//! Layer CRUD and transform operations
//!
//! Every operation here is all-or-nothing: it validates its inputs, then
//! mutates and records exactly one history snapshot, or fails and leaves
//! the document untouched.

use shared::{FillDirective, Layer, LayerId, LayerPatch, MovePosition, PixelRef, ResizeSpec};

use super::Document;
use crate::error::{EngineError, EngineResult};
use crate::layout::{self, FillReport};

/// Imports larger than this are fitted down to a workable on-sheet size
const MAX_IMPORT_DIM: f64 = 800.0;

/// Pixel offset applied to duplicated layers
const DUPLICATE_OFFSET: f64 = 20.0;

/// Edge padding for named move positions
const MOVE_PAD: f64 = 20.0;

impl Document {
    /// Add a decoded image as a new layer, centered on the sheet.
    ///
    /// With no explicit `source` the layer references itself, matching hosts
    /// that key their pixel cache by layer id. The new layer becomes the
    /// selection.
    pub fn add_layer(
        &mut self,
        name: &str,
        source: Option<PixelRef>,
        width: f64,
        height: f64,
    ) -> LayerId {
        let id = uuid::Uuid::new_v4().to_string();
        let mut layer = Layer {
            id: id.clone(),
            source: source.unwrap_or_else(|| id.clone()),
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            visible: true,
            locked: false,
            name: name.to_string(),
            generated_from: None,
        };
        layer.sanitize();

        if layer.width > MAX_IMPORT_DIM || layer.height > MAX_IMPORT_DIM {
            let ratio = (MAX_IMPORT_DIM / layer.width).min(MAX_IMPORT_DIM / layer.height);
            layer.width *= ratio;
            layer.height *= ratio;
        }
        layer.x = (self.settings.width - layer.width) / 2.0;
        layer.y = (self.settings.height - layer.height) / 2.0;

        self.begin();
        self.layers.push(layer);
        self.selection.select(id.clone());
        self.commit();
        tracing::debug!(layer = %id, document = %self.id, "layer added");
        id
    }

    /// Remove a single layer by id, pruning it from the selection
    pub fn remove_layer(&mut self, layer_id: &str) -> EngineResult<()> {
        if self.get_layer(layer_id).is_none() {
            return Err(EngineError::LayerNotFound(layer_id.to_string()));
        }
        self.begin();
        self.layers.retain(|l| l.id != layer_id);
        self.selection.retain(|id| id != layer_id);
        self.commit();
        Ok(())
    }

    /// Remove every selected layer. Returns the removed ids; no-op when
    /// nothing is selected.
    pub fn delete_selected(&mut self) -> Vec<LayerId> {
        if !self.selection.has_selection() {
            return Vec::new();
        }
        self.begin();
        let removed: Vec<LayerId> = self.selection.all().to_vec();
        self.layers.retain(|l| !removed.contains(&l.id));
        self.selection.clear();
        self.commit();
        removed
    }

    /// Patch one layer's display attributes
    pub fn update_layer(&mut self, layer_id: &str, patch: &LayerPatch) -> EngineResult<()> {
        if self.get_layer(layer_id).is_none() {
            return Err(EngineError::LayerNotFound(layer_id.to_string()));
        }
        self.begin();
        if let Some(layer) = self.get_layer_mut(layer_id) {
            patch.apply(layer);
        }
        self.commit();
        Ok(())
    }

    /// Patch several layers atomically; fails without mutating if any id is
    /// absent
    pub fn update_many(&mut self, updates: &[(LayerId, LayerPatch)]) -> EngineResult<()> {
        if updates.is_empty() {
            return Ok(());
        }
        for (id, _) in updates {
            if self.get_layer(id).is_none() {
                return Err(EngineError::LayerNotFound(id.clone()));
            }
        }
        self.begin();
        for (id, patch) in updates {
            if let Some(layer) = self.get_layer_mut(id) {
                patch.apply(layer);
            }
        }
        self.commit();
        Ok(())
    }

    /// Clone every selected layer, inserting each clone directly above its
    /// original with a small offset. The clones become the selection.
    pub fn duplicate_selected(&mut self, offset: Option<(f64, f64)>) -> Vec<LayerId> {
        if !self.selection.has_selection() {
            return Vec::new();
        }
        let (dx, dy) = offset.unwrap_or((DUPLICATE_OFFSET, DUPLICATE_OFFSET));

        self.begin();
        let mut clone_ids = Vec::new();
        for source_id in self.selection.all().to_vec() {
            if let Some(index) = self.layer_index(&source_id) {
                let mut clone = self.layers[index].clone();
                clone.id = uuid::Uuid::new_v4().to_string();
                clone.x += dx;
                clone.y += dy;
                clone.sanitize();
                clone_ids.push(clone.id.clone());
                self.layers.insert(index + 1, clone);
            }
        }
        self.selection.select_many(clone_ids.clone());
        self.commit();
        clone_ids
    }

    /// Scale the selected layers to a physical size, by a factor, or to
    /// exact pixel targets
    pub fn resize_selected(&mut self, spec: &ResizeSpec) -> EngineResult<()> {
        if !self.selection.has_selection() {
            return Ok(());
        }
        let settings = self.settings.clone();
        self.begin();
        for id in self.selection.all().to_vec() {
            if let Some(layer) = self.get_layer_mut(&id) {
                if let Some(cm) = spec.width_cm {
                    let factor = settings.cm_to_px(cm) / layer.width;
                    layer.scale_x = factor;
                    layer.scale_y = factor;
                } else if let Some(cm) = spec.height_cm {
                    let factor = settings.cm_to_px(cm) / layer.height;
                    layer.scale_x = factor;
                    layer.scale_y = factor;
                } else if let Some(factor) = spec.factor {
                    layer.scale_x *= factor;
                    layer.scale_y *= factor;
                } else if let (Some(tw), Some(th)) = (spec.target_width, spec.target_height) {
                    layer.scale_x = tw / layer.width;
                    layer.scale_y = th / layer.height;
                }
                layer.sanitize();
            }
        }
        self.commit();
        Ok(())
    }

    /// Move the selected layers to a named sheet position
    pub fn move_selected(&mut self, position: MovePosition) {
        if !self.selection.has_selection() {
            return;
        }
        let sheet_w = self.settings.width;
        let sheet_h = self.settings.height;

        self.begin();
        for id in self.selection.all().to_vec() {
            if let Some(layer) = self.get_layer_mut(&id) {
                let w = layer.scaled_width();
                let h = layer.scaled_height();
                let center_x = (sheet_w - w) / 2.0;
                let center_y = (sheet_h - h) / 2.0;
                let (x, y) = match position {
                    MovePosition::Center => (center_x, center_y),
                    MovePosition::Top => (center_x, MOVE_PAD),
                    MovePosition::Bottom => (center_x, sheet_h - h - MOVE_PAD),
                    MovePosition::Left => (MOVE_PAD, center_y),
                    MovePosition::Right => (sheet_w - w - MOVE_PAD, center_y),
                    MovePosition::TopLeft => (MOVE_PAD, MOVE_PAD),
                    MovePosition::TopRight => (sheet_w - w - MOVE_PAD, MOVE_PAD),
                    MovePosition::BottomLeft => (MOVE_PAD, sheet_h - h - MOVE_PAD),
                    MovePosition::BottomRight => {
                        (sheet_w - w - MOVE_PAD, sheet_h - h - MOVE_PAD)
                    }
                };
                layer.x = x;
                layer.y = y;
            }
        }
        self.commit();
    }

    /// Remove every layer and clear the selection
    pub fn clear_layers(&mut self) {
        self.begin();
        self.layers.clear();
        self.selection.clear();
        self.commit();
    }

    /// Pack copies of a base layer onto the sheet according to the directive.
    ///
    /// On success the layer list is replaced by the solver's output, the
    /// identity-preserving first placement becomes the selection, and one
    /// snapshot is recorded. On failure the document is unchanged.
    pub fn fill(
        &mut self,
        base: Option<&LayerId>,
        directive: &FillDirective,
    ) -> EngineResult<FillReport> {
        let outcome = layout::solve(
            &self.layers,
            self.selection.all(),
            &self.settings,
            base,
            directive,
        )?;

        self.begin();
        self.layers = outcome.layers;
        self.selection.select(outcome.base_id.clone());
        self.commit();
        tracing::debug!(
            document = %self.id,
            generated = outcome.generated,
            "fill applied"
        );
        Ok(FillReport {
            base_id: outcome.base_id,
            generated: outcome.generated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DocumentSettings;

    fn doc() -> Document {
        Document::new(DocumentSettings::new("Test", 1000.0, 1000.0, 300.0))
    }

    fn add(doc: &mut Document, name: &str, w: f64, h: f64) -> LayerId {
        doc.add_layer(name, None, w, h)
    }

    #[test]
    fn test_add_layer_centers_and_selects() {
        let mut d = doc();
        let id = add(&mut d, "img", 200.0, 100.0);
        let layer = d.get_layer(&id).unwrap();
        assert_eq!(layer.x, 400.0);
        assert_eq!(layer.y, 450.0);
        assert!(d.selection.is_selected(&id));
        assert!(d.dirty);
    }

    #[test]
    fn test_add_layer_fits_oversized_import() {
        let mut d = doc();
        let id = add(&mut d, "big", 1600.0, 800.0);
        let layer = d.get_layer(&id).unwrap();
        assert_eq!(layer.width, 800.0);
        assert_eq!(layer.height, 400.0);
    }

    #[test]
    fn test_add_layer_defaults_source_to_id() {
        let mut d = doc();
        let id = add(&mut d, "img", 100.0, 100.0);
        assert_eq!(d.get_layer(&id).unwrap().source, id);
    }

    #[test]
    fn test_remove_layer_prunes_selection() {
        let mut d = doc();
        let a = add(&mut d, "a", 100.0, 100.0);
        let b = add(&mut d, "b", 100.0, 100.0);
        d.select_layers(vec![a.clone(), b.clone()]);
        d.remove_layer(&a).unwrap();
        assert!(d.get_layer(&a).is_none());
        assert_eq!(d.selection.all(), &[b]);
    }

    #[test]
    fn test_remove_missing_layer_fails_without_snapshot() {
        let mut d = doc();
        add(&mut d, "a", 100.0, 100.0);
        let before = d.history_len();
        assert!(d.remove_layer("ghost").is_err());
        assert_eq!(d.history_len(), before);
    }

    #[test]
    fn test_delete_selected_removes_and_clears() {
        let mut d = doc();
        let a = add(&mut d, "a", 100.0, 100.0);
        let b = add(&mut d, "b", 100.0, 100.0);
        d.select_layers(vec![a.clone(), b.clone()]);
        let removed = d.delete_selected();
        assert_eq!(removed, vec![a, b]);
        assert!(d.layers.is_empty());
        assert!(!d.selection.has_selection());
    }

    #[test]
    fn test_delete_with_empty_selection_is_noop() {
        let mut d = doc();
        add(&mut d, "a", 100.0, 100.0);
        d.clear_selection();
        let before = d.history_len();
        assert!(d.delete_selected().is_empty());
        assert_eq!(d.history_len(), before);
    }

    #[test]
    fn test_update_layer_applies_patch() {
        let mut d = doc();
        let id = add(&mut d, "a", 100.0, 100.0);
        let patch = LayerPatch {
            x: Some(5.0),
            rotation: Some(45.0),
            ..Default::default()
        };
        d.update_layer(&id, &patch).unwrap();
        let layer = d.get_layer(&id).unwrap();
        assert_eq!(layer.x, 5.0);
        assert_eq!(layer.rotation, 45.0);
    }

    #[test]
    fn test_update_many_is_atomic() {
        let mut d = doc();
        let a = add(&mut d, "a", 100.0, 100.0);
        let updates = vec![
            (
                a.clone(),
                LayerPatch {
                    x: Some(1.0),
                    ..Default::default()
                },
            ),
            (
                "ghost".to_string(),
                LayerPatch {
                    x: Some(2.0),
                    ..Default::default()
                },
            ),
        ];
        assert!(d.update_many(&updates).is_err());
        assert_eq!(d.get_layer(&a).unwrap().x, 450.0);
    }

    #[test]
    fn test_duplicate_inserts_above_original() {
        let mut d = doc();
        let a = add(&mut d, "a", 100.0, 100.0);
        let b = add(&mut d, "b", 100.0, 100.0);
        d.select_layers(vec![a.clone()]);
        let clones = d.duplicate_selected(None);
        assert_eq!(clones.len(), 1);
        assert_eq!(d.layer_index(&a), Some(0));
        assert_eq!(d.layer_index(&clones[0]), Some(1));
        assert_eq!(d.layer_index(&b), Some(2));
        assert_eq!(d.selection.all(), clones.as_slice());
    }

    #[test]
    fn test_duplicate_offsets_clone() {
        let mut d = doc();
        let a = add(&mut d, "a", 100.0, 100.0);
        d.select_layers(vec![a.clone()]);
        let clones = d.duplicate_selected(None);
        let original = d.get_layer(&a).unwrap();
        let clone = d.get_layer(&clones[0]).unwrap();
        assert_eq!(clone.x, original.x + 20.0);
        assert_eq!(clone.y, original.y + 20.0);
        assert_eq!(clone.name, original.name);
    }

    #[test]
    fn test_resize_to_physical_width() {
        let mut d = doc();
        let id = add(&mut d, "a", 300.0, 150.0);
        let spec = ResizeSpec {
            width_cm: Some(2.54),
            ..Default::default()
        };
        d.resize_selected(&spec).unwrap();
        let layer = d.get_layer(&id).unwrap();
        // 2.54 cm at 300 dpi is 300 px; base width 300 px, so scale 1.0
        assert!((layer.scale_x - 1.0).abs() < 1e-9);
        assert_eq!(layer.scale_x, layer.scale_y);
    }

    #[test]
    fn test_resize_by_factor_compounds() {
        let mut d = doc();
        let id = add(&mut d, "a", 100.0, 100.0);
        let spec = ResizeSpec {
            factor: Some(2.0),
            ..Default::default()
        };
        d.resize_selected(&spec).unwrap();
        d.resize_selected(&spec).unwrap();
        assert_eq!(d.get_layer(&id).unwrap().scale_x, 4.0);
    }

    #[test]
    fn test_resize_to_exact_targets() {
        let mut d = doc();
        let id = add(&mut d, "a", 100.0, 200.0);
        let spec = ResizeSpec {
            target_width: Some(50.0),
            target_height: Some(400.0),
            ..Default::default()
        };
        d.resize_selected(&spec).unwrap();
        let layer = d.get_layer(&id).unwrap();
        assert_eq!(layer.scale_x, 0.5);
        assert_eq!(layer.scale_y, 2.0);
    }

    #[test]
    fn test_move_to_named_positions() {
        let mut d = doc();
        let id = add(&mut d, "a", 100.0, 100.0);
        d.move_selected(MovePosition::TopLeft);
        let layer = d.get_layer(&id).unwrap();
        assert_eq!((layer.x, layer.y), (20.0, 20.0));

        d.move_selected(MovePosition::BottomRight);
        let layer = d.get_layer(&id).unwrap();
        assert_eq!((layer.x, layer.y), (880.0, 880.0));

        d.move_selected(MovePosition::Center);
        let layer = d.get_layer(&id).unwrap();
        assert_eq!((layer.x, layer.y), (450.0, 450.0));
    }

    #[test]
    fn test_clear_layers() {
        let mut d = doc();
        add(&mut d, "a", 100.0, 100.0);
        add(&mut d, "b", 100.0, 100.0);
        d.clear_layers();
        assert!(d.layers.is_empty());
        assert!(!d.selection.has_selection());
        assert!(d.undo());
        assert_eq!(d.layers.len(), 2);
    }
}
