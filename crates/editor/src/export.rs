//! Render-plan handoff to the compositing collaborator
//!
//! The engine's obligation at this boundary is paint order and resolved
//! geometry; rasterization and file encoding happen elsewhere.

use kurbo::Rect;
use shared::{Background, LayerId, PixelRef};

use crate::state::Document;

/// One layer as the compositor should draw it
#[derive(Debug, Clone)]
pub struct PlacedLayer {
    pub id: LayerId,
    pub source: PixelRef,
    /// On-sheet frame after scaling
    pub frame: Rect,
    /// Rotation in degrees around the frame origin
    pub rotation: f64,
}

/// Everything the compositing service needs to draw a document
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub width: f64,
    pub height: f64,
    pub background: Background,
    /// Visible layers in paint order, back to front
    pub layers: Vec<PlacedLayer>,
}

/// Build the render plan for a document
pub fn render_plan(document: &Document) -> RenderPlan {
    let layers = document
        .layers
        .iter()
        .filter(|l| l.visible)
        .map(|l| PlacedLayer {
            id: l.id.clone(),
            source: l.source.clone(),
            frame: Rect::new(
                l.x,
                l.y,
                l.x + l.scaled_width(),
                l.y + l.scaled_height(),
            ),
            rotation: l.rotation,
        })
        .collect();

    RenderPlan {
        width: document.settings.width,
        height: document.settings.height,
        background: document.settings.background.clone(),
        layers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Document;
    use shared::{DocumentSettings, LayerPatch};

    fn doc() -> Document {
        Document::new(DocumentSettings::new("Sheet", 1000.0, 800.0, 300.0))
    }

    #[test]
    fn test_plan_carries_sheet_properties() {
        let plan = render_plan(&doc());
        assert_eq!(plan.width, 1000.0);
        assert_eq!(plan.height, 800.0);
        assert_eq!(plan.background, Background::Transparent);
        assert!(plan.layers.is_empty());
    }

    #[test]
    fn test_plan_preserves_paint_order() {
        let mut d = doc();
        let a = d.add_layer("a", None, 100.0, 100.0);
        let b = d.add_layer("b", None, 100.0, 100.0);
        let plan = render_plan(&d);
        assert_eq!(plan.layers.len(), 2);
        assert_eq!(plan.layers[0].id, a);
        assert_eq!(plan.layers[1].id, b);
    }

    #[test]
    fn test_plan_skips_invisible_layers() {
        let mut d = doc();
        let a = d.add_layer("a", None, 100.0, 100.0);
        d.add_layer("b", None, 100.0, 100.0);
        d.update_layer(
            &a,
            &LayerPatch {
                visible: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        let plan = render_plan(&d);
        assert_eq!(plan.layers.len(), 1);
        assert_ne!(plan.layers[0].id, a);
    }

    #[test]
    fn test_plan_resolves_scaled_geometry() {
        let mut d = doc();
        let a = d.add_layer("a", None, 200.0, 100.0);
        d.update_layer(
            &a,
            &LayerPatch {
                x: Some(10.0),
                y: Some(20.0),
                scale_x: Some(2.0),
                scale_y: Some(3.0),
                rotation: Some(90.0),
                ..Default::default()
            },
        )
        .unwrap();
        let plan = render_plan(&d);
        let placed = &plan.layers[0];
        assert_eq!(placed.frame, Rect::new(10.0, 20.0, 410.0, 320.0));
        assert_eq!(placed.rotation, 90.0);
    }
}
