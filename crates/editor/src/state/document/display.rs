//! Display helper functions for layers

use shared::{DocumentSettings, Layer};

/// Get display name for a layer
pub fn layer_display_name(layer: &Layer) -> String {
    if layer.name.is_empty() {
        format!("Layer ({})", short_id(&layer.id))
    } else {
        format!("{} ({})", layer.name, short_id(&layer.id))
    }
}

/// Format a layer's effective size in physical units, e.g. "5.00 x 5.00 cm"
pub fn layer_size_label(layer: &Layer, settings: &DocumentSettings) -> String {
    format!(
        "{:.2} x {:.2} cm",
        settings.px_to_cm(layer.scaled_width()),
        settings.px_to_cm(layer.scaled_height())
    )
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str) -> Layer {
        Layer {
            id: "0123456789abcdef".to_string(),
            source: "s".to_string(),
            x: 0.0,
            y: 0.0,
            width: 300.0,
            height: 600.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            visible: true,
            locked: false,
            name: name.to_string(),
            generated_from: None,
        }
    }

    #[test]
    fn test_short_id_truncates() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_display_name_with_and_without_name() {
        assert_eq!(layer_display_name(&layer("logo")), "logo (01234567)");
        assert_eq!(layer_display_name(&layer("")), "Layer (01234567)");
    }

    #[test]
    fn test_size_label_uses_dpi() {
        let settings = DocumentSettings::new("Sheet", 1000.0, 1000.0, 300.0);
        // 300 px at 300 dpi is exactly 2.54 cm
        assert_eq!(layer_size_label(&layer("a"), &settings), "2.54 x 5.08 cm");
    }
}
