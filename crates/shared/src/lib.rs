use serde::{Deserialize, Serialize};

/// Unique identifier of a layer in a document
pub type LayerId = String;

/// Unique identifier of an open document
pub type DocumentId = String;

/// Opaque handle into an externally-owned image source cache
pub type PixelRef = String;

/// Sheet background fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    #[default]
    Transparent,
    White,
    Black,
    Custom {
        r: u8,
        g: u8,
        b: u8,
    },
}

/// Fixed properties of a document: sheet size in pixels, print density, background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub dpi: f64,
    #[serde(default)]
    pub background: Background,
}

impl DocumentSettings {
    pub fn new(name: impl Into<String>, width: f64, height: f64, dpi: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            dpi,
            background: Background::Transparent,
        }
    }

    /// Convert a physical length in centimeters to sheet pixels
    pub fn cm_to_px(&self, cm: f64) -> f64 {
        cm / 2.54 * self.dpi
    }

    /// Convert sheet pixels to centimeters
    pub fn px_to_cm(&self, px: f64) -> f64 {
        px / self.dpi * 2.54
    }
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self::new("Untitled", 1000.0, 1000.0, 300.0)
    }
}

/// One placeable image layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    /// Reference to the decoded pixel source (owned by the host's image cache)
    pub source: PixelRef,
    pub x: f64,
    pub y: f64,
    /// Intrinsic width in pixels (before scaling)
    pub width: f64,
    /// Intrinsic height in pixels (before scaling)
    pub height: f64,
    /// Rotation in degrees
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub visible: bool,
    pub locked: bool,
    pub name: String,
    /// Id of the base layer this one was generated from by an automatic fill,
    /// `None` for layers placed by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_from: Option<LayerId>,
}

impl Layer {
    /// Effective width on the sheet after scaling
    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale_x
    }

    /// Effective height on the sheet after scaling
    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale_y
    }

    /// Coerce corrupt geometry back to displayable defaults.
    ///
    /// Non-finite position/rotation become 0, non-finite scale becomes 1,
    /// and a non-finite or non-positive intrinsic size becomes 100 px.
    pub fn sanitize(&mut self) {
        if !self.x.is_finite() {
            self.x = 0.0;
        }
        if !self.y.is_finite() {
            self.y = 0.0;
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            self.width = 100.0;
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            self.height = 100.0;
        }
        if !self.rotation.is_finite() {
            self.rotation = 0.0;
        }
        if !self.scale_x.is_finite() {
            self.scale_x = 1.0;
        }
        if !self.scale_y.is_finite() {
            self.scale_y = 1.0;
        }
    }
}

/// Partial update of a layer's display attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LayerPatch {
    /// Apply the patch to a layer; sanitizes the result
    pub fn apply(&self, layer: &mut Layer) {
        if let Some(x) = self.x {
            layer.x = x;
        }
        if let Some(y) = self.y {
            layer.y = y;
        }
        if let Some(width) = self.width {
            layer.width = width;
        }
        if let Some(height) = self.height {
            layer.height = height;
        }
        if let Some(rotation) = self.rotation {
            layer.rotation = rotation;
        }
        if let Some(scale_x) = self.scale_x {
            layer.scale_x = scale_x;
        }
        if let Some(scale_y) = self.scale_y {
            layer.scale_y = scale_y;
        }
        if let Some(visible) = self.visible {
            layer.visible = visible;
        }
        if let Some(locked) = self.locked {
            layer.locked = locked;
        }
        if let Some(name) = &self.name {
            layer.name = name.clone();
        }
        layer.sanitize();
    }
}

/// Named placement on the sheet for move operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovePosition {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Target for a resize operation. Physical targets preserve aspect ratio;
/// exact pixel targets scale each axis independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResizeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_height: Option<f64>,
}

/// Unit of a fill constraint extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionUnit {
    #[serde(rename = "px")]
    Px,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "cm")]
    Cm,
}

/// A length with an explicit unit, resolved against a document axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    pub unit: DimensionUnit,
}

impl Dimension {
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: DimensionUnit::Px,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: DimensionUnit::Percent,
        }
    }

    pub fn cm(value: f64) -> Self {
        Self {
            value,
            unit: DimensionUnit::Cm,
        }
    }

    /// Resolve to pixels against the given axis extent and print density
    pub fn resolve(&self, axis_extent_px: f64, dpi: f64) -> f64 {
        match self.unit {
            DimensionUnit::Px => self.value,
            DimensionUnit::Percent => self.value / 100.0 * axis_extent_px,
            DimensionUnit::Cm => self.value / 2.54 * dpi,
        }
    }
}

/// Direction of an automatic fill layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillDirection {
    Grid,
    Horizontal,
    Vertical,
}

fn default_gap() -> f64 {
    10.0
}

/// Parameters of an automatic fill: how many copies, in what shape, under
/// which geometric limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillDirective {
    pub direction: FillDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Spacing between copies in pixels
    #[serde(default = "default_gap")]
    pub gap: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<Dimension>,
}

impl FillDirective {
    pub fn grid() -> Self {
        Self::new(FillDirection::Grid)
    }

    pub fn horizontal() -> Self {
        Self::new(FillDirection::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(FillDirection::Vertical)
    }

    fn new(direction: FillDirection) -> Self {
        Self {
            direction,
            count: None,
            gap: default_gap(),
            max_rows: None,
            max_cols: None,
            max_width: None,
            max_height: None,
        }
    }
}
