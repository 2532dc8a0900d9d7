pub mod document;
pub mod registry;
pub mod selection;
pub mod settings;

pub use document::{layer_display_name, short_id, Document, DocumentFile, Snapshot, MAX_HISTORY};
pub use registry::DocumentRegistry;
pub use selection::SelectionState;
pub use settings::{DocumentDefaults, EditorSettings, FillDefaults, Units};
