//! JSON command protocol for the AI agent.
//!
//! The engine executes already-structured directives; translating free-form
//! instructions into these commands is the interpreter's job.

use serde::{Deserialize, Serialize};
use shared::{DocumentSettings, FillDirective, LayerId, LayerPatch, MovePosition, PixelRef};

use crate::harness::EditorHarness;
use crate::state::document::{layer_display_name, layer_size_label};

fn one() -> u32 {
    1
}

/// A command the AI agent can execute against the active document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Open a new document and make it active
    NewDocument {
        #[serde(default)]
        settings: DocumentSettings,
    },
    /// Close a document by ID
    CloseDocument {
        id: String,
    },
    /// Switch the active document
    SetActiveDocument {
        id: String,
    },
    /// Add a layer with known pixel dimensions
    AddLayer {
        name: String,
        width: f64,
        height: f64,
        #[serde(default)]
        source: Option<PixelRef>,
    },
    /// Delete a layer by ID
    DeleteLayer {
        id: String,
    },
    /// Delete the selected layers
    DeleteSelected,
    /// Patch a layer's attributes
    UpdateLayer {
        id: String,
        attrs: LayerPatch,
    },
    /// Duplicate the selection, optionally several times
    Duplicate {
        #[serde(default = "one")]
        count: u32,
    },
    /// Pack copies of a base layer according to a fill directive
    Fill {
        #[serde(default)]
        base: Option<LayerId>,
        directive: FillDirective,
    },
    /// Scale the selection to a physical size, factor, or pixel targets
    Resize {
        #[serde(default)]
        width_cm: Option<f64>,
        #[serde(default)]
        height_cm: Option<f64>,
        #[serde(default)]
        factor: Option<f64>,
        #[serde(default)]
        target_width: Option<f64>,
        #[serde(default)]
        target_height: Option<f64>,
    },
    /// Move the selection to a named sheet position
    Move {
        position: MovePosition,
    },
    /// Center the selection on the sheet
    Center,
    /// Remove every layer
    Clear,
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Select layers by IDs.
    Select {
        ids: Vec<String>,
    },
    /// Select every layer.
    SelectAll,
    /// Clear selection.
    ClearSelection,
    /// Inspect the active document: list all layers.
    Inspect,
    /// Export the active document as JSON.
    ExportDocument,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut EditorHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::NewDocument { settings } => {
            let id = harness.registry.create_document(settings);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::CloseDocument { id } => match harness.registry.close_document(&id) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::SetActiveDocument { id } => {
            match harness.registry.set_active_document(&id) {
                Ok(()) => CommandResponse::ok(),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::AddLayer {
            name,
            width,
            height,
            source,
        } => match harness.registry.add_layer(&name, source, width, height) {
            Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::DeleteLayer { id } => match harness.registry.remove_layer(&id) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::DeleteSelected => match harness.registry.delete_selected() {
            Ok(removed) => CommandResponse::ok_with_data(serde_json::json!({ "removed": removed })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::UpdateLayer { id, attrs } => {
            match harness.registry.update_layer(&id, &attrs) {
                Ok(()) => CommandResponse::ok(),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Duplicate { count } => {
            let mut created: Vec<String> = Vec::new();
            for _ in 0..count {
                match harness.registry.duplicate_selected(None) {
                    Ok(ids) => created.extend(ids),
                    Err(e) => return CommandResponse::err(e.to_string()),
                }
            }
            CommandResponse::ok_with_data(serde_json::json!({ "created": created }))
        }

        AgentCommand::Fill { base, directive } => {
            match harness.registry.fill(base.as_ref(), &directive) {
                Ok(report) => CommandResponse::ok_with_data(serde_json::json!({
                    "base_id": report.base_id,
                    "generated": report.generated,
                })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Resize {
            width_cm,
            height_cm,
            factor,
            target_width,
            target_height,
        } => {
            let spec = shared::ResizeSpec {
                width_cm,
                height_cm,
                factor,
                target_width,
                target_height,
            };
            match harness.registry.resize_selected(&spec) {
                Ok(()) => CommandResponse::ok(),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Move { position } => match harness.registry.move_selected(position) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Center => {
            match harness.registry.move_selected(MovePosition::Center) {
                Ok(()) => CommandResponse::ok(),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Clear => match harness.registry.clear_layers() {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Undo => match harness.registry.undo() {
            Ok(undone) => CommandResponse::ok_with_data(serde_json::json!({ "undone": undone })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Redo => match harness.registry.redo() {
            Ok(redone) => CommandResponse::ok_with_data(serde_json::json!({ "redone": redone })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Select { ids } => match harness.registry.select_layers(ids) {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::SelectAll => match harness.registry.select_all() {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::ClearSelection => match harness.registry.clear_selection() {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Inspect => {
            let Some(doc) = harness.active_document() else {
                return CommandResponse::err("No active document");
            };
            let layers: Vec<serde_json::Value> = doc
                .layers
                .iter()
                .map(|layer| {
                    serde_json::json!({
                        "id": layer.id,
                        "name": layer_display_name(layer),
                        "x": layer.x,
                        "y": layer.y,
                        "width": layer.scaled_width(),
                        "height": layer.scaled_height(),
                        "size": layer_size_label(layer, &doc.settings),
                        "visible": layer.visible,
                        "locked": layer.locked,
                        "generated_from": layer.generated_from,
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "document_count": harness.document_count(),
                "active_document": doc.id,
                "sheet": {
                    "width": doc.settings.width,
                    "height": doc.settings.height,
                    "dpi": doc.settings.dpi,
                },
                "layer_count": layers.len(),
                "layers": layers,
                "selected": doc.selection.all(),
            }))
        }

        AgentCommand::ExportDocument => {
            let json = harness.export_document_json();
            if json.is_empty() {
                CommandResponse::err("No active document")
            } else {
                CommandResponse::ok_with_data(serde_json::json!({ "document_json": json }))
            }
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut EditorHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut EditorHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
