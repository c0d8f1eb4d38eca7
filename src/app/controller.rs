//! Application Controller für zentrale Command-Verarbeitung.

use super::command_log::CommandOutcome;
use super::render_scene;
use super::use_cases::{editing, history, layout, notify, transfer};
use super::{EditorCommand, EditorState};
use crate::shared::RenderScene;

/// Maximale Anzahl Runden beim Abarbeiten verzögerter Commands.
const MAX_QUEUE_ROUNDS: usize = 16;

/// Orchestriert Commands und Use-Cases auf dem EditorState.
#[derive(Debug, Default)]
pub struct EditorController;

impl EditorController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Führt einen mutierenden Command auf dem EditorState aus.
    ///
    /// Referenzfehler (unbekannte IDs usw.) sind geloggte No-ops; nur ein
    /// ungültiger Import-Snapshot liefert einen Fehler. Der Command landet
    /// mit seinem Ergebnis im Command-Log.
    pub fn handle_command(
        &mut self,
        state: &mut EditorState,
        command: EditorCommand,
    ) -> anyhow::Result<()> {
        let logged = command.clone();
        let result = self.dispatch(state, command);
        state
            .command_log
            .record(logged, CommandOutcome::from_result(&result));
        result
    }

    fn dispatch(&mut self, state: &mut EditorState, command: EditorCommand) -> anyhow::Result<()> {
        match command {
            // === Shapes ===
            EditorCommand::AddShape { draft } => {
                editing::add_shape(state, draft);
            }
            EditorCommand::RemoveShape { id } => {
                editing::remove_shape(state, id);
            }
            EditorCommand::UpdateShape { id, patch } => {
                editing::update_shape(state, id, patch);
            }
            EditorCommand::ChangeShapeType { id, kind } => {
                editing::change_shape_type(state, id, kind);
            }
            EditorCommand::SetShapeText { id, field, text } => {
                editing::set_shape_text(state, id, field, &text);
            }
            EditorCommand::SetShapeFillColor { id, color } => {
                editing::set_shape_fill_color(state, id, &color);
            }
            EditorCommand::SetShapeBorderColor { id, color } => {
                editing::set_shape_border_color(state, id, &color);
            }
            EditorCommand::SetShapeTextColor { id, color } => {
                editing::set_shape_text_color(state, id, &color);
            }
            EditorCommand::SetShapeOrder { id, patch } => {
                editing::set_shape_order(state, id, patch);
            }
            EditorCommand::LockShape { id } => {
                editing::lock_shape(state, id);
            }
            EditorCommand::UnlockShape { id } => {
                editing::unlock_shape(state, id);
            }
            EditorCommand::LockAllShapes => {
                editing::lock_all_shapes(state);
            }
            EditorCommand::UnlockAllShapes => {
                editing::unlock_all_shapes(state);
            }
            EditorCommand::BringToFront { id } => {
                editing::bring_to_front(state, id);
            }
            EditorCommand::BringToBack { id } => {
                editing::bring_to_back(state, id);
            }

            // === Drag ===
            EditorCommand::BeginMoveShape { id } => {
                editing::begin_move_shape(state, id);
            }
            EditorCommand::MoveShape { id, position } => {
                editing::move_shape(state, id, position);
            }
            EditorCommand::EndMoveShape { id } => {
                editing::end_move_shape(state, id);
            }

            // === Verbindungen ===
            EditorCommand::AddConnection {
                from_id,
                to_id,
                options,
            } => {
                editing::add_connection(state, from_id, to_id, options);
            }
            EditorCommand::RemoveConnection { id } => {
                editing::remove_connection(state, id);
            }
            EditorCommand::UpdateConnection { id, patch } => {
                editing::update_connection(state, id, patch);
            }
            EditorCommand::SetConnectionColor { id, color } => {
                editing::set_connection_color(state, id, &color);
            }
            EditorCommand::SetConnectionLabel { id, label } => {
                editing::set_connection_label(state, id, label);
            }
            EditorCommand::SetLabelTextColor { id, color } => {
                editing::set_label_text_color(state, id, &color);
            }
            EditorCommand::SetLabelBackgroundColor { id, color } => {
                editing::set_label_background_color(state, id, &color);
            }
            EditorCommand::SetConnectionKind { id, kind } => {
                editing::set_connection_kind(state, id, kind);
            }
            EditorCommand::ToggleConnectionKind { id } => {
                editing::toggle_connection_kind(state, id);
            }
            EditorCommand::CycleLabelAlignment { id } => {
                editing::cycle_label_alignment(state, id);
            }

            // === Layout ===
            EditorCommand::AlignShapes { edge } => {
                layout::align_shapes(state, edge);
            }
            EditorCommand::DistributeShapes { axis } => {
                layout::distribute_shapes(state, axis);
            }
            EditorCommand::MoveDiagram { delta } => {
                layout::move_diagram(state, delta);
            }
            EditorCommand::CenterUnlockedShapes => {
                layout::center_unlocked_shapes(state);
            }
            EditorCommand::ClearDiagram => {
                layout::clear_diagram(state);
            }

            // === Import/Export ===
            EditorCommand::ImportState { snapshot } => {
                transfer::import_state(state, snapshot)?;
            }
            EditorCommand::ExportState => {
                transfer::export_state(state);
            }

            // === Historie ===
            EditorCommand::Undo => {
                history::undo(state);
            }
            EditorCommand::Redo => {
                history::redo(state);
            }

            // === Plugins / Hinweise ===
            EditorCommand::BroadcastPluginMessage { topic, data } => {
                notify::broadcast_plugin_message(state, &topic, data);
            }
            EditorCommand::RequestRedrawHint => {
                notify::request_redraw_hint(state);
            }
            EditorCommand::RequestLayoutHint => {
                notify::request_layout_hint(state);
            }
        }

        Ok(())
    }

    /// Arbeitet Commands ab, die Handler oder Plugins eingereiht haben.
    ///
    /// Gibt die Anzahl erfolgreich ausgeführter Commands zurück. Ein
    /// fehlschlagender Command hält die übrigen nicht auf; nach dem Abarbeiten
    /// wird der erste Fehler zurückgegeben. Bricht nach `MAX_QUEUE_ROUNDS`
    /// Runden ab; Reste bleiben in der Warteschlange.
    pub fn process_queued_commands(&mut self, state: &mut EditorState) -> anyhow::Result<usize> {
        let queue = state.command_queue().clone();
        let mut executed = 0;
        let mut failed = 0;
        let mut first_error: Option<anyhow::Error> = None;
        for _ in 0..MAX_QUEUE_ROUNDS {
            let pending = queue.drain();
            if pending.is_empty() {
                break;
            }
            for command in pending {
                match self.handle_command(state, command) {
                    Ok(()) => executed += 1,
                    Err(error) => {
                        log::warn!("Verzögerter Command fehlgeschlagen: {:#}", error);
                        failed += 1;
                        first_error.get_or_insert(error);
                    }
                }
            }
        }
        if !queue.is_empty() {
            log::warn!(
                "Command-Warteschlange nach {} Runden nicht leer ({} verbleibend)",
                MAX_QUEUE_ROUNDS,
                queue.len()
            );
        }
        match first_error {
            Some(error) => Err(error.context(format!(
                "{} verzögerte Commands fehlgeschlagen, {} ausgeführt",
                failed, executed
            ))),
            None => Ok(executed),
        }
    }

    /// Baut die Render-Szene (read-only).
    pub fn build_render_scene(&self, state: &EditorState) -> RenderScene {
        render_scene::build(state)
    }
}
