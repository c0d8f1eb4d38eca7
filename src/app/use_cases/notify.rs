//! Use-Case: Plugin-Nachrichten und Hinweise an Renderer/Layout.

use crate::app::events::DiagramEvent;
use crate::app::EditorState;

/// Meldet `plugin:message` mit Thema und JSON-Daten.
///
/// Gibt die Anzahl erfolgreich aufgerufener Handler zurück.
pub fn broadcast_plugin_message(
    state: &EditorState,
    topic: &str,
    data: serde_json::Value,
) -> usize {
    if topic.trim().is_empty() {
        log::warn!("Plugin-Nachricht ohne Thema verworfen");
        return 0;
    }
    state.bus().trigger(&DiagramEvent::PluginMessage {
        topic: topic.to_string(),
        data,
    })
}

/// Bittet den Renderer um ein Neuzeichnen.
pub fn request_redraw_hint(state: &EditorState) -> usize {
    state.bus().trigger(&DiagramEvent::RedrawHint)
}

/// Bittet ein Layout-Plugin um eine Neuanordnung.
pub fn request_layout_hint(state: &EditorState) -> usize {
    state.bus().trigger(&DiagramEvent::LayoutHint)
}
