//! Use-Case: Verbindungen erstellen, entfernen und ändern.

use super::{modify_connection, valid_color};
use crate::app::history::{ActionKind, EditOp};
use crate::app::EditorState;
use crate::core::{Connection, ConnectionOptions, ConnectionPatch, RouteKind};

/// Erstellt eine Verbindung zwischen zwei Shapes.
///
/// Self-Loops, unbekannte Shapes und bereits vergebene explizite IDs sind
/// geloggte No-ops.
pub fn add_connection(
    state: &mut EditorState,
    from_id: u64,
    to_id: u64,
    options: ConnectionOptions,
) -> Option<u64> {
    if from_id == to_id {
        log::warn!("Self-Loop nicht erlaubt (Shape {})", from_id);
        return None;
    }
    if !state.diagram.contains_shape(from_id) || !state.diagram.contains_shape(to_id) {
        log::warn!(
            "Verbindung nicht möglich: Shape {} oder {} existiert nicht",
            from_id,
            to_id
        );
        return None;
    }
    if let Some(id) = options.id {
        if state.diagram.contains_connection(id) {
            log::warn!("Verbindung {} existiert bereits, nicht angelegt", id);
            return None;
        }
    }

    let Some(id) = options.id.or_else(|| state.diagram.allocate_connection_id()) else {
        log::warn!("Verbindung nicht angelegt: keine freie Verbindungs-ID mehr");
        return None;
    };
    let mut connection = Connection::new(id, from_id, to_id);
    connection.from_side = options.from_side;
    connection.to_side = options.to_side;
    connection.kind = options.kind;
    connection.label = options.label.filter(|l| !l.is_empty());
    connection.style = state.options.connection_style();
    if let Some(color) = options.color.filter(|c| valid_color(c, "Verbindung", id)) {
        connection.style.color = color;
    }

    let kind = connection.kind.clone();
    let index = state.diagram.connection_count();
    if !state.commit(
        ActionKind::AddConnection,
        vec![EditOp::InsertConnection { index, connection }],
    ) {
        return None;
    }
    log::info!(
        "Verbindung {} {}→{} ({}) erstellt",
        id,
        from_id,
        to_id,
        kind
    );
    Some(id)
}

/// Entfernt eine Verbindung.
pub fn remove_connection(state: &mut EditorState, id: u64) -> bool {
    let (Some(index), Some(connection)) = (
        state.diagram.connection_index(id),
        state.diagram.connection(id).cloned(),
    ) else {
        log::warn!("Verbindung {} existiert nicht, nichts entfernt", id);
        return false;
    };
    let removed = state.commit(
        ActionKind::RemoveConnection,
        vec![EditOp::RemoveConnection { index, connection }],
    );
    if removed {
        log::info!("Verbindung {} entfernt", id);
    }
    removed
}

/// Führt die gesetzten Felder des Patches in die Verbindung zusammen und routet neu.
pub fn update_connection(state: &mut EditorState, id: u64, patch: ConnectionPatch) -> bool {
    if patch.is_empty() {
        log::debug!("Leerer Patch für Verbindung {}", id);
        return false;
    }
    modify_connection(state, id, ActionKind::UpdateConnection, |conn| {
        if let Some(side) = patch.from_side {
            conn.from_side = side;
        }
        if let Some(side) = patch.to_side {
            conn.to_side = side;
        }
        if let Some(kind) = patch.kind {
            conn.kind = kind;
        }
        if let Some(label) = patch.label {
            conn.label = label.filter(|l| !l.is_empty());
        }
        if let Some(color) = patch.color.filter(|c| valid_color(c, "Verbindung", id)) {
            conn.style.color = color;
        }
        if let Some(color) = patch
            .label_text_color
            .filter(|c| valid_color(c, "Verbindung", id))
        {
            conn.style.label_text_color = color;
        }
        if let Some(color) = patch
            .label_background_color
            .filter(|c| valid_color(c, "Verbindung", id))
        {
            conn.style.label_background_color = color;
        }
    })
}

/// Setzt oder entfernt (`None` bzw. leerer Text) das Label.
pub fn set_connection_label(state: &mut EditorState, id: u64, label: Option<String>) -> bool {
    modify_connection(state, id, ActionKind::UpdateConnection, |conn| {
        conn.label = label.filter(|l| !l.is_empty());
    })
}

/// Setzt die Routing-Art.
pub fn set_connection_kind(state: &mut EditorState, id: u64, kind: RouteKind) -> bool {
    modify_connection(state, id, ActionKind::UpdateConnection, |conn| {
        conn.kind = kind;
    })
}

/// Wechselt zwischen gerader und rechtwinkliger Verbindung.
pub fn toggle_connection_kind(state: &mut EditorState, id: u64) -> bool {
    modify_connection(state, id, ActionKind::UpdateConnection, |conn| {
        conn.kind = conn.kind.toggled();
    })
}
