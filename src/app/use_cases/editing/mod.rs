//! Use-Case-Funktionen für Shape/Verbindungs-Editing.
//!
//! Aufgeteilt nach Operation:
//! - `shapes` — Shapes anlegen, entfernen, ändern, sperren
//! - `connections` — Verbindungen anlegen, entfernen, ändern
//! - `styling` — Farb-Setter für Shapes, Verbindungen und Labels, Label-Ausrichtung
//! - `drag` — Verschieben per Drag mit einem History-Eintrag pro Geste

mod connections;
mod drag;
mod shapes;
mod styling;

pub use connections::{
    add_connection, remove_connection, set_connection_kind, set_connection_label,
    toggle_connection_kind, update_connection,
};
pub use drag::{begin_move_shape, end_move_shape, move_shape};
pub use shapes::{
    add_shape, bring_to_back, bring_to_front, change_shape_type, lock_all_shapes, lock_shape,
    remove_shape, set_shape_order, set_shape_text, unlock_all_shapes, unlock_shape, update_shape,
};
pub use styling::{
    cycle_label_alignment, set_connection_color, set_label_background_color, set_label_text_color,
    set_shape_border_color, set_shape_fill_color, set_shape_text_color,
};

use crate::app::history::{ActionKind, EditOp};
use crate::app::EditorState;
use crate::core::{Connection, Shape};

/// Ändert eine Kopie der Shape und legt die Änderung als ein History-Eintrag ab.
///
/// Position wird neu eingerastet, der Umriss neu abgeleitet. Ohne
/// tatsächliche Änderung entsteht kein Eintrag.
pub(crate) fn modify_shape(
    state: &mut EditorState,
    id: u64,
    action: ActionKind,
    change: impl FnOnce(&mut Shape),
) -> bool {
    let Some(before) = state.diagram.shape(id).cloned() else {
        log::warn!("Shape {} existiert nicht ({})", id, action);
        return false;
    };
    let mut after = before.clone();
    change(&mut after);
    after.position = state.snap(after.position);
    state.derive_outline(&mut after);
    if after == before {
        log::debug!("Shape {}: '{}' ohne Änderung", id, action);
        return false;
    }
    state.commit(action, vec![EditOp::ReplaceShape { before, after }])
}

/// Ändert eine Kopie der Verbindung und legt die Änderung als ein History-Eintrag ab.
pub(crate) fn modify_connection(
    state: &mut EditorState,
    id: u64,
    action: ActionKind,
    change: impl FnOnce(&mut Connection),
) -> bool {
    let Some(before) = state.diagram.connection(id).cloned() else {
        log::warn!("Verbindung {} existiert nicht ({})", id, action);
        return false;
    };
    let mut after = before.clone();
    change(&mut after);
    // Pfad wird beim Anwenden neu berechnet
    after.path = before.path.clone();
    if after == before {
        log::debug!("Verbindung {}: '{}' ohne Änderung", id, action);
        return false;
    }
    state.commit(action, vec![EditOp::ReplaceConnection { before, after }])
}

/// Prüft einen Farbstring; leere Farben werden abgelehnt.
pub(crate) fn valid_color(color: &str, what: &str, id: u64) -> bool {
    if color.trim().is_empty() {
        log::warn!("Leere Farbe für {} {} ignoriert", what, id);
        return false;
    }
    true
}
