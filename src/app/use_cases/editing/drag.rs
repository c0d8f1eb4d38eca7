//! Use-Case: Shapes per Drag verschieben.
//!
//! Zwischen `begin_move_shape` und `end_move_shape` werden Positionen direkt
//! gesetzt (eingerastet, Verbindungen neu geroutet) ohne History-Einträge.
//! Beim Abschluss entsteht genau ein Eintrag vom Ausgangs- zum Endzustand.

use crate::app::history::ActionKind;
use crate::app::state::DragState;
use crate::app::EditorState;
use glam::Vec2;

/// Startet einen Drag. Ein noch offener Drag wird vorher abgeschlossen.
pub fn begin_move_shape(state: &mut EditorState, id: u64) -> bool {
    let Some(shape) = state.diagram.shape(id) else {
        log::warn!("Drag nicht möglich: Shape {} existiert nicht", id);
        return false;
    };
    if shape.locked {
        log::warn!("Shape {} ist gesperrt und kann nicht verschoben werden", id);
        return false;
    }
    let before = shape.clone();
    state.finish_drag();
    state.drag = Some(DragState {
        shape_id: id,
        before,
    });
    log::debug!("Drag für Shape {} gestartet", id);
    true
}

/// Setzt die Position einer Shape.
///
/// Während eines Drags dieser Shape ohne History, sonst als eigener
/// Undo-Schritt. Gesperrte Shapes bleiben stehen.
pub fn move_shape(state: &mut EditorState, id: u64, position: Vec2) -> bool {
    let Some(shape) = state.diagram.shape(id) else {
        log::warn!("Shape {} existiert nicht, nicht verschoben", id);
        return false;
    };
    if shape.locked {
        log::warn!("Shape {} ist gesperrt und kann nicht verschoben werden", id);
        return false;
    }
    if !position.is_finite() {
        log::warn!("Nicht endliche Position {:?} für Shape {} ignoriert", position, id);
        return false;
    }

    if state.active_drag() != Some(id) {
        return super::modify_shape(state, id, ActionKind::MoveShape, |shape| {
            shape.position = position;
        });
    }

    let mut moved = shape.clone();
    moved.position = state.snap(position);
    if moved.position == shape.position {
        return false;
    }
    state.derive_outline(&mut moved);
    let Some((previous, rerouted)) = state.diagram.replace_shape(moved) else {
        return false;
    };
    state.emit_shape_change(&previous, &rerouted);
    true
}

/// Schließt den Drag ab. Gibt `true` zurück, wenn ein History-Eintrag entstand.
pub fn end_move_shape(state: &mut EditorState, id: u64) -> bool {
    match state.active_drag() {
        Some(active) if active == id => state.finish_drag(),
        Some(active) => {
            log::warn!("Drag-Ende für Shape {}, aktiv ist aber Shape {}", id, active);
            false
        }
        None => {
            log::debug!("Kein aktiver Drag für Shape {}", id);
            false
        }
    }
}
