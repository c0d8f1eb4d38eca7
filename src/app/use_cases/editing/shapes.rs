//! Use-Case: Shapes anlegen, entfernen und ändern.

use super::{modify_shape, valid_color};
use crate::app::history::{ActionKind, EditOp};
use crate::app::EditorState;
use crate::core::{OrderPatch, Shape, ShapeDraft, ShapeKind, ShapePatch, TextField};

/// Legt eine neue Shape an.
///
/// Vergibt eine ID, falls keine angegeben ist, rastet die Position ein und
/// leitet den Umriss ab. Eine bereits vergebene explizite ID, nicht endliche
/// Werte oder eine ungültige Größe führen zu einem geloggten No-op.
pub fn add_shape(state: &mut EditorState, draft: ShapeDraft) -> Option<u64> {
    if !draft.position.is_finite() {
        log::warn!("Shape nicht angelegt: Position {:?} ist nicht endlich", draft.position);
        return None;
    }
    let size = draft
        .size
        .unwrap_or_else(|| state.options.default_shape_size());
    if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
        log::warn!("Shape nicht angelegt: ungültige Größe {:?}", size);
        return None;
    }
    if let Some(id) = draft.id {
        if state.diagram.contains_shape(id) {
            log::warn!("Shape {} existiert bereits, nicht angelegt", id);
            return None;
        }
    }

    let Some(id) = draft.id.or_else(|| state.diagram.allocate_shape_id()) else {
        log::warn!("Shape nicht angelegt: keine freie Shape-ID mehr");
        return None;
    };
    let mut shape = Shape::new(id, draft.kind, state.snap(draft.position), size);
    shape.title = draft.title;
    shape.body = draft.body;
    shape.style = state.options.shape_style();
    if let Some(color) = draft.fill_color.filter(|c| valid_color(c, "Shape", id)) {
        shape.style.fill_color = color;
    }
    if let Some(color) = draft.border_color.filter(|c| valid_color(c, "Shape", id)) {
        shape.style.border_color = color;
    }
    if let Some(color) = draft.text_color.filter(|c| valid_color(c, "Shape", id)) {
        shape.style.text_color = color;
    }
    shape.locked = draft.locked.unwrap_or(state.options.new_shapes_locked);
    shape.editable = draft.editable.unwrap_or(true);
    state.derive_outline(&mut shape);

    let kind = shape.kind.clone();
    let index = state.diagram.shape_count();
    if !state.commit(ActionKind::AddShape, vec![EditOp::InsertShape { index, shape }]) {
        return None;
    }
    log::info!("Shape {} ({}) angelegt", id, kind);
    Some(id)
}

/// Entfernt eine Shape. Jede berührende Verbindung wird vorher als eigener
/// Undo-Schritt entfernt, danach die Shape selbst.
pub fn remove_shape(state: &mut EditorState, id: u64) -> bool {
    if !state.diagram.contains_shape(id) {
        log::warn!("Shape {} existiert nicht, nichts entfernt", id);
        return false;
    }

    let connection_ids: Vec<u64> = state
        .diagram
        .connections_of(id)
        .iter()
        .map(|c| c.id)
        .collect();
    for connection_id in &connection_ids {
        super::remove_connection(state, *connection_id);
    }

    let (Some(index), Some(shape)) = (state.diagram.shape_index(id), state.diagram.shape(id).cloned())
    else {
        return false;
    };
    if !state.commit(ActionKind::RemoveShape, vec![EditOp::RemoveShape { index, shape }]) {
        return false;
    }
    log::info!(
        "Shape {} entfernt ({} Verbindungen mitentfernt)",
        id,
        connection_ids.len()
    );
    true
}

/// Führt die gesetzten Felder des Patches in die Shape zusammen.
///
/// Gesperrte Shapes behalten ihre Position; ungültige Größen und leere
/// Farben werden ignoriert.
pub fn update_shape(state: &mut EditorState, id: u64, patch: ShapePatch) -> bool {
    if patch.is_empty() {
        log::debug!("Leerer Patch für Shape {}", id);
        return false;
    }
    if let Some(kind) = &patch.kind {
        if !state.geometry.is_registered(kind) {
            log::warn!("Shape-Typ '{}' ist nicht registriert, Typ bleibt unverändert", kind);
        }
    }
    let registered_kind = patch
        .kind
        .clone()
        .filter(|kind| state.geometry.is_registered(kind));

    modify_shape(state, id, ActionKind::UpdateShape, |shape| {
        if let Some(kind) = registered_kind {
            shape.kind = kind;
        }
        if let Some(position) = patch.position {
            if shape.locked {
                log::warn!("Shape {} ist gesperrt, Position bleibt unverändert", id);
            } else if !position.is_finite() {
                log::warn!("Nicht endliche Position für Shape {} ignoriert", id);
            } else {
                shape.position = position;
            }
        }
        if let Some(width) = patch.width {
            if width.is_finite() && width > 0.0 {
                shape.size.x = width;
            } else {
                log::warn!("Ungültige Breite {} für Shape {} ignoriert", width, id);
            }
        }
        if let Some(height) = patch.height {
            if height.is_finite() && height > 0.0 {
                shape.size.y = height;
            } else {
                log::warn!("Ungültige Höhe {} für Shape {} ignoriert", height, id);
            }
        }
        if let Some(title) = patch.title {
            shape.title = title;
        }
        if let Some(body) = patch.body {
            shape.body = body;
        }
        if let Some(color) = patch.fill_color.filter(|c| valid_color(c, "Shape", id)) {
            shape.style.fill_color = color;
        }
        if let Some(color) = patch.border_color.filter(|c| valid_color(c, "Shape", id)) {
            shape.style.border_color = color;
        }
        if let Some(color) = patch.text_color.filter(|c| valid_color(c, "Shape", id)) {
            shape.style.text_color = color;
        }
        if let Some(editable) = patch.editable {
            shape.editable = editable;
        }
    })
}

/// Wechselt den Shape-Typ. Nicht registrierte Typen werden abgelehnt.
pub fn change_shape_type(state: &mut EditorState, id: u64, kind: ShapeKind) -> bool {
    if !state.geometry.is_registered(&kind) {
        log::warn!("Shape-Typ '{}' ist nicht registriert", kind);
        return false;
    }
    let changed = modify_shape(state, id, ActionKind::ChangeShapeType, |shape| {
        shape.kind = kind.clone();
    });
    if changed {
        log::info!("Shape {} ist jetzt vom Typ '{}'", id, kind);
    }
    changed
}

/// Setzt Titel oder Text einer Shape.
pub fn set_shape_text(state: &mut EditorState, id: u64, field: TextField, text: &str) -> bool {
    modify_shape(state, id, ActionKind::SetShapeText, |shape| {
        *shape.text_mut(field) = text.to_string();
    })
}

/// Ändert die Reihenfolge-Metadaten (Nummer, Start, Ende).
pub fn set_shape_order(state: &mut EditorState, id: u64, patch: OrderPatch) -> bool {
    modify_shape(state, id, ActionKind::SetShapeOrder, |shape| {
        if let Some(order) = patch.order {
            shape.order.order = order;
        }
        if let Some(is_start) = patch.is_start {
            shape.order.is_start = is_start;
        }
        if let Some(is_end) = patch.is_end {
            shape.order.is_end = is_end;
        }
    })
}

/// Holt eine Shape in den Vordergrund (ans Ende der Zeichenreihenfolge).
pub fn bring_to_front(state: &mut EditorState, id: u64) -> bool {
    let last = state.diagram.shape_count().saturating_sub(1);
    reorder_shape(state, id, last, ActionKind::BringToFront)
}

/// Schickt eine Shape in den Hintergrund (an den Anfang der Zeichenreihenfolge).
pub fn bring_to_back(state: &mut EditorState, id: u64) -> bool {
    reorder_shape(state, id, 0, ActionKind::BringToBack)
}

fn reorder_shape(state: &mut EditorState, id: u64, to: usize, action: ActionKind) -> bool {
    let Some(from) = state.diagram.shape_index(id) else {
        log::warn!("Shape {} existiert nicht ({})", id, action);
        return false;
    };
    if from == to {
        log::debug!("Shape {} liegt bereits an Position {}", id, to);
        return false;
    }
    if !state.commit(action, vec![EditOp::ReorderShape { id, from, to }]) {
        return false;
    }
    log::info!("Shape {} von Ebene {} nach {} verschoben", id, from, to);
    true
}

/// Sperrt eine Shape (nicht mehr verschiebbar, nicht editierbar).
pub fn lock_shape(state: &mut EditorState, id: u64) -> bool {
    modify_shape(state, id, ActionKind::LockShape, |shape| {
        shape.locked = true;
        shape.editable = false;
    })
}

/// Entsperrt eine Shape und macht sie editierbar.
pub fn unlock_shape(state: &mut EditorState, id: u64) -> bool {
    modify_shape(state, id, ActionKind::UnlockShape, |shape| {
        shape.locked = false;
        shape.editable = true;
    })
}

/// Sperrt alle Shapes in einem History-Eintrag.
pub fn lock_all_shapes(state: &mut EditorState) -> usize {
    set_all_locked(state, true)
}

/// Entsperrt alle Shapes in einem History-Eintrag.
pub fn unlock_all_shapes(state: &mut EditorState) -> usize {
    set_all_locked(state, false)
}

fn set_all_locked(state: &mut EditorState, locked: bool) -> usize {
    let ops: Vec<EditOp> = state
        .diagram
        .shapes()
        .filter(|s| s.locked != locked || s.editable == locked)
        .map(|before| {
            let mut after = before.clone();
            after.locked = locked;
            after.editable = !locked;
            EditOp::ReplaceShape {
                before: before.clone(),
                after,
            }
        })
        .collect();
    let count = ops.len();
    if count == 0 {
        log::debug!("Alle Shapes bereits {}", if locked { "gesperrt" } else { "entsperrt" });
        return 0;
    }
    let action = if locked {
        ActionKind::LockAllShapes
    } else {
        ActionKind::UnlockAllShapes
    };
    state.commit(action, ops);
    log::info!(
        "{} Shapes {}",
        count,
        if locked { "gesperrt" } else { "entsperrt" }
    );
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::{DiagramEvent, EventKind};
    use crate::app::use_cases::history::{redo, undo};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn three_shapes() -> EditorState {
        let mut state = EditorState::new();
        for x in [0.0, 300.0, 600.0] {
            add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::new(x, 0.0)))
                .expect("Shape");
        }
        state
    }

    #[test]
    fn bring_to_front_and_back_reorder_with_undo() {
        let mut state = three_shapes();
        assert!(bring_to_front(&mut state, 1));
        assert_eq!(state.diagram.shape_ids(), vec![2, 3, 1]);
        assert!(bring_to_back(&mut state, 3));
        assert_eq!(state.diagram.shape_ids(), vec![3, 2, 1]);
        assert_eq!(state.history.peek_undo(), Some(ActionKind::BringToBack));

        assert!(undo(&mut state));
        assert!(undo(&mut state));
        assert_eq!(state.diagram.shape_ids(), vec![1, 2, 3]);
        assert!(redo(&mut state));
        assert_eq!(state.diagram.shape_ids(), vec![2, 3, 1]);
    }

    #[test]
    fn reorder_in_place_records_nothing() {
        let mut state = three_shapes();
        let undo_before = state.history.undo_len();
        assert!(!bring_to_front(&mut state, 3));
        assert!(!bring_to_back(&mut state, 1));
        assert!(!bring_to_front(&mut state, 99));
        assert_eq!(state.history.undo_len(), undo_before);
    }

    #[test]
    fn reorder_reports_shape_update() {
        let mut state = three_shapes();
        let updated = Rc::new(RefCell::new(Vec::new()));
        let u = Rc::clone(&updated);
        state.bus().on(EventKind::ShapeUpdated, move |event| {
            if let DiagramEvent::ShapeUpdated { shape } = event {
                u.borrow_mut().push(shape.id);
            }
            Ok(())
        });
        bring_to_back(&mut state, 2);
        assert_eq!(*updated.borrow(), vec![2]);
    }
}
