//! Use-Case: Undo/Redo.

use crate::app::events::DiagramEvent;
use crate::app::EditorState;

/// Macht den letzten Schritt rückgängig. Ein offener Drag wird vorher abgeschlossen.
pub fn undo(state: &mut EditorState) -> bool {
    state.finish_drag();
    let Some((action, ops)) = state.history.pop_undo() else {
        log::debug!("Undo: nichts zu tun");
        return false;
    };
    for op in &ops {
        state.apply_op(op);
    }
    log::info!("Undo ausgeführt: {}", action);
    state.emit(DiagramEvent::UndoApplied { action });
    true
}

/// Wendet den zuletzt rückgängig gemachten Schritt erneut an.
pub fn redo(state: &mut EditorState) -> bool {
    state.finish_drag();
    let Some((action, ops)) = state.history.pop_redo() else {
        log::debug!("Redo: nichts zu tun");
        return false;
    };
    for op in &ops {
        state.apply_op(op);
    }
    log::info!("Redo ausgeführt: {}", action);
    state.emit(DiagramEvent::RedoApplied { action });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{add_shape, remove_shape, set_shape_fill_color};
    use crate::core::{ShapeDraft, ShapeKind};
    use glam::Vec2;

    #[test]
    fn empty_stacks_are_no_ops() {
        let mut state = EditorState::new();
        assert!(!undo(&mut state));
        assert!(!redo(&mut state));
    }

    #[test]
    fn redo_after_new_mutation_is_no_op() {
        let mut state = EditorState::new();
        let a = add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::ZERO)).expect("a");
        set_shape_fill_color(&mut state, a, "#ff0000");
        assert!(undo(&mut state));
        assert!(state.can_redo());

        set_shape_fill_color(&mut state, a, "#00ff00");
        assert!(!state.can_redo());
        assert!(!redo(&mut state));
        assert_eq!(state.diagram.shape(a).expect("a").style.fill_color, "#00ff00");
    }

    #[test]
    fn undo_remove_restores_position_in_order() {
        let mut state = EditorState::new();
        let ids: Vec<u64> = (0..3)
            .map(|i| {
                add_shape(
                    &mut state,
                    ShapeDraft::new(ShapeKind::Square, Vec2::new(i as f32 * 200.0, 0.0)),
                )
                .expect("Shape")
            })
            .collect();
        remove_shape(&mut state, ids[1]);
        assert!(undo(&mut state));
        assert_eq!(state.diagram.shape_ids(), ids);
    }
}
