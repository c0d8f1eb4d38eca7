//! Integrationstests für Undo/Redo:
//! - Roundtrip über beliebige Mutationsfolgen
//! - Redo-Stack wird durch neue Mutationen verworfen
//! - Begrenzte Tiefe

use diagram_editor::app::use_cases::editing::{
    add_connection, add_shape, begin_move_shape, change_shape_type, end_move_shape,
    lock_all_shapes, move_shape, remove_connection, remove_shape, set_connection_label,
    set_shape_fill_color, set_shape_text, update_shape,
};
use diagram_editor::app::use_cases::history::{redo, undo};
use diagram_editor::app::use_cases::layout::{distribute_shapes, move_diagram, DistributeAxis};
use diagram_editor::core::{ShapePatch, TextField};
use diagram_editor::{
    ActionKind, ConnectionOptions, Diagram, DiagramEvent, EditorOptions, EditorState, EventKind,
    ShapeDraft, ShapeKind,
};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

fn unlocked_state() -> EditorState {
    EditorState::with_options(EditorOptions {
        new_shapes_locked: false,
        ..EditorOptions::default()
    })
}

/// Führt eine feste Mutationsfolge aus und liefert den Zustand nach jedem Schritt.
fn run_mutations(state: &mut EditorState) -> Vec<Diagram> {
    let mut steps = vec![state.diagram.clone()];
    let record = |state: &EditorState, steps: &mut Vec<Diagram>| {
        assert_eq!(state.history.undo_len(), steps.len(), "genau ein Eintrag pro Schritt");
        steps.push(state.diagram.clone());
    };

    let a = add_shape(state, ShapeDraft::new(ShapeKind::Square, Vec2::ZERO)).expect("a");
    record(state, &mut steps);
    let b = add_shape(state, ShapeDraft::new(ShapeKind::Circle, Vec2::new(300.0, 0.0)))
        .expect("b");
    record(state, &mut steps);
    let c = add_shape(state, ShapeDraft::new(ShapeKind::Octagon, Vec2::new(0.0, 300.0)))
        .expect("c");
    record(state, &mut steps);
    let ab = add_connection(state, a, b, ConnectionOptions::default().with_kind("elbow"))
        .expect("ab");
    record(state, &mut steps);
    add_connection(state, b, c, ConnectionOptions::default()).expect("bc");
    record(state, &mut steps);
    assert!(set_shape_fill_color(state, a, "#ff0000"));
    record(state, &mut steps);
    assert!(update_shape(state, b, ShapePatch::position(Vec2::new(400.0, 100.0))));
    record(state, &mut steps);
    assert!(set_connection_label(state, ab, Some("ja".into())));
    record(state, &mut steps);
    assert!(change_shape_type(state, c, ShapeKind::Triangle));
    record(state, &mut steps);
    assert!(set_shape_text(state, c, TextField::Body, "Details"));
    record(state, &mut steps);
    assert!(begin_move_shape(state, a));
    move_shape(state, a, Vec2::new(100.0, 0.0));
    move_shape(state, a, Vec2::new(-200.0, -100.0));
    assert!(end_move_shape(state, a));
    record(state, &mut steps);
    assert_eq!(move_diagram(state, Vec2::new(100.0, 100.0)), 3);
    record(state, &mut steps);
    assert!(distribute_shapes(state, DistributeAxis::Horizontal) > 0);
    record(state, &mut steps);
    assert!(remove_connection(state, ab));
    record(state, &mut steps);
    assert_eq!(lock_all_shapes(state), 3);
    record(state, &mut steps);
    let d = add_shape(state, ShapeDraft::new(ShapeKind::Square, Vec2::new(900.0, 900.0)))
        .expect("d");
    record(state, &mut steps);
    assert!(remove_shape(state, d));
    record(state, &mut steps);

    steps
}

#[test]
fn test_undo_redo_roundtrip_restores_every_step() {
    let mut state = unlocked_state();
    let steps = run_mutations(&mut state);
    let n = steps.len() - 1;

    for i in (0..n).rev() {
        assert!(undo(&mut state), "Undo {} fehlgeschlagen", i);
        assert_eq!(state.diagram, steps[i], "Zustand nach Undo bis Schritt {}", i);
    }
    assert!(!state.can_undo());

    for (i, expected) in steps.iter().enumerate().skip(1) {
        assert!(redo(&mut state), "Redo {} fehlgeschlagen", i);
        assert_eq!(&state.diagram, expected, "Zustand nach Redo bis Schritt {}", i);
    }
    assert!(!state.can_redo());
}

#[test]
fn test_new_mutation_after_undo_discards_redo() {
    let mut state = unlocked_state();
    let a = add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::ZERO)).expect("a");
    add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::new(300.0, 0.0))).expect("b");

    assert!(undo(&mut state));
    assert!(state.can_redo());
    assert!(set_shape_fill_color(&mut state, a, "#123456"));

    let before = state.diagram.clone();
    assert!(!redo(&mut state));
    assert_eq!(state.diagram, before);
    assert_eq!(state.shape_count(), 1);
}

#[test]
fn test_undo_depth_is_bounded() {
    let mut state = EditorState::with_options(EditorOptions {
        max_undo: 5,
        ..EditorOptions::default()
    });
    for i in 0..8 {
        add_shape(
            &mut state,
            ShapeDraft::new(ShapeKind::Square, Vec2::new(i as f32 * 100.0, 0.0)),
        )
        .expect("Shape");
    }
    assert_eq!(state.history.undo_len(), 5);

    while undo(&mut state) {}
    // die ältesten drei Einträge sind verworfen
    assert_eq!(state.shape_count(), 3);
}

#[test]
fn test_undo_and_redo_emit_events() {
    let mut state = unlocked_state();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in [EventKind::UndoApplied, EventKind::RedoApplied] {
        let s = Rc::clone(&seen);
        state.bus().on(kind, move |event| {
            s.borrow_mut().push(event.clone());
            Ok(())
        });
    }

    add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::ZERO)).expect("a");
    undo(&mut state);
    redo(&mut state);

    assert_eq!(
        *seen.borrow(),
        vec![
            DiagramEvent::UndoApplied {
                action: ActionKind::AddShape
            },
            DiagramEvent::RedoApplied {
                action: ActionKind::AddShape
            },
        ]
    );
}

#[test]
fn test_undo_of_cascaded_remove_restores_connections_stepwise() {
    let mut state = unlocked_state();
    let a = add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::ZERO)).expect("a");
    let b = add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::new(300.0, 0.0)))
        .expect("b");
    let c = add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::new(600.0, 0.0)))
        .expect("c");
    add_connection(&mut state, a, b, ConnectionOptions::default()).expect("ab");
    add_connection(&mut state, b, c, ConnectionOptions::default()).expect("bc");
    let before = state.diagram.clone();

    remove_shape(&mut state, b);
    assert_eq!(state.connection_count(), 0);

    assert!(undo(&mut state));
    assert!(state.diagram.contains_shape(b));
    assert_eq!(state.connection_count(), 0);
    assert!(undo(&mut state));
    assert_eq!(state.connection_count(), 1);
    assert!(undo(&mut state));
    assert_eq!(state.diagram, before);
}
