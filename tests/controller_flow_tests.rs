//! Integrationstests für den Command-Fluss über den Controller:
//! - Commands verändern den State und landen im Command-Log
//! - Fehlerpfad beim Import, auch mitten in der Warteschlange
//! - Z-Reihenfolge und Label-Ausrichtung
//! - Export, Plugin-Nachrichten und Render-Szene

use diagram_editor::app::use_cases::analysis::{undo_redo_counts, validate_diagram};
use diagram_editor::app::use_cases::layout::AlignEdge;
use diagram_editor::app::CommandOutcome;
use diagram_editor::core::LabelAlign;
use diagram_editor::{
    ConnectionOptions, DiagramEvent, DiagramSnapshot, EditorCommand, EditorController,
    EditorOptions, EditorState, EventKind, RouteKind, ShapeDraft, ShapeKind,
};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

fn run(controller: &mut EditorController, state: &mut EditorState, commands: Vec<EditorCommand>) {
    for command in commands {
        controller
            .handle_command(state, command)
            .expect("Command sollte gelingen");
    }
}

fn unlocked_state() -> EditorState {
    EditorState::with_options(EditorOptions {
        new_shapes_locked: false,
        ..EditorOptions::default()
    })
}

#[test]
fn test_command_flow_builds_diagram_and_render_scene() {
    let mut controller = EditorController::new();
    let mut state = unlocked_state();

    run(
        &mut controller,
        &mut state,
        vec![
            EditorCommand::AddShape {
                draft: ShapeDraft::new(ShapeKind::Rectangle, Vec2::new(0.0, 0.0))
                    .with_title("Start"),
            },
            EditorCommand::AddShape {
                draft: ShapeDraft::new(ShapeKind::Circle, Vec2::new(310.0, 120.0))
                    .with_title("Ende"),
            },
            EditorCommand::AddConnection {
                from_id: 1,
                to_id: 2,
                options: ConnectionOptions::default().with_label("weiter"),
            },
            EditorCommand::ToggleConnectionKind { id: 1 },
            EditorCommand::AlignShapes {
                edge: AlignEdge::Top,
            },
        ],
    );

    assert_eq!(state.command_log.len(), 5);
    assert!(validate_diagram(&state).valid);
    let end = state.diagram.shape(2).expect("Ende");
    assert_eq!(end.position, Vec2::new(300.0, 0.0));

    let scene = controller.build_render_scene(&state);
    assert_eq!(scene.shapes.len(), 2);
    assert_eq!(scene.connections.len(), 1);
    let connection = &scene.connections[0];
    assert_eq!(connection.path.len(), 3);
    assert_eq!(connection.label.as_deref(), Some("weiter"));
    assert!(connection.label_position.is_some());
    assert_eq!(state.diagram.connection(1).expect("1→2").kind, RouteKind::Elbow);
}

#[test]
fn test_undo_redo_commands() {
    let mut controller = EditorController::new();
    let mut state = unlocked_state();
    run(
        &mut controller,
        &mut state,
        vec![
            EditorCommand::AddShape {
                draft: ShapeDraft::new(ShapeKind::Square, Vec2::ZERO),
            },
            EditorCommand::SetShapeFillColor {
                id: 1,
                color: "#00ff00".into(),
            },
            EditorCommand::Undo,
        ],
    );
    assert_eq!(undo_redo_counts(&state), (1, 1));
    assert_ne!(state.diagram.shape(1).expect("1").style.fill_color, "#00ff00");

    run(&mut controller, &mut state, vec![EditorCommand::Redo]);
    assert_eq!(state.diagram.shape(1).expect("1").style.fill_color, "#00ff00");
}

#[test]
fn test_invalid_import_command_returns_error() {
    let mut controller = EditorController::new();
    let mut state = unlocked_state();
    run(
        &mut controller,
        &mut state,
        vec![EditorCommand::AddShape {
            draft: ShapeDraft::new(ShapeKind::Square, Vec2::ZERO),
        }],
    );
    let before = state.diagram.clone();

    let json = r#"{"shapes":[{"id":1,"kind":"square","position":[0,0],"size":[-5,10]}],"connections":[]}"#;
    let snapshot = DiagramSnapshot::from_json(json).expect("parsebar");
    let result = controller.handle_command(&mut state, EditorCommand::ImportState { snapshot });

    assert!(result.is_err());
    assert_eq!(state.diagram, before);
    // auch fehlgeschlagene Commands stehen im Log
    assert_eq!(state.command_log.len(), 2);
    let last = state.command_log.last().expect("Log-Eintrag");
    assert!(matches!(&last.outcome, CommandOutcome::Failed(reason) if !reason.is_empty()));
    assert_eq!(state.command_log.completed_commands().len(), 1);
}

#[test]
fn test_failing_queued_command_keeps_later_commands() {
    let mut controller = EditorController::new();
    let mut state = unlocked_state();
    let json = r#"{"shapes":[{"id":1,"kind":"square","position":[0,0],"size":[-5,10]}],"connections":[]}"#;
    let snapshot = DiagramSnapshot::from_json(json).expect("parsebar");

    let queue = state.command_queue().clone();
    queue.push(EditorCommand::AddShape {
        draft: ShapeDraft::new(ShapeKind::Square, Vec2::ZERO),
    });
    queue.push(EditorCommand::ImportState { snapshot });
    queue.push(EditorCommand::AddShape {
        draft: ShapeDraft::new(ShapeKind::Circle, Vec2::new(300.0, 0.0)),
    });
    queue.push(EditorCommand::BringToBack { id: 2 });

    let result = controller.process_queued_commands(&mut state);
    assert!(result.is_err());
    assert!(state.command_queue().is_empty());
    assert_eq!(state.diagram.shape_ids(), vec![2, 1]);
    assert_eq!(state.command_log.len(), 4);
    assert_eq!(state.command_log.failures().count(), 1);
}

#[test]
fn test_z_order_and_label_alignment_commands_are_undoable() {
    let mut controller = EditorController::new();
    let mut state = unlocked_state();
    run(
        &mut controller,
        &mut state,
        vec![
            EditorCommand::AddShape {
                draft: ShapeDraft::new(ShapeKind::Square, Vec2::ZERO),
            },
            EditorCommand::AddShape {
                draft: ShapeDraft::new(ShapeKind::Circle, Vec2::new(300.0, 0.0)),
            },
            EditorCommand::AddConnection {
                from_id: 1,
                to_id: 2,
                options: ConnectionOptions::default().with_label("weiter"),
            },
            EditorCommand::BringToFront { id: 1 },
            EditorCommand::CycleLabelAlignment { id: 1 },
        ],
    );

    let scene = controller.build_render_scene(&state);
    let drawn: Vec<u64> = scene.shapes.iter().map(|s| s.id).collect();
    assert_eq!(drawn, vec![2, 1]);
    assert_eq!(scene.connections[0].style.label_align, LabelAlign::Right);

    run(
        &mut controller,
        &mut state,
        vec![EditorCommand::Undo, EditorCommand::Undo],
    );
    assert_eq!(state.diagram.shape_ids(), vec![1, 2]);
    assert_eq!(
        state.diagram.connection(1).expect("1→2").style.label_align,
        LabelAlign::Center
    );
}

#[test]
fn test_export_and_clear_commands() {
    let mut controller = EditorController::new();
    let mut state = unlocked_state();
    let exported = Rc::new(RefCell::new(None));
    let e = Rc::clone(&exported);
    state.bus().on(EventKind::DiagramExported, move |event| {
        if let DiagramEvent::DiagramExported { snapshot } = event {
            *e.borrow_mut() = Some(snapshot.clone());
        }
        Ok(())
    });

    run(
        &mut controller,
        &mut state,
        vec![
            EditorCommand::AddShape {
                draft: ShapeDraft::new(ShapeKind::Octagon, Vec2::ZERO),
            },
            EditorCommand::ExportState,
            EditorCommand::ClearDiagram,
        ],
    );

    let snapshot = exported.borrow().clone().expect("Export-Event");
    assert_eq!(snapshot.shapes.len(), 1);
    assert_eq!(state.shape_count(), 0);

    run(
        &mut controller,
        &mut state,
        vec![EditorCommand::ImportState { snapshot }],
    );
    assert_eq!(state.shape_count(), 1);
}

#[test]
fn test_plugin_message_and_hints() {
    let mut controller = EditorController::new();
    let mut state = unlocked_state();
    let received = Rc::new(RefCell::new(Vec::new()));
    for kind in [EventKind::PluginMessage, EventKind::LayoutHint] {
        let r = Rc::clone(&received);
        state.bus().on(kind, move |event| {
            r.borrow_mut().push(event.clone());
            Ok(())
        });
    }

    run(
        &mut controller,
        &mut state,
        vec![
            EditorCommand::BroadcastPluginMessage {
                topic: "layout:auto".into(),
                data: serde_json::json!({ "richtung": "rechts" }),
            },
            EditorCommand::BroadcastPluginMessage {
                topic: "  ".into(),
                data: serde_json::Value::Null,
            },
            EditorCommand::RequestLayoutHint,
        ],
    );

    assert_eq!(
        *received.borrow(),
        vec![
            DiagramEvent::PluginMessage {
                topic: "layout:auto".into(),
                data: serde_json::json!({ "richtung": "rechts" }),
            },
            DiagramEvent::LayoutHint,
        ]
    );
}

#[test]
fn test_drag_commands_record_single_entry() {
    let mut controller = EditorController::new();
    let mut state = unlocked_state();
    run(
        &mut controller,
        &mut state,
        vec![
            EditorCommand::AddShape {
                draft: ShapeDraft::new(ShapeKind::Square, Vec2::ZERO),
            },
            EditorCommand::BeginMoveShape { id: 1 },
            EditorCommand::MoveShape {
                id: 1,
                position: Vec2::new(120.0, 40.0),
            },
            EditorCommand::MoveShape {
                id: 1,
                position: Vec2::new(260.0, 210.0),
            },
            EditorCommand::EndMoveShape { id: 1 },
        ],
    );

    assert_eq!(state.history.undo_len(), 2);
    assert_eq!(
        state.diagram.shape(1).expect("1").position,
        Vec2::new(300.0, 200.0)
    );
    run(&mut controller, &mut state, vec![EditorCommand::Undo]);
    assert_eq!(state.diagram.shape(1).expect("1").position, Vec2::ZERO);
}
