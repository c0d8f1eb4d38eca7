//! Integrationstests für Import/Export:
//! - ID-Kollisionen beim Import
//! - JSON-Format des Snapshots
//! - Events und Fehlerfälle

use diagram_editor::app::use_cases::editing::{add_connection, add_shape};
use diagram_editor::app::use_cases::transfer::{export_json, export_state, import_json, import_state};
use diagram_editor::core::SnapshotError;
use diagram_editor::{
    ConnectionOptions, DiagramEvent, DiagramSnapshot, EditorState, EventKind, RouteKind,
    ShapeDraft, ShapeKind,
};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

const SNAPSHOT_JSON: &str = r##"{
  "shapes": [
    { "id": 1, "kind": "square", "position": [0, 0], "size": [80, 50], "title": "Start" },
    { "id": 7, "kind": "hexagon", "position": [310, 40], "size": [80, 50], "fill_color": "#ff0000" }
  ],
  "connections": [
    { "id": 3, "from": 1, "to": 7, "kind": "elbow", "label": "weiter" }
  ]
}"##;

#[test]
fn test_import_collision_remaps_shape_and_rewrites_connections() {
    let mut state = EditorState::new();
    let existing = add_shape(&mut state, ShapeDraft::new(ShapeKind::Circle, Vec2::ZERO))
        .expect("bestehende Shape");
    assert_eq!(existing, 1);

    let report = import_json(&mut state, SNAPSHOT_JSON).expect("Import sollte gelingen");

    assert_eq!(report.remapped_shapes.len(), 1);
    let (old, new) = report.remapped_shapes[0];
    assert_eq!(old, 1);
    assert_ne!(new, 1);
    assert_ne!(new, 7);

    assert_eq!(state.shape_count(), 2);
    assert!(state.diagram.contains_shape(new));
    assert!(state.diagram.contains_shape(7));
    assert!(!state.diagram.contains_shape(1));

    let connection = state.diagram.connection(3).expect("Verbindung 3");
    assert_eq!(connection.from, new);
    assert_eq!(connection.to, 7);
    assert_eq!(connection.kind, RouteKind::Elbow);
    assert_eq!(connection.label.as_deref(), Some("weiter"));
}

#[test]
fn test_import_snaps_and_keeps_unknown_kind_tags() {
    let mut state = EditorState::new();
    import_json(&mut state, SNAPSHOT_JSON).expect("Import");

    let shape = state.diagram.shape(7).expect("Shape 7");
    assert_eq!(shape.position, Vec2::new(300.0, 0.0));
    assert_eq!(shape.kind, ShapeKind::Custom("hexagon".into()));
    // ohne registrierten Umriss: Rechteck
    assert_eq!(shape.outline.len(), 4);
    assert_eq!(shape.style.fill_color, "#ff0000");

    let start = state.diagram.shape(1).expect("Shape 1");
    assert_eq!(start.title, "Start");
    assert_eq!(start.style.fill_color, "#f9fafb");
}

#[test]
fn test_export_contains_shapes_and_connections() {
    let mut state = EditorState::new();
    let a = add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::ZERO)).expect("a");
    let b = add_shape(&mut state, ShapeDraft::new(ShapeKind::Triangle, Vec2::new(300.0, 0.0)))
        .expect("b");
    add_connection(&mut state, a, b, ConnectionOptions::default()).expect("ab");

    let json = export_json(&state).expect("Export");
    let value: serde_json::Value = serde_json::from_str(&json).expect("gültiges JSON");
    assert_eq!(value["shapes"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["connections"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["shapes"][1]["kind"], "triangle");
    assert_eq!(value["connections"][0]["kind"], "straight");
    assert_eq!(value["connections"][0]["from_side"], "auto");
    // abgeleitete Geometrie wird nicht exportiert
    assert!(value["shapes"][0].get("outline").is_none());
    assert!(value["connections"][0].get("path").is_none());
}

#[test]
fn test_import_and_export_emit_events() {
    let mut state = EditorState::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    for kind in [EventKind::DiagramImported, EventKind::DiagramExported] {
        let e = Rc::clone(&events);
        state.bus().on(kind, move |event| {
            e.borrow_mut().push(event.kind());
            Ok(())
        });
    }

    import_json(&mut state, SNAPSHOT_JSON).expect("Import");
    export_state(&state);

    assert_eq!(
        *events.borrow(),
        vec![EventKind::DiagramImported, EventKind::DiagramExported]
    );
}

#[test]
fn test_import_reports_counts_in_event() {
    let mut state = EditorState::new();
    let counts = Rc::new(RefCell::new(None));
    let c = Rc::clone(&counts);
    state.bus().on(EventKind::DiagramImported, move |event| {
        if let DiagramEvent::DiagramImported { counts } = event {
            *c.borrow_mut() = Some(*counts);
        }
        Ok(())
    });

    let mut snapshot = DiagramSnapshot::from_json(SNAPSHOT_JSON).expect("parse");
    snapshot.connections.push(snapshot.connections[0].clone());
    snapshot.connections[1].to = 1;
    snapshot.connections[1].id = 4;

    let report = import_state(&mut state, snapshot).expect("Import");
    assert_eq!(report.counts.skipped_connections, 1);
    let event_counts = counts.borrow().expect("Event empfangen");
    assert_eq!(event_counts.shapes, 2);
    assert_eq!(event_counts.connections, 1);
    assert_eq!(event_counts.skipped_connections, 1);
}

#[test]
fn test_malformed_json_is_rejected_without_changes() {
    let mut state = EditorState::new();
    add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::ZERO)).expect("a");
    let before = state.diagram.clone();

    let result = import_json(&mut state, "{ \"shapes\": [ }");
    assert!(matches!(result, Err(SnapshotError::Json(_))));

    let empty_color = SNAPSHOT_JSON.replace("#ff0000", "");
    let result = import_json(&mut state, &empty_color);
    assert!(matches!(result, Err(SnapshotError::EmptyColor { id: 7, .. })));
    assert_eq!(state.diagram, before);
}
