//! Use-Case: Snapshot-Import und -Export.
//!
//! Der Import ersetzt den kompletten Inhalt in einem History-Eintrag.
//! Kollidierende IDs werden neu vergeben und Verbindungen entsprechend
//! umgeschrieben.

use super::layout::clear_ops;
use crate::app::events::{DiagramEvent, ImportCounts};
use crate::app::history::{ActionKind, EditOp};
use crate::app::EditorState;
use crate::core::{DiagramSnapshot, SnapshotError};
use anyhow::Context;
use std::collections::{HashMap, HashSet};

/// Ergebnis eines Imports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub counts: ImportCounts,
    /// Neu vergebene Shape-IDs als `(alt, neu)`
    pub remapped_shapes: Vec<(u64, u64)>,
    /// Neu vergebene Verbindungs-IDs als `(alt, neu)`
    pub remapped_connections: Vec<(u64, u64)>,
}

/// Ersetzt den Diagramm-Inhalt durch den Snapshot.
///
/// Der Snapshot wird vollständig geprüft, bevor das Diagramm angefasst wird.
/// Verbindungen mit unbekanntem Endpunkt oder Self-Loop werden übersprungen
/// und gezählt.
pub fn import_state(
    state: &mut EditorState,
    snapshot: DiagramSnapshot,
) -> Result<ImportReport, SnapshotError> {
    snapshot.validate()?;
    state.finish_drag();

    let mut ops = clear_ops(state);
    let mut report = ImportReport::default();

    // Alle Snapshot-IDs reservieren, damit frische IDs darüber liegen
    for shape in &snapshot.shapes {
        state.diagram.reserve_shape_id(shape.id);
    }
    for connection in &snapshot.connections {
        state.diagram.reserve_connection_id(connection.id);
    }

    let mut taken_shapes: HashSet<u64> = state.diagram.shape_ids().into_iter().collect();
    let mut id_map: HashMap<u64, u64> = HashMap::new();
    for mut shape in snapshot.shapes {
        let old_id = shape.id;
        if taken_shapes.contains(&old_id) {
            let Some(fresh) = state.diagram.allocate_shape_id() else {
                log::warn!("Shape {} übersprungen: keine freie Shape-ID mehr", old_id);
                report.counts.skipped_shapes += 1;
                continue;
            };
            shape.id = fresh;
            report.remapped_shapes.push((old_id, shape.id));
            log::info!("Shape-ID {} vergeben, importiert als {}", old_id, shape.id);
        }
        taken_shapes.insert(shape.id);
        id_map.insert(old_id, shape.id);

        shape.position = state.snap(shape.position);
        shape.connections.clear();
        state.derive_outline(&mut shape);
        let index = report.counts.shapes;
        ops.push(EditOp::InsertShape { index, shape });
        report.counts.shapes += 1;
    }

    let mut taken_connections: HashSet<u64> =
        state.diagram.connection_ids().into_iter().collect();
    for mut connection in snapshot.connections {
        let endpoints = (id_map.get(&connection.from), id_map.get(&connection.to));
        let (Some(&from), Some(&to)) = endpoints else {
            log::warn!(
                "Verbindung {} übersprungen: Endpunkt {} oder {} fehlt im Snapshot",
                connection.id,
                connection.from,
                connection.to
            );
            report.counts.skipped_connections += 1;
            continue;
        };
        if from == to {
            log::warn!("Verbindung {} übersprungen: Self-Loop", connection.id);
            report.counts.skipped_connections += 1;
            continue;
        }

        let old_id = connection.id;
        if taken_connections.contains(&old_id) {
            let Some(fresh) = state.diagram.allocate_connection_id() else {
                log::warn!("Verbindung {} übersprungen: keine freie Verbindungs-ID mehr", old_id);
                report.counts.skipped_connections += 1;
                continue;
            };
            connection.id = fresh;
            report.remapped_connections.push((old_id, connection.id));
        }
        taken_connections.insert(connection.id);

        connection.from = from;
        connection.to = to;
        connection.path.clear();
        let index = report.counts.connections;
        ops.push(EditOp::InsertConnection { index, connection });
        report.counts.connections += 1;
    }

    state.commit(ActionKind::Import, ops);
    log::info!(
        "Import: {} Shapes, {} Verbindungen ({} Shapes, {} Verbindungen übersprungen)",
        report.counts.shapes,
        report.counts.connections,
        report.counts.skipped_shapes,
        report.counts.skipped_connections
    );
    state.emit(DiagramEvent::DiagramImported {
        counts: report.counts,
    });
    state.emit(DiagramEvent::RedrawHint);
    Ok(report)
}

/// Parst JSON und importiert es.
pub fn import_json(state: &mut EditorState, json: &str) -> Result<ImportReport, SnapshotError> {
    let snapshot = DiagramSnapshot::from_json(json)?;
    import_state(state, snapshot)
}

/// Erstellt einen Snapshot des aktuellen Inhalts und meldet `diagram:exported`.
pub fn export_state(state: &EditorState) -> DiagramSnapshot {
    let snapshot = DiagramSnapshot::capture(&state.diagram);
    log::info!(
        "Export: {} Shapes, {} Verbindungen",
        snapshot.shapes.len(),
        snapshot.connections.len()
    );
    state.emit(DiagramEvent::DiagramExported {
        snapshot: snapshot.clone(),
    });
    snapshot
}

/// Exportiert als formatiertes JSON.
pub fn export_json(state: &EditorState) -> anyhow::Result<String> {
    export_state(state)
        .to_json_pretty()
        .context("Snapshot konnte nicht serialisiert werden")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{add_connection, add_shape};
    use crate::app::use_cases::history::undo;
    use crate::core::{ConnectionOptions, ShapeDraft, ShapeKind};
    use glam::Vec2;

    fn populated() -> EditorState {
        let mut state = EditorState::new();
        let a = add_shape(&mut state, ShapeDraft::new(ShapeKind::Square, Vec2::ZERO)).expect("a");
        let b = add_shape(&mut state, ShapeDraft::new(ShapeKind::Circle, Vec2::new(300.0, 0.0)))
            .expect("b");
        add_connection(&mut state, a, b, ConnectionOptions::default().with_label("ja"))
            .expect("ab");
        state
    }

    #[test]
    fn export_then_import_into_fresh_state() {
        let source = populated();
        let json = export_json(&source).expect("Export");

        let mut target = EditorState::new();
        let report = import_json(&mut target, &json).expect("Import");
        assert_eq!(report.counts.shapes, 2);
        assert_eq!(report.counts.connections, 1);
        assert!(report.remapped_shapes.is_empty());
        assert_eq!(target.diagram, source.diagram);
    }

    #[test]
    fn invalid_snapshot_leaves_state_untouched() {
        let mut state = populated();
        let before = state.diagram.clone();
        let mut snapshot = export_state(&state);
        snapshot.shapes[0].size = Vec2::new(0.0, 10.0);

        let result = import_state(&mut state, snapshot);
        assert!(matches!(result, Err(SnapshotError::InvalidSize { .. })));
        assert_eq!(state.diagram, before);
    }

    #[test]
    fn dangling_connections_are_skipped() {
        let mut state = EditorState::new();
        let mut snapshot = export_state(&populated());
        snapshot.connections[0].to = 77;

        let report = import_state(&mut state, snapshot).expect("Import");
        assert_eq!(report.counts.skipped_connections, 1);
        assert_eq!(state.connection_count(), 0);
    }

    #[test]
    fn import_is_one_undo_step() {
        let mut state = populated();
        let before = state.diagram.clone();
        let undo_before = state.history.undo_len();
        let snapshot = export_state(&populated());

        import_state(&mut state, snapshot).expect("Import");
        assert_eq!(state.history.undo_len(), undo_before + 1);
        assert!(undo(&mut state));
        assert_eq!(state.diagram, before);
    }

    #[test]
    fn exhausted_id_space_skips_colliding_shapes() {
        let mut state = EditorState::new();
        let mut draft = ShapeDraft::new(ShapeKind::Square, Vec2::ZERO);
        draft.id = Some(u64::MAX);
        add_shape(&mut state, draft).expect("Shape mit maximaler ID");
        let mut snapshot = export_state(&populated());
        snapshot.shapes[0].id = u64::MAX;
        snapshot.connections[0].from = u64::MAX;

        let report = import_state(&mut state, snapshot).expect("Import");
        assert_eq!(report.counts.skipped_shapes, 1);
        assert_eq!(report.counts.shapes, 1);
        assert_eq!(report.counts.skipped_connections, 1);
        assert_eq!(state.shape_count(), 1);
        assert!(!state.diagram.contains_shape(u64::MAX));
    }
}
