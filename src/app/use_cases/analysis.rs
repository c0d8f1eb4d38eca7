//! Use-Case: Auswertungen über dem Diagramm (ohne Mutation).

use crate::app::EditorState;
use crate::core::{Bounds, Shape};
use glam::Vec2;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Ergebnis einer Konsistenzprüfung.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub messages: Vec<String>,
}

/// Prüft Endpunkte und Verbindungsmengen aller Shapes.
pub fn validate_diagram(state: &EditorState) -> ValidationReport {
    let diagram = &state.diagram;
    let mut messages = Vec::new();

    for connection in diagram.connections() {
        for (end, id) in [("from", connection.from), ("to", connection.to)] {
            if !diagram.contains_shape(id) {
                messages.push(format!(
                    "Verbindung {}: Endpunkt '{}' verweist auf fehlende Shape {}",
                    connection.id, end, id
                ));
            }
        }
        if connection.from == connection.to {
            messages.push(format!("Verbindung {} ist ein Self-Loop", connection.id));
        }
    }

    for shape in diagram.shapes() {
        let expected: BTreeSet<u64> = diagram
            .connections()
            .filter(|c| c.touches(shape.id))
            .map(|c| c.id)
            .collect();
        if expected != shape.connections {
            messages.push(format!(
                "Shape {}: Verbindungsmenge {:?} erwartet, {:?} gefunden",
                shape.id, expected, shape.connections
            ));
        }
        if !shape.is_finite() {
            messages.push(format!("Shape {}: nicht endliche Geometrie", shape.id));
        }
    }

    for message in &messages {
        log::warn!("{}", message);
    }
    ValidationReport {
        valid: messages.is_empty(),
        messages,
    }
}

/// Shapes ohne Verbindung, in Diagramm-Reihenfolge.
pub fn unconnected_shapes(state: &EditorState) -> Vec<u64> {
    state
        .diagram
        .shapes()
        .filter(|s| s.connections.is_empty())
        .map(|s| s.id)
        .collect()
}

/// Titel, die mehrfach vorkommen (getrimmt, ohne Groß-/Kleinschreibung).
///
/// Jeder Titel erscheint einmal in der Schreibweise seines ersten Auftretens,
/// sortiert nach dem Zeitpunkt, an dem die Dopplung erkannt wurde.
/// Leere Titel zählen nicht.
pub fn find_duplicate_shape_titles(state: &EditorState) -> Vec<String> {
    let mut first_seen: HashMap<String, &str> = HashMap::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for shape in state.diagram.shapes() {
        let title = shape.title.trim();
        let key = title.to_lowercase();
        if key.is_empty() {
            continue;
        }
        match first_seen.get(&key) {
            Some(first) => {
                if reported.insert(key) {
                    duplicates.push(first.to_string());
                }
            }
            None => {
                first_seen.insert(key, title);
            }
        }
    }
    duplicates
}

/// Shapes nach Reihenfolge-Nummer; Shapes ohne Nummer stabil am Ende.
pub fn shapes_in_order(state: &EditorState) -> Vec<&Shape> {
    let mut shapes: Vec<&Shape> = state.diagram.shapes().collect();
    shapes.sort_by_key(|s| (s.order.order.is_none(), s.order.order));
    shapes
}

/// Als Start markierte Shapes.
pub fn start_shapes(state: &EditorState) -> Vec<&Shape> {
    state
        .diagram
        .shapes()
        .filter(|s| s.order.is_start)
        .collect()
}

/// Paare von Shapes, deren Bounding-Boxen sich überlappen oder berühren.
///
/// Paare stehen in Diagramm-Reihenfolge, `(früher, später)`.
pub fn overlapping_shapes(state: &EditorState) -> Vec<(u64, u64)> {
    let shapes: Vec<(u64, Bounds)> = state.diagram.shapes().map(|s| (s.id, s.bounds())).collect();
    let mut pairs = Vec::new();
    for (i, (a, a_bounds)) in shapes.iter().enumerate() {
        for (b, b_bounds) in &shapes[i + 1..] {
            if a_bounds.intersects(b_bounds) {
                pairs.push((*a, *b));
            }
        }
    }
    pairs
}

/// Verbindungen ohne (nicht leeres) Label.
pub fn unlabeled_connections(state: &EditorState) -> Vec<u64> {
    state
        .diagram
        .connections()
        .filter(|c| c.label.as_deref().map_or(true, |l| l.trim().is_empty()))
        .map(|c| c.id)
        .collect()
}

/// Shapes aufsteigend nach Abstand ihres Mittelpunkts zu `center`.
/// Gleich weit entfernte Shapes behalten die Diagramm-Reihenfolge.
pub fn shapes_by_proximity_to_center(state: &EditorState, center: Vec2) -> Vec<u64> {
    let mut shapes: Vec<(u64, f32)> = state
        .diagram
        .shapes()
        .map(|s| (s.id, s.position.distance(center)))
        .collect();
    shapes.sort_by(|a, b| a.1.total_cmp(&b.1));
    shapes.into_iter().map(|(id, _)| id).collect()
}

/// `(undo, redo)`-Tiefe.
pub fn undo_redo_counts(state: &EditorState) -> (usize, usize) {
    (state.history.undo_len(), state.history.redo_len())
}
