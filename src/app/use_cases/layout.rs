//! Use-Case: Ausrichten, Verteilen und Verschieben mehrerer Shapes.
//!
//! Jede Operation wirkt nur auf entsperrte Shapes, rastet die Ergebnisse ein
//! und landet als genau ein History-Eintrag in der Undo-History. Danach wird
//! `plugin:hint:redraw` gemeldet.

use crate::app::events::DiagramEvent;
use crate::app::history::{ActionKind, EditOp};
use crate::app::EditorState;
use crate::core::Bounds;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Kante, an der ausgerichtet wird. `Top` ist die kleinste y-Koordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl AlignEdge {
    /// Parst `left`/`right`/`top`/`bottom`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Achse für gleichmäßiges Verteilen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

impl DistributeAxis {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }
}

/// Richtet alle entsperrten Shapes an der äußersten Kante aus.
///
/// Bei `Left` wandert die linke Kante jeder Shape auf die kleinste linke
/// Kante aller entsperrten Shapes; die anderen Kanten entsprechend.
/// Gibt die Anzahl bewegter Shapes zurück.
pub fn align_shapes(state: &mut EditorState, edge: AlignEdge) -> usize {
    let bounds: Vec<(u64, Vec2, Bounds)> = state
        .diagram
        .unlocked_shapes()
        .map(|s| (s.id, s.position, s.bounds()))
        .collect();
    if bounds.is_empty() {
        log::debug!("Keine entsperrten Shapes zum Ausrichten");
        return 0;
    }

    let edges = bounds.iter().map(|(_, _, b)| match edge {
        AlignEdge::Left => b.min.x,
        AlignEdge::Right => b.max.x,
        AlignEdge::Top => b.min.y,
        AlignEdge::Bottom => b.max.y,
    });
    let target = match edge {
        AlignEdge::Left | AlignEdge::Top => edges.fold(f32::INFINITY, f32::min),
        AlignEdge::Right | AlignEdge::Bottom => edges.fold(f32::NEG_INFINITY, f32::max),
    };

    let moves = bounds
        .iter()
        .map(|(id, position, b)| {
            let target_position = match edge {
                AlignEdge::Left => Vec2::new(target + (position.x - b.min.x), position.y),
                AlignEdge::Right => Vec2::new(target - (b.max.x - position.x), position.y),
                AlignEdge::Top => Vec2::new(position.x, target + (position.y - b.min.y)),
                AlignEdge::Bottom => Vec2::new(position.x, target - (b.max.y - position.y)),
            };
            (*id, target_position)
        })
        .collect();
    move_shapes(state, ActionKind::AlignShapes, moves)
}

/// Verteilt die entsperrten Shapes gleichmäßig zwischen der ersten und der
/// letzten Shape entlang der Achse (mindestens drei Shapes nötig, damit sich
/// etwas bewegt).
pub fn distribute_shapes(state: &mut EditorState, axis: DistributeAxis) -> usize {
    let component = |p: Vec2| match axis {
        DistributeAxis::Horizontal => p.x,
        DistributeAxis::Vertical => p.y,
    };
    let mut shapes: Vec<(u64, Vec2)> = state
        .diagram
        .unlocked_shapes()
        .map(|s| (s.id, s.position))
        .collect();
    if shapes.len() < 2 {
        log::debug!("Verteilen braucht mindestens zwei entsperrte Shapes");
        return 0;
    }
    shapes.sort_by(|a, b| component(a.1).total_cmp(&component(b.1)));

    let first = component(shapes[0].1);
    let last = component(shapes[shapes.len() - 1].1);
    let step = (last - first) / (shapes.len() - 1) as f32;

    let moves = shapes
        .iter()
        .enumerate()
        .map(|(i, (id, position))| {
            let value = first + step * i as f32;
            let target = match axis {
                DistributeAxis::Horizontal => Vec2::new(value, position.y),
                DistributeAxis::Vertical => Vec2::new(position.x, value),
            };
            (*id, target)
        })
        .collect();
    move_shapes(state, ActionKind::DistributeShapes, moves)
}

/// Verschiebt alle entsperrten Shapes um `delta`.
pub fn move_diagram(state: &mut EditorState, delta: Vec2) -> usize {
    if !delta.is_finite() {
        log::warn!("Nicht endlicher Versatz {:?} ignoriert", delta);
        return 0;
    }
    let moves = state
        .diagram
        .unlocked_shapes()
        .map(|s| (s.id, s.position + delta))
        .collect();
    move_shapes(state, ActionKind::MoveDiagram, moves)
}

/// Setzt alle entsperrten Shapes auf den eingerasteten Mittelpunkt der
/// Bounding-Box ihrer Positionen.
pub fn center_unlocked_shapes(state: &mut EditorState) -> usize {
    let positions: Vec<Vec2> = state.diagram.unlocked_shapes().map(|s| s.position).collect();
    let Some(bounds) = Bounds::from_points(&positions) else {
        log::debug!("Keine entsperrten Shapes zum Zentrieren");
        return 0;
    };
    let center = bounds.center();
    let moves = state
        .diagram
        .unlocked_shapes()
        .map(|s| (s.id, center))
        .collect();
    move_shapes(state, ActionKind::CenterShapes, moves)
}

/// Entfernt alle Shapes und Verbindungen in einem History-Eintrag.
///
/// Verbindungen werden zuerst entfernt, jeweils von hinten, damit die
/// gespeicherten Indizes beim Undo die Reihenfolge exakt wiederherstellen.
pub fn clear_diagram(state: &mut EditorState) -> bool {
    if state.diagram.is_empty() {
        log::debug!("Diagramm ist bereits leer");
        return false;
    }
    let ops = clear_ops(state);
    let shape_count = state.shape_count();
    let connection_count = state.connection_count();
    if !state.commit(ActionKind::ClearDiagram, ops) {
        return false;
    }
    log::info!(
        "Diagramm geleert ({} Shapes, {} Verbindungen)",
        shape_count,
        connection_count
    );
    state.emit(DiagramEvent::DiagramCleared);
    state.emit(DiagramEvent::RedrawHint);
    true
}

/// Remove-Operationen für den kompletten Inhalt (Verbindungen, dann Shapes, jeweils rückwärts).
pub(crate) fn clear_ops(state: &EditorState) -> Vec<EditOp> {
    let connections: Vec<EditOp> = state
        .diagram
        .connections()
        .enumerate()
        .rev()
        .map(|(index, connection)| EditOp::RemoveConnection {
            index,
            connection: connection.clone(),
        })
        .collect();
    let shapes = state
        .diagram
        .shapes()
        .enumerate()
        .rev()
        .map(|(index, shape)| EditOp::RemoveShape {
            index,
            shape: shape.clone(),
        });
    connections.into_iter().chain(shapes).collect()
}

/// Setzt Zielpositionen (eingerastet) als einen History-Eintrag.
fn move_shapes(state: &mut EditorState, action: ActionKind, moves: Vec<(u64, Vec2)>) -> usize {
    let ops: Vec<EditOp> = moves
        .into_iter()
        .filter_map(|(id, target)| {
            let before = state.diagram.shape(id)?;
            let mut after = before.clone();
            after.position = state.snap(target);
            if after.position == before.position {
                return None;
            }
            state.derive_outline(&mut after);
            Some(EditOp::ReplaceShape {
                before: before.clone(),
                after,
            })
        })
        .collect();
    let count = ops.len();
    if count == 0 {
        log::debug!("'{}': keine Shape bewegt", action);
        return 0;
    }
    state.commit(action, ops);
    log::info!("'{}': {} Shapes bewegt", action, count);
    state.emit(DiagramEvent::RedrawHint);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{add_connection, add_shape};
    use crate::app::use_cases::history::undo;
    use crate::core::{ConnectionOptions, ShapeDraft, ShapeKind};
    use crate::shared::EditorOptions;
    use approx::assert_relative_eq;

    fn state_with_grid(spacing: f32) -> EditorState {
        EditorState::with_options(EditorOptions {
            grid_spacing: spacing,
            new_shapes_locked: false,
            ..EditorOptions::default()
        })
    }

    fn add_at(state: &mut EditorState, x: f32, y: f32) -> u64 {
        add_shape(state, ShapeDraft::new(ShapeKind::Rectangle, Vec2::new(x, y))).expect("Shape")
    }

    fn x_of(state: &EditorState, id: u64) -> f32 {
        state.diagram.shape(id).expect("Shape").position.x
    }

    #[test]
    fn align_left_moves_to_leftmost() {
        let mut state = state_with_grid(10.0);
        let ids = [add_at(&mut state, 50.0, 0.0), add_at(&mut state, 120.0, 40.0), add_at(&mut state, 10.0, 80.0)];

        assert_eq!(align_shapes(&mut state, AlignEdge::Left), 2);
        for id in ids {
            assert_relative_eq!(x_of(&state, id), 10.0);
        }
    }

    #[test]
    fn align_respects_sizes_and_locked() {
        let mut state = state_with_grid(10.0);
        let wide = add_shape(
            &mut state,
            ShapeDraft::new(ShapeKind::Rectangle, Vec2::new(100.0, 0.0)).with_size(Vec2::new(200.0, 50.0)),
        )
        .expect("wide");
        let narrow = add_at(&mut state, 300.0, 100.0);
        let locked = add_shape(
            &mut state,
            ShapeDraft::new(ShapeKind::Rectangle, Vec2::new(-500.0, 0.0)).locked(true),
        )
        .expect("locked");

        align_shapes(&mut state, AlignEdge::Right);
        // rechte Kante von narrow (x=300 + 40) ist die äußerste
        assert_relative_eq!(x_of(&state, wide), 240.0);
        assert_relative_eq!(x_of(&state, narrow), 300.0);
        assert_relative_eq!(x_of(&state, locked), -500.0);
    }

    #[test]
    fn align_is_single_undo_step() {
        let mut state = state_with_grid(10.0);
        let a = add_at(&mut state, 50.0, 0.0);
        let b = add_at(&mut state, 120.0, 40.0);
        let undo_before = state.history.undo_len();
        align_shapes(&mut state, AlignEdge::Left);
        assert_eq!(state.history.undo_len(), undo_before + 1);

        assert!(undo(&mut state));
        assert_relative_eq!(x_of(&state, a), 50.0);
        assert_relative_eq!(x_of(&state, b), 120.0);
    }

    #[test]
    fn distribute_spaces_evenly() {
        let mut state = state_with_grid(10.0);
        let a = add_at(&mut state, 0.0, 0.0);
        let c = add_at(&mut state, 300.0, 0.0);
        let b = add_at(&mut state, 50.0, 0.0);

        assert_eq!(distribute_shapes(&mut state, DistributeAxis::Horizontal), 1);
        assert_relative_eq!(x_of(&state, a), 0.0);
        assert_relative_eq!(x_of(&state, b), 150.0);
        assert_relative_eq!(x_of(&state, c), 300.0);
    }

    #[test]
    fn distribute_needs_two_shapes() {
        let mut state = state_with_grid(10.0);
        add_at(&mut state, 0.0, 0.0);
        assert_eq!(distribute_shapes(&mut state, DistributeAxis::Vertical), 0);
    }

    #[test]
    fn move_diagram_shifts_unlocked_and_reroutes() {
        let mut state = state_with_grid(100.0);
        let a = add_at(&mut state, 0.0, 0.0);
        let b = add_at(&mut state, 300.0, 0.0);
        let c = add_connection(&mut state, a, b, ConnectionOptions::default()).expect("c");

        assert_eq!(move_diagram(&mut state, Vec2::new(100.0, 200.0)), 2);
        assert_eq!(state.diagram.shape(a).expect("a").position, Vec2::new(100.0, 200.0));
        let path = &state.diagram.connection(c).expect("c").path;
        assert_eq!(path.first().copied(), Some(Vec2::new(140.0, 200.0)));
    }

    #[test]
    fn center_stacks_unlocked_shapes() {
        let mut state = state_with_grid(100.0);
        let a = add_at(&mut state, 0.0, 0.0);
        let b = add_at(&mut state, 400.0, 200.0);
        assert_eq!(center_unlocked_shapes(&mut state), 2);
        assert_eq!(state.diagram.shape(a).expect("a").position, Vec2::new(200.0, 100.0));
        assert_eq!(state.diagram.shape(b).expect("b").position, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn clear_and_undo_restores_order() {
        let mut state = state_with_grid(100.0);
        let a = add_at(&mut state, 0.0, 0.0);
        let b = add_at(&mut state, 300.0, 0.0);
        let d = add_at(&mut state, 600.0, 0.0);
        add_connection(&mut state, a, b, ConnectionOptions::default()).expect("ab");
        add_connection(&mut state, b, d, ConnectionOptions::default()).expect("bd");
        let before = state.diagram.clone();

        assert!(clear_diagram(&mut state));
        assert!(state.diagram.is_empty());
        assert!(undo(&mut state));
        assert_eq!(state.diagram, before);
    }
}
