//! Builder für Render-Szenen aus dem EditorState.

use crate::app::EditorState;
use crate::shared::{ConnectionVisual, RenderScene, ShapeVisual};

/// Baut eine RenderScene aus dem aktuellen EditorState.
pub fn build(state: &EditorState) -> RenderScene {
    let shapes = state
        .diagram
        .shapes()
        .map(|shape| ShapeVisual {
            id: shape.id,
            kind: shape.kind.clone(),
            outline: shape.outline.clone(),
            center: shape.position,
            title: shape.title.clone(),
            body: shape.body.clone(),
            style: shape.style.clone(),
            locked: shape.locked,
            editable: shape.editable,
        })
        .collect();

    let connections = state
        .diagram
        .connections()
        .map(|connection| ConnectionVisual {
            id: connection.id,
            path: connection.path.clone(),
            style: connection.style.clone(),
            label: connection.label.clone(),
            label_position: connection
                .label
                .as_ref()
                .and_then(|_| connection.label_position()),
        })
        .collect();

    RenderScene {
        shapes,
        connections,
        grid_spacing: state.options.grid_spacing,
    }
}
