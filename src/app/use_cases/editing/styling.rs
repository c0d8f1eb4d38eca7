//! Use-Case: Farben von Shapes, Verbindungen und Labels, Label-Ausrichtung.
//!
//! Jeder Setter ist ein eigener Undo-Schritt. Leere Farbstrings werden abgelehnt.

use super::{modify_connection, modify_shape, valid_color};
use crate::app::history::ActionKind;
use crate::app::EditorState;
use crate::core::LabelAlign;

pub fn set_shape_fill_color(state: &mut EditorState, id: u64, color: &str) -> bool {
    valid_color(color, "Shape", id)
        && modify_shape(state, id, ActionKind::SetShapeStyle, |shape| {
            shape.style.fill_color = color.to_string();
        })
}

pub fn set_shape_border_color(state: &mut EditorState, id: u64, color: &str) -> bool {
    valid_color(color, "Shape", id)
        && modify_shape(state, id, ActionKind::SetShapeStyle, |shape| {
            shape.style.border_color = color.to_string();
        })
}

pub fn set_shape_text_color(state: &mut EditorState, id: u64, color: &str) -> bool {
    valid_color(color, "Shape", id)
        && modify_shape(state, id, ActionKind::SetShapeStyle, |shape| {
            shape.style.text_color = color.to_string();
        })
}

/// Linienfarbe einer Verbindung.
pub fn set_connection_color(state: &mut EditorState, id: u64, color: &str) -> bool {
    valid_color(color, "Verbindung", id)
        && modify_connection(state, id, ActionKind::SetConnectionStyle, |conn| {
            conn.style.color = color.to_string();
        })
}

/// Textfarbe des Labels. Wirkt auch ohne gesetztes Label (gilt für spätere Labels).
pub fn set_label_text_color(state: &mut EditorState, id: u64, color: &str) -> bool {
    valid_color(color, "Verbindung", id)
        && modify_connection(state, id, ActionKind::SetConnectionStyle, |conn| {
            conn.style.label_text_color = color.to_string();
        })
}

pub fn set_label_background_color(state: &mut EditorState, id: u64, color: &str) -> bool {
    valid_color(color, "Verbindung", id)
        && modify_connection(state, id, ActionKind::SetConnectionStyle, |conn| {
            conn.style.label_background_color = color.to_string();
        })
}

/// Schaltet die Label-Ausrichtung weiter (links → mitte → rechts → links).
///
/// Verbindungen ohne Label bleiben unverändert. Gibt die neue Ausrichtung zurück.
pub fn cycle_label_alignment(state: &mut EditorState, id: u64) -> Option<LabelAlign> {
    let connection = state.diagram.connection(id)?;
    if connection.label.is_none() {
        log::debug!("Verbindung {} hat kein Label, Ausrichtung unverändert", id);
        return None;
    }
    let next = connection.style.label_align.next();
    if !modify_connection(state, id, ActionKind::SetConnectionStyle, |conn| {
        conn.style.label_align = next;
    }) {
        return None;
    }
    log::info!("Label von Verbindung {} jetzt '{}' ausgerichtet", id, next.as_str());
    Some(next)
}
