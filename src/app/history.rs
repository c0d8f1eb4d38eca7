use crate::core::{Connection, Shape};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Art der Benutzeraktion, die ein History-Eintrag zusammenfasst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddShape,
    RemoveShape,
    UpdateShape,
    MoveShape,
    ChangeShapeType,
    SetShapeText,
    SetShapeStyle,
    SetShapeOrder,
    LockShape,
    UnlockShape,
    LockAllShapes,
    UnlockAllShapes,
    BringToFront,
    BringToBack,
    AddConnection,
    RemoveConnection,
    UpdateConnection,
    SetConnectionStyle,
    AlignShapes,
    DistributeShapes,
    MoveDiagram,
    CenterShapes,
    ClearDiagram,
    Import,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::AddShape => "add_shape",
            ActionKind::RemoveShape => "remove_shape",
            ActionKind::UpdateShape => "update_shape",
            ActionKind::MoveShape => "move_shape",
            ActionKind::ChangeShapeType => "change_shape_type",
            ActionKind::SetShapeText => "set_shape_text",
            ActionKind::SetShapeStyle => "set_shape_style",
            ActionKind::SetShapeOrder => "set_shape_order",
            ActionKind::LockShape => "lock_shape",
            ActionKind::UnlockShape => "unlock_shape",
            ActionKind::LockAllShapes => "lock_all_shapes",
            ActionKind::UnlockAllShapes => "unlock_all_shapes",
            ActionKind::BringToFront => "bring_to_front",
            ActionKind::BringToBack => "bring_to_back",
            ActionKind::AddConnection => "add_connection",
            ActionKind::RemoveConnection => "remove_connection",
            ActionKind::UpdateConnection => "update_connection",
            ActionKind::SetConnectionStyle => "set_connection_style",
            ActionKind::AlignShapes => "align_shapes",
            ActionKind::DistributeShapes => "distribute_shapes",
            ActionKind::MoveDiagram => "move_diagram",
            ActionKind::CenterShapes => "center_shapes",
            ActionKind::ClearDiagram => "clear_diagram",
            ActionKind::Import => "import",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Eine strukturelle Änderung am Diagramm.
///
/// Einfügen/Entfernen merken sich den Index, damit die Reihenfolge beim
/// Rückgängigmachen exakt wiederhergestellt wird.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    InsertShape { index: usize, shape: Shape },
    RemoveShape { index: usize, shape: Shape },
    ReplaceShape { before: Shape, after: Shape },
    /// Nur die Zeichenreihenfolge ändert sich
    ReorderShape { id: u64, from: usize, to: usize },
    InsertConnection { index: usize, connection: Connection },
    RemoveConnection { index: usize, connection: Connection },
    ReplaceConnection { before: Connection, after: Connection },
}

impl EditOp {
    /// Die Gegenoperation.
    pub fn inverse(&self) -> EditOp {
        match self {
            EditOp::InsertShape { index, shape } => EditOp::RemoveShape {
                index: *index,
                shape: shape.clone(),
            },
            EditOp::RemoveShape { index, shape } => EditOp::InsertShape {
                index: *index,
                shape: shape.clone(),
            },
            EditOp::ReplaceShape { before, after } => EditOp::ReplaceShape {
                before: after.clone(),
                after: before.clone(),
            },
            EditOp::ReorderShape { id, from, to } => EditOp::ReorderShape {
                id: *id,
                from: *to,
                to: *from,
            },
            EditOp::InsertConnection { index, connection } => EditOp::RemoveConnection {
                index: *index,
                connection: connection.clone(),
            },
            EditOp::RemoveConnection { index, connection } => EditOp::InsertConnection {
                index: *index,
                connection: connection.clone(),
            },
            EditOp::ReplaceConnection { before, after } => EditOp::ReplaceConnection {
                before: after.clone(),
                after: before.clone(),
            },
        }
    }
}

/// Ein Undo-Schritt: Aktionsart plus die Vorwärts-Operationen in Ausführungsreihenfolge.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub action: ActionKind,
    pub ops: Vec<EditOp>,
}

impl HistoryEntry {
    pub fn new(action: ActionKind, ops: Vec<EditOp>) -> Self {
        Self { action, ops }
    }

    /// Gegenoperationen in umgekehrter Reihenfolge (zum Rückgängigmachen).
    pub fn inverse_ops(&self) -> Vec<EditOp> {
        self.ops.iter().rev().map(EditOp::inverse).collect()
    }
}

/// Undo/Redo-Manager mit begrenzter Tiefe.
///
/// Hält nur die strukturellen Änderungen, nicht ganze Diagramm-Kopien.
/// Anwenden der Operationen ist Sache des Aufrufers.
#[derive(Debug, Default)]
pub struct EditHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::with_capacity(max_depth),
            max_depth,
        }
    }

    /// Nimmt einen neuen Eintrag auf und verwirft den Redo-Stack (lineare Historie).
    /// Bei voller Tiefe fällt der älteste Eintrag heraus.
    pub fn record(&mut self, entry: HistoryEntry) {
        if self.max_depth == 0 {
            self.redo_stack.clear();
            return;
        }
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(entry);
        self.redo_stack.clear();
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Nimmt den obersten Undo-Eintrag und legt ihn auf den Redo-Stack.
    /// Gibt die anzuwendenden Gegenoperationen zurück.
    pub fn pop_undo(&mut self) -> Option<(ActionKind, Vec<EditOp>)> {
        let entry = self.undo_stack.pop()?;
        let result = (entry.action, entry.inverse_ops());
        if self.redo_stack.len() >= self.max_depth {
            self.redo_stack.remove(0);
        }
        self.redo_stack.push(entry);
        Some(result)
    }

    /// Nimmt den obersten Redo-Eintrag und legt ihn zurück auf den Undo-Stack.
    /// Gibt die erneut anzuwendenden Vorwärts-Operationen zurück.
    pub fn pop_redo(&mut self) -> Option<(ActionKind, Vec<EditOp>)> {
        let entry = self.redo_stack.pop()?;
        let result = (entry.action, entry.ops.clone());
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(entry);
        Some(result)
    }

    /// Verwirft beide Stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Aktionsart des nächsten Undo-Schritts.
    pub fn peek_undo(&self) -> Option<ActionKind> {
        self.undo_stack.last().map(|e| e.action)
    }

    /// Aktionsart des nächsten Redo-Schritts.
    pub fn peek_redo(&self) -> Option<ActionKind> {
        self.redo_stack.last().map(|e| e.action)
    }
}
