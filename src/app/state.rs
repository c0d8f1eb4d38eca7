//! Editor State: zentrale Datenhaltung.
//!
//! Alle strukturellen Änderungen laufen über [`EditorState::commit`]: die
//! Operationen werden angewendet, als ein History-Eintrag abgelegt und als
//! Events auf dem injizierten Bus gemeldet. Undo/Redo nutzt denselben Weg.

use super::command_queue::CommandQueue;
use super::events::{DiagramEvent, EventBus};
use super::history::{ActionKind, EditHistory, EditOp, HistoryEntry};
use super::CommandLog;
use crate::core::{snap_to_grid, Diagram, GeometryRegistry, Shape};
use crate::shared::EditorOptions;
use glam::Vec2;

/// Laufender Drag einer Shape.
#[derive(Debug, Clone)]
pub struct DragState {
    /// ID der gezogenen Shape
    pub shape_id: u64,
    /// Zustand vor dem Drag (für den History-Eintrag)
    pub before: Shape,
}

/// Hauptzustand des Editors
#[derive(Debug)]
pub struct EditorState {
    /// Alle Shapes und Verbindungen
    pub diagram: Diagram,
    /// Undo/Redo-History (operationsbasiert)
    pub history: EditHistory,
    /// Laufzeit-Optionen (Raster, Farben, Größen)
    pub options: EditorOptions,
    /// Typ-Tag → Umriss-Funktion
    pub geometry: GeometryRegistry,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Aktiver Drag (zwischen begin_move_shape und end_move_shape)
    pub(crate) drag: Option<DragState>,
    bus: EventBus,
    commands: CommandQueue,
}

impl EditorState {
    /// Erstellt einen leeren Editor mit Standard-Optionen und eigenem Bus.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        Self::with_bus(options, EventBus::new())
    }

    /// Erstellt einen Editor, der seine Events auf einem fremden Bus meldet.
    pub fn with_bus(options: EditorOptions, bus: EventBus) -> Self {
        Self {
            diagram: Diagram::new(),
            history: EditHistory::new_with_capacity(options.max_undo),
            geometry: GeometryRegistry::with_builtins(options.circle_segments),
            options,
            command_log: CommandLog::new(),
            drag: None,
            bus,
            commands: CommandQueue::new(),
        }
    }

    /// Der Event-Bus (klonbares Handle).
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Warteschlange für verzögerte Commands (klonbares Handle).
    pub fn command_queue(&self) -> &CommandQueue {
        &self.commands
    }

    /// Gibt die Anzahl der Shapes zurück
    pub fn shape_count(&self) -> usize {
        self.diagram.shape_count()
    }

    /// Gibt die Anzahl der Verbindungen zurück
    pub fn connection_count(&self) -> usize {
        self.diagram.connection_count()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// ID der aktuell gezogenen Shape.
    pub fn active_drag(&self) -> Option<u64> {
        self.drag.as_ref().map(|d| d.shape_id)
    }

    /// Meldet ein Event auf dem Bus.
    pub fn emit(&self, event: DiagramEvent) {
        self.bus.trigger(&event);
    }

    /// Rastet eine Position gemäß `options.grid_spacing` ein.
    pub fn snap(&self, position: Vec2) -> Vec2 {
        snap_to_grid(position, self.options.grid_spacing)
    }

    /// Leitet den Umriss einer Shape aus Typ, Position und Größe ab.
    pub fn derive_outline(&self, shape: &mut Shape) {
        shape.outline = self
            .geometry
            .outline(&shape.kind, shape.position, shape.size);
    }

    // ── Mutationen ──────────────────────────────────────────────────

    /// Wendet die Operationen an und legt sie als einen History-Eintrag ab.
    ///
    /// Ein offener Drag wird vorher abgeschlossen. Nicht anwendbare
    /// Operationen werden geloggt und nicht in die History übernommen.
    /// Gibt `false` zurück, wenn keine Operation angewendet wurde.
    pub(crate) fn commit(&mut self, action: ActionKind, ops: Vec<EditOp>) -> bool {
        self.finish_drag();
        let applied: Vec<EditOp> = ops.into_iter().filter(|op| self.apply_op(op)).collect();
        if applied.is_empty() {
            log::debug!("'{}' ohne Änderung, kein History-Eintrag", action);
            return false;
        }
        self.history.record(HistoryEntry::new(action, applied));
        true
    }

    /// Schließt einen offenen Drag ab: ein History-Eintrag vom Ausgangs- zum Endzustand.
    pub(crate) fn finish_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let Some(current) = self.diagram.shape(drag.shape_id) else {
            log::warn!("Drag-Shape {} existiert nicht mehr", drag.shape_id);
            return false;
        };
        if current.position == drag.before.position {
            log::debug!("Drag von Shape {} ohne Bewegung beendet", drag.shape_id);
            return false;
        }
        let after = current.clone();
        self.history.record(HistoryEntry::new(
            ActionKind::MoveShape,
            vec![EditOp::ReplaceShape {
                before: drag.before,
                after,
            }],
        ));
        log::info!("Shape {} verschoben (Drag)", drag.shape_id);
        true
    }

    /// Wendet eine einzelne Operation am Diagramm an und meldet die Events.
    pub(crate) fn apply_op(&mut self, op: &EditOp) -> bool {
        match op {
            EditOp::InsertShape { index, shape } => {
                if !self.diagram.insert_shape_at(*index, shape.clone()) {
                    log::warn!("Shape {} existiert bereits, Einfügen übersprungen", shape.id);
                    return false;
                }
                if let Some(stored) = self.diagram.shape(shape.id) {
                    self.emit(DiagramEvent::ShapeAdded {
                        shape: stored.clone(),
                    });
                }
                true
            }
            EditOp::RemoveShape { shape, .. } => {
                let Some(removed) = self.diagram.remove_shape(shape.id) else {
                    log::warn!("Shape {} nicht gefunden, Entfernen übersprungen", shape.id);
                    return false;
                };
                for (_, connection) in removed.connections {
                    self.emit(DiagramEvent::ConnectionRemoved { connection });
                }
                self.emit(DiagramEvent::ShapeRemoved {
                    shape: removed.shape,
                });
                true
            }
            EditOp::ReplaceShape { after, .. } => {
                let Some((previous, rerouted)) = self.diagram.replace_shape(after.clone()) else {
                    log::warn!("Shape {} nicht gefunden, Ersetzen übersprungen", after.id);
                    return false;
                };
                self.emit_shape_change(&previous, &rerouted);
                true
            }
            EditOp::ReorderShape { id, to, .. } => {
                if self.diagram.move_shape_to(*id, *to).is_none() {
                    log::warn!("Shape {} nicht gefunden, Umsortieren übersprungen", id);
                    return false;
                }
                if let Some(shape) = self.diagram.shape(*id) {
                    self.emit(DiagramEvent::ShapeUpdated {
                        shape: shape.clone(),
                    });
                }
                true
            }
            EditOp::InsertConnection { index, connection } => {
                if !self.diagram.insert_connection_at(*index, connection.clone()) {
                    log::warn!(
                        "Verbindung {} ({} → {}) nicht einfügbar",
                        connection.id,
                        connection.from,
                        connection.to
                    );
                    return false;
                }
                if let Some(stored) = self.diagram.connection(connection.id) {
                    self.emit(DiagramEvent::ConnectionAdded {
                        connection: stored.clone(),
                    });
                }
                true
            }
            EditOp::RemoveConnection { connection, .. } => {
                let Some((_, removed)) = self.diagram.remove_connection(connection.id) else {
                    log::warn!(
                        "Verbindung {} nicht gefunden, Entfernen übersprungen",
                        connection.id
                    );
                    return false;
                };
                self.emit(DiagramEvent::ConnectionRemoved {
                    connection: removed,
                });
                true
            }
            EditOp::ReplaceConnection { after, .. } => {
                if self.diagram.replace_connection(after.clone()).is_none() {
                    log::warn!("Verbindung {} nicht ersetzbar", after.id);
                    return false;
                }
                if let Some(stored) = self.diagram.connection(after.id) {
                    self.emit(DiagramEvent::ConnectionUpdated {
                        connection: stored.clone(),
                    });
                }
                true
            }
        }
    }

    /// Meldet eine geänderte Shape samt neu gerouteter Verbindungen.
    pub(crate) fn emit_shape_change(&self, previous: &Shape, rerouted: &[u64]) {
        let Some(current) = self.diagram.shape(previous.id) else {
            return;
        };
        if current.position != previous.position {
            self.emit(DiagramEvent::ShapeMoved {
                id: current.id,
                from: previous.position,
                to: current.position,
            });
        }
        self.emit(DiagramEvent::ShapeUpdated {
            shape: current.clone(),
        });
        for id in rerouted {
            if let Some(connection) = self.diagram.connection(*id) {
                self.emit(DiagramEvent::ConnectionUpdated {
                    connection: connection.clone(),
                });
            }
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
