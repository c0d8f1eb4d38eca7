use crate::app::history::ActionKind;
use crate::core::{Connection, DiagramSnapshot, Shape};
use glam::Vec2;
use std::fmt;

/// Version des Event-Katalogs. Wird erhöht, wenn sich Payloads inkompatibel ändern.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Geschlossene Menge aller abonnierbaren Events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    ShapeAdded,
    ShapeRemoved,
    ShapeUpdated,
    ShapeMoved,
    ShapeClicked,
    ConnectionAdded,
    ConnectionRemoved,
    ConnectionUpdated,
    ConnectionClicked,
    CanvasClicked,
    CanvasResized,
    DiagramImported,
    DiagramExported,
    DiagramCleared,
    UndoApplied,
    RedoApplied,
    PluginLoaded,
    PluginUnloaded,
    PluginMessage,
    RedrawHint,
    LayoutHint,
}

impl EventKind {
    /// Alle Events, zur Laufzeit auflistbar.
    pub const ALL: [EventKind; 21] = [
        EventKind::ShapeAdded,
        EventKind::ShapeRemoved,
        EventKind::ShapeUpdated,
        EventKind::ShapeMoved,
        EventKind::ShapeClicked,
        EventKind::ConnectionAdded,
        EventKind::ConnectionRemoved,
        EventKind::ConnectionUpdated,
        EventKind::ConnectionClicked,
        EventKind::CanvasClicked,
        EventKind::CanvasResized,
        EventKind::DiagramImported,
        EventKind::DiagramExported,
        EventKind::DiagramCleared,
        EventKind::UndoApplied,
        EventKind::RedoApplied,
        EventKind::PluginLoaded,
        EventKind::PluginUnloaded,
        EventKind::PluginMessage,
        EventKind::RedrawHint,
        EventKind::LayoutHint,
    ];

    /// Stabiler Event-Name.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::ShapeAdded => "shape:added",
            EventKind::ShapeRemoved => "shape:removed",
            EventKind::ShapeUpdated => "shape:updated",
            EventKind::ShapeMoved => "shape:moved",
            EventKind::ShapeClicked => "shape:clicked",
            EventKind::ConnectionAdded => "connection:added",
            EventKind::ConnectionRemoved => "connection:removed",
            EventKind::ConnectionUpdated => "connection:updated",
            EventKind::ConnectionClicked => "connection:clicked",
            EventKind::CanvasClicked => "canvas:clicked",
            EventKind::CanvasResized => "canvas:resized",
            EventKind::DiagramImported => "diagram:imported",
            EventKind::DiagramExported => "diagram:exported",
            EventKind::DiagramCleared => "diagram:cleared",
            EventKind::UndoApplied => "undo:applied",
            EventKind::RedoApplied => "redo:applied",
            EventKind::PluginLoaded => "plugin:loaded",
            EventKind::PluginUnloaded => "plugin:unloaded",
            EventKind::PluginMessage => "plugin:message",
            EventKind::RedrawHint => "plugin:hint:redraw",
            EventKind::LayoutHint => "plugin:hint:layout",
        }
    }

    /// Sucht ein Event anhand seines Namens.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zählerstände eines Imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportCounts {
    pub shapes: usize,
    pub connections: usize,
    pub skipped_connections: usize,
    /// Shapes ohne freie ID (ID-Raum erschöpft)
    pub skipped_shapes: usize,
}

/// Typisierte Event-Payloads, ein Variant je `EventKind`.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramEvent {
    ShapeAdded { shape: Shape },
    ShapeRemoved { shape: Shape },
    ShapeUpdated { shape: Shape },
    ShapeMoved { id: u64, from: Vec2, to: Vec2 },
    ShapeClicked { id: u64 },
    ConnectionAdded { connection: Connection },
    ConnectionRemoved { connection: Connection },
    ConnectionUpdated { connection: Connection },
    ConnectionClicked { id: u64 },
    CanvasClicked { position: Vec2 },
    CanvasResized { width: f32, height: f32 },
    DiagramImported { counts: ImportCounts },
    DiagramExported { snapshot: DiagramSnapshot },
    DiagramCleared,
    UndoApplied { action: ActionKind },
    RedoApplied { action: ActionKind },
    PluginLoaded { plugin_id: String },
    PluginUnloaded { plugin_id: String },
    PluginMessage { topic: String, data: serde_json::Value },
    RedrawHint,
    LayoutHint,
}

impl DiagramEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DiagramEvent::ShapeAdded { .. } => EventKind::ShapeAdded,
            DiagramEvent::ShapeRemoved { .. } => EventKind::ShapeRemoved,
            DiagramEvent::ShapeUpdated { .. } => EventKind::ShapeUpdated,
            DiagramEvent::ShapeMoved { .. } => EventKind::ShapeMoved,
            DiagramEvent::ShapeClicked { .. } => EventKind::ShapeClicked,
            DiagramEvent::ConnectionAdded { .. } => EventKind::ConnectionAdded,
            DiagramEvent::ConnectionRemoved { .. } => EventKind::ConnectionRemoved,
            DiagramEvent::ConnectionUpdated { .. } => EventKind::ConnectionUpdated,
            DiagramEvent::ConnectionClicked { .. } => EventKind::ConnectionClicked,
            DiagramEvent::CanvasClicked { .. } => EventKind::CanvasClicked,
            DiagramEvent::CanvasResized { .. } => EventKind::CanvasResized,
            DiagramEvent::DiagramImported { .. } => EventKind::DiagramImported,
            DiagramEvent::DiagramExported { .. } => EventKind::DiagramExported,
            DiagramEvent::DiagramCleared => EventKind::DiagramCleared,
            DiagramEvent::UndoApplied { .. } => EventKind::UndoApplied,
            DiagramEvent::RedoApplied { .. } => EventKind::RedoApplied,
            DiagramEvent::PluginLoaded { .. } => EventKind::PluginLoaded,
            DiagramEvent::PluginUnloaded { .. } => EventKind::PluginUnloaded,
            DiagramEvent::PluginMessage { .. } => EventKind::PluginMessage,
            DiagramEvent::RedrawHint => EventKind::RedrawHint,
            DiagramEvent::LayoutHint => EventKind::LayoutHint,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}
