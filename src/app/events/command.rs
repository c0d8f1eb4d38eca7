use crate::app::use_cases::layout::{AlignEdge, DistributeAxis};
use crate::core::{
    ConnectionOptions, ConnectionPatch, DiagramSnapshot, OrderPatch, RouteKind, ShapeDraft,
    ShapeKind, ShapePatch, TextField,
};
use glam::Vec2;

/// Commands sind mutierende Schritte, die zentral über den Controller ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // ── Shapes ──────────────────────────────────────────────────
    /// Neue Shape anlegen
    AddShape { draft: ShapeDraft },
    /// Shape samt ihrer Verbindungen entfernen
    RemoveShape { id: u64 },
    /// Felder einer Shape zusammenführen
    UpdateShape { id: u64, patch: ShapePatch },
    ChangeShapeType { id: u64, kind: ShapeKind },
    SetShapeText {
        id: u64,
        field: TextField,
        text: String,
    },
    SetShapeFillColor { id: u64, color: String },
    SetShapeBorderColor { id: u64, color: String },
    SetShapeTextColor { id: u64, color: String },
    SetShapeOrder { id: u64, patch: OrderPatch },
    LockShape { id: u64 },
    UnlockShape { id: u64 },
    LockAllShapes,
    UnlockAllShapes,
    /// Shape nach vorne (zuletzt gezeichnet)
    BringToFront { id: u64 },
    /// Shape nach hinten (zuerst gezeichnet)
    BringToBack { id: u64 },

    // ── Drag ────────────────────────────────────────────────────
    /// Drag beginnen (merkt den Ausgangszustand)
    BeginMoveShape { id: u64 },
    /// Drag-Tick: Position setzen ohne History-Eintrag
    MoveShape { id: u64, position: Vec2 },
    /// Drag abschließen (ein History-Eintrag für den ganzen Drag)
    EndMoveShape { id: u64 },

    // ── Verbindungen ────────────────────────────────────────────
    AddConnection {
        from_id: u64,
        to_id: u64,
        options: ConnectionOptions,
    },
    RemoveConnection { id: u64 },
    UpdateConnection { id: u64, patch: ConnectionPatch },
    SetConnectionColor { id: u64, color: String },
    SetConnectionLabel { id: u64, label: Option<String> },
    SetLabelTextColor { id: u64, color: String },
    SetLabelBackgroundColor { id: u64, color: String },
    SetConnectionKind { id: u64, kind: RouteKind },
    ToggleConnectionKind { id: u64 },
    /// Label-Ausrichtung links → mitte → rechts
    CycleLabelAlignment { id: u64 },

    // ── Layout ──────────────────────────────────────────────────
    AlignShapes { edge: AlignEdge },
    DistributeShapes { axis: DistributeAxis },
    MoveDiagram { delta: Vec2 },
    CenterUnlockedShapes,
    ClearDiagram,

    // ── Import/Export ───────────────────────────────────────────
    ImportState { snapshot: DiagramSnapshot },
    ExportState,

    // ── Historie ────────────────────────────────────────────────
    Undo,
    Redo,

    // ── Plugins / Hinweise ──────────────────────────────────────
    BroadcastPluginMessage {
        topic: String,
        data: serde_json::Value,
    },
    RequestRedrawHint,
    RequestLayoutHint,
}
