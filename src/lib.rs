//! Diagram Editor Library.
//! Headless Kern eines Vektor-Diagramm-Editors, als Library exportiert für
//! Hosts, Plugins, Tests und Benchmarks.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    ActionKind, DiagramEvent, EditorCommand, EditorController, EditorState, EventBus, EventKind,
    PluginDefinition, PluginHost,
};
pub use core::{
    route, AnchorSide, AnchorSpec, Connection, ConnectionOptions, Diagram, DiagramSnapshot,
    RouteKind, Shape, ShapeDraft, ShapeKind,
};
pub use shared::{EditorOptions, RenderScene};
