//! Core-Domänentypen: Geometrie, Routing, Shapes, Verbindungen, Diagramm.

pub mod connection;
/// Geometrie-Kit
///
/// - Umrisse der eingebauten Shape-Typen und die erweiterbare Registry
/// - Bounding-Boxen und die acht Anker-Punkte
/// - Raster-Snapping
pub mod geometry;
pub mod diagram;
pub mod routing;
pub mod shape;
pub mod snapshot;

pub use connection::{
    Connection, ConnectionOptions, ConnectionPatch, ConnectionStyle, LabelAlign,
};
pub use diagram::{Diagram, RemovedShape};
pub use geometry::{
    closest_anchor, outline, snap_to_grid, AnchorSide, Anchors, Bounds, GeometryRegistry,
    ShapeKind,
};
pub use routing::{route, AnchorSpec, RouteKind};
pub use shape::{OrderPatch, Shape, ShapeDraft, ShapeOrder, ShapePatch, ShapeStyle, TextField};
pub use snapshot::{DiagramSnapshot, SnapshotError, SNAPSHOT_VERSION};
