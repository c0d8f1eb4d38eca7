//! Events und Commands: typisierte Diagramm-Events, der Event-Bus und die EditorCommand-Enum.

mod bus;
mod command;
mod diagram_event;

pub use bus::{EventBus, SubscriptionId};
pub use command::EditorCommand;
pub use diagram_event::{DiagramEvent, EventKind, ImportCounts, EVENT_SCHEMA_VERSION};
