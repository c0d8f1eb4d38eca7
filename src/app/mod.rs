//! Application-Layer: Controller, State, Events, Plugins und Use-Cases.

pub mod command_log;
mod command_queue;
pub mod controller;
pub mod events;
pub mod history;
pub mod plugins;
pub mod render_scene;
/// Editor State
///
/// Hält Diagramm, History, Optionen und den injizierten Event-Bus.
pub mod state;
pub mod use_cases;

pub use command_log::{CommandLog, CommandOutcome, CommandRecord};
pub use command_queue::CommandQueue;
pub use controller::EditorController;
pub use events::{DiagramEvent, EditorCommand, EventBus, EventKind, SubscriptionId};
pub use history::{ActionKind, EditHistory, EditOp};
pub use plugins::{PluginContext, PluginDefinition, PluginError, PluginHost, PluginStatus};
pub use render_scene::build as build_render_scene;
pub use state::EditorState;
