//! Plugin-Host: registriert, lädt und entlädt benannte Erweiterungen.
//!
//! Lebenszyklus: registriert → geladen (`init` aufgerufen) → entladen
//! (`unload` aufgerufen, falls vorhanden). `reload_all_plugins` ruft `init`
//! aller geladenen Plugins erneut auf, ohne vorher zu entladen; ob ein
//! doppeltes `init` unschädlich ist, liegt beim Plugin.

use super::command_queue::CommandQueue;
use super::events::{DiagramEvent, EventBus};
use super::EditorState;
use indexmap::IndexMap;
use thiserror::Error;

/// Zugriff eines Plugins während `init`.
///
/// `state` darf direkt geändert werden. Event-Handler, die das Plugin
/// registriert, ändern das Diagramm dagegen über `commands`.
pub struct PluginContext<'a> {
    pub state: &'a mut EditorState,
    pub bus: EventBus,
    pub commands: CommandQueue,
}

type InitFn = Box<dyn FnMut(&mut PluginContext<'_>) -> anyhow::Result<()>>;
type UnloadFn = Box<dyn FnMut(&EventBus) -> anyhow::Result<()>>;

/// Definition eines Plugins. `init` ist Pflicht, `unload` optional.
#[derive(Default)]
pub struct PluginDefinition {
    init: Option<InitFn>,
    unload: Option<UnloadFn>,
    description: String,
}

impl PluginDefinition {
    /// Leere Definition (ohne `init` nicht registrierbar).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_init<F>(mut self, init: F) -> Self
    where
        F: FnMut(&mut PluginContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.init = Some(Box::new(init));
        self
    }

    pub fn with_unload<F>(mut self, unload: F) -> Self
    where
        F: FnMut(&EventBus) -> anyhow::Result<()> + 'static,
    {
        self.unload = Some(Box::new(unload));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn has_unload(&self) -> bool {
        self.unload.is_some()
    }
}

impl std::fmt::Debug for PluginDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDefinition")
            .field("description", &self.description)
            .field("has_init", &self.init.is_some())
            .field("has_unload", &self.unload.is_some())
            .finish()
    }
}

/// Fehler bei Registrierung und Lebenszyklus.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("Plugin-ID darf nicht leer sein")]
    EmptyId,
    #[error("Plugin '{0}' hat keine init-Funktion")]
    MissingInit(String),
    #[error("Plugin '{0}' ist nicht registriert")]
    UnknownPlugin(String),
    #[error("Plugin '{0}' ist geladen und kann nicht neu registriert werden")]
    AlreadyLoaded(String),
}

/// Lebenszyklus-Zustand eines registrierten Plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    Registered,
    Loaded,
    Unloaded,
}

#[derive(Debug)]
struct PluginEntry {
    definition: PluginDefinition,
    status: PluginStatus,
}

/// Registry aller Plugins in Registrierungsreihenfolge.
#[derive(Debug, Default)]
pub struct PluginHost {
    plugins: IndexMap<String, PluginEntry>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert ein Plugin. Ein nicht geladenes Plugin gleichen Namens
    /// wird ersetzt.
    pub fn register_plugin(
        &mut self,
        id: &str,
        definition: PluginDefinition,
    ) -> Result<(), PluginError> {
        let id = plugin_id(id);
        let result = if id.is_empty() {
            Err(PluginError::EmptyId)
        } else if definition.init.is_none() {
            Err(PluginError::MissingInit(id.to_string()))
        } else if self.plugin_status(id) == Some(PluginStatus::Loaded) {
            Err(PluginError::AlreadyLoaded(id.to_string()))
        } else {
            Ok(())
        };
        if let Err(e) = &result {
            log::warn!("Plugin-Registrierung abgelehnt: {}", e);
            return result;
        }

        let replaced = self
            .plugins
            .insert(
                id.to_string(),
                PluginEntry {
                    definition,
                    status: PluginStatus::Registered,
                },
            )
            .is_some();
        log::info!(
            "Plugin '{}' {}",
            id,
            if replaced { "neu registriert" } else { "registriert" }
        );
        Ok(())
    }

    /// Lädt ein Plugin: ruft `init` auf und meldet `plugin:loaded`.
    ///
    /// Schlägt `init` fehl, wird der Fehler geloggt und das Plugin bleibt
    /// ungeladen (`Ok(false)`). Ein bereits geladenes Plugin wird erneut
    /// initialisiert.
    pub fn load_plugin(&mut self, id: &str, state: &mut EditorState) -> Result<bool, PluginError> {
        let id = plugin_id(id);
        let entry = self.entry_mut(id)?;
        let Some(init) = entry.definition.init.as_mut() else {
            return Err(PluginError::MissingInit(id.to_string()));
        };

        let mut context = PluginContext {
            bus: state.bus().clone(),
            commands: state.command_queue().clone(),
            state: &mut *state,
        };
        if let Err(e) = init(&mut context) {
            log::error!("init von Plugin '{}' fehlgeschlagen: {:#}", id, e);
            return Ok(false);
        }
        entry.status = PluginStatus::Loaded;
        log::info!("Plugin '{}' geladen", id);
        state.emit(DiagramEvent::PluginLoaded {
            plugin_id: id.to_string(),
        });
        Ok(true)
    }

    /// Entlädt ein geladenes Plugin: ruft `unload` auf (falls vorhanden) und
    /// meldet `plugin:unloaded`. Ein Fehler in `unload` wird geloggt, das
    /// Plugin gilt trotzdem als entladen.
    pub fn unload_plugin(&mut self, id: &str, state: &EditorState) -> Result<bool, PluginError> {
        let id = plugin_id(id);
        let entry = self.entry_mut(id)?;
        if entry.status != PluginStatus::Loaded {
            log::debug!("Plugin '{}' ist nicht geladen", id);
            return Ok(false);
        }
        if let Some(unload) = entry.definition.unload.as_mut() {
            if let Err(e) = unload(state.bus()) {
                log::error!("unload von Plugin '{}' fehlgeschlagen: {:#}", id, e);
            }
        }
        entry.status = PluginStatus::Unloaded;
        log::info!("Plugin '{}' entladen", id);
        state.emit(DiagramEvent::PluginUnloaded {
            plugin_id: id.to_string(),
        });
        Ok(true)
    }

    /// Ruft `init` aller geladenen Plugins erneut auf (ohne `unload`).
    ///
    /// Gibt die Anzahl erfolgreicher Aufrufe zurück. Ein fehlschlagendes
    /// Plugin bleibt geladen.
    pub fn reload_all_plugins(&mut self, state: &mut EditorState) -> usize {
        let mut reloaded = 0;
        for (id, entry) in self.plugins.iter_mut() {
            if entry.status != PluginStatus::Loaded {
                continue;
            }
            let Some(init) = entry.definition.init.as_mut() else {
                continue;
            };
            let mut context = PluginContext {
                bus: state.bus().clone(),
                commands: state.command_queue().clone(),
                state: &mut *state,
            };
            match init(&mut context) {
                Ok(()) => reloaded += 1,
                Err(e) => log::error!("Reload von Plugin '{}' fehlgeschlagen: {:#}", id, e),
            }
        }
        log::info!("{} Plugins neu initialisiert", reloaded);
        reloaded
    }

    /// IDs aller registrierten Plugins in Registrierungsreihenfolge.
    pub fn registered_plugins(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    /// IDs der aktuell geladenen Plugins.
    pub fn loaded_plugins(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .filter(|(_, e)| e.status == PluginStatus::Loaded)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn plugin_status(&self, id: &str) -> Option<PluginStatus> {
        self.plugins.get(plugin_id(id)).map(|e| e.status)
    }

    pub fn definition(&self, id: &str) -> Option<&PluginDefinition> {
        self.plugins.get(plugin_id(id)).map(|e| &e.definition)
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut PluginEntry, PluginError> {
        let id = plugin_id(id);
        match self.plugins.get_mut(id) {
            Some(entry) => Ok(entry),
            None => {
                log::warn!("Plugin '{}' ist nicht registriert", id);
                Err(PluginError::UnknownPlugin(id.to_string()))
            }
        }
    }
}

/// Plugin-IDs gelten ohne umgebenden Leerraum.
fn plugin_id(id: &str) -> &str {
    id.trim()
}
