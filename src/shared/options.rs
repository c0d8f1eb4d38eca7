//! Zentrale Konfiguration für den Diagramm-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::connection::{
    DEFAULT_CONNECTION_COLOR, DEFAULT_LABEL_BACKGROUND_COLOR, DEFAULT_LABEL_TEXT_COLOR,
};
use crate::core::geometry::CIRCLE_SEGMENTS;
use crate::core::shape::{DEFAULT_BORDER_COLOR, DEFAULT_FILL_COLOR, DEFAULT_TEXT_COLOR};
use crate::core::{ConnectionStyle, LabelAlign, ShapeStyle};
use glam::Vec2;
use serde::{Deserialize, Serialize};

// ── Raster ──────────────────────────────────────────────────────────

/// Rasterabstand für Snap-to-Grid. `<= 0` schaltet das Raster ab.
pub const GRID_SPACING: f32 = 100.0;

// ── Shapes ──────────────────────────────────────────────────────────

/// Standard-Breite neuer Shapes.
pub const DEFAULT_SHAPE_WIDTH: f32 = 80.0;
/// Standard-Höhe neuer Shapes.
pub const DEFAULT_SHAPE_HEIGHT: f32 = 50.0;

// ── Historie ────────────────────────────────────────────────────────

/// Maximale Tiefe des Undo-Stacks.
pub const MAX_UNDO: usize = 100;

/// Dateiname der Optionen-Datei.
pub const CONFIG_FILE_NAME: &str = "diagram_editor.toml";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `diagram_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── Raster ──────────────────────────────────────────────────
    /// Rasterabstand; jede Position wird darauf eingerastet
    pub grid_spacing: f32,

    // ── Shapes ──────────────────────────────────────────────────
    /// Breite neuer Shapes ohne explizite Größe
    pub default_shape_width: f32,
    /// Höhe neuer Shapes ohne explizite Größe
    pub default_shape_height: f32,
    /// Segmentanzahl des Kreis-Polygons
    #[serde(default = "default_circle_segments")]
    pub circle_segments: usize,
    /// Neue Shapes sind gesperrt, sofern nicht anders angegeben
    #[serde(default = "default_new_shapes_locked")]
    pub new_shapes_locked: bool,
    pub shape_fill_color: String,
    pub shape_border_color: String,
    pub shape_text_color: String,

    // ── Verbindungen ────────────────────────────────────────────
    pub connection_color: String,
    pub label_text_color: String,
    pub label_background_color: String,

    // ── Historie ────────────────────────────────────────────────
    /// Maximale Undo-Tiefe (älteste Einträge fallen heraus)
    #[serde(default = "default_max_undo")]
    pub max_undo: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            grid_spacing: GRID_SPACING,

            default_shape_width: DEFAULT_SHAPE_WIDTH,
            default_shape_height: DEFAULT_SHAPE_HEIGHT,
            circle_segments: CIRCLE_SEGMENTS,
            new_shapes_locked: true,
            shape_fill_color: DEFAULT_FILL_COLOR.to_string(),
            shape_border_color: DEFAULT_BORDER_COLOR.to_string(),
            shape_text_color: DEFAULT_TEXT_COLOR.to_string(),

            connection_color: DEFAULT_CONNECTION_COLOR.to_string(),
            label_text_color: DEFAULT_LABEL_TEXT_COLOR.to_string(),
            label_background_color: DEFAULT_LABEL_BACKGROUND_COLOR.to_string(),

            max_undo: MAX_UNDO,
        }
    }
}

/// Serde-Default für `circle_segments` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_circle_segments() -> usize {
    CIRCLE_SEGMENTS
}

fn default_new_shapes_locked() -> bool {
    true
}

fn default_max_undo() -> usize {
    MAX_UNDO
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("diagram-editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join(CONFIG_FILE_NAME)
    }

    /// Standard-Größe neuer Shapes.
    pub fn default_shape_size(&self) -> Vec2 {
        Vec2::new(self.default_shape_width, self.default_shape_height)
    }

    /// Stil neuer Shapes.
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            fill_color: self.shape_fill_color.clone(),
            border_color: self.shape_border_color.clone(),
            text_color: self.shape_text_color.clone(),
        }
    }

    /// Stil neuer Verbindungen.
    pub fn connection_style(&self) -> ConnectionStyle {
        ConnectionStyle {
            color: self.connection_color.clone(),
            label_text_color: self.label_text_color.clone(),
            label_background_color: self.label_background_color.clone(),
            label_align: LabelAlign::default(),
        }
    }
}
