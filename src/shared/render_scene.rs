//! Render-Szene als expliziter Übergabevertrag zwischen App und Renderer.
//!
//! Lebt im shared-Modul, da `app` sie baut und ein externer Renderer sie konsumiert.

use crate::core::{ConnectionStyle, ShapeKind, ShapeStyle};
use glam::Vec2;

/// Zeichendaten einer Shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeVisual {
    pub id: u64,
    pub kind: ShapeKind,
    /// Geschlossener Umriss in Weltkoordinaten
    pub outline: Vec<Vec2>,
    /// Mittelpunkt (Textanker)
    pub center: Vec2,
    pub title: String,
    pub body: String,
    pub style: ShapeStyle,
    pub locked: bool,
    pub editable: bool,
}

/// Zeichendaten einer Verbindung.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionVisual {
    pub id: u64,
    /// Wegpunkte vom Start- zum Ziel-Anker
    pub path: Vec<Vec2>,
    pub style: ConnectionStyle,
    pub label: Option<String>,
    /// Position des Labels (mittlerer Wegpunkt)
    pub label_position: Option<Vec2>,
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderScene {
    /// Shapes in Zeichenreihenfolge
    pub shapes: Vec<ShapeVisual>,
    /// Verbindungen in Zeichenreihenfolge
    pub connections: Vec<ConnectionVisual>,
    /// Rasterabstand (für Hilfslinien)
    pub grid_spacing: f32,
}

impl RenderScene {
    /// Gibt zurück, ob etwas zu zeichnen ist.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.connections.is_empty()
    }
}
