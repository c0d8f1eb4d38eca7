//! Shape: ein Diagramm-Element mit Umriss, Text und Stil.

use super::geometry::{Anchors, Bounds, ShapeKind};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Standard-Füllfarbe neuer Shapes.
pub const DEFAULT_FILL_COLOR: &str = "#f9fafb";
/// Standard-Rahmenfarbe neuer Shapes.
pub const DEFAULT_BORDER_COLOR: &str = "#000000";
/// Standard-Textfarbe neuer Shapes.
pub const DEFAULT_TEXT_COLOR: &str = "#111827";

/// Farben einer Shape (CSS-Farbstrings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub fill_color: String,
    pub border_color: String,
    pub text_color: String,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
        }
    }
}

/// Reihenfolge-Metadaten (Ablaufdiagramme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOrder {
    pub order: Option<i64>,
    pub is_start: bool,
    pub is_end: bool,
}

/// Welches Textfeld einer Shape bearbeitet wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Title,
    Body,
}

/// Ein Diagramm-Element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Eindeutige Shape-ID
    pub id: u64,
    /// Shape-Typ (bestimmt den Umriss)
    pub kind: ShapeKind,
    /// Mittelpunkt, immer auf dem Raster
    pub position: Vec2,
    /// Breite/Höhe
    pub size: Vec2,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(flatten)]
    pub style: ShapeStyle,
    /// Gesperrt: Position unveränderlich, nicht verschiebbar
    #[serde(default)]
    pub locked: bool,
    /// Inline-Textbearbeitung erlaubt
    #[serde(default = "default_editable")]
    pub editable: bool,
    #[serde(flatten)]
    pub order: ShapeOrder,
    /// Abgeleiteter Umriss (aus Typ, Position und Größe)
    #[serde(skip)]
    pub outline: Vec<Vec2>,
    /// IDs aller Verbindungen, die diese Shape berühren (abgeleitet)
    #[serde(skip)]
    pub connections: BTreeSet<u64>,
}

fn default_editable() -> bool {
    true
}

impl Shape {
    /// Erstellt eine Shape ohne Umriss; der Umriss wird beim Einfügen abgeleitet.
    pub fn new(id: u64, kind: ShapeKind, position: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            size,
            title: String::new(),
            body: String::new(),
            style: ShapeStyle::default(),
            locked: false,
            editable: true,
            order: ShapeOrder::default(),
            outline: Vec::new(),
            connections: BTreeSet::new(),
        }
    }

    /// Bounding-Box des Umrisses (Fallback: Position/Größe).
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.outline).unwrap_or(Bounds {
            min: self.position - self.size * 0.5,
            max: self.position + self.size * 0.5,
        })
    }

    /// Die acht Anker-Punkte aus der Bounding-Box.
    pub fn anchors(&self) -> Anchors {
        Anchors::from_bounds(self.bounds())
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Title => &self.title,
            TextField::Body => &self.body,
        }
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Title => &mut self.title,
            TextField::Body => &mut self.body,
        }
    }

    /// Prüft alle Fließkomma-Felder auf endliche Werte.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.size.is_finite()
    }
}

/// Beschreibung einer neuen Shape für `add_shape`.
///
/// Nicht gesetzte Felder werden aus den `EditorOptions` ergänzt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeDraft {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub kind: ShapeKind,
    pub position: Vec2,
    #[serde(default)]
    pub size: Option<Vec2>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub editable: Option<bool>,
}

impl ShapeDraft {
    pub fn new(kind: impl Into<ShapeKind>, position: Vec2) -> Self {
        Self {
            kind: kind.into(),
            position,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }
}

/// Teilweise Änderung einer Shape für `update_shape`. `None` = unverändert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapePatch {
    #[serde(default)]
    pub kind: Option<ShapeKind>,
    #[serde(default)]
    pub position: Option<Vec2>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub editable: Option<bool>,
}

impl ShapePatch {
    pub fn position(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn size(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Änderung der Reihenfolge-Metadaten. `order: Some(None)` löscht die Nummer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default)]
    pub order: Option<Option<i64>>,
    #[serde(default)]
    pub is_start: Option<bool>,
    #[serde(default)]
    pub is_end: Option<bool>,
}
