//! Repräsentiert eine Verbindung zwischen zwei Shapes.

use super::routing::{resolve_anchor, route, AnchorSpec, RouteKind};
use super::shape::Shape;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Standard-Linienfarbe.
pub const DEFAULT_CONNECTION_COLOR: &str = "#000000";
/// Standard-Farbe des Label-Texts.
pub const DEFAULT_LABEL_TEXT_COLOR: &str = "#000000";
/// Standard-Hintergrund des Labels.
pub const DEFAULT_LABEL_BACKGROUND_COLOR: &str = "#ffffff";

/// Textausrichtung des Labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl LabelAlign {
    /// Nächste Ausrichtung im Zyklus links → mitte → rechts → links.
    pub fn next(self) -> Self {
        match self {
            LabelAlign::Left => LabelAlign::Center,
            LabelAlign::Center => LabelAlign::Right,
            LabelAlign::Right => LabelAlign::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabelAlign::Left => "left",
            LabelAlign::Center => "center",
            LabelAlign::Right => "right",
        }
    }
}

/// Farben einer Verbindung und ihres Labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionStyle {
    pub color: String,
    pub label_text_color: String,
    pub label_background_color: String,
    pub label_align: LabelAlign,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_CONNECTION_COLOR.to_string(),
            label_text_color: DEFAULT_LABEL_TEXT_COLOR.to_string(),
            label_background_color: DEFAULT_LABEL_BACKGROUND_COLOR.to_string(),
            label_align: LabelAlign::Center,
        }
    }
}

/// Eine gerichtete Verbindung `from → to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Eindeutige Verbindungs-ID
    pub id: u64,
    /// Start-Shape-ID
    pub from: u64,
    /// Ziel-Shape-ID
    pub to: u64,
    #[serde(default)]
    pub from_side: AnchorSpec,
    #[serde(default)]
    pub to_side: AnchorSpec,
    #[serde(default)]
    pub kind: RouteKind,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub style: ConnectionStyle,
    /// Berechnete Wegpunkte (abgeleitet aus den Shapes)
    #[serde(skip)]
    pub path: Vec<Vec2>,
}

impl Connection {
    /// Erstellt eine Verbindung mit automatischer Anker-Wahl und ohne Pfad.
    pub fn new(id: u64, from: u64, to: u64) -> Self {
        Self {
            id,
            from,
            to,
            from_side: AnchorSpec::Auto,
            to_side: AnchorSpec::Auto,
            kind: RouteKind::Straight,
            label: None,
            style: ConnectionStyle::default(),
            path: Vec::new(),
        }
    }

    /// Prüft ob die Verbindung die Shape als Endpunkt hat.
    pub fn touches(&self, shape_id: u64) -> bool {
        self.from == shape_id || self.to == shape_id
    }

    /// Aktualisiert die Wegpunkte auf Basis der beiden Endpunkt-Shapes.
    pub fn update_geometry(&mut self, from_shape: &Shape, to_shape: &Shape) {
        self.path = Self::calculate_path(
            from_shape,
            to_shape,
            self.from_side,
            self.to_side,
            &self.kind,
        );
    }

    /// Anker auflösen und routen.
    pub fn calculate_path(
        from_shape: &Shape,
        to_shape: &Shape,
        from_side: AnchorSpec,
        to_side: AnchorSpec,
        kind: &RouteKind,
    ) -> Vec<Vec2> {
        let start = resolve_anchor(&from_shape.anchors(), from_side, to_shape.position);
        let end = resolve_anchor(&to_shape.anchors(), to_side, from_shape.position);
        route(start, end, kind)
    }

    /// Position des Labels: mittlerer Wegpunkt bzw. Mitte der Strecke.
    pub fn label_position(&self) -> Option<Vec2> {
        match self.path.len() {
            0 => None,
            n if n % 2 == 1 => Some(self.path[n / 2]),
            n => Some((self.path[n / 2 - 1] + self.path[n / 2]) * 0.5),
        }
    }
}

/// Optionen für `add_connection`. Nicht gesetzte Farben kommen aus den `EditorOptions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    pub id: Option<u64>,
    pub from_side: AnchorSpec,
    pub to_side: AnchorSpec,
    pub kind: RouteKind,
    pub label: Option<String>,
    pub color: Option<String>,
}

impl ConnectionOptions {
    pub fn with_kind(mut self, kind: impl Into<RouteKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_sides(mut self, from_side: AnchorSpec, to_side: AnchorSpec) -> Self {
        self.from_side = from_side;
        self.to_side = to_side;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Teilweise Änderung einer Verbindung. `label: Some(None)` entfernt das Label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionPatch {
    pub from_side: Option<AnchorSpec>,
    pub to_side: Option<AnchorSpec>,
    pub kind: Option<RouteKind>,
    pub label: Option<Option<String>>,
    pub color: Option<String>,
    pub label_text_color: Option<String>,
    pub label_background_color: Option<String>,
}

impl ConnectionPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
