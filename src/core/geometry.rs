//! Geometrie-Kit: Shape-Umrisse, Bounding-Boxen und die acht Anker-Punkte.
//!
//! Koordinatensystem wie auf dem Canvas: x nach rechts, y nach unten.
//! "Norden" ist damit die Kante mit dem kleinsten y-Wert.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::TAU;
use std::fmt;

/// Standard-Segmentanzahl für Kreis-Polygone.
pub const CIRCLE_SEGMENTS: usize = 32;

/// Shape-Typ. Die eingebauten Typen haben feste Umrisse, weitere Typen
/// werden über die [`GeometryRegistry`] registriert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    #[default]
    Square,
    Rectangle,
    Circle,
    Triangle,
    Octagon,
    /// Per Registry erweiterter Typ (Name wie registriert)
    Custom(String),
}

impl ShapeKind {
    /// Alle eingebauten Typen.
    pub const BUILTIN: [ShapeKind; 5] = [
        ShapeKind::Square,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Octagon,
    ];

    /// Typ-Tag, wie er in Snapshots und in der Registry verwendet wird.
    pub fn as_str(&self) -> &str {
        match self {
            ShapeKind::Square => "square",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Octagon => "octagon",
            ShapeKind::Custom(name) => name,
        }
    }
}

impl From<String> for ShapeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "square" => ShapeKind::Square,
            "rectangle" => ShapeKind::Rectangle,
            "circle" => ShapeKind::Circle,
            "triangle" => ShapeKind::Triangle,
            "octagon" => ShapeKind::Octagon,
            _ => ShapeKind::Custom(value),
        }
    }
}

impl From<&str> for ShapeKind {
    fn from(value: &str) -> Self {
        ShapeKind::from(value.to_string())
    }
}

impl From<ShapeKind> for String {
    fn from(value: ShapeKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Achsenparallele Bounding-Box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Bounding-Box einer Punktliste. `None` bei leerer Liste.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Überlappung inklusive Berührung an Kante oder Ecke.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

// ── Eingebaute Umrisse ─────────────────────────────────────────────

/// Rechteck (auch für "square"): 4 Ecken im Uhrzeigersinn ab oben links.
pub fn rectangle_outline(center: Vec2, size: Vec2) -> Vec<Vec2> {
    let half = size * 0.5;
    vec![
        Vec2::new(center.x - half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
        Vec2::new(center.x - half.x, center.y + half.y),
    ]
}

/// Kreis als regelmäßiges Polygon. Radius = halbe kleinere Seite.
pub fn circle_outline(center: Vec2, size: Vec2, segments: usize) -> Vec<Vec2> {
    regular_polygon(center, size.x.min(size.y) * 0.5, segments.max(3))
}

/// Dreieck mit Spitze oben (kleinstes y).
pub fn triangle_outline(center: Vec2, size: Vec2) -> Vec<Vec2> {
    let half = size * 0.5;
    vec![
        Vec2::new(center.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
        Vec2::new(center.x - half.x, center.y + half.y),
    ]
}

/// Regelmäßiges Achteck, Radius = halbe kleinere Seite.
pub fn octagon_outline(center: Vec2, size: Vec2) -> Vec<Vec2> {
    regular_polygon(center, size.x.min(size.y) * 0.5, 8)
}

fn regular_polygon(center: Vec2, radius: f32, points: usize) -> Vec<Vec2> {
    (0..points)
        .map(|i| {
            let angle = TAU * i as f32 / points as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Umriss eines eingebauten Typs. Unbekannte Typen fallen auf das Rechteck zurück.
pub fn outline(kind: &ShapeKind, center: Vec2, size: Vec2) -> Vec<Vec2> {
    match kind {
        ShapeKind::Square | ShapeKind::Rectangle => rectangle_outline(center, size),
        ShapeKind::Circle => circle_outline(center, size, CIRCLE_SEGMENTS),
        ShapeKind::Triangle => triangle_outline(center, size),
        ShapeKind::Octagon => octagon_outline(center, size),
        ShapeKind::Custom(_) => rectangle_outline(center, size),
    }
}

// ── Registry ────────────────────────────────────────────────────────

/// Umriss-Funktion: (Mittelpunkt, Größe) → geschlossene Punktliste.
pub type OutlineFn = Box<dyn Fn(Vec2, Vec2) -> Vec<Vec2>>;

/// Typ-Tag → Umriss-Funktion. Neue Shape-Typen registrieren nur ihren Umriss,
/// Anker und Routing leiten sich daraus ab.
pub struct GeometryRegistry {
    outlines: HashMap<String, OutlineFn>,
}

impl Default for GeometryRegistry {
    fn default() -> Self {
        Self::with_builtins(CIRCLE_SEGMENTS)
    }
}

impl fmt::Debug for GeometryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.outlines.keys().collect();
        kinds.sort();
        f.debug_struct("GeometryRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl GeometryRegistry {
    /// Leere Registry ohne eingebaute Typen.
    pub fn empty() -> Self {
        Self {
            outlines: HashMap::new(),
        }
    }

    /// Registry mit den fünf eingebauten Typen.
    pub fn with_builtins(circle_segments: usize) -> Self {
        let mut registry = Self::empty();
        registry.register(ShapeKind::Square, rectangle_outline);
        registry.register(ShapeKind::Rectangle, rectangle_outline);
        registry.register(ShapeKind::Circle, move |c, s| {
            circle_outline(c, s, circle_segments)
        });
        registry.register(ShapeKind::Triangle, triangle_outline);
        registry.register(ShapeKind::Octagon, octagon_outline);
        registry
    }

    /// Registriert (oder ersetzt) die Umriss-Funktion eines Typs.
    pub fn register<K, F>(&mut self, kind: K, outline_fn: F)
    where
        K: Into<ShapeKind>,
        F: Fn(Vec2, Vec2) -> Vec<Vec2> + 'static,
    {
        let kind = kind.into();
        if self
            .outlines
            .insert(kind.as_str().to_string(), Box::new(outline_fn))
            .is_some()
        {
            log::debug!("Umriss für Shape-Typ '{}' ersetzt", kind);
        }
    }

    /// Prüft ob für den Typ ein Umriss registriert ist.
    pub fn is_registered(&self, kind: &ShapeKind) -> bool {
        self.outlines.contains_key(kind.as_str())
    }

    /// Registrierte Typ-Tags (sortiert).
    pub fn kinds(&self) -> Vec<ShapeKind> {
        let mut names: Vec<&String> = self.outlines.keys().collect();
        names.sort();
        names.into_iter().map(|n| ShapeKind::from(n.as_str())).collect()
    }

    /// Berechnet den Umriss. Nicht registrierte Typen werden als Rechteck gezeichnet.
    pub fn outline(&self, kind: &ShapeKind, center: Vec2, size: Vec2) -> Vec<Vec2> {
        match self.outlines.get(kind.as_str()) {
            Some(outline_fn) => outline_fn(center, size),
            None => {
                log::warn!(
                    "Kein Umriss für Shape-Typ '{}' registriert, verwende Rechteck",
                    kind
                );
                rectangle_outline(center, size)
            }
        }
    }
}

// ── Anker ───────────────────────────────────────────────────────────

/// Einer der acht kanonischen Anker-Punkte auf der Bounding-Box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSide {
    North,
    South,
    West,
    East,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl AnchorSide {
    /// Feste Reihenfolge; bei gleichem Abstand gewinnt der frühere Anker.
    pub const ALL: [AnchorSide; 8] = [
        AnchorSide::North,
        AnchorSide::South,
        AnchorSide::West,
        AnchorSide::East,
        AnchorSide::NorthWest,
        AnchorSide::NorthEast,
        AnchorSide::SouthWest,
        AnchorSide::SouthEast,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorSide::North => "north",
            AnchorSide::South => "south",
            AnchorSide::West => "west",
            AnchorSide::East => "east",
            AnchorSide::NorthWest => "north_west",
            AnchorSide::NorthEast => "north_east",
            AnchorSide::SouthWest => "south_west",
            AnchorSide::SouthEast => "south_east",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|side| side.as_str() == tag)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Die acht Anker-Punkte einer Shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    points: [Vec2; 8],
}

impl Anchors {
    /// Leitet die Anker aus der Bounding-Box ab.
    pub fn from_bounds(bounds: Bounds) -> Self {
        let c = bounds.center();
        let (min, max) = (bounds.min, bounds.max);
        let mut points = [Vec2::ZERO; 8];
        points[AnchorSide::North.index()] = Vec2::new(c.x, min.y);
        points[AnchorSide::South.index()] = Vec2::new(c.x, max.y);
        points[AnchorSide::West.index()] = Vec2::new(min.x, c.y);
        points[AnchorSide::East.index()] = Vec2::new(max.x, c.y);
        points[AnchorSide::NorthWest.index()] = Vec2::new(min.x, min.y);
        points[AnchorSide::NorthEast.index()] = Vec2::new(max.x, min.y);
        points[AnchorSide::SouthWest.index()] = Vec2::new(min.x, max.y);
        points[AnchorSide::SouthEast.index()] = Vec2::new(max.x, max.y);
        Self { points }
    }

    /// Anker aus einem Umriss; ein leerer Umriss liefert acht Punkte im `fallback`.
    pub fn from_outline(outline: &[Vec2], fallback: Vec2) -> Self {
        let bounds = Bounds::from_points(outline).unwrap_or(Bounds {
            min: fallback,
            max: fallback,
        });
        Self::from_bounds(bounds)
    }

    pub fn get(&self, side: AnchorSide) -> Vec2 {
        self.points[side.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorSide, Vec2)> + '_ {
        AnchorSide::ALL.into_iter().map(|side| (side, self.get(side)))
    }
}

/// Wählt den Anker mit minimalem euklidischem Abstand zu `toward`.
pub fn closest_anchor(anchors: &Anchors, toward: Vec2) -> (AnchorSide, Vec2) {
    let mut best = (AnchorSide::North, anchors.get(AnchorSide::North));
    let mut best_distance = f32::INFINITY;
    for (side, point) in anchors.iter() {
        let distance = point.distance_squared(toward);
        if distance < best_distance {
            best_distance = distance;
            best = (side, point);
        }
    }
    best
}

/// Rastet eine Position auf das nächste Vielfache von `spacing` ein.
/// `spacing <= 0` schaltet das Raster ab.
pub fn snap_to_grid(position: Vec2, spacing: f32) -> Vec2 {
    if spacing <= 0.0 || !spacing.is_finite() {
        return position;
    }
    // + 0.0 normalisiert -0.0
    (position / spacing).round() * spacing + Vec2::ZERO
}
