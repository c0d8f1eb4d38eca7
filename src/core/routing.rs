//! Pfad-Router: Anker-Auswahl und Wegpunkt-Berechnung für Verbindungen.

use super::geometry::{closest_anchor, AnchorSide, Anchors};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, OnceLock};

/// Routing-Art einer Verbindung.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RouteKind {
    /// Direkte Linie zwischen den Ankern
    #[default]
    Straight,
    /// Rechtwinkliger Knick (ein Zwischenpunkt)
    Elbow,
    /// Unbekannter Tag, wird wie `Elbow` geroutet
    Other(String),
}

impl RouteKind {
    pub fn as_str(&self) -> &str {
        match self {
            RouteKind::Straight => "straight",
            RouteKind::Elbow => "elbow",
            RouteKind::Other(tag) => tag,
        }
    }

    /// Wechselt zwischen gerade und geknickt. Unbekannte Tags werden zu `Straight`.
    pub fn toggled(&self) -> RouteKind {
        match self {
            RouteKind::Straight => RouteKind::Elbow,
            RouteKind::Elbow | RouteKind::Other(_) => RouteKind::Straight,
        }
    }
}

impl From<String> for RouteKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "straight" => RouteKind::Straight,
            "elbow" => RouteKind::Elbow,
            _ => RouteKind::Other(value),
        }
    }
}

impl From<&str> for RouteKind {
    fn from(value: &str) -> Self {
        RouteKind::from(value.to_string())
    }
}

impl From<RouteKind> for String {
    fn from(value: RouteKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anker-Angabe an einem Verbindungsende: fest oder automatisch gewählt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnchorSpec {
    /// Nächster Anker zum Mittelpunkt der Gegen-Shape
    #[default]
    Auto,
    Side(AnchorSide),
}

impl AnchorSpec {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorSpec::Auto => "auto",
            AnchorSpec::Side(side) => side.as_str(),
        }
    }
}

impl From<AnchorSide> for AnchorSpec {
    fn from(side: AnchorSide) -> Self {
        AnchorSpec::Side(side)
    }
}

impl TryFrom<String> for AnchorSpec {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "auto" {
            return Ok(AnchorSpec::Auto);
        }
        AnchorSide::parse(&value)
            .map(AnchorSpec::Side)
            .ok_or_else(|| format!("unbekannte Anker-Seite '{}'", value))
    }
}

impl From<AnchorSpec> for String {
    fn from(value: AnchorSpec) -> Self {
        value.as_str().to_string()
    }
}

/// Löst eine Anker-Angabe auf. `Auto` wählt den Anker, der dem
/// Mittelpunkt der Gegen-Shape am nächsten liegt.
pub fn resolve_anchor(anchors: &Anchors, spec: AnchorSpec, other_center: Vec2) -> Vec2 {
    match spec {
        AnchorSpec::Side(side) => anchors.get(side),
        AnchorSpec::Auto => closest_anchor(anchors, other_center).1,
    }
}

/// Berechnet die Wegpunkte zwischen zwei Anker-Punkten.
///
/// - `Straight`: `[start, end]`
/// - `Elbow`: `[start, (end.x, start.y), end]`
/// - unbekannte Tags: einmalige Warnung pro Tag, dann wie `Elbow`
pub fn route(start: Vec2, end: Vec2, kind: &RouteKind) -> Vec<Vec2> {
    match kind {
        RouteKind::Straight => vec![start, end],
        RouteKind::Elbow => elbow(start, end),
        RouteKind::Other(tag) => {
            warn_unknown_route_kind(tag);
            elbow(start, end)
        }
    }
}

fn elbow(start: Vec2, end: Vec2) -> Vec<Vec2> {
    vec![start, Vec2::new(end.x, start.y), end]
}

fn warn_unknown_route_kind(tag: &str) {
    static WARNED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    let warned = WARNED.get_or_init(|| Mutex::new(HashSet::new()));
    let first_time = match warned.lock() {
        Ok(mut seen) => seen.insert(tag.to_string()),
        Err(poisoned) => poisoned.into_inner().insert(tag.to_string()),
    };
    if first_time {
        log::warn!(
            "Unbekannte Routing-Art '{}', verwende rechtwinkliges Routing",
            tag
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::rectangle_outline;

    #[test]
    fn straight_route_has_two_points() {
        let path = route(Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0), &RouteKind::Straight);
        assert_eq!(path, vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0)]);
    }

    #[test]
    fn elbow_route_bends_once() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(100.0, 50.0);
        let path = route(start, end, &RouteKind::Elbow);
        assert_eq!(path, vec![start, Vec2::new(100.0, 0.0), end]);
    }

    #[test]
    fn unknown_route_kind_falls_back_to_elbow() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(30.0, 40.0);
        let kind = RouteKind::from("spline");
        assert_eq!(kind, RouteKind::Other("spline".into()));
        assert_eq!(route(start, end, &kind), route(start, end, &RouteKind::Elbow));
        // zweiter Aufruf bleibt deterministisch
        assert_eq!(route(start, end, &kind), route(start, end, &RouteKind::Elbow));
    }

    #[test]
    fn anchor_spec_parses_tags() {
        assert_eq!(AnchorSpec::try_from("auto".to_string()), Ok(AnchorSpec::Auto));
        assert_eq!(
            AnchorSpec::try_from("south_west".to_string()),
            Ok(AnchorSpec::Side(AnchorSide::SouthWest))
        );
        assert!(AnchorSpec::try_from("middle".to_string()).is_err());
    }

    #[test]
    fn resolve_anchor_uses_fixed_side_or_nearest() {
        let anchors = Anchors::from_outline(&rectangle_outline(Vec2::ZERO, Vec2::new(80.0, 50.0)), Vec2::ZERO);
        let fixed = resolve_anchor(&anchors, AnchorSide::North.into(), Vec2::new(300.0, 0.0));
        assert_eq!(fixed, Vec2::new(0.0, -25.0));
        let auto = resolve_anchor(&anchors, AnchorSpec::Auto, Vec2::new(0.0, 400.0));
        assert_eq!(auto, Vec2::new(0.0, 25.0));
    }

    #[test]
    fn toggled_switches_between_straight_and_elbow() {
        assert_eq!(RouteKind::Straight.toggled(), RouteKind::Elbow);
        assert_eq!(RouteKind::Elbow.toggled(), RouteKind::Straight);
        assert_eq!(RouteKind::from("arc").toggled(), RouteKind::Straight);
    }
}
