//! Reiner Daten-Snapshot eines Diagramms für Import/Export.

use super::{Connection, Diagram, Shape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aktuelle Snapshot-Formatversion.
pub const SNAPSHOT_VERSION: u32 = 1;

/// `{ shapes: [...], connections: [...] }` in Diagramm-Reihenfolge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub shapes: Vec<Shape>,
    pub connections: Vec<Connection>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Default for DiagramSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            shapes: Vec::new(),
            connections: Vec::new(),
        }
    }
}

/// Fehler beim Einlesen oder Prüfen eines Snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot ist kein gültiges JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{entity} {id}: Feld '{field}' ist nicht endlich")]
    NonFiniteValue {
        entity: &'static str,
        id: u64,
        field: &'static str,
    },
    #[error("Shape {id}: Breite und Höhe müssen größer als 0 sein")]
    InvalidSize { id: u64 },
    #[error("{entity} {id}: Farbe '{field}' ist leer")]
    EmptyColor {
        entity: &'static str,
        id: u64,
        field: &'static str,
    },
}

impl DiagramSnapshot {
    /// Erstellt einen Snapshot aus dem aktuellen Diagramm.
    pub fn capture(diagram: &Diagram) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            shapes: diagram.shapes().cloned().collect(),
            connections: diagram.connections().cloned().collect(),
        }
    }

    /// Parst einen Snapshot aus JSON (ohne Prüfung der Werte).
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Prüft alle Werte, bevor irgendetwas am Live-Diagramm verändert wird.
    ///
    /// Verweise von Verbindungen auf unbekannte Shapes sind kein Fehler;
    /// sie werden beim Import übersprungen.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for shape in &self.shapes {
            if !shape.position.is_finite() {
                return Err(SnapshotError::NonFiniteValue {
                    entity: "Shape",
                    id: shape.id,
                    field: "position",
                });
            }
            if !shape.size.is_finite() {
                return Err(SnapshotError::NonFiniteValue {
                    entity: "Shape",
                    id: shape.id,
                    field: "size",
                });
            }
            if shape.size.x <= 0.0 || shape.size.y <= 0.0 {
                return Err(SnapshotError::InvalidSize { id: shape.id });
            }
            let colors = [
                ("fill_color", &shape.style.fill_color),
                ("border_color", &shape.style.border_color),
                ("text_color", &shape.style.text_color),
            ];
            if let Some(&(field, _)) = colors.iter().find(|(_, c)| c.trim().is_empty()) {
                return Err(SnapshotError::EmptyColor {
                    entity: "Shape",
                    id: shape.id,
                    field,
                });
            }
        }

        for conn in &self.connections {
            let colors = [
                ("color", &conn.style.color),
                ("label_text_color", &conn.style.label_text_color),
                ("label_background_color", &conn.style.label_background_color),
            ];
            if let Some(&(field, _)) = colors.iter().find(|(_, c)| c.trim().is_empty()) {
                return Err(SnapshotError::EmptyColor {
                    entity: "Verbindung",
                    id: conn.id,
                    field,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_arrays_are_rejected() {
        let result = DiagramSnapshot::from_json(r#"{"shapes": []}"#);
        assert!(matches!(result, Err(SnapshotError::Json(_))));
    }

    #[test]
    fn zero_size_is_rejected() {
        let json = r#"{"shapes":[{"id":1,"kind":"square","position":[0,0],"size":[0,10]}],"connections":[]}"#;
        let snapshot = DiagramSnapshot::from_json(json).expect("parsebar");
        assert!(matches!(snapshot.validate(), Err(SnapshotError::InvalidSize { id: 1 })));
    }

    #[test]
    fn empty_color_is_rejected() {
        let json = r#"{"shapes":[{"id":1,"kind":"square","position":[0,0],"size":[10,10],"fill_color":" "}],"connections":[]}"#;
        let snapshot = DiagramSnapshot::from_json(json).expect("parsebar");
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::EmptyColor { field: "fill_color", .. })
        ));
    }

    #[test]
    fn dangling_connection_is_not_a_validation_error() {
        let json = r#"{"shapes":[],"connections":[{"id":1,"from":1,"to":2}]}"#;
        let snapshot = DiagramSnapshot::from_json(json).expect("parsebar");
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    }
}
