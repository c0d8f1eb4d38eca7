//! Das Diagramm: geordneter Container aller Shapes und Verbindungen.
//!
//! Der Container hält die referentielle Integrität (Endpunkte existieren,
//! Verbindungsmengen der Shapes stimmen) und die abgeleitete Geometrie.
//! Historie und Events liegen eine Schicht höher in `app`.

use super::{Connection, Shape};
use indexmap::IndexMap;

/// Eine beim Entfernen gelöschte Shape samt ihrer Position in der Reihenfolge.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedShape {
    pub index: usize,
    pub shape: Shape,
    /// Mitentfernte Verbindungen (Kaskade), jeweils mit ihrem Index
    pub connections: Vec<(usize, Connection)>,
}

/// Alle Shapes und Verbindungen in Einfügereihenfolge.
#[derive(Debug, Clone)]
pub struct Diagram {
    shapes: IndexMap<u64, Shape>,
    connections: IndexMap<u64, Connection>,
    /// `None`: ID-Raum erschöpft
    next_shape_id: Option<u64>,
    next_connection_id: Option<u64>,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

/// Vergleicht nur den Inhalt (inkl. Reihenfolge), nicht die ID-Zähler.
impl PartialEq for Diagram {
    fn eq(&self, other: &Self) -> bool {
        self.shapes.len() == other.shapes.len()
            && self.connections.len() == other.connections.len()
            && self.shapes.iter().eq(other.shapes.iter())
            && self.connections.iter().eq(other.connections.iter())
    }
}

impl Diagram {
    /// Erstellt ein leeres Diagramm
    pub fn new() -> Self {
        Self {
            shapes: IndexMap::new(),
            connections: IndexMap::new(),
            next_shape_id: Some(1),
            next_connection_id: Some(1),
        }
    }

    // ── Lesen ───────────────────────────────────────────────────────

    pub fn shape(&self, id: u64) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn connection(&self, id: u64) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn contains_shape(&self, id: u64) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn contains_connection(&self, id: u64) -> bool {
        self.connections.contains_key(&id)
    }

    /// Alle Shapes in Einfügereihenfolge.
    pub fn shapes(&self) -> impl DoubleEndedIterator<Item = &Shape> + ExactSizeIterator {
        self.shapes.values()
    }

    /// Alle Verbindungen in Einfügereihenfolge.
    pub fn connections(
        &self,
    ) -> impl DoubleEndedIterator<Item = &Connection> + ExactSizeIterator {
        self.connections.values()
    }

    pub fn shape_ids(&self) -> Vec<u64> {
        self.shapes.keys().copied().collect()
    }

    pub fn connection_ids(&self) -> Vec<u64> {
        self.connections.keys().copied().collect()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.connections.is_empty()
    }

    pub fn shape_index(&self, id: u64) -> Option<usize> {
        self.shapes.get_index_of(&id)
    }

    pub fn connection_index(&self, id: u64) -> Option<usize> {
        self.connections.get_index_of(&id)
    }

    /// Verbindungen, die eine Shape berühren, in Einfügereihenfolge.
    pub fn connections_of(&self, shape_id: u64) -> Vec<&Connection> {
        self.connections
            .values()
            .filter(|c| c.touches(shape_id))
            .collect()
    }

    pub fn locked_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values().filter(|s| s.locked)
    }

    pub fn unlocked_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values().filter(|s| !s.locked)
    }

    // ── IDs ─────────────────────────────────────────────────────────

    /// Nächste freie Shape-ID (wird nicht reserviert).
    pub fn peek_next_shape_id(&self) -> Option<u64> {
        self.next_shape_id
    }

    /// Vergibt eine neue Shape-ID. IDs werden nie wiederverwendet.
    ///
    /// `None`, sobald der ID-Raum bis `u64::MAX` verbraucht ist.
    pub fn allocate_shape_id(&mut self) -> Option<u64> {
        let shapes = &self.shapes;
        allocate_id(&mut self.next_shape_id, |id| shapes.contains_key(&id))
    }

    /// Vergibt eine neue Verbindungs-ID.
    pub fn allocate_connection_id(&mut self) -> Option<u64> {
        let connections = &self.connections;
        allocate_id(&mut self.next_connection_id, |id| connections.contains_key(&id))
    }

    /// Hebt den Shape-Zähler über `id` an.
    pub fn reserve_shape_id(&mut self, id: u64) {
        reserve_id(&mut self.next_shape_id, id);
    }

    /// Hebt den Verbindungs-Zähler über `id` an.
    pub fn reserve_connection_id(&mut self, id: u64) {
        reserve_id(&mut self.next_connection_id, id);
    }

    // ── Schreiben ───────────────────────────────────────────────────

    /// Fügt eine Shape an `index` ein (geklemmt auf die Länge).
    ///
    /// Gibt `false` zurück, wenn die ID bereits vergeben ist. Die
    /// Verbindungsmenge wird aus dem Bestand abgeleitet.
    pub fn insert_shape_at(&mut self, index: usize, mut shape: Shape) -> bool {
        if self.shapes.contains_key(&shape.id) {
            return false;
        }
        shape.connections = self
            .connections
            .values()
            .filter(|c| c.touches(shape.id))
            .map(|c| c.id)
            .collect();
        self.reserve_shape_id(shape.id);
        let index = index.min(self.shapes.len());
        self.shapes.shift_insert(index, shape.id, shape);
        true
    }

    /// Hängt eine Shape an.
    pub fn push_shape(&mut self, shape: Shape) -> bool {
        self.insert_shape_at(self.shapes.len(), shape)
    }

    /// Entfernt eine Shape inklusive aller Verbindungen, die sie berühren.
    pub fn remove_shape(&mut self, id: u64) -> Option<RemovedShape> {
        let index = self.shapes.get_index_of(&id)?;
        let connection_ids: Vec<u64> = self.shapes[index].connections.iter().copied().collect();
        let mut connections = Vec::with_capacity(connection_ids.len());
        for connection_id in connection_ids {
            if let Some(removed) = self.remove_connection(connection_id) {
                connections.push(removed);
            }
        }
        let shape = self.shapes.shift_remove(&id)?;
        Some(RemovedShape {
            index,
            shape,
            connections,
        })
    }

    /// Ersetzt eine Shape (gleiche ID). Die Verbindungsmenge bleibt erhalten,
    /// die Pfade der berührenden Verbindungen werden neu berechnet.
    ///
    /// Gibt die vorherige Shape und die IDs der neu gerouteten Verbindungen zurück.
    pub fn replace_shape(&mut self, mut shape: Shape) -> Option<(Shape, Vec<u64>)> {
        let slot = self.shapes.get_mut(&shape.id)?;
        shape.connections = slot.connections.clone();
        let previous = std::mem::replace(slot, shape);
        let rerouted = self.rebuild_connection_geometry_for(previous.id);
        Some((previous, rerouted))
    }

    /// Verschiebt eine Shape an `index` (geklemmt) in der Zeichenreihenfolge.
    ///
    /// Gibt den bisherigen Index zurück.
    pub fn move_shape_to(&mut self, id: u64, index: usize) -> Option<usize> {
        let from = self.shapes.get_index_of(&id)?;
        let to = index.min(self.shapes.len() - 1);
        self.shapes.move_index(from, to);
        Some(from)
    }

    /// Fügt eine Verbindung an `index` ein und berechnet ihren Pfad.
    ///
    /// Gibt `false` zurück bei vergebener ID, unbekanntem Endpunkt oder `from == to`.
    pub fn insert_connection_at(&mut self, index: usize, mut connection: Connection) -> bool {
        if self.connections.contains_key(&connection.id) || connection.from == connection.to {
            return false;
        }
        let (Some(from), Some(to)) = (
            self.shapes.get(&connection.from),
            self.shapes.get(&connection.to),
        ) else {
            return false;
        };
        connection.update_geometry(from, to);

        let id = connection.id;
        let (from_id, to_id) = (connection.from, connection.to);
        self.reserve_connection_id(id);
        let index = index.min(self.connections.len());
        self.connections.shift_insert(index, id, connection);
        for shape_id in [from_id, to_id] {
            if let Some(shape) = self.shapes.get_mut(&shape_id) {
                shape.connections.insert(id);
            }
        }
        true
    }

    /// Hängt eine Verbindung an.
    pub fn push_connection(&mut self, connection: Connection) -> bool {
        self.insert_connection_at(self.connections.len(), connection)
    }

    /// Entfernt eine Verbindung und trägt sie aus den Shapes aus.
    pub fn remove_connection(&mut self, id: u64) -> Option<(usize, Connection)> {
        let (index, _, connection) = self.connections.shift_remove_full(&id)?;
        for shape_id in [connection.from, connection.to] {
            if let Some(shape) = self.shapes.get_mut(&shape_id) {
                shape.connections.remove(&id);
            }
        }
        Some((index, connection))
    }

    /// Ersetzt eine Verbindung (gleiche ID) und berechnet ihren Pfad neu.
    ///
    /// Geänderte Endpunkte werden in den Verbindungsmengen nachgeführt;
    /// ungültige Endpunkte lassen das Diagramm unverändert (`None`).
    pub fn replace_connection(&mut self, mut connection: Connection) -> Option<Connection> {
        let id = connection.id;
        let current = self.connections.get(&id)?;
        if connection.from == connection.to {
            return None;
        }
        let (Some(from), Some(to)) = (
            self.shapes.get(&connection.from),
            self.shapes.get(&connection.to),
        ) else {
            return None;
        };
        let (old_from, old_to) = (current.from, current.to);
        connection.update_geometry(from, to);
        let (new_from, new_to) = (connection.from, connection.to);

        let previous = self.connections.insert(id, connection)?;
        if (old_from, old_to) != (new_from, new_to) {
            for shape_id in [old_from, old_to] {
                if let Some(shape) = self.shapes.get_mut(&shape_id) {
                    shape.connections.remove(&id);
                }
            }
            for shape_id in [new_from, new_to] {
                if let Some(shape) = self.shapes.get_mut(&shape_id) {
                    shape.connections.insert(id);
                }
            }
        }
        Some(previous)
    }

    /// Berechnet die Pfade aller Verbindungen einer Shape neu.
    /// Gibt die IDs der Verbindungen zurück, deren Pfad sich geändert hat.
    pub fn rebuild_connection_geometry_for(&mut self, shape_id: u64) -> Vec<u64> {
        let Some(shape) = self.shapes.get(&shape_id) else {
            return Vec::new();
        };
        let ids: Vec<u64> = shape.connections.iter().copied().collect();
        self.rebuild_paths(&ids)
    }

    /// Berechnet alle Verbindungspfade neu.
    pub fn rebuild_connection_geometry(&mut self) -> Vec<u64> {
        let ids = self.connection_ids();
        self.rebuild_paths(&ids)
    }

    fn rebuild_paths(&mut self, ids: &[u64]) -> Vec<u64> {
        let mut changed = Vec::new();
        for id in ids {
            let Some(conn) = self.connections.get_mut(id) else {
                continue;
            };
            let (Some(from), Some(to)) = (self.shapes.get(&conn.from), self.shapes.get(&conn.to))
            else {
                continue;
            };
            let path = Connection::calculate_path(from, to, conn.from_side, conn.to_side, &conn.kind);
            if path != conn.path {
                conn.path = path;
                changed.push(*id);
            }
        }
        changed
    }

    /// Entfernt alles. Die ID-Zähler bleiben stehen.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.connections.clear();
    }
}

fn allocate_id(next: &mut Option<u64>, taken: impl Fn(u64) -> bool) -> Option<u64> {
    let mut candidate = (*next)?;
    while taken(candidate) {
        match candidate.checked_add(1) {
            Some(following) => candidate = following,
            None => {
                *next = None;
                return None;
            }
        }
    }
    *next = candidate.checked_add(1);
    Some(candidate)
}

fn reserve_id(next: &mut Option<u64>, id: u64) {
    *next = match (*next, id.checked_add(1)) {
        (Some(current), Some(above)) => Some(current.max(above)),
        _ => None,
    };
}
