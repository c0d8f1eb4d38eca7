//! Protokoll ausgeführter Commands samt Ergebnis.
//!
//! Die Einträge sind fortlaufend nummeriert; bei vollem Protokoll fällt
//! der älteste Eintrag heraus, die Nummern laufen weiter.

use super::EditorCommand;
use std::collections::VecDeque;

/// Standard-Kapazität des Protokolls.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Ergebnis eines ausgeführten Commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    /// Command mit Fehler abgebrochen (Fehlerkette als Text)
    Failed(String),
}

impl CommandOutcome {
    /// Übernimmt das Ergebnis eines Controller-Aufrufs.
    pub fn from_result(result: &anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => CommandOutcome::Completed,
            Err(error) => CommandOutcome::Failed(format!("{:#}", error)),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CommandOutcome::Failed(_))
    }
}

/// Ein Protokolleintrag.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRecord {
    /// Laufende Nummer ab 1
    pub sequence: u64,
    pub command: EditorCommand,
    pub outcome: CommandOutcome,
}

/// Begrenztes Protokoll der Commands, die der Controller ausgeführt hat.
#[derive(Debug)]
pub struct CommandLog {
    records: VecDeque<CommandRecord>,
    capacity: usize,
    next_sequence: u64,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Protokoll mit eigener Kapazität; `0` protokolliert nichts.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
            next_sequence: 1,
        }
    }

    /// Nimmt einen ausgeführten Command mit seinem Ergebnis auf.
    pub fn record(&mut self, command: EditorCommand, outcome: CommandOutcome) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        if let CommandOutcome::Failed(reason) = &outcome {
            log::debug!("Command #{} fehlgeschlagen: {}", sequence, reason);
        }
        if self.capacity == 0 {
            return;
        }
        if self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(CommandRecord {
            sequence,
            command,
            outcome,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Alle gehaltenen Einträge, älteste zuerst.
    pub fn records(&self) -> impl DoubleEndedIterator<Item = &CommandRecord> + ExactSizeIterator {
        self.records.iter()
    }

    /// Der zuletzt protokollierte Eintrag.
    pub fn last(&self) -> Option<&CommandRecord> {
        self.records.back()
    }

    /// Nur die fehlgeschlagenen Einträge.
    pub fn failures(&self) -> impl Iterator<Item = &CommandRecord> {
        self.records.iter().filter(|r| r.outcome.is_failed())
    }

    /// Anzahl Einträge, die wegen der Kapazität verworfen wurden.
    pub fn dropped(&self) -> u64 {
        (self.next_sequence - 1).saturating_sub(self.records.len() as u64)
    }

    /// Erfolgreiche Commands in Reihenfolge, z. B. zum erneuten Abspielen.
    pub fn completed_commands(&self) -> Vec<EditorCommand> {
        self.records
            .iter()
            .filter(|r| !r.outcome.is_failed())
            .map(|r| r.command.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
