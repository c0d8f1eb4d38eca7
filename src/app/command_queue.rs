//! Verzögerte Commands aus Event-Handlern und Plugins.
//!
//! Handler laufen während einer Mutation und dürfen das Diagramm nicht
//! direkt ändern. Sie legen Commands hier ab; der Host arbeitet sie nach
//! Abschluss über `EditorController::process_queued_commands` ab.

use super::EditorCommand;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Geteilte FIFO-Warteschlange (klonbares Handle).
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Rc<RefCell<VecDeque<EditorCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt einen Command an.
    pub fn push(&self, command: EditorCommand) {
        self.inner.borrow_mut().push_back(command);
    }

    /// Entnimmt alle wartenden Commands in Einfügereihenfolge.
    pub fn drain(&self) -> Vec<EditorCommand> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
