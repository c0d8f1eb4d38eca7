//! Synchroner Pub/Sub-Bus für Diagramm-Events.
//!
//! - Handler werden pro `EventKind` in Registrierungsreihenfolge aufgerufen
//! - `once`-Handler werden vor ihrem Aufruf abgemeldet
//! - Fehler (`Err`) und Panics eines Handlers werden geloggt, die übrigen laufen weiter
//! - Handler dürfen während der Zustellung selbst `on`/`off`/`trigger` aufrufen
//!
//! Der Bus ist ein billig klonbares Handle; alle Klone teilen dieselben Abos.
//! Single-threaded: das Handle ist nicht `Send`.

use super::{DiagramEvent, EventKind};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// Handle einer Anmeldung, für `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler = Rc<RefCell<dyn FnMut(&DiagramEvent) -> anyhow::Result<()>>>;

struct Subscription {
    id: SubscriptionId,
    once: bool,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    subscribers: BTreeMap<EventKind, Vec<Subscription>>,
    next_id: u64,
}

/// Event-Bus mit geteiltem Zustand.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<(EventKind, usize)> = self
            .inner
            .try_borrow()
            .map(|inner| {
                inner
                    .subscribers
                    .iter()
                    .map(|(kind, subs)| (*kind, subs.len()))
                    .collect()
            })
            .unwrap_or_default();
        f.debug_struct("EventBus").field("subscribers", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alle abonnierbaren Events.
    pub fn available_events() -> &'static [EventKind] {
        &EventKind::ALL
    }

    /// Meldet einen Handler für `kind` an.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&DiagramEvent) -> anyhow::Result<()> + 'static,
    {
        self.subscribe(kind, false, handler)
    }

    /// Meldet einen Handler an, der nach dem ersten Aufruf automatisch abgemeldet wird.
    pub fn once<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&DiagramEvent) -> anyhow::Result<()> + 'static,
    {
        self.subscribe(kind, true, handler)
    }

    fn subscribe<F>(&self, kind: EventKind, once: bool, handler: F) -> SubscriptionId
    where
        F: FnMut(&DiagramEvent) -> anyhow::Result<()> + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        let handler: Handler = Rc::new(RefCell::new(handler));
        inner
            .subscribers
            .entry(kind)
            .or_default()
            .push(Subscription { id, once, handler });
        log::debug!("Handler {:?} für '{}' angemeldet", id, kind);
        id
    }

    /// Meldet einen Handler ab. `false` wenn die ID unbekannt ist.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        for subs in inner.subscribers.values_mut() {
            if let Some(pos) = subs.iter().position(|s| s.id == id) {
                subs.remove(pos);
                return true;
            }
        }
        false
    }

    /// Meldet alle Handler eines Events ab. Gibt die Anzahl zurück.
    pub fn off_all(&self, kind: EventKind) -> usize {
        self.inner
            .borrow_mut()
            .subscribers
            .remove(&kind)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Prüft ob für `kind` Handler angemeldet sind.
    pub fn has_subscribers(&self, kind: EventKind) -> bool {
        self.subscriber_count(kind) > 0
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .subscribers
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Stellt ein Event synchron an alle Handler zu.
    ///
    /// Gibt die Anzahl erfolgreich ausgeführter Handler zurück.
    pub fn trigger(&self, event: &DiagramEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<(SubscriptionId, Handler)> = {
            let mut inner = self.inner.borrow_mut();
            let Some(subs) = inner.subscribers.get_mut(&kind) else {
                return 0;
            };
            let handlers = subs.iter().map(|s| (s.id, Rc::clone(&s.handler))).collect();
            subs.retain(|s| !s.once);
            handlers
        };

        let mut delivered = 0;
        for (id, handler) in handlers {
            // Handler, der gerade selbst läuft (rekursives trigger), wird übersprungen
            let Ok(mut callback) = handler.try_borrow_mut() else {
                log::warn!(
                    "Handler {:?} für '{}' läuft bereits, rekursiver Aufruf übersprungen",
                    id,
                    kind
                );
                continue;
            };
            match catch_unwind(AssertUnwindSafe(|| (*callback)(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    log::error!("Handler {:?} für '{}' fehlgeschlagen: {:#}", id, kind, e);
                }
                Err(_) => {
                    log::error!("Handler {:?} für '{}' ist in Panik geraten", id, kind);
                }
            }
        }
        delivered
    }

    /// Entfernt alle Abos.
    pub fn clear(&self) {
        self.inner.borrow_mut().subscribers.clear();
    }
}
