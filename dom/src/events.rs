use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DoubleClick,
}

/// Callback invoked with the node the event was dispatched on.
pub type Listener = Arc<dyn Fn(NodeId) + Send + Sync>;

/// Listeners keyed by target node and event kind.
#[derive(Default, Clone)]
pub struct EventRegistry {
    listeners: HashMap<(NodeId, EventKind), Vec<Listener>>,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("targets", &self.listeners.len())
            .finish()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(
        &mut self,
        target: NodeId,
        kind: EventKind,
        listener: impl Fn(NodeId) + Send + Sync + 'static,
    ) {
        self.listeners
            .entry((target, kind))
            .or_default()
            .push(Arc::new(listener));
    }

    /// Runs the listeners for `(target, kind)` in registration order.
    ///
    /// Returns how many listeners ran.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> usize {
        let Some(listeners) = self.listeners.get(&(target, kind)) else {
            debug!("EventRegistry: no {kind:?} listener on {target:?}");
            return 0;
        };
        for listener in listeners {
            listener(target);
        }
        listeners.len()
    }

    pub fn listener_count(&self, target: NodeId, kind: EventKind) -> usize {
        self.listeners.get(&(target, kind)).map_or(0, Vec::len)
    }
}
