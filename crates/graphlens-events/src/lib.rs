use crossbeam_channel::{Receiver, Sender, unbounded};
use graphlens_core::{GroupBy, ImportError, LayoutMode, NodeId};
use graphlens_schema::ValidGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stamp given to every import request. Larger tickets supersede smaller ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImportTicket(pub u64);

impl fmt::Display for ImportTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportOrigin {
    File(PathBuf),
    Text,
    Sample,
}

impl fmt::Display for ImportOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Text => write!(f, "pasted text"),
            Self::Sample => write!(f, "sample graph"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipInfo {
    pub node_id: NodeId,
    pub title: String,
    pub description: String,
}

/// State-transition messages. Every change to the graph store travels through
/// the bus as one of these and is applied in arrival order.
#[derive(Debug, Clone)]
pub enum Event {
    // Import
    ImportCompleted {
        ticket: ImportTicket,
        origin: ImportOrigin,
        graph: ValidGraph,
    },
    ImportFailed {
        ticket: ImportTicket,
        origin: ImportOrigin,
        error: ImportError,
    },
    Reset,

    // Filters and view
    SetFilter {
        node_type: String,
        visible: bool,
    },
    SetAllFilters {
        visible: bool,
    },
    SetGroupBy(GroupBy),
    SetLayout(LayoutMode),
    SetSearchTerm(String),
    SelectNode(Option<NodeId>),

    // UI
    TooltipShow {
        info: TooltipInfo,
        x: f32,
        y: f32,
    },
    TooltipHide,

    // Notifications
    ShowInfo {
        message: String,
    },
    ShowError {
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Sender handle for producers on other threads (file readers).
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        // The bus owns a receiver, so the channel never disconnects.
        let _ = self.tx.send(event);
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Dispatch all pending events to a listener, oldest first.
    /// Returns the number of events handled.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            tracing::trace!(?event, "dispatching event");
            listener.handle_event(event);
            handled += 1;
        }
        handled
    }
}

/// Implement this to receive events from the [`EventBus`].
pub trait EventListener {
    fn handle_event(&mut self, event: Event);
}
