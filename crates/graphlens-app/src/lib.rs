pub mod sample;
pub mod settings;

pub use sample::{EmbeddedSample, FileSample, SAMPLE_GRAPH, SampleSource};
pub use settings::ViewerSettings;

use graphlens_core::{ImportError, ValidationError};
use graphlens_events::{
    Event, EventBus, EventListener, ImportOrigin, ImportTicket, TooltipInfo,
};
use graphlens_graph::{GraphStore, InteractionEvent, RenderGraph, ViewProjection};
use graphlens_schema::{ValidGraph, parse_graph};
use std::fs;
use std::path::PathBuf;
use std::thread::JoinHandle;

/// Oldest notices are dropped beyond this many.
pub const MAX_NOTICES: usize = 64;

/// User-facing message recorded by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error {
        message: String,
        /// One line per validation error; empty for other failures.
        details: Vec<String>,
    },
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Info(message) | Self::Error { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub info: TooltipInfo,
    pub x: f32,
    pub y: f32,
}

/// Headless owner of the graph store.
///
/// Shells (CLI, desktop, tests) request changes through the methods here or
/// by publishing [`Event`]s; nothing touches the store until [`pump`] applies
/// the queued events in arrival order.
///
/// [`pump`]: GraphSession::pump
pub struct GraphSession {
    store: GraphStore,
    projection: ViewProjection,
    bus: EventBus,
    settings: ViewerSettings,
    last_ticket: u64,
    /// Resets requested through [`GraphSession::reset`] and not yet applied.
    pending_resets: usize,
    tooltip: Option<Tooltip>,
    notices: Vec<Notice>,
}

impl Default for GraphSession {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

impl GraphSession {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            store: GraphStore::new(),
            projection: ViewProjection::new(settings.palette()),
            bus: EventBus::new(),
            settings,
            last_ticket: 0,
            pending_resets: 0,
            tooltip: None,
            notices: Vec::new(),
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn projection(&self) -> &ViewProjection {
        &self.projection
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Recent notices, oldest first. At most [`MAX_NOTICES`] are kept.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn publish(&self, event: Event) {
        self.bus.publish(event);
    }

    /// Newest ticket handed out. Only imports carrying this ticket are applied.
    pub fn current_ticket(&self) -> ImportTicket {
        ImportTicket(self.last_ticket)
    }

    fn next_ticket(&mut self) -> ImportTicket {
        self.last_ticket += 1;
        ImportTicket(self.last_ticket)
    }

    /// Validate pasted JSON and queue the outcome.
    pub fn import_text(&mut self, text: &str) -> ImportTicket {
        let ticket = self.next_ticket();
        self.bus
            .publish(import_outcome(ticket, ImportOrigin::Text, parse_graph(text)));
        ticket
    }

    /// Read and validate `path` on a worker thread. Exactly one completion
    /// event is published when it finishes.
    pub fn import_file(&mut self, path: impl Into<PathBuf>) -> (ImportTicket, JoinHandle<()>) {
        let path = path.into();
        let ticket = self.next_ticket();
        let tx = self.bus.sender();
        tracing::debug!(%ticket, path = %path.display(), "reading graph file");

        let handle = std::thread::spawn(move || {
            let origin = ImportOrigin::File(path.clone());
            let event = match fs::read_to_string(&path) {
                Ok(text) => import_outcome(ticket, origin, parse_graph(&text)),
                Err(e) => Event::ImportFailed {
                    ticket,
                    origin,
                    error: ImportError::Io {
                        path,
                        message: e.to_string(),
                    },
                },
            };
            let _ = tx.send(event);
        });
        (ticket, handle)
    }

    pub fn load_sample(&mut self, source: &dyn SampleSource) -> ImportTicket {
        let ticket = self.next_ticket();
        let event = match source.fetch() {
            Ok(text) => import_outcome(ticket, ImportOrigin::Sample, parse_graph(&text)),
            Err(e) => Event::ImportFailed {
                ticket,
                origin: ImportOrigin::Sample,
                error: ImportError::Fetch(e),
            },
        };
        self.bus.publish(event);
        ticket
    }

    /// Load the sample configured in the settings.
    pub fn load_configured_sample(&mut self) -> ImportTicket {
        let source = self.settings.sample_source();
        self.load_sample(source.as_ref())
    }

    /// Queue a reset. Imports requested before this call are superseded;
    /// imports requested after it still apply.
    pub fn reset(&mut self) {
        self.next_ticket();
        self.pending_resets += 1;
        self.bus.publish(Event::Reset);
    }

    /// Forward a backend interaction as the event it stands for.
    pub fn interact(&self, interaction: InteractionEvent) {
        self.projection.forward(&self.store, interaction, &self.bus);
    }

    /// Apply every queued event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let bus = self.bus.clone();
        bus.dispatch_to(self)
    }

    pub fn render(&self) -> RenderGraph {
        self.projection.project(&self.store)
    }

    fn is_stale(&self, ticket: ImportTicket) -> bool {
        ticket < self.current_ticket()
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
    }

    fn import_completed(&mut self, origin: ImportOrigin, graph: ValidGraph) {
        let message = format!(
            "Loaded \"{}\" from {origin} ({} nodes, {} edges)",
            graph.meta.title,
            graph.nodes.len(),
            graph.edges.len()
        );
        self.store.load(graph);
        self.tooltip = None;
        self.push_notice(Notice::Info(message));
    }

    fn import_failed(&mut self, origin: ImportOrigin, error: ImportError) {
        tracing::warn!(%origin, %error, "import rejected");
        if matches!(error, ImportError::Fetch(_)) {
            self.store.unload();
            self.tooltip = None;
        }
        self.push_notice(Notice::Error {
            message: format!("Could not load {origin}: {error}"),
            details: error.violations().iter().map(ValidationError::to_string).collect(),
        });
    }
}

fn import_outcome(
    ticket: ImportTicket,
    origin: ImportOrigin,
    result: Result<ValidGraph, Vec<ValidationError>>,
) -> Event {
    match result {
        Ok(graph) => Event::ImportCompleted {
            ticket,
            origin,
            graph,
        },
        Err(errors) => Event::ImportFailed {
            ticket,
            origin,
            error: ImportError::Invalid(errors),
        },
    }
}

impl EventListener for GraphSession {
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::ImportCompleted {
                ticket,
                origin,
                graph,
            } => {
                if self.is_stale(ticket) {
                    tracing::debug!(%ticket, %origin, "discarding superseded import");
                    return;
                }
                self.import_completed(origin, graph);
            }
            Event::ImportFailed {
                ticket,
                origin,
                error,
            } => {
                if self.is_stale(ticket) {
                    tracing::debug!(%ticket, %origin, "discarding superseded import failure");
                    return;
                }
                self.import_failed(origin, error);
            }
            Event::Reset => {
                // A reset published straight onto the bus supersedes every
                // ticket issued so far.
                if self.pending_resets > 0 {
                    self.pending_resets -= 1;
                } else {
                    self.next_ticket();
                }
                self.store.reset();
                self.tooltip = None;
            }
            Event::SetFilter { node_type, visible } => {
                self.store.set_filter(&node_type, visible);
            }
            Event::SetAllFilters { visible } => self.store.set_all_filters(visible),
            Event::SetGroupBy(mode) => self.store.set_group_by(mode),
            Event::SetLayout(layout) => self.store.set_layout(layout),
            Event::SetSearchTerm(term) => self.store.set_search_term(term),
            Event::SelectNode(id) => self.store.select_node(id),
            Event::TooltipShow { info, x, y } => self.tooltip = Some(Tooltip { info, x, y }),
            Event::TooltipHide => self.tooltip = None,
            Event::ShowInfo { message } => self.push_notice(Notice::Info(message)),
            Event::ShowError { message } => self.push_notice(Notice::Error {
                message,
                details: Vec::new(),
            }),
        }
    }
}
