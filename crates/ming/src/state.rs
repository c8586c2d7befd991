use crate::tracked::TrackedDocument;

use ming_core::Document;
use std::{cell::Cell, rc::Rc};

/// Persistence status of a mapped instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Constructed in memory, never inserted.
    New,

    /// In sync with the store.
    Clean,

    /// Mutated since the last insert or update.
    Dirty,

    /// Marked for removal. Sessions must delete and expunge, never re-save.
    Deleted,
}

/// Observes mutations of a tracked document and soils the owning state.
///
/// The tracker shares the status cell with its [`InstanceState`], so tracked
/// containers can carry a tracker without holding the state itself.
#[derive(Debug, Clone)]
pub struct Tracker {
    status: Rc<Cell<Status>>,
}

impl Tracker {
    fn new(status: Rc<Cell<Status>>) -> Tracker {
        Tracker { status }
    }

    /// Records that the tracked document changed.
    ///
    /// Only a clean instance becomes dirty: new instances stay new until
    /// their first insert and deleted instances stay deleted. Repeated calls
    /// have no further effect.
    pub fn soil(&self) {
        if self.status.get() == Status::Clean {
            self.status.set(Status::Dirty);
            tracing::trace!("instance soiled");
        }
    }

    pub fn status(&self) -> Status {
        self.status.get()
    }
}

/// Per-instance persistence record: status, tracked document, an untracked
/// `raw` document for auxiliary data, and the tracker wiring them together.
#[derive(Debug)]
pub struct InstanceState {
    status: Rc<Cell<Status>>,
    document: TrackedDocument,
    raw: Document,
    tracker: Tracker,
}

impl InstanceState {
    /// State for a freshly constructed instance: empty document, status `new`.
    pub fn new() -> InstanceState {
        InstanceState::with_document(Document::new(), Status::New)
    }

    /// State wrapping `document`, e.g. one read back from the store.
    pub fn with_document(document: Document, status: Status) -> InstanceState {
        let status = Rc::new(Cell::new(status));
        let tracker = Tracker::new(status.clone());

        InstanceState {
            document: TrackedDocument::new(document, tracker.clone()),
            status,
            raw: Document::new(),
            tracker,
        }
    }

    pub fn status(&self) -> Status {
        self.status.get()
    }

    /// Sets the status directly. Used by mappers and sessions to record
    /// lifecycle transitions; field writes go through the tracker instead.
    pub fn set_status(&self, status: Status) {
        self.status.set(status);
    }

    pub fn is_new(&self) -> bool {
        self.status() == Status::New
    }

    pub fn is_clean(&self) -> bool {
        self.status() == Status::Clean
    }

    pub fn is_dirty(&self) -> bool {
        self.status() == Status::Dirty
    }

    pub fn is_deleted(&self) -> bool {
        self.status() == Status::Deleted
    }

    pub fn soil(&self) {
        self.tracker.soil();
    }

    pub fn document(&self) -> &TrackedDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut TrackedDocument {
        &mut self.document
    }

    pub fn raw(&self) -> &Document {
        &self.raw
    }

    /// Untracked: changes to `raw` never soil the instance.
    pub fn raw_mut(&mut self) -> &mut Document {
        &mut self.raw
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Replaces the document wholesale without soiling, e.g. after the
    /// session re-reads the stored copy.
    pub fn replace_document(&mut self, document: Document) {
        self.document.replace(document);
    }
}

impl Default for InstanceState {
    fn default() -> Self {
        InstanceState::new()
    }
}
