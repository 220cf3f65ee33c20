//! Document-change notifications and their subscribers.

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::{DocumentView, Range, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorChange {
    TextChange {
        source: Source,
    },
    SelectionChange {
        range: Option<Range>,
        old_range: Option<Range>,
        source: Source,
    },
}

impl EditorChange {
    pub const fn source(&self) -> Source {
        match self {
            Self::TextChange { source } | Self::SelectionChange { source, .. } => *source,
        }
    }
}

/// Receives every editor change. Listeners only get read access to the document.
pub trait EditorListener {
    fn on_editor_change(&mut self, change: &EditorChange, doc: &dyn DocumentView);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Fan-out of editor changes to registered listeners, owned by the editor instance.
#[derive(Default)]
pub struct Emitter {
    next_id: u64,
    listeners: Vec<(ListenerId, Rc<RefCell<dyn EditorListener>>)>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Rc<RefCell<dyn EditorListener>>) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, listener));
        tracing::debug!(?id, total = self.listeners.len(), "editor listener subscribed");
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        let removed = self.listeners.len() != before;
        tracing::debug!(?id, removed, "editor listener unsubscribed");
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&self, change: &EditorChange, doc: &dyn DocumentView) {
        for (_, listener) in &self.listeners {
            listener.borrow_mut().on_editor_change(change, doc);
        }
    }

    pub fn emit_all(&self, changes: &[EditorChange], doc: &dyn DocumentView) {
        for change in changes {
            self.emit(change, doc);
        }
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
