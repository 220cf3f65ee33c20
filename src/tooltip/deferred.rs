/// Identifies one `edit()` call. Deferred work scheduled by an older session is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<T> {
    session: SessionId,
    task: T,
}

/// Work postponed to the next turn of the host's event loop.
///
/// Tasks are tagged with the session that scheduled them; [`DeferredQueue::drain_current`]
/// only hands back tasks of the session that is still current.
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    pending: Vec<Pending<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn schedule(&mut self, session: SessionId, task: T) {
        self.pending.push(Pending { session, task });
    }

    /// Drop every task belonging to `session`.
    pub fn cancel(&mut self, session: SessionId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.session != session);
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Empty the queue, returning tasks of `current` in scheduling order. Stale tasks are discarded.
    pub fn drain_current(&mut self, current: SessionId) -> Vec<T> {
        let mut live = Vec::new();
        for pending in self.pending.drain(..) {
            if pending.session == current {
                live.push(pending.task);
            } else {
                tracing::debug!(
                    stale = ?pending.session,
                    current = ?current,
                    "dropping deferred task from stale session"
                );
            }
        }
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_keeps_only_current_session() {
        let first = SessionId::default().next();
        let second = first.next();
        let mut queue = DeferredQueue::default();
        queue.schedule(first, "old");
        queue.schedule(second, "new");

        assert_eq!(queue.drain_current(second), vec!["new"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn cancel_removes_session_tasks() {
        let session = SessionId::default().next();
        let mut queue = DeferredQueue::default();
        queue.schedule(session, 1);
        queue.schedule(session.next(), 2);

        assert_eq!(queue.cancel(session), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.cancel_all(), 1);
        assert!(queue.drain_current(session.next()).is_empty());
    }
}
