use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one layout request issued through a [`LayoutSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Tracks the most recent layout request so results of superseded requests
/// can be dropped by the caller. Layout itself stays stateless.
#[derive(Debug, Default)]
pub struct LayoutSession {
    latest: AtomicU64,
}

impl LayoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Returns `output` only if no newer request was started since `ticket`.
    pub fn accept<T>(&self, ticket: Ticket, output: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(output)
        } else {
            tracing::debug!(ticket = ticket.0, "dropping superseded layout result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn newer_request_supersedes_older() {
        let session = LayoutSession::new();
        let first = session.begin();
        assert!(session.is_current(first));
        let second = session.begin();
        assert!(second > first);
        assert_eq!(session.accept(first, "stale"), None);
        assert_eq!(session.accept(second, "fresh"), Some("fresh"));
    }

    #[test]
    fn tickets_are_unique_across_threads() {
        let session = Arc::new(LayoutSession::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || (0..100).map(|_| session.begin()).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<Ticket> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 400);
        assert!(session.is_current(all[399]));
    }
}
