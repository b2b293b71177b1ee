//! Last-keystroke-wins guard for async entry points.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A newer request was issued before this one settled; its result is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("superseded by a newer request")]
pub struct Superseded;

/// Shared request counter. Cloning shares the counter.
#[derive(Debug, Clone, Default)]
pub struct Generation(
    /// Id of the newest ticket.
    Arc<AtomicU64>,
);

impl Generation {
    /// A fresh counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, invalidating every ticket issued before it.
    pub fn issue(&self) -> Ticket {
        let issued = self.0.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        Ticket { counter: Some(Arc::clone(&self.0)), issued }
    }
}

/// Proof that a request is still the newest one.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// Counter shared with the issuing generation; `None` never expires.
    counter: Option<Arc<AtomicU64>>,
    /// Counter value at issue time.
    issued: u64,
}

impl Ticket {
    /// A ticket that is never superseded, for one-shot calls.
    pub const fn detached() -> Self {
        Self { counter: None, issued: 0 }
    }

    /// Whether no newer ticket has been issued since this one.
    pub fn is_current(&self) -> bool {
        self.counter.as_ref().is_none_or(|c| c.load(Ordering::Acquire) == self.issued)
    }

    /// Bail out with `Superseded` if a newer ticket exists.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` when the ticket is stale.
    pub fn check(&self) -> Result<(), Superseded> {
        if self.is_current() {
            Ok(())
        } else {
            tracing::debug!(issued = self.issued, "dropping superseded request");
            Err(Superseded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let generation = Generation::new();
        let first = generation.issue();
        assert!(first.check().is_ok());

        let second = generation.issue();
        assert_eq!(first.check(), Err(Superseded));
        assert!(second.is_current());
    }

    #[test]
    fn clones_share_the_counter() {
        let generation = Generation::new();
        let ticket = generation.issue();
        let _newer = generation.clone().issue();
        assert!(!ticket.is_current());
    }

    #[test]
    fn detached_ticket_never_expires() {
        let generation = Generation::new();
        let ticket = Ticket::detached();
        let _ = generation.issue();
        assert!(ticket.is_current());
    }
}
