use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ticket handed out for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Orders the requests of one panel.
///
/// Every fetch takes a ticket; its response may be applied only while the
/// ticket is still the latest issued, so a slow earlier response can never
/// overwrite a newer one.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
