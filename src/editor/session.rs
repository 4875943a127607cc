use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Epoch captured when an async operation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket(u64);

/// Shared epoch counter for one editor instance.
///
/// Cloned handles can end the session from outside the controller, e.g. when
/// the user navigates away while a fetch is still pending. Results carrying a
/// ticket from an older epoch must be dropped.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    epoch: Arc<AtomicU64>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> SessionTicket {
        SessionTicket(self.epoch.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, ticket: SessionTicket) -> bool {
        self.epoch.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidates every ticket issued so far.
    pub fn close(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_invalidates_outstanding_tickets() {
        let handle = SessionHandle::new();
        let ticket = handle.ticket();
        assert!(handle.is_current(ticket));

        handle.clone().close();
        assert!(!handle.is_current(ticket));
        assert!(handle.is_current(handle.ticket()));
    }
}
