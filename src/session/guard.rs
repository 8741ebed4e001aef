use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Allows at most one save per entity at a time
#[derive(Debug, Clone, Default)]
pub struct SaveGate {
    busy: Arc<AtomicBool>,
}

impl SaveGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another ticket is alive
    pub fn try_acquire(&self) -> Option<SaveTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SaveTicket { busy: Arc::clone(&self.busy) })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases its gate when dropped
#[derive(Debug)]
pub struct SaveTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for SaveTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
