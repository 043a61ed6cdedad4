use std::sync::Arc;
use tokio::sync::watch;

use super::types::ContactSnapshot;

/// Latest snapshot. Replacement swaps the whole `Arc`, so a reader sees either
/// the previous or the next snapshot, never a mix.
#[derive(Debug, Clone)]
pub struct ContactStore {
    tx: Arc<watch::Sender<Option<Arc<ContactSnapshot>>>>,
}

impl ContactStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        ContactStore { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Option<Arc<ContactSnapshot>> {
        self.tx.borrow().clone()
    }

    pub fn replace(&self, next: ContactSnapshot) {
        let next = Arc::new(next);
        log::debug!("replacing snapshot ({} contacts)", next.len());
        self.tx.send_replace(Some(next));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ContactSnapshot>>> {
        self.tx.subscribe()
    }
}

impl Default for ContactStore {
    fn default() -> Self {
        Self::new()
    }
}
